use dirbatch_directory::schema::{AssignLicense, NewUser, PasswordProfile, UserPatch};
use dirbatch_directory::{Directory, StatusCode};

use crate::action::{ActionKind, UserAction};
use crate::config::Config as LicenseConfig;
use crate::error::{ActionError, ActionOutcome, ActionSuccess, Operation};

/// Returns the first blank field by its input name.
fn first_missing(fields: &[(&'static str, bool)]) -> Result<(), ActionError> {
    match fields.iter().find(|(_, present)| !present) {
        Some((name, _)) => Err(ActionError::MissingValue(*name)),
        None => Ok(()),
    }
}

/// Maps each user action to its workflow against the directory.
#[derive(Clone)]
pub struct Dispatcher {
    directory: Directory,
    licenses: LicenseConfig,
}

impl Dispatcher {
    pub fn new(directory: Directory, licenses: LicenseConfig) -> Self {
        Self {
            directory,
            licenses,
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub async fn dispatch(&self, action: &UserAction) -> ActionOutcome {
        let outcome = match &action.action {
            ActionKind::Create => self.create(action).await,
            ActionKind::Update => self.update(action).await,
            ActionKind::Delete => self.delete(action).await,
            ActionKind::Unrecognized(name) => {
                tracing::error!("unrecognized action: {name}");
                Err(ActionError::UnrecognizedAction)
            }
        };
        match &outcome {
            Ok(ActionSuccess::CreatedWithoutLicense) => {
                tracing::error!("user {} did not get licenses in the directory", action.username)
            }
            Ok(success) => tracing::info!("{}: {success}", action.username),
            Err(err) => tracing::error!(
                "{} {} failed: {err}",
                action.action.as_str(),
                action.username
            ),
        }
        outcome
    }

    async fn authenticate(&self) -> Result<(), ActionError> {
        self.directory
            .ensure_token()
            .await
            .map(|_| ())
            .map_err(|_| ActionError::Authentication)
    }

    async fn create(&self, action: &UserAction) -> ActionOutcome {
        first_missing(&[
            ("username", !action.username.is_empty()),
            ("loginDisabled", action.login_disabled.is_some()),
            ("UDCid", !action.immutable_id.is_empty()),
            ("givenName", !action.given_name.is_empty()),
            ("fullName", !action.full_name.is_empty()),
            ("sn", !action.surname.is_empty()),
            ("primO", !action.organizational_unit.is_empty()),
            ("userPassword", !action.initial_password.is_empty()),
        ])?;
        self.authenticate().await?;

        let upn = self.directory.principal_name(&action.username);
        if self.directory.exists(&upn).await {
            tracing::error!("cannot create user - user already exists: {upn}");
            return Err(ActionError::AlreadyExists);
        }

        let user = NewUser {
            user_principal_name: upn.clone(),
            account_enabled: true,
            given_name: action.given_name.clone(),
            display_name: action.full_name.clone(),
            surname: action.surname.clone(),
            mail_nickname: action.username.clone(),
            department: action.organizational_unit.clone(),
            immutable_id: action.immutable_id.clone(),
            password_profile: PasswordProfile {
                password: action.initial_password.clone(),
                force_change_password_next_login: false,
            },
            password_policies: "DisablePasswordExpiration".to_string(),
            usage_location: self.directory.config().usage_location().to_string(),
        };
        match self.directory.create_user(&user).await {
            Ok(StatusCode::CREATED) => {}
            Ok(status) => {
                tracing::error!("user {upn} could not be created ({status})");
                return Err(ActionError::Remote {
                    operation: Operation::Create,
                    status: status.as_u16(),
                });
            }
            Err(err) => {
                tracing::error!("create failed for user {upn}: {err}");
                return Err(ActionError::Transport {
                    operation: Operation::Create,
                });
            }
        }

        let user_type = self.licenses.user_type(&action.username);
        let license = AssignLicense::grant(
            self.licenses.sku_for(user_type),
            self.licenses.disabled_plans().to_vec(),
        );
        tracing::debug!("assigning {user_type:?} license to {upn}");
        match self.directory.assign_license(&upn, &license).await {
            Ok(StatusCode::OK) => Ok(ActionSuccess::Created),
            Ok(status) => {
                tracing::error!("license assignment for {upn} returned {status}");
                Ok(ActionSuccess::CreatedWithoutLicense)
            }
            Err(err) => {
                tracing::error!("license assignment for {upn} failed: {err}");
                Ok(ActionSuccess::CreatedWithoutLicense)
            }
        }
    }

    async fn update(&self, action: &UserAction) -> ActionOutcome {
        first_missing(&[
            ("username", !action.username.is_empty()),
            ("newusername", !action.new_username.is_empty()),
            ("loginDisabled", action.login_disabled.is_some()),
            ("givenName", !action.given_name.is_empty()),
            ("fullName", !action.full_name.is_empty()),
            ("sn", !action.surname.is_empty()),
            ("primO", !action.organizational_unit.is_empty()),
        ])?;
        self.authenticate().await?;

        let upn = self.directory.principal_name(&action.username);
        if !self.directory.exists(&upn).await {
            return Err(ActionError::NotFound);
        }

        let target_upn = self.directory.principal_name(&action.new_username);
        if action.is_rename() && self.directory.exists(&target_upn).await {
            tracing::error!("cannot rename user - user already exists: {target_upn}");
            return Err(ActionError::AlreadyExists);
        }

        let patch = UserPatch {
            user_principal_name: target_upn,
            account_enabled: action.account_enabled().unwrap_or(true),
            given_name: action.given_name.clone(),
            display_name: action.full_name.clone(),
            surname: action.surname.clone(),
            mail_nickname: action.new_username.clone(),
            department: action.organizational_unit.clone(),
        };
        match self.directory.patch_user(&upn, &patch).await {
            Ok(StatusCode::NO_CONTENT) => Ok(ActionSuccess::Updated),
            Ok(status) => Err(ActionError::Remote {
                operation: Operation::Update,
                status: status.as_u16(),
            }),
            Err(err) => {
                tracing::error!("update failed for user {upn}: {err}");
                Err(ActionError::Transport {
                    operation: Operation::Update,
                })
            }
        }
    }

    async fn delete(&self, action: &UserAction) -> ActionOutcome {
        first_missing(&[("username", !action.username.is_empty())])?;
        self.authenticate().await?;

        let upn = self.directory.principal_name(&action.username);
        if !self.directory.exists(&upn).await {
            return Err(ActionError::NotFound);
        }

        match self.directory.delete_user(&upn).await {
            Ok(StatusCode::NO_CONTENT) => Ok(ActionSuccess::Deleted),
            Ok(status) => Err(ActionError::Remote {
                operation: Operation::Delete,
                status: status.as_u16(),
            }),
            Err(err) => {
                tracing::error!("delete failed for user {upn}: {err}");
                Err(ActionError::Transport {
                    operation: Operation::Delete,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::first_missing;
    use crate::error::ActionError;

    #[test]
    fn reports_first_blank_field() {
        assert_eq!(
            first_missing(&[("username", true), ("sn", false), ("primO", false)]),
            Err(ActionError::MissingValue("sn"))
        );
        assert_eq!(first_missing(&[("username", true)]), Ok(()));
    }
}
