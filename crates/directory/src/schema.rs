use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordProfile {
    pub password: String,
    pub force_change_password_next_login: bool,
}

/// Body of the create request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub user_principal_name: String,
    pub account_enabled: bool,
    pub given_name: String,
    pub display_name: String,
    pub surname: String,
    pub mail_nickname: String,
    pub department: String,
    pub immutable_id: String,
    pub password_profile: PasswordProfile,
    pub password_policies: String,
    pub usage_location: String,
}

/// Body of the patch request. The immutable id has no place here.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub user_principal_name: String,
    pub account_enabled: bool,
    pub given_name: String,
    pub display_name: String,
    pub surname: String,
    pub mail_nickname: String,
    pub department: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LicenseGrant {
    pub disabled_plans: Vec<String>,
    pub sku_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssignLicense {
    pub add_licenses: Vec<LicenseGrant>,
    pub remove_licenses: Vec<String>,
}

impl AssignLicense {
    pub fn grant(sku_id: impl Into<String>, disabled_plans: Vec<String>) -> Self {
        Self {
            add_licenses: vec![LicenseGrant {
                disabled_plans,
                sku_id: sku_id.into(),
            }],
            remove_licenses: vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_user_uses_directory_field_names() -> serde_json::Result<()> {
        let user = NewUser {
            user_principal_name: "jdoe@example.edu".into(),
            account_enabled: true,
            given_name: "John".into(),
            display_name: "John Doe".into(),
            surname: "Doe".into(),
            mail_nickname: "jdoe".into(),
            department: "Biology".into(),
            immutable_id: "1554943643675475475437".into(),
            password_profile: PasswordProfile {
                password: "initial".into(),
                force_change_password_next_login: false,
            },
            password_policies: "DisablePasswordExpiration".into(),
            usage_location: "US".into(),
        };
        let value = serde_json::to_value(&user)?;
        assert_eq!(value["userPrincipalName"], "jdoe@example.edu");
        assert_eq!(value["immutableId"], "1554943643675475475437");
        assert_eq!(
            value["passwordProfile"],
            json!({"password": "initial", "forceChangePasswordNextLogin": false})
        );
        Ok(())
    }

    #[test]
    fn license_grant_shape() -> serde_json::Result<()> {
        let body = AssignLicense::grant("sku", vec!["plan-a".into(), "plan-b".into()]);
        assert_eq!(
            serde_json::to_value(&body)?,
            json!({
                "addLicenses": [{"disabledPlans": ["plan-a", "plan-b"], "skuId": "sku"}],
                "removeLicenses": []
            })
        );
        Ok(())
    }
}
