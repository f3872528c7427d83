use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads any JSON scalar as text. Numbers keep their literal digits, booleans
/// become `True`/`False`, null becomes empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}

/// One element of the `useractions` array as it appears on disk.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct UserActionRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub action: String,
    #[serde(deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(deserialize_with = "lenient_string")]
    pub newusername: String,
    #[serde(rename = "loginDisabled", deserialize_with = "lenient_string")]
    pub login_disabled: String,
    #[serde(rename = "UDCid", alias = "immutableId", deserialize_with = "lenient_string")]
    pub immutable_id: String,
    #[serde(rename = "givenName", deserialize_with = "lenient_string")]
    pub given_name: String,
    #[serde(rename = "fullName", deserialize_with = "lenient_string")]
    pub full_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub sn: String,
    #[serde(rename = "primO", deserialize_with = "lenient_string")]
    pub prim_o: String,
    #[serde(rename = "userPassword", deserialize_with = "lenient_string")]
    pub user_password: String,
}

/// The `useractions` document.
#[derive(Debug, Deserialize)]
pub struct UserActions {
    pub useractions: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Create,
    Update,
    Delete,
    Unrecognized(String),
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Update => "update",
            ActionKind::Delete => "delete",
            ActionKind::Unrecognized(action) => action,
        }
    }
}

impl From<&str> for ActionKind {
    fn from(value: &str) -> Self {
        match value {
            "create" => ActionKind::Create,
            "update" => ActionKind::Update,
            "delete" => ActionKind::Delete,
            other => ActionKind::Unrecognized(other.to_string()),
        }
    }
}

/// A user action with its flags parsed. Text fields stay as given; an empty
/// field is reported by the dispatcher when the action needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAction {
    pub action: ActionKind,
    pub username: String,
    pub new_username: String,
    pub login_disabled: Option<bool>,
    pub immutable_id: String,
    pub given_name: String,
    pub full_name: String,
    pub surname: String,
    pub organizational_unit: String,
    pub initial_password: String,
}

impl From<UserActionRecord> for UserAction {
    fn from(record: UserActionRecord) -> Self {
        let new_username = if record.newusername.is_empty() {
            record.username.clone()
        } else {
            record.newusername
        };
        let login_disabled = if record.login_disabled.is_empty() {
            None
        } else {
            Some(record.login_disabled == "True")
        };
        Self {
            action: ActionKind::from(record.action.as_str()),
            username: record.username,
            new_username,
            login_disabled,
            immutable_id: record.immutable_id,
            given_name: record.given_name,
            full_name: record.full_name,
            surname: record.sn,
            organizational_unit: record.prim_o,
            initial_password: record.user_password,
        }
    }
}

impl UserAction {
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        if !value.is_object() {
            return Err(serde::de::Error::custom("expected a user action object"));
        }
        serde_json::from_value::<UserActionRecord>(value).map(Into::into)
    }

    pub fn is_rename(&self) -> bool {
        self.new_username != self.username
    }

    /// `accountEnabled` is the negation of the input's `loginDisabled`.
    pub fn account_enabled(&self) -> Option<bool> {
        self.login_disabled.map(|disabled| !disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_documented_record() -> serde_json::Result<()> {
        let value: serde_json::Value = serde_json::from_str(
            r#"{
                "action": "create",
                "username": "testuserj",
                "newusername": "testuserj",
                "loginDisabled": "False",
                "UDCid": 1554943643675475475437,
                "givenName": "John",
                "fullName": "John The Testuser",
                "sn": "Testuser",
                "primO": "Biology",
                "userPassword": "initial password"
            }"#,
        )?;
        let action = UserAction::from_value(value)?;
        assert_eq!(action.action, ActionKind::Create);
        assert_eq!(action.login_disabled, Some(false));
        assert_eq!(action.account_enabled(), Some(true));
        assert_eq!(action.immutable_id, "1554943643675475475437");
        assert_eq!(action.surname, "Testuser");
        assert_eq!(action.organizational_unit, "Biology");
        assert!(!action.is_rename());
        Ok(())
    }

    #[test]
    fn missing_fields_are_empty() -> serde_json::Result<()> {
        let action = UserAction::from_value(json!({"action": "bogus", "username": "x"}))?;
        assert_eq!(action.action, ActionKind::Unrecognized("bogus".into()));
        assert_eq!(action.action.as_str(), "bogus");
        assert_eq!(action.new_username, "x");
        assert_eq!(action.login_disabled, None);
        assert!(action.immutable_id.is_empty());
        Ok(())
    }

    #[test]
    fn login_disabled_matches_literal_true_only() -> serde_json::Result<()> {
        let disabled = UserAction::from_value(json!({"loginDisabled": "True"}))?;
        assert_eq!(disabled.account_enabled(), Some(false));
        let lowercase = UserAction::from_value(json!({"loginDisabled": "true"}))?;
        assert_eq!(lowercase.account_enabled(), Some(true));
        let boolean = UserAction::from_value(json!({"loginDisabled": true}))?;
        assert_eq!(boolean.account_enabled(), Some(false));
        Ok(())
    }

    #[test]
    fn immutable_id_alias() -> serde_json::Result<()> {
        let action = UserAction::from_value(json!({"immutableId": "abc"}))?;
        assert_eq!(action.immutable_id, "abc");
        Ok(())
    }

    #[test]
    fn non_object_row_is_rejected() {
        assert!(UserAction::from_value(json!(["create", "x"])).is_err());
        assert!(UserAction::from_value(json!("create")).is_err());
    }
}
