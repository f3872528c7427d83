use serde::Serialize;

use crate::error::ActionOutcome;

/// One row of the output audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    pub action: String,
    pub username: String,
    pub result: String,
}

impl ActionResult {
    pub fn new(action: impl Into<String>, username: impl Into<String>, outcome: &ActionOutcome) -> Self {
        Self {
            action: action.into(),
            username: username.into(),
            result: match outcome {
                Ok(success) => format!("SUCCESS: {success}"),
                Err(err) => format!("ERROR: {err}"),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.starts_with("SUCCESS:")
    }
}
