use thiserror::Error;

/// Which mutating call a remote or transport failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

/// Row-scoped failure of a single user action. The display text is what ends
/// up after `ERROR: ` in the result column.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    /// A field the action needs is blank.
    #[error("Missing an expected input value for {0} in input file.")]
    MissingValue(&'static str),
    /// The action is not one of create, update or delete.
    #[error("Unrecognized action.")]
    UnrecognizedAction,
    /// The login service did not issue a token.
    #[error("unable to authenticate to the directory login service.")]
    Authentication,
    /// The principal name (or rename target) is already taken.
    #[error("username already taken!")]
    AlreadyExists,
    /// The principal name does not exist.
    #[error("user could not be found in the directory!")]
    NotFound,
    /// The directory answered the mutating call with an unexpected status.
    #[error("{}", remote_message(.operation))]
    Remote { operation: Operation, status: u16 },
    /// The mutating call failed before a response arrived.
    #[error("could not {} directory user.", operation_verb(.operation))]
    Transport { operation: Operation },
    /// The row could not be read.
    #[error("unknown error while processing row: {0}")]
    Unexpected(String),
}

fn remote_message(operation: &Operation) -> &'static str {
    match operation {
        Operation::Create => "user could not be created in the directory.",
        Operation::Update => "could not update user in the directory.",
        Operation::Delete => "could not delete user in the directory.",
    }
}

fn operation_verb(operation: &Operation) -> &'static str {
    match operation {
        Operation::Create => "create",
        Operation::Update => "update",
        Operation::Delete => "delete",
    }
}

/// Outcome of an action that reached the directory successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSuccess {
    Created,
    /// The user exists but the license grant was refused.
    CreatedWithoutLicense,
    Updated,
    Deleted,
}

impl std::fmt::Display for ActionSuccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ActionSuccess::Created => "user was created in the directory.",
            ActionSuccess::CreatedWithoutLicense => {
                "user added but with no licenses in the directory."
            }
            ActionSuccess::Updated => "user was updated in the directory.",
            ActionSuccess::Deleted => "user deleted in the directory.",
        })
    }
}

pub type ActionOutcome = Result<ActionSuccess, ActionError>;
