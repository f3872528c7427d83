use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DirectoryError {
    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// The service answered with an unexpected status.
    #[error("directory error ({status}): {text}")]
    HttpFailure { status: u16, text: String },
    /// The response body could not be decoded.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
    /// The configured api url cannot carry a request path.
    #[error("invalid directory url: {0}")]
    InvalidUrl(String),
    /// The login service answered without an access token.
    #[error("login service response did not contain an access token")]
    MissingAccessToken,
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;
