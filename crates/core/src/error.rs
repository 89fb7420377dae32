use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SymptomError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(
        "failed to load dataset (path: {path}): {reason}",
        path = path.display()
    )]
    DatasetLoad { path: PathBuf, reason: String },
    #[error("AI provider unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("malformed webhook request: {0}")]
    MalformedLegacyRequest(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SymptomError {
    /// The text shown to an end user for recoverable input errors.
    pub fn user_message(&self) -> String {
        match self {
            SymptomError::InvalidInput(msg) => msg.clone(),
            other => format!("An error occurred: {other}"),
        }
    }
}

pub type SymptomResult<T> = std::result::Result<T, SymptomError>;
