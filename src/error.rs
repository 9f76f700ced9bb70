use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfirmError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    /// The backend answered with a non-success status. Displays only the
    /// backend's message so it can be shown to the user as-is.
    #[error("{message}")]
    ApiError { status: u16, message: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("not authenticated")]
    NotAuthenticated,
}

pub type Result<T> = std::result::Result<T, ConfirmError>;
