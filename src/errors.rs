use thiserror::Error;

/// Errors that can occur while loading rosters or resolving members.
#[derive(Error, Debug)]
pub enum MemberLensError {
    #[error("user not found: '{token}'")]
    NotFound { token: String },

    #[error("roster error: {message} (path: {path})")]
    Roster { message: String, path: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid parameters: {message}")]
    InvalidParams { message: String },

    #[error("prompt error: {message}")]
    Prompt { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `MemberLensError`.
pub type Result<T> = std::result::Result<T, MemberLensError>;
