use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("plot failed: {0}")]
    Plot(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
}

impl GridError {
    pub fn invalid(message: impl Into<String>) -> Self {
        GridError::InvalidArgument(message.into())
    }
}
