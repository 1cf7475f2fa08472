//! Unified error handling for the console.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Engine error: {0}")]
    Engine(#[from] ferrand_engine::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid command: {0}")]
    BadCommand(String),
}

/// A message shown to the user in place of the failed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl AppError {
    /// Turn the error into a user-facing notice, logging it on the way.
    pub fn to_notice(&self) -> Notice {
        let (title, message) = match self {
            AppError::Engine(e) => {
                tracing::warn!(kind = e.kind(), "Engine error: {:?}", e);
                (e.title().to_string(), e.to_string())
            }
            AppError::BadCommand(msg) => ("Invalid command".to_string(), msg.clone()),
            AppError::Io(e) => {
                tracing::error!("IO error: {:?}", e);
                ("Input/output failure".to_string(), e.to_string())
            }
        };

        Notice { title, message }
    }
}

/// Result type alias for console operations.
pub type Result<T> = std::result::Result<T, AppError>;
