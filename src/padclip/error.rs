use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid selection key: {0}")]
    InvalidKey(String),

    #[error("Cannot resolve path {path}: {reason}")]
    PathResolution { path: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ClipError>;
