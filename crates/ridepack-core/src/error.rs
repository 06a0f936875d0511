use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid duration window: min {min} exceeds max {max}")]
    InvalidWindow { min: i64, max: i64 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
