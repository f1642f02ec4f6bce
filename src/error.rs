use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeedTestError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unknown storage backend: {0}")]
    UnknownBackend(String),
}

pub type Result<T> = std::result::Result<T, SpeedTestError>;
