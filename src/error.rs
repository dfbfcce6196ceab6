use thiserror::Error;

/// The text half of a turn failed. Aborts the turn; the caller keeps its
/// previous state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Request(String),

    #[error("invalid format")]
    InvalidFormat,

    #[error("malformed model output: {0}")]
    MalformedOutput(String),
}

/// Never reaches the player; the narrator swaps in a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("image request failed: {0}")]
    Request(String),

    #[error("no image returned")]
    Empty,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not serialize save data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("corrupt save data: {0}")]
    Corrupt(String),
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("the API_KEY environment variable is not set")]
    MissingCredential,

    #[error("invalid configuration value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("could not build the HTTP client: {0}")]
    HttpClient(String),
}
