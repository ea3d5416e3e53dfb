/// Failure reported by a [`KeyedStore`](crate::KeyedStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request body is empty")]
    EmptyRequest,

    #[error("malformed request: {0}")]
    MalformedRequest(#[source] serde_json::Error),

    #[error("unsupported algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    #[error("no hashes to look up")]
    NoHashes,

    #[error("too many hashes: {count} exceeds the limit of {max}")]
    TooManyHashes { count: usize, max: usize },

    #[error("store execution failed: {0}")]
    StoreExecution(#[from] StoreError),

    #[error("invalid {key}: {reason}")]
    Config { key: &'static str, reason: String },
}

impl Error {
    /// Whether the caller, rather than the service, is at fault.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::EmptyRequest
                | Error::MalformedRequest(_)
                | Error::UnsupportedAlgorithm(_)
                | Error::NoHashes
                | Error::TooManyHashes { .. }
        )
    }

    /// HTTP-style status for this error.
    pub fn status(&self) -> u16 {
        if self.is_caller_error() { 400 } else { 500 }
    }

    /// Message safe to return to a caller. Infrastructure detail stays in
    /// the logs.
    pub fn public_message(&self) -> String {
        match self {
            Error::StoreExecution(_) => "internal store error".to_string(),
            Error::Config { .. } => "service misconfigured".to_string(),
            other => other.to_string(),
        }
    }
}
