use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Failures talking to a provider's model listing endpoint.
///
/// Each variant is reported once; callers never retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// Connection failure, timeout, or a non-success HTTP status
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// Body was not a model listing envelope
    #[error("invalid response from {url}: {message}")]
    Decode { url: String, message: String },

    /// Envelope decoded but reported `success: false`
    #[error("upstream at {url} reported failure")]
    Rejected { url: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// True for failures caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidArgument(_)
                | CoreError::InvalidConfiguration(_)
                | CoreError::NotFound(_)
                | CoreError::UnsupportedProvider(_)
        )
    }
}

// Implement From for common error types
#[cfg(feature = "database")]
impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        CoreError::Persistence(err.to_string())
    }
}

#[cfg(feature = "database")]
impl From<sqlx::migrate::MigrateError> for CoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        CoreError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Persistence(format!("column encoding: {}", err))
    }
}
