use thiserror::Error;

#[derive(Error, Debug)]
pub enum TradingError {
    /// Bad credentials or a login response missing required fields.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The platform answered 401 to a trading call.
    #[error("Session rejected by {endpoint}")]
    SessionExpired { endpoint: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Trading API error on {endpoint}: {status} - {body}")]
    TradingApiError {
        status: u16,
        body: String,
        endpoint: String,
    },

    #[error("Network error on {endpoint}: {message}")]
    NetworkError { endpoint: String, message: String },

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::core::config::ConfigError),
}

impl TradingError {
    /// Whether the platform refused the credentials or the session.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed(_) | Self::SessionExpired { .. }
        )
    }

    /// Whether repeating the same call later may succeed.
    ///
    /// The client never retries these on its own; this is a hint for callers
    /// that run their own retry loop.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NetworkError { .. } => true,
            Self::TradingApiError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::TradingApiError { status, .. } => Some(*status),
            Self::SessionExpired { .. } => Some(401),
            _ => None,
        }
    }
}
