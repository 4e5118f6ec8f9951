use crate::core::errors::TradingError;
use std::collections::HashMap;

/// Result type for signing operations: headers to attach to the request
pub type SignatureResult = Result<HashMap<String, String>, TradingError>;

/// Signer trait for request authentication
///
/// Implementations produce the headers that prove the caller's identity to the
/// trading API. The authenticated [`Session`](crate::core::session::Session)
/// is the production implementation.
pub trait Signer: Send + Sync {
    /// Produce authentication headers for a request
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, etc.)
    /// * `endpoint` - API endpoint path
    fn sign_request(&self, method: &str, endpoint: &str) -> SignatureResult;
}
