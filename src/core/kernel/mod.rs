/// Transport layer for the trading platform
///
/// The kernel knows how to move HTTP requests and how to attach
/// authentication headers. It contains no session or platform logic.
///
/// - `RestClient`: HTTP transport interface, with `ReqwestRest` as the
///   reqwest-backed implementation
/// - `Signer`: produces authentication headers for a request
///
/// # Example
/// ```rust,no_run
/// use fundezy::core::kernel::*;
/// use reqwest::Method;
///
/// # async fn example() -> Result<(), fundezy::TradingError> {
/// let rest = RestClientBuilder::new(RestClientConfig::default().with_timeout(10)).build()?;
/// let request = RestRequest::new(Method::GET, "https://platform.fundezy.io/health");
/// let response = rest.send(request, "/health").await?;
/// println!("status {}", response.status);
/// # Ok(())
/// # }
/// ```
pub mod rest;
pub mod signer;

pub use rest::{
    ReqwestRest, RestClient, RestClientBuilder, RestClientConfig, RestRequest, RestResponse,
};
pub use signer::{SignatureResult, Signer};
