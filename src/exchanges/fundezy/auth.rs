use crate::core::config::PlatformConfig;
use crate::core::errors::TradingError;
use crate::core::kernel::{RestClient, RestRequest};
use crate::core::session::Session;
use crate::exchanges::fundezy::converters::scalar_to_string;
use crate::exchanges::fundezy::types::{LoginRequest, LoginResponse};
use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use tracing::{info, instrument, warn};

pub const LOGIN_ENDPOINT: &str = "/manager/mtr-login";

/// Submit the configured credentials and build a session from the answer.
///
/// Rejected credentials and incomplete responses both come back as
/// [`TradingError::AuthenticationFailed`]; transport failures as
/// [`TradingError::NetworkError`].
#[instrument(skip(rest, config), fields(base_url = %config.base_url))]
pub async fn authenticate<R: RestClient>(
    rest: &R,
    config: &PlatformConfig,
    now: DateTime<Utc>,
) -> Result<Session, TradingError> {
    if !config.has_credentials() {
        return Err(TradingError::AuthenticationFailed(
            "email, password and broker id are required".to_string(),
        ));
    }

    let body = serde_json::to_value(LoginRequest {
        email: config.email(),
        password: config.password(),
        broker_id: &config.broker_id,
    })
    .map_err(|e| TradingError::SerializationError(e.to_string()))?;

    let request = RestRequest::new(Method::POST, format!("{}{}", config.base_url, LOGIN_ENDPOINT))
        .with_body(body);
    let response = rest.send(request, LOGIN_ENDPOINT).await?;

    if !response.is_success() {
        warn!(status = response.status, "Login rejected");
        return Err(TradingError::AuthenticationFailed(format!(
            "login rejected with status {}: {}",
            response.status, response.body
        )));
    }

    let parsed: LoginResponse = serde_json::from_str(&response.body).map_err(|e| {
        TradingError::AuthenticationFailed(format!("malformed login response: {}", e))
    })?;

    let session = session_from_login(parsed, now, config.token_validity)?;

    info!(
        account_id = %session.trading_account_id(),
        system_uuid = %session.system_uuid(),
        accounts = session.accounts().len(),
        expires_at = %session.expires_at(),
        "Login successful"
    );

    Ok(session)
}

/// Build a session from a login response, or fail without building anything
pub fn session_from_login(
    response: LoginResponse,
    issued_at: DateTime<Utc>,
    validity: Duration,
) -> Result<Session, TradingError> {
    let token = response.token.unwrap_or_default();
    let account = response.selected_account.ok_or_else(|| {
        TradingError::AuthenticationFailed("login response has no selected account".to_string())
    })?;
    let system_uuid = account
        .system_uuid()
        .map(str::to_string)
        .ok_or_else(|| {
            TradingError::AuthenticationFailed(
                "selected account has no offer.system.uuid".to_string(),
            )
        })?;
    let account_id = account
        .trading_account_id
        .as_ref()
        .and_then(scalar_to_string)
        .ok_or_else(|| {
            TradingError::AuthenticationFailed(
                "selected account has no trading account id".to_string(),
            )
        })?;

    let session = Session::new(
        token,
        account.trading_api_token.unwrap_or_default(),
        account_id,
        system_uuid,
        issued_at,
        validity,
    )?;

    Ok(session.with_accounts(response.accounts.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> LoginResponse {
        serde_json::from_value(value).unwrap()
    }

    fn full_response() -> serde_json::Value {
        json!({
            "token": "auth-token",
            "email": "trader@example.com",
            "accounts": [{"tradingAccountId": 991}, {"tradingAccountId": 992}],
            "selectedAccount": {
                "tradingApiToken": "api-token",
                "tradingAccountId": 991,
                "offer": {"system": {"uuid": "sys-uuid"}}
            }
        })
    }

    #[test]
    fn test_session_from_complete_response() {
        let now = Utc::now();
        let session = session_from_login(parse(full_response()), now, Duration::hours(24)).unwrap();
        assert_eq!(session.system_uuid(), "sys-uuid");
        assert_eq!(session.trading_account_id(), "991");
        assert_eq!(session.accounts().len(), 2);
        assert_eq!(session.issued_at(), now);
        assert_eq!(session.expires_at(), now + Duration::hours(24));
    }

    #[test]
    fn test_missing_selected_account_fails() {
        let mut response = full_response();
        response.as_object_mut().unwrap().remove("selectedAccount");
        let result = session_from_login(parse(response), Utc::now(), Duration::hours(24));
        assert!(matches!(
            result,
            Err(TradingError::AuthenticationFailed(_))
        ));
    }

    #[test]
    fn test_missing_system_uuid_fails() {
        let mut response = full_response();
        response["selectedAccount"]["offer"]["system"] = json!({});
        let result = session_from_login(parse(response), Utc::now(), Duration::hours(24));
        assert!(matches!(
            result,
            Err(TradingError::AuthenticationFailed(_))
        ));
    }

    #[test]
    fn test_missing_token_fails() {
        let mut response = full_response();
        response.as_object_mut().unwrap().remove("token");
        let result = session_from_login(parse(response), Utc::now(), Duration::hours(24));
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_validity_window() {
        let now = Utc::now();
        let session =
            session_from_login(parse(full_response()), now, Duration::minutes(30)).unwrap();
        assert_eq!(session.expires_at(), now + Duration::minutes(30));
    }
}
