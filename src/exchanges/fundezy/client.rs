use crate::core::clock::{Clock, SystemClock};
use crate::core::config::PlatformConfig;
use crate::core::errors::TradingError;
use crate::core::kernel::{ReqwestRest, RestClient, RestRequest, RestResponse, Signer};
use crate::core::session::{Session, SessionStore};
use crate::core::types::TokenStatus;
use crate::exchanges::fundezy::auth;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

/// Path segment in front of the system uuid on every trading call
pub const TRADING_API_PREFIX: &str = "/mtr-api";

/// Where a dispatch stands in its retry budget.
///
/// A call gets one reactive refresh: `First` may move to
/// `AfterReactiveRefresh`, which is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    AfterReactiveRefresh,
}

/// Session manager for the trading platform.
///
/// Owns the current session, logs in lazily, refreshes it before it expires or
/// after the platform rejects it, and funnels every trading call through
/// [`dispatch`](Self::dispatch). Safe to share between tasks: logins are
/// serialized, and concurrent callers that find the session stale wait for
/// the login already in flight instead of starting another one.
pub struct FundezyClient<R: RestClient = ReqwestRest> {
    rest: R,
    config: PlatformConfig,
    clock: Arc<dyn Clock>,
    store: SessionStore,
    login_lock: Mutex<()>,
}

impl<R: RestClient> std::fmt::Debug for FundezyClient<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundezyClient")
            .field("base_url", &self.config.base_url)
            .field("authenticated", &self.store.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl<R: RestClient> FundezyClient<R> {
    pub fn new(rest: R, config: PlatformConfig) -> Self {
        Self::with_clock(rest, config, Arc::new(SystemClock))
    }

    pub fn with_clock(rest: R, config: PlatformConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            rest,
            config,
            clock,
            store: SessionStore::new(),
            login_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Log in with the configured credentials, replacing any current session.
    ///
    /// On failure the client is left unauthenticated.
    pub async fn login(&self) -> Result<(), TradingError> {
        let _guard = self.login_lock.lock().await;
        self.authenticate_locked().await.map(|_| ())
    }

    /// Force a fresh login regardless of the current session's expiry
    pub async fn refresh(&self) -> Result<(), TradingError> {
        info!("Manual session refresh requested");
        self.login().await
    }

    /// Return a session that is safe to use now, logging in first if needed
    pub async fn ensure_valid_session(&self) -> Result<Arc<Session>, TradingError> {
        if let Some(session) = self.fresh_session() {
            return Ok(session);
        }

        let _guard = self.login_lock.lock().await;

        // Another caller may have logged in while we waited for the lock
        if let Some(session) = self.fresh_session() {
            debug!("Session was refreshed by a concurrent caller");
            return Ok(session);
        }

        match self.store.snapshot() {
            Some(stale) => warn!(
                expires_at = %stale.expires_at(),
                "Session close to expiry, refreshing"
            ),
            None => info!("No active session, logging in"),
        }

        self.authenticate_locked().await
    }

    /// Read-only view of the session lifetime
    pub fn token_status(&self) -> TokenStatus {
        let now = self.clock.now();
        self.store
            .snapshot()
            .map_or_else(TokenStatus::unauthenticated, |session| TokenStatus {
                authenticated: now < session.expires_at(),
                minutes_until_expiry: Some((session.expires_at() - now).num_minutes()),
                last_refresh: Some(session.issued_at()),
                expires_at: Some(session.expires_at()),
            })
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Forget the current session; the next call logs in again
    pub fn invalidate(&self) {
        self.store.clear();
    }

    /// Accounts returned by the last successful login
    pub fn accounts(&self) -> Vec<Value> {
        self.store
            .snapshot()
            .map(|session| session.accounts().to_vec())
            .unwrap_or_default()
    }

    /// Send an authenticated request to the trading API.
    ///
    /// Ensures a fresh session, sends the call, and classifies the answer.
    /// A 401 triggers one re-login and one retry; a second 401 drops the
    /// session and fails with [`TradingError::AuthenticationFailed`]. Other
    /// non-2xx answers become [`TradingError::TradingApiError`] and transport
    /// failures [`TradingError::NetworkError`], neither retried here.
    #[instrument(skip(self, body, query), fields(method = %method, endpoint = %endpoint))]
    pub async fn dispatch(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<Value, TradingError> {
        let mut session = self.ensure_valid_session().await?;
        let mut attempt = Attempt::First;

        loop {
            let response = self
                .send_with_session(&session, &method, endpoint, body, query)
                .await?;

            match (classify_response(endpoint, response), attempt) {
                (Err(TradingError::SessionExpired { .. }), Attempt::First) => {
                    warn!(endpoint, "Session rejected, re-authenticating before retry");
                    session = self.reactive_refresh(&session).await?;
                    attempt = Attempt::AfterReactiveRefresh;
                }
                (Err(TradingError::SessionExpired { .. }), Attempt::AfterReactiveRefresh) => {
                    self.store.clear_if_current(&session);
                    error!(endpoint, "Session rejected again after refresh");
                    return Err(TradingError::AuthenticationFailed(format!(
                        "{} rejected a freshly issued session",
                        endpoint
                    )));
                }
                (result, _) => return result,
            }
        }
    }

    /// Full trading API URL for an endpoint
    pub fn trading_url(&self, system_uuid: &str, endpoint: &str) -> String {
        format!(
            "{}{}/{}{}",
            self.config.base_url, TRADING_API_PREFIX, system_uuid, endpoint
        )
    }

    fn fresh_session(&self) -> Option<Arc<Session>> {
        let now = self.clock.now();
        self.store
            .snapshot()
            .filter(|session| session.is_fresh(now, self.config.refresh_buffer))
    }

    /// Log in and install the new session. Caller must hold `login_lock`.
    async fn authenticate_locked(&self) -> Result<Arc<Session>, TradingError> {
        match auth::authenticate(&self.rest, &self.config, self.clock.now()).await {
            Ok(session) => Ok(self.store.replace(session)),
            Err(e) => {
                self.store.clear();
                Err(e)
            }
        }
    }

    /// Replace a session the platform just rejected.
    ///
    /// If another caller already replaced it, that newer session is reused.
    async fn reactive_refresh(
        &self,
        rejected: &Arc<Session>,
    ) -> Result<Arc<Session>, TradingError> {
        let _guard = self.login_lock.lock().await;

        if let Some(current) = self.store.snapshot() {
            if !Arc::ptr_eq(&current, rejected) {
                debug!("Rejected session already replaced by a concurrent caller");
                return Ok(current);
            }
        }

        self.authenticate_locked().await
    }

    async fn send_with_session(
        &self,
        session: &Session,
        method: &Method,
        endpoint: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<RestResponse, TradingError> {
        if session.system_uuid().is_empty() {
            return Err(TradingError::ConfigurationError(
                "system uuid not available - login did not complete".to_string(),
            ));
        }

        let headers = session.sign_request(method.as_str(), endpoint)?;
        let mut request = RestRequest::new(
            method.clone(),
            self.trading_url(session.system_uuid(), endpoint),
        )
        .with_headers(headers)
        .with_query(query);

        if let Some(body) = body {
            request = request.with_body(body.clone());
        }

        self.rest.send(request, endpoint).await
    }
}

/// Turn a raw trading API response into a value or a typed error
fn classify_response(endpoint: &str, response: RestResponse) -> Result<Value, TradingError> {
    match response.status {
        401 => Err(TradingError::SessionExpired {
            endpoint: endpoint.to_string(),
        }),
        _ if response.is_success() => {
            if response.body.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(&response.body).map_err(|e| {
                TradingError::DeserializationError(format!(
                    "Failed to parse response from {}: {}",
                    endpoint, e
                ))
            })
        }
        status => Err(TradingError::TradingApiError {
            status,
            body: response.body,
            endpoint: endpoint.to_string(),
        }),
    }
}
