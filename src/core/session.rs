use crate::core::errors::TradingError;
use crate::core::kernel::signer::{SignatureResult, Signer};
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Header carrying the per-account trading API token
pub const TRADING_TOKEN_HEADER: &str = "Auth-trading-api";
/// Name of the cookie carrying the platform session token
pub const AUTH_COOKIE_NAME: &str = "co-auth";

/// An authenticated platform session.
///
/// Only constructed through [`Session::new`], which refuses to build a session
/// with an empty token or system identifier. Sessions are immutable; a refresh
/// produces a new one.
#[derive(Debug, Clone)]
pub struct Session {
    auth_token: Secret<String>,
    trading_api_token: Secret<String>,
    trading_account_id: String,
    system_uuid: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    accounts: Vec<Value>,
}

impl Session {
    pub fn new(
        auth_token: String,
        trading_api_token: String,
        trading_account_id: String,
        system_uuid: String,
        issued_at: DateTime<Utc>,
        validity: Duration,
    ) -> Result<Self, TradingError> {
        if auth_token.is_empty() {
            return Err(TradingError::AuthenticationFailed(
                "login response has no session token".to_string(),
            ));
        }
        if trading_api_token.is_empty() {
            return Err(TradingError::AuthenticationFailed(
                "selected account has no trading API token".to_string(),
            ));
        }
        if system_uuid.is_empty() {
            return Err(TradingError::AuthenticationFailed(
                "selected account has no system uuid".to_string(),
            ));
        }

        let expires_at = issued_at.checked_add_signed(validity).ok_or_else(|| {
            TradingError::ConfigurationError(format!(
                "token validity of {}s is out of range",
                validity.num_seconds()
            ))
        })?;

        Ok(Self {
            auth_token: Secret::new(auth_token),
            trading_api_token: Secret::new(trading_api_token),
            trading_account_id,
            system_uuid,
            issued_at,
            expires_at,
            accounts: Vec::new(),
        })
    }

    /// Attach the account list returned alongside the session
    #[must_use]
    pub fn with_accounts(mut self, accounts: Vec<Value>) -> Self {
        self.accounts = accounts;
        self
    }

    /// All trading accounts visible to the logged-in user
    pub fn accounts(&self) -> &[Value] {
        &self.accounts
    }

    pub fn trading_account_id(&self) -> &str {
        &self.trading_account_id
    }

    pub fn system_uuid(&self) -> &str {
        &self.system_uuid
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the session can still be used at `now` without a refresh
    pub fn is_fresh(&self, now: DateTime<Utc>, refresh_buffer: Duration) -> bool {
        self.expires_at
            .checked_sub_signed(refresh_buffer)
            .is_some_and(|deadline| now < deadline)
    }
}

impl Signer for Session {
    fn sign_request(&self, _method: &str, _endpoint: &str) -> SignatureResult {
        let mut headers = HashMap::new();
        headers.insert(
            TRADING_TOKEN_HEADER.to_string(),
            self.trading_api_token.expose_secret().clone(),
        );
        headers.insert(
            "Cookie".to_string(),
            format!("{}={}", AUTH_COOKIE_NAME, self.auth_token.expose_secret()),
        );
        Ok(headers)
    }
}

/// Holder of the current session.
///
/// Readers get a shared snapshot of a complete session; writers swap the whole
/// session in one step, so a token is never observed with another session's
/// expiry.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: RwLock<Option<Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session, if any
    pub fn snapshot(&self) -> Option<Arc<Session>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Install a new session, returning the shared handle to it
    pub fn replace(&self, session: Session) -> Arc<Session> {
        let session = Arc::new(session);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&session));
        session
    }

    /// Drop the current session
    pub fn clear(&self) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Drop `session` if it is still the current one.
    ///
    /// Returns whether anything was removed. A session installed by another
    /// caller in the meantime is left alone.
    pub fn clear_if_current(&self, session: &Arc<Session>) -> bool {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match current.as_ref() {
            Some(existing) if Arc::ptr_eq(existing, session) => {
                *current = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_some()
    }
}
