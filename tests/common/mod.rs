#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use fundezy::core::clock::ManualClock;
use fundezy::core::config::PlatformConfig;
use fundezy::core::kernel::ReqwestRest;
use fundezy::{FundezyBuilder, FundezyConnector};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;
use std::sync::Arc;

pub const EMAIL: &str = "trader@example.com";
pub const PASSWORD: &str = "correct-horse";
pub const BROKER_ID: &str = "broker-7";
pub const SYSTEM_UUID: &str = "sys-uuid-1";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

pub fn config_for(server: &ServerGuard) -> PlatformConfig {
    PlatformConfig::new(EMAIL.to_string(), PASSWORD.to_string(), BROKER_ID.to_string())
        .base_url(server.url())
        .timeout_seconds(5)
}

pub fn connector_for(
    server: &ServerGuard,
    clock: &Arc<ManualClock>,
) -> FundezyConnector<ReqwestRest> {
    init_tracing();
    FundezyBuilder::new(config_for(server))
        .with_clock(clock.clone())
        .build()
        .unwrap()
}

pub fn login_body(token: &str, api_token: &str) -> String {
    json!({
        "token": token,
        "email": EMAIL,
        "accounts": [
            {"tradingAccountId": 991, "currency": "USD"},
            {"tradingAccountId": 992, "currency": "EUR"}
        ],
        "selectedAccount": {
            "tradingApiToken": api_token,
            "tradingAccountId": 991,
            "offer": {"system": {"uuid": SYSTEM_UUID}}
        }
    })
    .to_string()
}

/// Login endpoint answering with the given tokens, expected `hits` times
pub async fn mock_login(
    server: &mut ServerGuard,
    token: &str,
    api_token: &str,
    hits: usize,
) -> Mock {
    server
        .mock("POST", "/manager/mtr-login")
        .match_body(Matcher::Json(json!({
            "email": EMAIL,
            "password": PASSWORD,
            "brokerId": BROKER_ID
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(login_body(token, api_token))
        .expect(hits)
        .create_async()
        .await
}

pub fn trading_path(endpoint: &str) -> String {
    format!("/mtr-api/{}{}", SYSTEM_UUID, endpoint)
}

/// Trading endpoint that only answers requests carrying the given session
pub fn mock_trading(
    server: &mut ServerGuard,
    method: &str,
    endpoint: &str,
    token: &str,
    api_token: &str,
) -> Mock {
    server
        .mock(method, trading_path(endpoint).as_str())
        .match_header("auth-trading-api", api_token)
        .match_header("cookie", format!("co-auth={}", token).as_str())
}
