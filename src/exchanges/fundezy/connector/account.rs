use crate::core::errors::TradingError;
use crate::core::kernel::RestClient;
use crate::core::traits::AccountInfo;
use crate::core::types::{Balance, Position};
use crate::exchanges::fundezy::client::FundezyClient;
use crate::exchanges::fundezy::converters::positions_from_payload;
use async_trait::async_trait;
use reqwest::Method;
use std::sync::Arc;
use tracing::instrument;

pub const BALANCE_ENDPOINT: &str = "/balance";
pub const OPEN_POSITIONS_ENDPOINT: &str = "/open-positions";

/// Account implementation for Fundezy
pub struct Account<R: RestClient> {
    client: Arc<FundezyClient<R>>,
}

impl<R: RestClient> Account<R> {
    pub fn new(client: Arc<FundezyClient<R>>) -> Self {
        Self { client }
    }

    /// Same as [`AccountInfo::get_balance`], kept under its older name
    pub async fn get_account_info(&self) -> Result<Balance, TradingError> {
        self.get_balance().await
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for Account<R> {
    #[instrument(skip(self), fields(exchange = "fundezy"))]
    async fn get_balance(&self) -> Result<Balance, TradingError> {
        let value = self
            .client
            .dispatch(Method::GET, BALANCE_ENDPOINT, None, &[])
            .await?;

        serde_json::from_value(value).map_err(|e| {
            TradingError::DeserializationError(format!("Failed to parse balance: {}", e))
        })
    }

    #[instrument(skip(self), fields(exchange = "fundezy"))]
    async fn get_open_positions(&self) -> Result<Vec<Position>, TradingError> {
        let value = self
            .client
            .dispatch(Method::GET, OPEN_POSITIONS_ENDPOINT, None, &[])
            .await?;

        positions_from_payload(value)
    }
}
