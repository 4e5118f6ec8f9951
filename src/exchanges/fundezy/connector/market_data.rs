use crate::core::errors::TradingError;
use crate::core::kernel::RestClient;
use crate::core::traits::MarketDataSource;
use crate::core::types::{DEFAULT_CANDLE_COUNT, DEFAULT_CANDLE_INTERVAL};
use crate::exchanges::fundezy::client::FundezyClient;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{instrument, warn};

pub const CANDLES_ENDPOINT: &str = "/candles";
pub const MARKET_WATCH_ENDPOINT: &str = "/market-watch";

/// Market data implementation for Fundezy
pub struct MarketData<R: RestClient> {
    client: Arc<FundezyClient<R>>,
}

impl<R: RestClient> MarketData<R> {
    pub fn new(client: Arc<FundezyClient<R>>) -> Self {
        Self { client }
    }

    /// Candle records only, without the surrounding envelope.
    ///
    /// Accepts both `{"candles": [...]}` and a bare list; anything else gives
    /// an empty list.
    pub async fn get_historical_data(
        &self,
        symbol: &str,
        interval: &str,
        count: u32,
    ) -> Result<Vec<Value>, TradingError> {
        let response = self.get_candles(symbol, interval, count).await?;

        Ok(match response {
            Value::Array(candles) => candles,
            Value::Object(mut map) => match map.remove("candles") {
                Some(Value::Array(candles)) => candles,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        })
    }

    /// The last [`DEFAULT_CANDLE_COUNT`] candles at [`DEFAULT_CANDLE_INTERVAL`]
    pub async fn get_recent_candles(&self, symbol: &str) -> Result<Value, TradingError> {
        self.get_candles(symbol, DEFAULT_CANDLE_INTERVAL, DEFAULT_CANDLE_COUNT)
            .await
    }

    /// Best-effort quote snapshot.
    ///
    /// Never fails: any error is logged and an empty object returned.
    #[instrument(skip(self), fields(exchange = "fundezy"))]
    pub async fn get_market_watch(&self) -> Value {
        match self
            .client
            .dispatch(Method::GET, MARKET_WATCH_ENDPOINT, None, &[])
            .await
        {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Market watch unavailable");
                Value::Object(Map::new())
            }
        }
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for MarketData<R> {
    #[instrument(skip(self), fields(exchange = "fundezy"))]
    async fn get_candles(
        &self,
        symbol: &str,
        interval: &str,
        count: u32,
    ) -> Result<Value, TradingError> {
        let params = [
            ("symbol", symbol.to_string()),
            ("interval", interval.to_string()),
            ("count", count.to_string()),
        ];

        self.client
            .dispatch(Method::GET, CANDLES_ENDPOINT, None, &params)
            .await
    }
}
