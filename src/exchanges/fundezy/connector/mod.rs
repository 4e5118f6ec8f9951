use crate::core::errors::TradingError;
use crate::core::kernel::RestClient;
use crate::core::traits::{AccountInfo, MarketDataSource, OrderPlacer, TradingConnector};
use crate::core::types::{
    Balance, ClosePositionRequest, OpenPositionRequest, Position, TokenStatus,
};
use crate::exchanges::fundezy::client::FundezyClient;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub mod account;
pub mod market_data;
pub mod trading;

pub use account::Account;
pub use market_data::MarketData;
pub use trading::Trading;

/// Fundezy connector that composes all sub-trait implementations
///
/// All components share one [`FundezyClient`], and with it one session.
pub struct FundezyConnector<R: RestClient> {
    pub market: MarketData<R>,
    pub trading: Trading<R>,
    pub account: Account<R>,
    session: Arc<FundezyClient<R>>,
}

impl<R: RestClient> FundezyConnector<R> {
    pub fn new(client: FundezyClient<R>) -> Self {
        let client = Arc::new(client);
        Self {
            market: MarketData::new(Arc::clone(&client)),
            trading: Trading::new(Arc::clone(&client)),
            account: Account::new(Arc::clone(&client)),
            session: client,
        }
    }

    /// The session manager behind this connector
    pub fn session(&self) -> &Arc<FundezyClient<R>> {
        &self.session
    }

    pub async fn login(&self) -> Result<(), TradingError> {
        self.session.login().await
    }

    pub async fn refresh(&self) -> Result<(), TradingError> {
        self.session.refresh().await
    }

    pub fn token_status(&self) -> TokenStatus {
        self.session.token_status()
    }

    pub fn invalidate(&self) {
        self.session.invalidate();
    }

    pub async fn get_account_info(&self) -> Result<Balance, TradingError> {
        self.account.get_account_info().await
    }

    pub async fn get_historical_data(
        &self,
        symbol: &str,
        interval: &str,
        count: u32,
    ) -> Result<Vec<Value>, TradingError> {
        self.market
            .get_historical_data(symbol, interval, count)
            .await
    }

    pub async fn get_recent_candles(&self, symbol: &str) -> Result<Value, TradingError> {
        self.market.get_recent_candles(symbol).await
    }

    pub async fn get_market_watch(&self) -> Value {
        self.market.get_market_watch().await
    }

    #[deprecated(note = "close positions one at a time with `close_position`")]
    #[allow(deprecated)]
    pub async fn close_positions(&self, position_ids: &[String]) -> Result<Value, TradingError> {
        self.trading.close_positions(position_ids).await
    }
}

// Implement traits for the connector by delegating to sub-components

#[async_trait]
impl<R: RestClient> MarketDataSource for FundezyConnector<R> {
    async fn get_candles(
        &self,
        symbol: &str,
        interval: &str,
        count: u32,
    ) -> Result<Value, TradingError> {
        self.market.get_candles(symbol, interval, count).await
    }
}

#[async_trait]
impl<R: RestClient> OrderPlacer for FundezyConnector<R> {
    async fn open_position(&self, order: OpenPositionRequest) -> Result<Value, TradingError> {
        self.trading.open_position(order).await
    }

    async fn close_position(&self, request: ClosePositionRequest) -> Result<Value, TradingError> {
        self.trading.close_position(request).await
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for FundezyConnector<R> {
    async fn get_balance(&self) -> Result<Balance, TradingError> {
        self.account.get_balance().await
    }

    async fn get_open_positions(&self) -> Result<Vec<Position>, TradingError> {
        self.account.get_open_positions().await
    }
}

impl<R: RestClient> TradingConnector for FundezyConnector<R> {}
