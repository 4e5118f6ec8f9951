use crate::core::{
    errors::TradingError,
    types::{Balance, ClosePositionRequest, OpenPositionRequest, Position},
};
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait MarketDataSource {
    /// Historical candles for a symbol, exactly as the platform returns them
    async fn get_candles(
        &self,
        symbol: &str,
        interval: &str,
        count: u32,
    ) -> Result<Value, TradingError>;
}

#[async_trait]
pub trait OrderPlacer {
    /// Open a new position
    async fn open_position(&self, order: OpenPositionRequest) -> Result<Value, TradingError>;

    /// Close a single position
    async fn close_position(&self, request: ClosePositionRequest) -> Result<Value, TradingError>;
}

#[async_trait]
pub trait AccountInfo {
    async fn get_balance(&self) -> Result<Balance, TradingError>;
    async fn get_open_positions(&self) -> Result<Vec<Position>, TradingError>;
}

// Composite trait for callers that need all functionality
pub trait TradingConnector: MarketDataSource + OrderPlacer + AccountInfo {}
