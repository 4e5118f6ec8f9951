pub mod core;
pub mod exchanges;

pub use crate::core::{
    errors::TradingError,
    traits::{AccountInfo, MarketDataSource, OrderPlacer, TradingConnector},
    types::*,
};
pub use exchanges::fundezy::{build_connector, FundezyBuilder, FundezyClient, FundezyConnector};
