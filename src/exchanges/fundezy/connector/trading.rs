use crate::core::errors::TradingError;
use crate::core::kernel::RestClient;
use crate::core::traits::OrderPlacer;
use crate::core::types::{ClosePositionRequest, OpenPositionRequest};
use crate::exchanges::fundezy::client::FundezyClient;
use crate::exchanges::fundezy::types::{BulkCloseBody, ClosePositionBody, OpenPositionBody};
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub const OPEN_POSITION_ENDPOINT: &str = "/position/open";
pub const CLOSE_POSITION_ENDPOINT: &str = "/position/close";

/// Trading implementation for Fundezy
pub struct Trading<R: RestClient> {
    client: Arc<FundezyClient<R>>,
}

impl<R: RestClient> Trading<R> {
    pub fn new(client: Arc<FundezyClient<R>>) -> Self {
        Self { client }
    }

    /// Close several positions in one call.
    ///
    /// Older API shape; prefer [`OrderPlacer::close_position`].
    #[deprecated(note = "close positions one at a time with `close_position`")]
    #[instrument(skip(self), fields(exchange = "fundezy", count = position_ids.len()))]
    pub async fn close_positions(&self, position_ids: &[String]) -> Result<Value, TradingError> {
        warn!("close_positions is deprecated, use close_position for individual positions");
        let body = to_body(&BulkCloseBody { position_ids })?;
        self.client
            .dispatch(Method::POST, CLOSE_POSITION_ENDPOINT, Some(&body), &[])
            .await
    }
}

#[async_trait]
impl<R: RestClient> OrderPlacer for Trading<R> {
    #[instrument(
        skip(self),
        fields(
            exchange = "fundezy",
            instrument = %order.instrument,
            side = %order.side,
            volume = order.volume
        )
    )]
    async fn open_position(&self, order: OpenPositionRequest) -> Result<Value, TradingError> {
        order.validate()?;
        let body = to_body(&OpenPositionBody::from(&order))?;

        let response = self
            .client
            .dispatch(Method::POST, OPEN_POSITION_ENDPOINT, Some(&body), &[])
            .await?;

        info!(instrument = %order.instrument, side = %order.side, "Position opened");
        Ok(response)
    }

    #[instrument(
        skip(self),
        fields(
            exchange = "fundezy",
            position_id = %request.position_id,
            instrument = %request.instrument
        )
    )]
    async fn close_position(&self, request: ClosePositionRequest) -> Result<Value, TradingError> {
        request.validate()?;
        let body = to_body(&ClosePositionBody::from(&request))?;

        let response = self
            .client
            .dispatch(Method::POST, CLOSE_POSITION_ENDPOINT, Some(&body), &[])
            .await?;

        info!(position_id = %request.position_id, "Position closed");
        Ok(response)
    }
}

fn to_body<T: Serialize>(body: &T) -> Result<Value, TradingError> {
    serde_json::to_value(body).map_err(|e| {
        TradingError::SerializationError(format!("Failed to serialize request body: {}", e))
    })
}
