use crate::core::types::{ClosePositionRequest, OpenPositionRequest, OrderSide};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub broker_id: &'a str,
}

/// Body of a successful `mtr-login` call.
///
/// Every field is optional on the wire; completeness is checked when the
/// session is built.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub accounts: Option<Vec<Value>>,
    #[serde(default)]
    pub selected_account: Option<SelectedAccount>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedAccount {
    #[serde(default)]
    pub trading_api_token: Option<String>,
    /// Sent as a number by some deployments and as a string by others
    #[serde(default)]
    pub trading_account_id: Option<Value>,
    #[serde(default)]
    pub offer: Option<Offer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Offer {
    #[serde(default)]
    pub system: Option<OfferSystem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferSystem {
    #[serde(default)]
    pub uuid: Option<String>,
}

impl SelectedAccount {
    pub fn system_uuid(&self) -> Option<&str> {
        self.offer
            .as_ref()
            .and_then(|offer| offer.system.as_ref())
            .and_then(|system| system.uuid.as_deref())
    }
}

/// Wire body for `POST /position/open`; volume travels as a JSON number
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPositionBody<'a> {
    pub instrument: &'a str,
    pub order_side: OrderSide,
    pub volume: f64,
    pub sl_price: f64,
    pub tp_price: f64,
    pub is_mobile: bool,
}

impl<'a> From<&'a OpenPositionRequest> for OpenPositionBody<'a> {
    fn from(order: &'a OpenPositionRequest) -> Self {
        Self {
            instrument: &order.instrument,
            order_side: order.side,
            volume: order.volume,
            sl_price: order.stop_loss,
            tp_price: order.take_profit,
            is_mobile: false,
        }
    }
}

/// Wire body for `POST /position/close`; volume travels as a JSON string
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosePositionBody<'a> {
    pub position_id: &'a str,
    pub instrument: &'a str,
    pub order_side: OrderSide,
    pub volume: &'a str,
}

impl<'a> From<&'a ClosePositionRequest> for ClosePositionBody<'a> {
    fn from(request: &'a ClosePositionRequest) -> Self {
        Self {
            position_id: &request.position_id,
            instrument: &request.instrument,
            order_side: request.side,
            volume: request.volume.trim(),
        }
    }
}

/// Legacy bulk close body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCloseBody<'a> {
    pub position_ids: &'a [String],
}
