use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default candle interval used by the platform
pub const DEFAULT_CANDLE_INTERVAL: &str = "H1";
/// Default number of candles requested
pub const DEFAULT_CANDLE_COUNT: u32 = 100;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TypesError {
    #[error("Invalid order side: {0}")]
    InvalidSide(String),
    #[error("Invalid volume: {0}")]
    InvalidVolume(String),
    #[error("Invalid instrument: {0}")]
    InvalidInstrument(String),
}

impl From<TypesError> for crate::core::errors::TradingError {
    fn from(err: TypesError) -> Self {
        Self::InvalidParameters(err.to_string())
    }
}

/// Direction of a position.
///
/// Parsing is case-insensitive; the wire form is always upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            _ => Err(TypesError::InvalidSide(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for OrderSide {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Account balance as reported by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(deserialize_with = "number_or_string")]
    pub balance: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub equity: f64,
    /// Any other fields the platform includes (margin, currency, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An open position.
///
/// Read fresh from the platform on every call; never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub id: String,
    pub instrument: String,
    pub side: OrderSide,
    pub volume: f64,
    /// The platform's original record
    pub raw: Value,
}

/// Parameters for opening a position
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPositionRequest {
    pub instrument: String,
    pub side: OrderSide,
    pub volume: f64,
    /// Stop-loss price, 0 for none
    pub stop_loss: f64,
    /// Take-profit price, 0 for none
    pub take_profit: f64,
}

impl OpenPositionRequest {
    pub fn new(instrument: impl Into<String>, side: OrderSide, volume: f64) -> Self {
        Self {
            instrument: instrument.into(),
            side,
            volume,
            stop_loss: 0.0,
            take_profit: 0.0,
        }
    }

    #[must_use]
    pub fn with_stop_loss(mut self, price: f64) -> Self {
        self.stop_loss = price;
        self
    }

    #[must_use]
    pub fn with_take_profit(mut self, price: f64) -> Self {
        self.take_profit = price;
        self
    }

    pub fn validate(&self) -> Result<(), TypesError> {
        if self.instrument.trim().is_empty() {
            return Err(TypesError::InvalidInstrument(
                "instrument cannot be empty".to_string(),
            ));
        }
        if !self.volume.is_finite() || self.volume <= 0.0 {
            return Err(TypesError::InvalidVolume(self.volume.to_string()));
        }
        if self.stop_loss < 0.0 || self.take_profit < 0.0 {
            return Err(TypesError::InvalidVolume(
                "stop-loss and take-profit cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parameters for closing a single position
///
/// `side` must be the side the position was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosePositionRequest {
    pub position_id: String,
    pub instrument: String,
    pub side: OrderSide,
    /// Kept as text: the close endpoint takes the volume as a string
    pub volume: String,
}

impl ClosePositionRequest {
    pub fn new(
        position_id: impl Into<String>,
        instrument: impl Into<String>,
        side: OrderSide,
        volume: impl ToString,
    ) -> Self {
        Self {
            position_id: position_id.into(),
            instrument: instrument.into(),
            side,
            volume: volume.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), TypesError> {
        if self.instrument.trim().is_empty() {
            return Err(TypesError::InvalidInstrument(
                "instrument cannot be empty".to_string(),
            ));
        }
        match self.volume.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
            _ => Err(TypesError::InvalidVolume(self.volume.clone())),
        }
    }
}

impl From<&Position> for ClosePositionRequest {
    fn from(position: &Position) -> Self {
        Self::new(
            position.id.clone(),
            position.instrument.clone(),
            position.side,
            position.volume,
        )
    }
}

/// Observability snapshot of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenStatus {
    pub authenticated: bool,
    /// Whole minutes left before expiry; negative once expired
    pub minutes_until_expiry: Option<i64>,
    /// When the current session was obtained
    pub last_refresh: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenStatus {
    pub const fn unauthenticated() -> Self {
        Self {
            authenticated: false,
            minutes_until_expiry: None,
            last_refresh: None,
            expires_at: None,
        }
    }
}

/// Accept a JSON number or a numeric string
pub(crate) fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_side_parsing_is_case_insensitive() {
        assert_eq!("buy".parse::<OrderSide>().unwrap(), OrderSide::Buy);
        assert_eq!("Sell".parse::<OrderSide>().unwrap(), OrderSide::Sell);
        assert_eq!(" BUY ".parse::<OrderSide>().unwrap(), OrderSide::Buy);
        assert!("hold".parse::<OrderSide>().is_err());
    }

    #[test]
    fn test_side_serializes_upper_case() {
        assert_eq!(json!(OrderSide::Buy), json!("BUY"));
        assert_eq!(OrderSide::Sell.to_string(), "SELL");
        let side: OrderSide = serde_json::from_value(json!("sell")).unwrap();
        assert_eq!(side, OrderSide::Sell);
    }

    #[test]
    fn test_balance_keeps_values() {
        let balance: Balance = serde_json::from_value(json!({
            "balance": 10000.5,
            "equity": "10012.25",
            "currency": "USD"
        }))
        .unwrap();
        assert!((balance.balance - 10000.5).abs() < f64::EPSILON);
        assert!((balance.equity - 10012.25).abs() < f64::EPSILON);
        assert_eq!(balance.extra.get("currency"), Some(&json!("USD")));
    }

    #[test]
    fn test_open_request_defaults_and_validation() {
        let request = OpenPositionRequest::new("BTCUSD", OrderSide::Buy, 0.01);
        assert!(request.stop_loss.abs() < f64::EPSILON);
        assert!(request.take_profit.abs() < f64::EPSILON);
        assert!(request.validate().is_ok());

        let zero = OpenPositionRequest::new("BTCUSD", OrderSide::Buy, 0.0);
        assert!(matches!(zero.validate(), Err(TypesError::InvalidVolume(_))));

        let unnamed = OpenPositionRequest::new(" ", OrderSide::Sell, 1.0);
        assert!(matches!(
            unnamed.validate(),
            Err(TypesError::InvalidInstrument(_))
        ));
    }

    #[test]
    fn test_close_request_stringifies_volume() {
        let from_number = ClosePositionRequest::new("p-1", "BTCUSD", OrderSide::Buy, 0.01);
        let from_text = ClosePositionRequest::new("p-1", "BTCUSD", OrderSide::Buy, "0.01");
        assert_eq!(from_number.volume, "0.01");
        assert_eq!(from_number, from_text);
        assert!(from_number.validate().is_ok());

        let bad = ClosePositionRequest::new("p-1", "BTCUSD", OrderSide::Buy, "lots");
        assert!(bad.validate().is_err());
    }
}
