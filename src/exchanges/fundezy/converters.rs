use crate::core::errors::TradingError;
use crate::core::types::{OrderSide, Position};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Shapes the open-positions endpoint is known to answer with
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PositionsPayload {
    Wrapped { positions: Vec<Value> },
    Bare(Vec<Value>),
    Other(Value),
}

/// Normalize an open-positions payload into a list of positions.
///
/// A wrapper object and a bare list are both accepted. Anything else means
/// "no positions". Entries inside a recognised list must be well formed: a
/// position that cannot be read is an error rather than silently dropped.
pub fn positions_from_payload(payload: Value) -> Result<Vec<Position>, TradingError> {
    let payload =
        serde_json::from_value(payload).unwrap_or(PositionsPayload::Other(Value::Null));

    let entries = match payload {
        PositionsPayload::Wrapped { positions } | PositionsPayload::Bare(positions) => positions,
        PositionsPayload::Other(other) => {
            debug!(payload = %other, "Unrecognised open-positions payload, treating as empty");
            Vec::new()
        }
    };

    entries.into_iter().map(position_from_value).collect()
}

pub fn position_from_value(value: Value) -> Result<Position, TradingError> {
    let id = field(&value, &["id", "positionId"])
        .and_then(scalar_to_string)
        .ok_or_else(|| missing("id", &value))?;
    let instrument = field(&value, &["instrument", "symbol"])
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing("instrument", &value))?;
    let side = field(&value, &["side", "orderSide"])
        .and_then(Value::as_str)
        .ok_or_else(|| missing("side", &value))?
        .parse::<OrderSide>()
        .map_err(|e| TradingError::DeserializationError(format!("position {}: {}", id, e)))?;
    let volume = field(&value, &["volume"])
        .and_then(scalar_to_f64)
        .ok_or_else(|| missing("volume", &value))?;

    Ok(Position {
        id,
        instrument,
        side,
        volume,
        raw: value,
    })
}

/// Render a string or number as text
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn scalar_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find(|v| !v.is_null())
}

fn missing(name: &str, value: &Value) -> TradingError {
    TradingError::DeserializationError(format!("position is missing '{}': {}", name, value))
}
