//! Field deserializers that never fail on a nested expression node.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::expr::ExprRecord;

/// Decodes an expression node from any JSON value. Shapes that do not match
/// a known node decode as [`ExprRecord::Unknown`].
pub(crate) fn node<'de, D>(deserializer: D) -> Result<Box<ExprRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Box::new(from_value(&value)))
}

/// Like [`node`], but `null` stays absent.
pub(crate) fn optional_node<'de, D>(deserializer: D) -> Result<Option<Box<ExprRecord>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(Box::new(from_value(&value))))
}

/// Decodes a message seed; anything but an array of non-negative integers
/// is dropped.
pub(crate) fn seed<'de, D>(deserializer: D) -> Result<Option<Vec<u64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    let seed = Vec::<u64>::deserialize(&value).ok();
    if seed.is_none() {
        log::debug!("ignoring malformed message seed {value}");
    }
    Ok(seed)
}

fn from_value(value: &Value) -> ExprRecord {
    ExprRecord::deserialize(value).unwrap_or_else(|err| {
        log::debug!("expression node degraded to Unknown: {err}");
        ExprRecord::Unknown
    })
}
