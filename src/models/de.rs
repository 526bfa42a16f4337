//! Lenient deserializers for upstream number fields.
//!
//! The fantasy API sends many decimals as strings (`"form": "5.2"`) and
//! occasionally `null` where a number is expected.

use serde::Deserialize;

/// Deserialize a value that may be a number, a numeric string or null.
/// Anything unparseable becomes `0.0`.
pub fn string_or_number_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let val: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(val
        .and_then(|v| match v {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .unwrap_or(0.0))
}

/// Deserialize an integer that may be null. Null becomes `0`.
pub fn null_as_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let val: Option<i64> = Option::deserialize(deserializer)?;
    Ok(val.unwrap_or(0))
}
