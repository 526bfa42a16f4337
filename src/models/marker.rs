//! Inline markers for values that could not be produced.

use serde::{Serialize, Serializer};

pub const NOT_AVAILABLE: &str = "N/A";
pub const ERROR_MARKER: &str = "Error";

/// A per-round score as shown to callers.
///
/// Missing data is reported as `"N/A"` and failed lookups as `"Error"`;
/// neither is ever coerced to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreCell {
    Points(i64),
    NotAvailable,
    Error,
}

impl Serialize for ScoreCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ScoreCell::Points(p) => serializer.serialize_i64(*p),
            ScoreCell::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
            ScoreCell::Error => serializer.serialize_str(ERROR_MARKER),
        }
    }
}
