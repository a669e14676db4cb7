use crate::value::Value;

///
/// Canonical Value Rank
///
/// Stable rank used for cross-variant ordering.
/// Numeric variants share one rank so mixed integral/float columns sort by
/// magnitude. `Null` ranks lowest.
///
#[must_use]
pub(super) const fn canonical_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Float(_) | Value::Int(_) | Value::Uint(_) => 2,
        Value::Timestamp(_) => 3,
        Value::Text(_) => 4,
        Value::List(_) => 5,
    }
}
