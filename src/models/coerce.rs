// Parse-or-default coercion for loosely typed control-plane JSON.
// Fields may arrive as number, numeric string, null or garbage; the rest of
// the crate only sees u64 / String.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Non-negative integer from any JSON value. Input that does not yield a finite
/// value >= 0 (NaN-producing strings, negatives, objects) becomes 0.
pub fn uint<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(value_to_u64(&v))
}

/// String from any JSON value; null becomes "", numbers are rendered.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Vec from an array or null. Entries that do not decode are dropped with a
/// warning; the rest of the batch is kept.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let mut out = Vec::with_capacity(raw.len());
    for (index, v) in raw.into_iter().enumerate() {
        match serde_json::from_value(v) {
            Ok(item) => out.push(item),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    index,
                    operation = "decode_list",
                    "skipping malformed list entry"
                );
            }
        }
    }
    Ok(out)
}

pub fn value_to_u64(v: &Value) -> u64 {
    match v {
        Value::Number(n) => match n.as_u64() {
            Some(u) => u,
            None => n.as_f64().map(f64_to_u64).unwrap_or(0),
        },
        Value::String(s) => str_to_u64(s),
        Value::Bool(b) => u64::from(*b),
        _ => 0,
    }
}

fn str_to_u64(s: &str) -> u64 {
    let s = s.trim();
    if let Ok(u) = s.parse::<u64>() {
        return u;
    }
    s.parse::<f64>().map(f64_to_u64).unwrap_or(0)
}

fn f64_to_u64(f: f64) -> u64 {
    if f.is_finite() && f >= 0.0 {
        f as u64
    } else {
        0
    }
}
