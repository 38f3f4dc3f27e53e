use serde_json::Value;

use crate::{
    foundation::error::{RevealError, RevealResult},
    ingest::records::{BarRow, Segment},
    style::palette::Palette,
};

/// Decode `text` as a JSON array, unwrapping one extra layer of string encoding.
///
/// `[1,2]` and `"[1,2]"` (a JSON string whose content is the array) decode to the same
/// records.
pub fn decode_records(text: &str) -> RevealResult<Vec<Value>> {
    let first: Value = serde_json::from_str(text)
        .map_err(|e| RevealError::ingest(format!("decode payload: {e}")))?;
    let value = match first {
        Value::String(inner) => serde_json::from_str(&inner)
            .map_err(|e| RevealError::ingest(format!("decode inner payload: {e}")))?,
        other => other,
    };
    match value {
        Value::Array(items) => Ok(items),
        other => Err(RevealError::ingest(format!(
            "expected a JSON array, found {}",
            value_kind(&other)
        ))),
    }
}

/// Donut segments from an embedded payload.
///
/// Never fails: undecodable payloads are logged and yield no segments. Segments whose
/// count is not a positive number are dropped.
pub fn ingest_segments(text: &str, palette: &Palette) -> Vec<Segment> {
    records_or_empty(text, "donut")
        .iter()
        .filter_map(|record| {
            let count = coerce_count(record.get("count")).map(round_count)?;
            if count == 0 {
                return None;
            }
            let label = coerce_label(record.get("label"));
            let color = palette.resolve(&label);
            Some(Segment {
                label,
                count,
                color,
            })
        })
        .collect()
}

/// Bar rows from an embedded payload. Rows with zero or non-numeric counts are kept
/// with a count of 0.
pub fn ingest_bars(text: &str) -> Vec<BarRow> {
    records_or_empty(text, "bars")
        .iter()
        .map(|record| BarRow {
            label: coerce_label(record.get("label")),
            count: coerce_count(record.get("count")).map_or(0, round_count),
            category: record
                .get("category")
                .and_then(Value::as_str)
                .map(str::to_owned),
        })
        .collect()
}

fn records_or_empty(text: &str, payload: &'static str) -> Vec<Value> {
    // A missing or blank payload is an empty dataset, not a decode failure.
    if text.trim().is_empty() {
        return Vec::new();
    }
    match decode_records(text) {
        Ok(records) => records,
        Err(err) => {
            tracing::error!(payload, error = %err, "chart data decode failed, using empty data");
            Vec::new()
        }
    }
}

/// Loose numeric conversion. `None` means "not a number".
fn coerce_count(v: Option<&Value>) -> Option<f64> {
    let n = match v {
        None | Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64()?,
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().ok()?
            }
        }
        Some(Value::Array(_) | Value::Object(_)) => return None,
    };
    n.is_finite().then_some(n)
}

fn round_count(n: f64) -> u64 {
    n.round().max(0.0) as u64
}

fn coerce_label(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ingest/decode.rs"]
mod tests;
