//! Normalization of analysis API payload shapes
//!
//! Depending on which workflow produced it, an analysis payload is either the
//! analysis object itself, a wrapper carrying it under `extractedJson` (plus an
//! optional raw `timeSeries` mapping), or an array of such wrappers. Callers
//! build an [`AnalysisEnvelope`] once and derive both views from it.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::candle::{Candle, candles_from_raw_series};
use crate::json_text;

pub const EXTRACTED_JSON_KEY: &str = "extractedJson";
pub const TIME_SERIES_KEY: &str = "timeSeries";

/// Canonical analysis object, keys in the order the backend produced them
pub type AnalysisObject = Map<String, Value>;

/// The shapes an analysis payload arrives in
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum AnalysisEnvelope {
    /// Null or scalar payload; carries no data
    #[default]
    Missing,
    /// The analysis object itself
    Bare(Map<String, Value>),
    /// An object holding an `extractedJson` key
    Wrapper(EnvelopeWrapper),
    /// An array of wrapper-like elements
    Sequence(Vec<EnvelopeWrapper>),
}

/// The two fields a wrapper may carry; null fields are stored as `None`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvelopeWrapper {
    pub extracted_json: Option<Value>,
    pub time_series: Option<Value>,
}

impl AnalysisEnvelope {
    /// Parse a response body.
    ///
    /// A blank body is [`AnalysisEnvelope::Missing`]. A body that is not JSON at
    /// all is kept as `{"rawResponse": body}` so it can still be displayed.
    pub fn parse(body: &str) -> Self {
        if body.trim().is_empty() {
            return Self::Missing;
        }
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Self::from(value),
            Err(_) => {
                let mut raw = Map::new();
                raw.insert("rawResponse".to_string(), Value::String(body.to_string()));
                Self::Bare(raw)
            }
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    fn time_series_map(&self) -> Option<&Map<String, Value>> {
        let series = match self {
            Self::Missing => None,
            Self::Bare(map) => map.get(TIME_SERIES_KEY),
            Self::Wrapper(wrapper) => wrapper.time_series.as_ref(),
            Self::Sequence(items) => items
                .iter()
                .find_map(|item| item.time_series.as_ref().filter(|v| is_truthy(v))),
        };
        series.and_then(Value::as_object)
    }
}

impl From<Value> for AnalysisEnvelope {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                Self::Sequence(items.into_iter().map(EnvelopeWrapper::from).collect())
            }
            Value::Object(map) if map.contains_key(EXTRACTED_JSON_KEY) => {
                Self::Wrapper(EnvelopeWrapper::from(Value::Object(map)))
            }
            Value::Object(map) => Self::Bare(map),
            // Double-encoded payload: a JSON document shipped as a string
            Value::String(text) => match json_text::decode(&text) {
                Some(decoded) => Self::from(decoded),
                None => Self::Missing,
            },
            Value::Null | Value::Bool(_) | Value::Number(_) => Self::Missing,
        }
    }
}

impl From<Value> for EnvelopeWrapper {
    fn from(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };
        Self {
            extracted_json: map.remove(EXTRACTED_JSON_KEY).filter(|v| !v.is_null()),
            time_series: map.remove(TIME_SERIES_KEY).filter(|v| !v.is_null()),
        }
    }
}

/// Derive the canonical analysis object from any envelope shape.
///
/// For a sequence, the first element with a truthy `extractedJson` wins. A
/// found value that is not an object (or a JSON string encoding one) yields an
/// empty object.
pub fn extract_analysis(envelope: &AnalysisEnvelope) -> AnalysisObject {
    let found = match envelope {
        AnalysisEnvelope::Missing => None,
        AnalysisEnvelope::Bare(map) => return map.clone(),
        AnalysisEnvelope::Wrapper(wrapper) => wrapper.extracted_json.as_ref(),
        AnalysisEnvelope::Sequence(items) => items
            .iter()
            .find_map(|item| item.extracted_json.as_ref().filter(|v| is_truthy(v))),
    };
    found.map(coerce_object).unwrap_or_default()
}

/// Derive the date-sorted candle series from any envelope shape.
pub fn extract_time_series(envelope: &AnalysisEnvelope) -> Vec<Candle> {
    envelope
        .time_series_map()
        .map(candles_from_raw_series)
        .unwrap_or_default()
}

fn coerce_object(value: &Value) -> AnalysisObject {
    match value {
        Value::Object(map) => map.clone(),
        Value::String(text) => match json_text::decode(text) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

/// JavaScript truthiness, used when scanning sequences for the first usable field
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
