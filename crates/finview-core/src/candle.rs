//! Candle records for charting

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const OPEN_KEY: &str = "1. open";
pub const HIGH_KEY: &str = "2. high";
pub const LOW_KEY: &str = "3. low";
pub const CLOSE_KEY: &str = "4. close";
pub const VOLUME_KEY: &str = "5. volume";

/// One OHLCV bar handed to the charting layer
///
/// All numeric fields are finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Intraday candle as served by the market data endpoint
///
/// Fields are kept loosely typed: the backend serializes decimals either as
/// JSON numbers or as strings depending on its mapper configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntradayCandle {
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub open: Option<Value>,
    #[serde(default)]
    pub high: Option<Value>,
    #[serde(default)]
    pub low: Option<Value>,
    #[serde(default)]
    pub close: Option<Value>,
    #[serde(default)]
    pub volume: Option<Value>,
}

/// Convert intraday DTOs into candles sorted by date.
///
/// Each numeric field is coerced with a zero default. Entries whose open, high,
/// low or close does not end up finite are discarded; a bad volume becomes 0.
pub fn map_intraday_to_candles(series: &[IntradayCandle]) -> Vec<Candle> {
    let mut candles: Vec<Candle> = series
        .iter()
        .filter_map(|item| {
            let candle = Candle {
                date: timestamp_text(item.timestamp.as_ref()),
                open: coerce_number(item.open.as_ref()),
                high: coerce_number(item.high.as_ref()),
                low: coerce_number(item.low.as_ref()),
                close: coerce_number(item.close.as_ref()),
                volume: finite_or_zero(coerce_number(item.volume.as_ref())),
            };
            candle.has_finite_prices().then_some(candle)
        })
        .collect();
    sort_by_date(&mut candles);
    candles
}

/// Convert a raw `date -> {"1. open": ..}` mapping into candles sorted by date.
pub(crate) fn candles_from_raw_series(series: &Map<String, Value>) -> Vec<Candle> {
    let mut candles: Vec<Candle> = series
        .iter()
        .filter_map(|(date, fields)| {
            Some(Candle {
                date: date.clone(),
                open: parse_decimal(fields.get(OPEN_KEY))?,
                high: parse_decimal(fields.get(HIGH_KEY))?,
                low: parse_decimal(fields.get(LOW_KEY))?,
                close: parse_decimal(fields.get(CLOSE_KEY))?,
                volume: parse_decimal(fields.get(VOLUME_KEY)).unwrap_or(0.0),
            })
        })
        .collect();
    sort_by_date(&mut candles);
    candles
}

impl Candle {
    fn has_finite_prices(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|v| v.is_finite())
    }
}

// Plain string ordering: only correct for fixed-width, zero-padded ISO dates.
fn sort_by_date(candles: &mut [Candle]) {
    candles.sort_by(|a, b| a.date.cmp(&b.date));
}

fn parse_decimal(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Loose numeric conversion: absent, null and blank become 0, booleans 0/1,
/// anything unparseable NaN.
fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        None | Some(Value::Null) => 0.0,
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        Some(Value::Array(_) | Value::Object(_)) => f64::NAN,
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn timestamp_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
