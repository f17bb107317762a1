//! Request and response types of the analysis API

use std::fmt;
use std::str::FromStr;

use finview_core::{
    AnalysisEnvelope, AnalysisObject, Candle, IntradayCandle, extract_analysis,
    extract_time_series, map_intraday_to_candles, to_readable_text,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ClientError, Result};

/// Which upstream workflow produces a stock analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum AnalysisType {
    /// Free-form narrative analysis (default)
    #[default]
    Comprehensive,
    /// Structured JSON analysis
    Structured,
}

impl AnalysisType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comprehensive => "COMPREHENSIVE",
            Self::Structured => "STRUCTURED",
        }
    }
}

// Unknown or blank values mean comprehensive, matching the backend
impl From<String> for AnalysisType {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case("structured") {
            Self::Structured
        } else {
            Self::Comprehensive
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysisRequest {
    pub stock_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<AnalysisType>,
}

/// A stored or freshly produced stock analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAnalysisResponse {
    #[serde(default)]
    pub id: Option<i64>,
    pub stock_code: String,
    #[serde(default)]
    pub analysis_type: Option<AnalysisType>,
    #[serde(default)]
    pub analysis: Value,
    #[serde(default)]
    pub requested_at: Option<String>,
}

impl StockAnalysisResponse {
    pub fn envelope(&self) -> AnalysisEnvelope {
        AnalysisEnvelope::from(self.analysis.clone())
    }

    /// Readable text of the analysis.
    ///
    /// Wrapped payloads are unwrapped first so wrapper field names never reach
    /// the reader; anything else is rendered as it came.
    pub fn readable_text(&self) -> String {
        match self.envelope() {
            envelope @ (AnalysisEnvelope::Wrapper(_) | AnalysisEnvelope::Sequence(_)) => {
                to_readable_text(&Value::Object(extract_analysis(&envelope)))
            }
            _ => to_readable_text(&self.analysis),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsAnalysisRequest {
    pub keyword: String,
}

/// A stored or freshly produced news analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsAnalysisResponse {
    #[serde(default)]
    pub id: Option<i64>,
    pub keyword: String,
    #[serde(default)]
    pub analysis: Value,
    #[serde(default)]
    pub requested_at: Option<String>,
}

impl NewsAnalysisResponse {
    pub fn readable_text(&self) -> String {
        to_readable_text(&self.analysis)
    }
}

/// Intraday bar interval accepted by the market data endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntradayInterval {
    #[serde(rename = "1min")]
    OneMinute,
    #[default]
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
    #[serde(rename = "60min")]
    SixtyMinutes,
}

impl IntradayInterval {
    pub const ALL: [Self; 5] = [
        Self::OneMinute,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::SixtyMinutes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneMinute => "1min",
            Self::FiveMinutes => "5min",
            Self::FifteenMinutes => "15min",
            Self::ThirtyMinutes => "30min",
            Self::SixtyMinutes => "60min",
        }
    }
}

impl FromStr for IntradayInterval {
    type Err = ClientError;

    fn from_str(raw: &str) -> Result<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|interval| interval.as_str() == normalized)
            .ok_or_else(|| ClientError::InvalidInterval(raw.to_string()))
    }
}

impl fmt::Display for IntradayInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntradayTimeSeriesResponse {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub interval: String,
    #[serde(default)]
    pub last_refreshed: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub candles: Vec<IntradayCandle>,
}

impl IntradayTimeSeriesResponse {
    /// Chart-ready candles, invalid bars dropped, sorted by timestamp
    pub fn to_candles(&self) -> Vec<Candle> {
        map_intraday_to_candles(&self.candles)
    }
}

/// Analysis object and candle series derived from one raw payload
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisWithSeries {
    pub analysis: AnalysisObject,
    pub series: Vec<Candle>,
}

impl AnalysisWithSeries {
    pub fn from_envelope(envelope: &AnalysisEnvelope) -> Self {
        Self {
            analysis: extract_analysis(envelope),
            series: extract_time_series(envelope),
        }
    }

    pub fn readable_text(&self) -> String {
        to_readable_text(&Value::Object(self.analysis.clone()))
    }
}

/// Trim and upper-case a stock code, rejecting blank input.
pub fn normalize_stock_code(code: &str) -> Result<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidSymbol(code.to_string()));
    }
    Ok(trimmed.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analysis_type_parsing() {
        assert_eq!(AnalysisType::from("structured".to_string()), AnalysisType::Structured);
        assert_eq!(AnalysisType::from(" STRUCTURED ".to_string()), AnalysisType::Structured);
        assert_eq!(AnalysisType::from("anything".to_string()), AnalysisType::Comprehensive);
        assert_eq!(AnalysisType::from(String::new()), AnalysisType::Comprehensive);
    }

    #[test]
    fn test_request_serialization() {
        let request = StockAnalysisRequest {
            stock_code: "AAPL".to_string(),
            analysis_type: Some(AnalysisType::Structured),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"stockCode": "AAPL", "analysisType": "STRUCTURED"})
        );

        let request = StockAnalysisRequest {
            stock_code: "MSFT".to_string(),
            analysis_type: None,
        };
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"stockCode": "MSFT"}));
    }

    #[test]
    fn test_stock_response_deserialization() {
        let response: StockAnalysisResponse = serde_json::from_value(json!({
            "id": 7,
            "stockCode": "AAPL",
            "analysisType": "structured",
            "analysis": {"extractedJson": {"stock": "AAPL"}},
            "requestedAt": "2024-05-01T09:30:00"
        }))
        .unwrap();

        assert_eq!(response.id, Some(7));
        assert_eq!(response.analysis_type, Some(AnalysisType::Structured));
        assert!(matches!(response.envelope(), AnalysisEnvelope::Wrapper(_)));
        assert_eq!(response.readable_text(), "Stock: AAPL");

        let narrative: StockAnalysisResponse = serde_json::from_value(json!({
            "stockCode": "MSFT",
            "analysis": "Outlook\\nPositive"
        }))
        .unwrap();
        assert_eq!(narrative.readable_text(), "Outlook\nPositive");
    }

    #[test]
    fn test_news_response_with_empty_analysis() {
        let response: NewsAnalysisResponse =
            serde_json::from_value(json!({"keyword": "chips", "analysis": null})).unwrap();
        assert_eq!(response.id, None);
        assert_eq!(response.readable_text(), finview_core::NO_RESULT_PLACEHOLDER);
    }

    #[test]
    fn test_interval_parsing() {
        assert_eq!("5min".parse::<IntradayInterval>().unwrap(), IntradayInterval::FiveMinutes);
        assert_eq!(" 60MIN ".parse::<IntradayInterval>().unwrap(), IntradayInterval::SixtyMinutes);
        assert!(matches!(
            "2min".parse::<IntradayInterval>(),
            Err(ClientError::InvalidInterval(_))
        ));
        assert_eq!(IntradayInterval::default().to_string(), "5min");
    }

    #[test]
    fn test_intraday_response_to_candles() {
        let response: IntradayTimeSeriesResponse = serde_json::from_value(json!({
            "symbol": "AAPL",
            "interval": "5min",
            "lastRefreshed": "2024-05-01 16:00:00",
            "timezone": "US/Eastern",
            "candles": [
                {"timestamp": "2024-05-01T15:55-04:00", "open": 170.1, "high": 170.4, "low": 169.9, "close": 170.2, "volume": 5300},
                {"timestamp": "2024-05-01T15:50-04:00", "open": 170.0, "high": 170.3, "low": 169.8, "close": 170.1, "volume": 4100}
            ]
        }))
        .unwrap();

        let candles = response.to_candles();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].date, "2024-05-01T15:50-04:00");
        assert_eq!(candles[1].volume, 5300.0);
    }

    #[test]
    fn test_analysis_with_series_from_envelope() {
        let envelope = AnalysisEnvelope::from(json!([{
            "extractedJson": {"stock": "AAPL"},
            "timeSeries": {
                "2024-01-02": {"1. open": "1", "2. high": "2", "3. low": "1", "4. close": "2"}
            }
        }]));
        let combined = AnalysisWithSeries::from_envelope(&envelope);
        assert_eq!(combined.analysis.get("stock"), Some(&json!("AAPL")));
        assert_eq!(combined.series.len(), 1);
        assert_eq!(combined.readable_text(), "Stock: AAPL");
    }

    #[test]
    fn test_normalize_stock_code() {
        assert_eq!(normalize_stock_code(" aapl ").unwrap(), "AAPL");
        assert!(matches!(normalize_stock_code("   "), Err(ClientError::InvalidSymbol(_))));
    }
}
