//! Terminal formatting for analysis results

use comfy_table::{Table, presets::UTF8_FULL};
use finview_client::{IntradayTimeSeriesResponse, NewsAnalysisResponse, StockAnalysisResponse};
use finview_core::{Candle, format_date, to_readable_text};
use serde_json::Value;

const NO_CANDLES: &str = "No candle data.";

pub fn format_stock_response(response: &StockAnalysisResponse) -> String {
    let mut header = response.stock_code.clone();
    if let Some(kind) = response.analysis_type {
        header.push_str(&format!(" | {kind}"));
    }
    if let Some(at) = &response.requested_at {
        header.push_str(&format!(" | {}", format_date(at)));
    }
    format!("{header}\n\n{}", response.readable_text())
}

pub fn format_news_response(response: &NewsAnalysisResponse) -> String {
    let mut header = response.keyword.clone();
    if let Some(at) = &response.requested_at {
        header.push_str(&format!(" | {}", format_date(at)));
    }
    format!("{header}\n\n{}", response.readable_text())
}

pub fn format_intraday_header(response: &IntradayTimeSeriesResponse) -> String {
    let mut header = format!("{} {}", response.symbol, response.interval);
    match (&response.last_refreshed, &response.timezone) {
        (Some(at), Some(tz)) => header.push_str(&format!(" (last refreshed {at} {tz})")),
        (Some(at), None) => header.push_str(&format!(" (last refreshed {at})")),
        _ => {}
    }
    header
}

pub fn format_candles(candles: &[Candle]) -> String {
    if candles.is_empty() {
        return NO_CANDLES.to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Date", "Open", "High", "Low", "Close", "Volume"]);
    for candle in candles {
        table.add_row(vec![
            candle.date.clone(),
            format!("{:.2}", candle.open),
            format!("{:.2}", candle.high),
            format!("{:.2}", candle.low),
            format!("{:.2}", candle.close),
            format!("{:.0}", candle.volume),
        ]);
    }
    table.to_string()
}

/// Render arbitrary input: JSON documents structurally, anything else as text.
pub fn render_input(input: &str) -> String {
    match serde_json::from_str::<Value>(input) {
        Ok(value) => to_readable_text(&value),
        Err(_) => to_readable_text(&Value::String(input.to_string())),
    }
}
