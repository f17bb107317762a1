//! Analysis payload normalization and rendering
//!
//! The analysis backend answers with loosely-typed JSON produced by an upstream
//! generation workflow. This crate turns those payloads into something a display
//! layer can use without branching on shape:
//!
//! - [`AnalysisEnvelope`] models the three shapes a payload arrives in (bare
//!   object, wrapper with `extractedJson`/`timeSeries`, array of wrappers)
//! - [`extract_analysis`] and [`extract_time_series`] derive the canonical
//!   analysis object and the sorted [`Candle`] series from any envelope
//! - [`render`] and [`to_readable_text`] turn arbitrary JSON into readable text
//!
//! Everything here is synchronous and total: malformed input degrades to an
//! empty result instead of an error.
//!
//! # Example
//!
//! ```
//! use finview_core::{AnalysisEnvelope, extract_analysis, to_readable_text};
//! use serde_json::{Value, json};
//!
//! let envelope = AnalysisEnvelope::from(json!([
//!     { "extractedJson": { "stock": "AAPL", "notes": "steady\\nuptrend" } }
//! ]));
//! let analysis = extract_analysis(&envelope);
//! let text = to_readable_text(&Value::Object(analysis));
//! assert_eq!(text, "Stock: AAPL\n\nNotes:\n  steady\n  uptrend");
//! ```

pub mod candle;
pub mod display;
pub mod envelope;
mod json_text;
pub mod render;

pub use candle::{Candle, IntradayCandle, map_intraday_to_candles};
pub use display::format_date;
pub use envelope::{AnalysisEnvelope, AnalysisObject, EnvelopeWrapper, extract_analysis, extract_time_series};
pub use render::{NO_RESULT_PLACEHOLDER, prettify_key, render, to_readable_text};
