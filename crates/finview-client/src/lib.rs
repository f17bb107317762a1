//! Async client for the finview analysis API
//!
//! Wraps the backend's stock and news analysis endpoints with typed requests
//! and responses, and wires the raw single-stock payload through the
//! normalizer from [`finview_core`].
//!
//! # Example
//!
//! ```rust,no_run
//! use finview_client::{AnalysisClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> finview_client::Result<()> {
//!     let config = ClientConfig::builder()
//!         .base_url("http://localhost:8080/api")
//!         .with_env()
//!         .build()?;
//!     let client = AnalysisClient::new(config)?;
//!
//!     let combined = client.analyze_with_series("AAPL").await?;
//!     println!("{}", combined.readable_text());
//!     println!("{} candles", combined.series.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod models;

pub use api::{AnalysisClient, RawAnalysisSource, analyze_with_series};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use models::{
    AnalysisType, AnalysisWithSeries, IntradayInterval, IntradayTimeSeriesResponse,
    NewsAnalysisResponse, StockAnalysisResponse,
};
