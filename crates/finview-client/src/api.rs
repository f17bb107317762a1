//! HTTP client for the analysis API

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use finview_core::AnalysisEnvelope;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result, server_message};
use crate::models::{
    AnalysisType, AnalysisWithSeries, IntradayInterval, IntradayTimeSeriesResponse,
    NewsAnalysisRequest, NewsAnalysisResponse, StockAnalysisRequest, StockAnalysisResponse,
    normalize_stock_code,
};

const STOCK_ANALYSIS_PATH: &str = "stocks/analysis";
const STOCK_HISTORY_PATH: &str = "stocks/history";
const STOCK_RAW_PATH: &str = "stocks/analyze";
const STOCK_INTRADAY_PATH: &str = "stocks/intraday";
const NEWS_ANALYSIS_PATH: &str = "news/analysis";
const NEWS_HISTORY_PATH: &str = "news/history";

/// Source of raw analysis payloads for a stock code
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RawAnalysisSource: Send + Sync {
    /// Fetch the untouched analysis payload for `code`
    async fn fetch_raw_analysis(&self, code: &str) -> Result<AnalysisEnvelope>;
}

/// Fetch one raw payload and derive both the analysis object and the candle
/// series from that same payload.
#[instrument(skip(source))]
pub async fn analyze_with_series<S>(source: &S, code: &str) -> Result<AnalysisWithSeries>
where
    S: RawAnalysisSource + ?Sized,
{
    let envelope = source.fetch_raw_analysis(code).await?;
    let combined = AnalysisWithSeries::from_envelope(&envelope);
    debug!(
        fields = combined.analysis.len(),
        candles = combined.series.len(),
        "Normalized single-stock analysis"
    );
    Ok(combined)
}

/// Client for the stock and news analysis endpoints
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    client: Client,
    base_url: Url,
    config: Arc<ClientConfig>,
}

impl AnalysisClient {
    /// Create a client from a validated configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let base_url = config.base()?;
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            client,
            base_url,
            config: Arc::new(config),
        })
    }

    /// Create from `FINVIEW_*` environment variables with defaults for the rest
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::builder().with_env().build()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve an endpoint path against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Submit a stock for analysis
    #[instrument(skip(self))]
    pub async fn analyze_stock(
        &self,
        code: &str,
        analysis_type: Option<AnalysisType>,
    ) -> Result<StockAnalysisResponse> {
        let request = StockAnalysisRequest {
            stock_code: normalize_stock_code(code)?,
            analysis_type,
        };
        info!(stock_code = %request.stock_code, "Requesting stock analysis");
        self.post_json(STOCK_ANALYSIS_PATH, &request, self.config.analysis_timeout)
            .await
    }

    /// Recent stock analyses, newest first
    #[instrument(skip(self))]
    pub async fn fetch_history(&self) -> Result<Vec<StockAnalysisResponse>> {
        self.get_json(STOCK_HISTORY_PATH, &[]).await
    }

    /// Submit a news keyword for analysis
    #[instrument(skip(self))]
    pub async fn analyze_news(&self, keyword: &str) -> Result<NewsAnalysisResponse> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ClientError::InvalidInput("keyword is required".to_string()));
        }
        let request = NewsAnalysisRequest {
            keyword: keyword.to_string(),
        };
        info!(keyword, "Requesting news analysis");
        self.post_json(NEWS_ANALYSIS_PATH, &request, self.config.request_timeout)
            .await
    }

    /// Recent news analyses, newest first
    #[instrument(skip(self))]
    pub async fn fetch_news_history(&self) -> Result<Vec<NewsAnalysisResponse>> {
        self.get_json(NEWS_HISTORY_PATH, &[]).await
    }

    /// Intraday candles for `symbol`
    ///
    /// The backend does not document a market data route yet; this assumes
    /// `GET stocks/intraday?symbol=&interval=` until one is published.
    #[instrument(skip(self))]
    pub async fn fetch_intraday(
        &self,
        symbol: &str,
        interval: IntradayInterval,
    ) -> Result<IntradayTimeSeriesResponse> {
        let symbol = normalize_stock_code(symbol)?;
        let response: IntradayTimeSeriesResponse = self
            .get_json(
                STOCK_INTRADAY_PATH,
                &[("symbol", symbol.as_str()), ("interval", interval.as_str())],
            )
            .await?;
        debug!(candles = response.candles.len(), "Fetched intraday series");
        Ok(response)
    }

    /// Single-stock analysis with its candle series, both from one payload
    pub async fn analyze_with_series(&self, code: &str) -> Result<AnalysisWithSeries> {
        analyze_with_series(self, code).await
    }

    async fn raw_analysis(&self, code: &str) -> Result<AnalysisEnvelope> {
        let code = normalize_stock_code(code)?;
        info!(code = %code, "Requesting single-stock analysis");
        let url = self.endpoint(STOCK_RAW_PATH)?;
        let response = self
            .send(self.client.get(url).query(&[("code", code.as_str())]))
            .await?;
        let body = response.text().await?;
        debug!(bytes = body.len(), "Received raw analysis payload");
        Ok(AnalysisEnvelope::parse(&body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self.send(self.client.get(url).query(query)).await?;
        decode_body(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B, timeout: Duration) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let request = self.client.post(url).timeout(timeout).json(body);
        let response = self.send(request).await?;
        decode_body(response).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = match &self.config.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().clone();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                debug!(error = %err, "Failed to read error response body");
                String::new()
            }
        };
        let message = server_message(&body);
        warn!(status = status.as_u16(), %url, "Analysis API request failed");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized { message });
        }
        Err(ClientError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl RawAnalysisSource for AnalysisClient {
    async fn fetch_raw_analysis(&self, code: &str) -> Result<AnalysisEnvelope> {
        self.raw_analysis(code).await
    }
}

async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    debug!(bytes = body.len(), "Received response body");
    Ok(serde_json::from_str(&body)?)
}
