// Analysis engine client.
//
// Both calls to the engine live here: the buffered analysis request and
// the token-streaming request. There is exactly one implementation, so
// the client is a plain capability value (base URL, optional timeout,
// reqwest handle) rather than a trait object; tests point it at a mock
// server instead of substituting a mock client.

use std::pin::Pin;
use std::time::Duration;

use axum::http::StatusCode;
use bytes::Bytes;
use futures_util::stream::Stream;
use futures_util::StreamExt;
use tokio_stream::wrappers::ReceiverStream;

use crate::config::EngineConfig;
use crate::query::{AnalysisResult, MedicalQuery};
use crate::stream::{extract_tokens, StreamContext};

/// Failures talking to the analysis engine before any token reaches the
/// client. Mid-stream failures never surface here; by then the response
/// has started and only the logs can record them.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("engine request failed: {0}")]
    Transport(String),

    #[error("engine request timed out: {0}")]
    Timeout(String),

    #[error("engine returned status {0}")]
    Status(StatusCode),

    #[error("engine response could not be decoded: {0}")]
    Decode(String),
}

/// Handle to the analysis engine. Cheap to clone: the reqwest client is
/// a shared-pool handle, and the pool is the only state shared across
/// requests.
#[derive(Debug, Clone)]
pub struct EngineClient {
    base_url: String,
    timeout: Option<Duration>,
    http: reqwest::Client,
}

impl EngineClient {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout_ms.map(Duration::from_millis),
            http: reqwest::Client::new(),
        }
    }

    /// Buffered analysis: POST the query, await the full response, and
    /// decode it. Fails on transport errors, non-success status, or a
    /// body that does not match the expected shape.
    pub async fn analyze(&self, query: &MedicalQuery) -> Result<AnalysisResult, UpstreamError> {
        let response = self.post_json("analyze", query).await?;
        response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    /// Streaming analysis: POST the query, then hand the response byte
    /// stream to the token extractor. Fails before any token is produced
    /// if the connection cannot be established or the engine answers with
    /// a non-success status. Dropping the returned stream tears down the
    /// producer and releases the upstream connection.
    pub async fn analyze_stream(
        &self,
        query: &MedicalQuery,
        ctx: StreamContext,
    ) -> Result<ReceiverStream<String>, UpstreamError> {
        let response = self.post_json("analyze-stream", query).await?;

        let bytes: Pin<Box<dyn Stream<Item = Result<Bytes, UpstreamError>> + Send>> = Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(|e| UpstreamError::Transport(e.to_string()))),
        );

        Ok(extract_tokens(bytes, ctx))
    }

    async fn post_json(
        &self,
        path: &str,
        query: &MedicalQuery,
    ) -> Result<reqwest::Response, UpstreamError> {
        let mut request = self
            .http
            .post(format!("{}/{path}", self.base_url))
            .json(query);

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout(e.to_string())
            } else {
                UpstreamError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        Ok(response)
    }
}
