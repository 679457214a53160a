//! Remote extraction client
//!
//! Sends the canonical image and query to `POST <base>/api/extract`. When
//! the service cannot produce a usable answer the client logs the cause and
//! answers from the local synthesizer, so callers only ever see local
//! failures.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::{debug, info, warn};

use crate::config::GeoPixelConfig;
use crate::extraction::errors::{ExtractionError, ExtractionOutcome};
use crate::extraction::features::image_features;
use crate::extraction::markers::marker_count;
use crate::extraction::synthesizer::synthesize;
use crate::extraction::types::{ExtractionRequest, ExtractionResult, WireRequest, WireResponse};
use crate::raster::CanonicalImage;

/// Path of the extraction endpoint below the base URL
pub const EXTRACT_PATH: &str = "/api/extract";

/// Anything that can answer an extraction request
///
/// The orchestrator depends on this rather than on the HTTP client, so a
/// different backend or a test double can be plugged in.
#[async_trait]
pub trait FeatureExtractor: Send + Sync {
    async fn extract(&self, request: &ExtractionRequest) -> ExtractionOutcome<ExtractionResult>;
}

/// Why the remote service did not produce a result
#[derive(Debug)]
enum RemoteError {
    Transport(reqwest::Error),
    Status(reqwest::StatusCode),
    Body(reqwest::Error),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Transport(e) if e.is_timeout() => write!(f, "request timed out"),
            RemoteError::Transport(e) => write!(f, "transport error: {}", e),
            RemoteError::Status(status) => write!(f, "service answered {}", status),
            RemoteError::Body(e) => write!(f, "undecodable response: {}", e),
        }
    }
}

/// HTTP client for the extraction service
///
/// Configured once and shared behind an `Arc`; it holds no per-request
/// state.
#[derive(Debug, Clone)]
pub struct ExtractionClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ExtractionClient {
    /// Creates a client for the service at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ExtractionOutcome<Self> {
        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| ExtractionError::ClientSetup(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!("Extraction client targets {}{}", base_url, EXTRACT_PATH);
        Ok(ExtractionClient { http, base_url, timeout })
    }

    /// Creates a client from the resolved configuration
    pub fn from_config(config: &GeoPixelConfig) -> ExtractionOutcome<Self> {
        Self::new(config.endpoint.clone(), Duration::from_secs(config.request_timeout_secs))
    }

    /// Full URL of the extraction endpoint
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, EXTRACT_PATH)
    }

    /// Answer `request`, from the service when possible
    ///
    /// # Returns
    /// A result tagged `Remote` or `Fallback`, or an error for a malformed
    /// request or an image that cannot be re-encoded
    pub async fn extract(&self, request: &ExtractionRequest) -> ExtractionOutcome<ExtractionResult> {
        if request.query.trim().is_empty() {
            return Err(ExtractionError::InvalidRequest("query is empty".to_string()));
        }
        if request.max_tokens == Some(0) {
            return Err(ExtractionError::InvalidRequest("max_tokens must be positive".to_string()));
        }

        let image = encode_image(Arc::clone(&request.image)).await?;
        let body = WireRequest {
            image,
            query: &request.query,
            max_tokens: request.max_tokens,
        };

        let started = Instant::now();
        let mut result = match self.call_remote(&body).await {
            Ok(result) => {
                info!("Remote extraction answered in {:.2}s with {} masks",
                      started.elapsed().as_secs_f64(), result.masks.len());
                let markers = marker_count(&result.description);
                if markers != result.masks.len() {
                    warn!("Remote description has {} segment markers for {} masks", markers, result.masks.len());
                }
                result
            }
            Err(cause) => {
                warn!("Remote extraction at {} unavailable ({}), used fallback", self.endpoint(), cause);
                synthesize(&request.query)
            }
        };

        if result.features.is_empty() {
            result.features = image_features(&request.image);
        }
        Ok(result)
    }

    async fn call_remote(&self, body: &WireRequest<'_>) -> Result<ExtractionResult, RemoteError> {
        let response = self
            .http
            .post(self.endpoint())
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(RemoteError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let wire: WireResponse = response.json().await.map_err(RemoteError::Body)?;
        Ok(wire.into_result())
    }
}

#[async_trait]
impl FeatureExtractor for ExtractionClient {
    async fn extract(&self, request: &ExtractionRequest) -> ExtractionOutcome<ExtractionResult> {
        ExtractionClient::extract(self, request).await
    }
}

/// PNG-encode and base64 the image on a blocking worker
async fn encode_image(image: Arc<CanonicalImage>) -> ExtractionOutcome<String> {
    let png = tokio::task::spawn_blocking(move || image.to_png())
        .await
        .map_err(|e| ExtractionError::Encoding(format!("encoder worker failed: {}", e)))??;
    debug!("Encoded {} byte PNG for upload", png.len());
    Ok(BASE64.encode(png))
}
