//! Annotation fetches against the NCBI esummary endpoint
//!
//! One variant identifier in, one significance string out: the client
//! absorbs every per-item failure and always produces a report cell.
//! Transient failures (connect errors, timeouts, non-success statuses) are
//! retried with exponential backoff; a document that does not parse is
//! final, because the service would send the same bytes again.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::config::AnnotateConfig;
use crate::error::Result;
use crate::rate_limit::RequestPacer;
use crate::summary::{self, SummaryError};

/// Significance reported for a well-formed summary without clinical data
pub const NO_KNOWN_IMPLICATIONS: &str = "No known implications";

/// One failed fetch attempt
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("service responded with HTTP {0}")]
    Status(StatusCode),

    /// The response body is not a well-formed summary document
    #[error("{0}")]
    Xml(#[from] SummaryError),
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Parse failures are final; everything else, including every
    /// non-success status, is treated as transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::Xml(_))
    }
}

/// Client for esummary lookups with retry, backoff and request pacing
pub struct AnnotationClient {
    client: Client,
    config: AnnotateConfig,
    pacer: Arc<RequestPacer>,
}

impl AnnotationClient {
    /// Create a client; the pacer is shared with whoever coordinates fetches
    pub fn new(config: AnnotateConfig, pacer: Arc<RequestPacer>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("snpsig/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(AnnotationClient {
            client,
            config,
            pacer,
        })
    }

    /// Fetch the clinical significance for one variant identifier.
    ///
    /// Every path yields a string for the report: the reported
    /// classification, [`NO_KNOWN_IMPLICATIONS`] for a well-formed summary
    /// without one, or a descriptive error line once the attempt budget is
    /// spent. The pacer gates every attempt, retries included.
    pub async fn fetch_significance(&self, rsid: &str) -> String {
        debug!(rsid, "Fetching annotation");

        let mut failures = 0u32;
        loop {
            self.pacer.acquire().await;

            match self.attempt(rsid).await {
                Ok(Some(significance)) => return significance,
                Ok(None) => return NO_KNOWN_IMPLICATIONS.to_string(),
                Err(e) if !e.is_retryable() => {
                    error!(rsid, error = %e, "Summary document could not be parsed");
                    return format!("Error parsing XML: {}", e);
                }
                Err(e) => {
                    failures += 1;
                    if failures >= self.config.max_attempts {
                        error!(rsid, attempts = failures, error = %e, "All fetch attempts failed");
                        return format!("Error fetching information: {}", e);
                    }

                    let backoff_ms = self
                        .config
                        .backoff_base_ms
                        .saturating_mul(2u64.saturating_pow(failures - 1));
                    warn!(
                        rsid,
                        attempt = failures,
                        backoff_ms,
                        error = %e,
                        "Fetch attempt failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                }
            }
        }
    }

    /// One paced request and parse, with a typed outcome
    async fn attempt(&self, rsid: &str) -> std::result::Result<Option<String>, FetchError> {
        let mut query: Vec<(&str, &str)> = vec![
            ("db", &self.config.database),
            ("id", rsid),
            ("tool", &self.config.tool),
            ("email", &self.config.email),
        ];
        if let Some(api_key) = &self.config.api_key {
            query.push(("api_key", api_key));
        }

        let response = self
            .client
            .get(self.config.esummary_url())
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        Ok(summary::clinical_significance(&body)?)
    }
}
