use std::sync::Arc;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::config::ReviewsConfig;
use crate::models::{PlaceDetailsResponse, ReviewSummary};
use crate::observability::Metrics;

/// Internal failure taxonomy for the upstream fetch. Never leaves this
/// module; every variant maps to the same fallback summary.
#[derive(Debug, Error)]
enum ReviewFetchError {
    #[error("Reviews API key not configured")]
    MissingApiKey,

    #[error("Transport error: {0}")]
    Transport(reqwest::Error),

    #[error("Upstream responded with status: {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("Malformed upstream body: {0}")]
    MalformedBody(reqwest::Error),

    #[error("Upstream request denied: {0}")]
    RequestDenied(String),

    #[error("No rating data in upstream response")]
    MissingRating,
}

/// Service aggregating third-party review data for a venue.
///
/// The contract is total: `get_reviews` never fails outward. Review data is
/// a decorative trust signal on a marketing page, so every failure path
/// degrades to the fixed fallback pair and is reported only through logs
/// and metrics.
pub struct ReviewService {
    client: reqwest::Client,
    config: ReviewsConfig,
    metrics: Option<Arc<Metrics>>,
}

impl ReviewService {
    /// Create a new ReviewService. The request timeout is applied at the
    /// transport boundary, on the underlying client.
    pub fn new(config: ReviewsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_default();

        Self {
            client,
            config,
            metrics: None,
        }
    }

    /// Create a new ReviewService that records fetch outcomes
    pub fn new_with_metrics(config: ReviewsConfig, metrics: Arc<Metrics>) -> Self {
        let mut service = Self::new(config);
        service.metrics = Some(metrics);
        service
    }

    /// Fetch the aggregated rating and review count for a place.
    /// Always returns a summary; `from_fallback` marks degraded responses.
    #[instrument(skip(self), fields(place_id = %place_id))]
    pub async fn get_reviews(&self, place_id: &str) -> ReviewSummary {
        match self.fetch_reviews(place_id).await {
            Ok(summary) => {
                crate::info_with_trace!(
                    "Fetched live review data: rating={}, review_count={}",
                    summary.rating,
                    summary.review_count
                );
                if let Some(ref metrics) = self.metrics {
                    metrics.record_review_fetch(true);
                }
                summary
            }
            Err(err) => {
                crate::error_with_trace!("Review fetch failed, serving fallback: {}", err);
                if let Some(ref metrics) = self.metrics {
                    metrics.record_review_fetch(false);
                }
                ReviewSummary::fallback()
            }
        }
    }

    async fn fetch_reviews(&self, place_id: &str) -> Result<ReviewSummary, ReviewFetchError> {
        let api_key = self
            .config
            .reviews_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ReviewFetchError::MissingApiKey)?;

        let url = format!(
            "{}?place_id={}&fields=rating,user_ratings_total&key={}",
            self.config.reviews_endpoint, place_id, api_key
        );

        // Never log the credential
        crate::info_with_trace!(
            "Fetching place details: {}",
            url.replace(api_key, "API_KEY_REDACTED")
        );

        let response = self.send_with_retry(&url).await?;

        if !response.status().is_success() {
            return Err(ReviewFetchError::UpstreamStatus(response.status()));
        }

        let body: PlaceDetailsResponse = response
            .json()
            .await
            .map_err(ReviewFetchError::MalformedBody)?;

        if body.status.as_deref() == Some("REQUEST_DENIED") {
            return Err(ReviewFetchError::RequestDenied(
                body.error_message.unwrap_or_default(),
            ));
        }

        let rating = body
            .result
            .as_ref()
            .and_then(|result| result.rating)
            .ok_or(ReviewFetchError::MissingRating)?;

        let review_count = body
            .result
            .and_then(|result| result.user_ratings_total)
            .unwrap_or(0);

        Ok(ReviewSummary::live(rating, review_count))
    }

    /// One retry at the transport boundary; HTTP error statuses come back
    /// as responses and are not retried.
    async fn send_with_retry(&self, url: &str) -> Result<reqwest::Response, ReviewFetchError> {
        match self.client.get(url).send().await {
            Ok(response) => Ok(response),
            Err(first_err) => {
                warn!("Place details request failed, retrying once: {}", first_err);
                self.client
                    .get(url)
                    .send()
                    .await
                    .map_err(ReviewFetchError::Transport)
            }
        }
    }
}
