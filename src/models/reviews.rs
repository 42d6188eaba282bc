use serde::{Deserialize, Serialize};

/// Fixed rating pair returned whenever live review data cannot be obtained
pub const FALLBACK_RATING: f64 = 4.8;
pub const FALLBACK_REVIEW_COUNT: u32 = 127;

/// Aggregated review data for a venue. `from_fallback` distinguishes live
/// upstream data from the static default without changing the total-function
/// contract of the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub rating: f64,
    pub review_count: u32,
    pub from_fallback: bool,
}

impl ReviewSummary {
    /// The static default served on any upstream failure
    pub fn fallback() -> Self {
        Self {
            rating: FALLBACK_RATING,
            review_count: FALLBACK_REVIEW_COUNT,
            from_fallback: true,
        }
    }

    pub fn live(rating: f64, review_count: u32) -> Self {
        Self {
            rating,
            review_count,
            from_fallback: false,
        }
    }
}

/// Place Details response body. Every field is optional; the upstream
/// reports errors in-band via `status` / `error_message`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetailsResponse {
    pub result: Option<PlaceDetailsResult>,
    pub status: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetailsResult {
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_pair() {
        let summary = ReviewSummary::fallback();
        assert_eq!(summary.rating, 4.8);
        assert_eq!(summary.review_count, 127);
        assert!(summary.from_fallback);
    }

    #[test]
    fn test_live_summary() {
        let summary = ReviewSummary::live(4.3, 250);
        assert_eq!(summary.rating, 4.3);
        assert_eq!(summary.review_count, 250);
        assert!(!summary.from_fallback);
    }

    #[test]
    fn test_place_details_parses_with_all_fields_missing() {
        let parsed: PlaceDetailsResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.result.is_none());
        assert!(parsed.status.is_none());
        assert!(parsed.error_message.is_none());
    }

    #[test]
    fn test_place_details_parses_well_formed_body() {
        let body = r#"{
            "result": { "rating": 4.3, "user_ratings_total": 250 },
            "status": "OK"
        }"#;
        let parsed: PlaceDetailsResponse = serde_json::from_str(body).unwrap();
        let result = parsed.result.unwrap();
        assert_eq!(result.rating, Some(4.3));
        assert_eq!(result.user_ratings_total, Some(250));
        assert_eq!(parsed.status.as_deref(), Some("OK"));
    }
}
