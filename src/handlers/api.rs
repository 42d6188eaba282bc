use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::models::{
    Category, DailyMenuResponse, MenuItemListResponse, ReviewSummary, ServiceError,
};
use crate::services::{CatalogService, ReviewService};

/// Shared application state for the public API
#[derive(Clone)]
pub struct ApiState {
    pub catalog_service: Arc<CatalogService>,
    pub review_service: Arc<ReviewService>,
}

/// Query parameters for listing menu items
#[derive(Debug, Deserialize)]
pub struct ListMenuItemsQuery {
    pub category_id: Option<String>,
}

/// Query parameters for the daily menu lookup
#[derive(Debug, Deserialize)]
pub struct DailyMenuQuery {
    /// Calendar date (YYYY-MM-DD); defaults to today (UTC)
    pub date: Option<NaiveDate>,
}

/// Create the public API router
pub fn create_api_router(
    catalog_service: Arc<CatalogService>,
    review_service: Arc<ReviewService>,
) -> Router {
    let state = ApiState {
        catalog_service,
        review_service,
    };

    Router::new()
        .route("/api/menu/categories", get(list_categories))
        .route("/api/menu/items", get(list_menu_items))
        .route("/api/menu/daily", get(get_daily_menu))
        .route("/api/reviews/:place_id", get(get_reviews))
        .with_state(state)
}

// =============================================================================
// MENU ENDPOINTS
// =============================================================================

/// List all categories ordered by sort order
#[instrument(name = "list_categories", skip(state))]
pub async fn list_categories(
    State(state): State<ApiState>,
) -> Result<Json<Vec<Category>>, (StatusCode, Json<Value>)> {
    info!("Listing categories");

    match state.catalog_service.list_categories().await {
        Ok(categories) => {
            info!("Successfully listed {} categories", categories.len());
            Ok(Json(categories))
        }
        Err(err) => {
            error!("Failed to list categories: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// List active menu items, optionally restricted to one category
#[instrument(name = "list_menu_items", skip(state), fields(
    category_id = query.category_id.as_deref(),
))]
pub async fn list_menu_items(
    State(state): State<ApiState>,
    Query(query): Query<ListMenuItemsQuery>,
) -> Result<Json<MenuItemListResponse>, (StatusCode, Json<Value>)> {
    info!("Listing menu items");

    match state
        .catalog_service
        .list_menu_items(query.category_id)
        .await
    {
        Ok(response) => {
            info!("Successfully listed {} menu items", response.total_count);
            Ok(Json(response))
        }
        Err(err) => {
            error!("Failed to list menu items: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Resolve the daily menu for a date. A date with no active menu returns
/// a JSON null body, which the view layer renders as an empty state.
#[instrument(name = "get_daily_menu", skip(state), fields(date = ?query.date))]
pub async fn get_daily_menu(
    State(state): State<ApiState>,
    Query(query): Query<DailyMenuQuery>,
) -> Result<Json<Option<DailyMenuResponse>>, (StatusCode, Json<Value>)> {
    info!("Resolving daily menu");

    let date: Option<DateTime<Utc>> = query
        .date
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));

    match state.catalog_service.get_daily_menu(date).await {
        Ok(menu) => {
            match &menu {
                Some(menu) => info!("Daily menu resolved with {} items", menu.menu_items.len()),
                None => info!("No active daily menu for the requested date"),
            }
            Ok(Json(menu))
        }
        Err(err) => {
            error!("Failed to resolve daily menu: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// REVIEW ENDPOINTS
// =============================================================================

/// Aggregated review rating for a venue. Total: upstream failures degrade
/// to the fixed fallback pair, so this endpoint always returns 200.
#[instrument(name = "get_reviews", skip(state), fields(place_id = %place_id))]
pub async fn get_reviews(
    State(state): State<ApiState>,
    Path(place_id): Path<String>,
) -> Json<ReviewSummary> {
    info!("Fetching reviews");

    let summary = state.review_service.get_reviews(&place_id).await;

    info!(
        "Reviews resolved: rating={}, from_fallback={}",
        summary.rating, summary.from_fallback
    );
    Json(summary)
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// Map service errors to HTTP responses
pub fn service_error_to_response(err: ServiceError) -> (StatusCode, Json<Value>) {
    let timestamp = chrono::Utc::now().to_rfc3339();

    match err {
        ServiceError::CategoryNotFound { .. }
        | ServiceError::MenuItemNotFound { .. }
        | ServiceError::DailyMenuNotFound { .. } => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "Not found",
                "message": err.to_string(),
                "timestamp": timestamp,
            })),
        ),
        ServiceError::ValidationError { .. } => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Validation failed",
                "message": err.to_string(),
                "timestamp": timestamp,
            })),
        ),
        ServiceError::Repository { .. } | ServiceError::Configuration { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Internal server error",
                "message": err.to_string(),
                "timestamp": timestamp,
            })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let (status, _) = service_error_to_response(ServiceError::CategoryNotFound {
            id: "C00000000".to_string(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let (status, _) = service_error_to_response(ServiceError::ValidationError {
            message: "Price must be greater than zero".to_string(),
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_repository_maps_to_500() {
        let (status, _) = service_error_to_response(ServiceError::Repository {
            source: crate::models::RepositoryError::ConnectionFailed,
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
