use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{post, put},
    Router,
};
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::handlers::api::service_error_to_response;
use crate::models::{
    Category, CreateCategoryRequest, CreateMenuItemRequest, DailyMenu, MenuItem,
    PublishDailyMenuRequest, UpdateCategoryRequest, UpdateMenuItemRequest,
};
use crate::services::CatalogService;

/// Admin state containing services
#[derive(Clone)]
pub struct AdminState {
    pub catalog_service: Arc<CatalogService>,
}

/// Response for seeding operations
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: String,
    pub categories_created: usize,
    pub items_created: usize,
    pub timestamp: String,
}

/// Create the admin router with catalog management endpoints
pub fn create_admin_router(catalog_service: Arc<CatalogService>) -> Router {
    let state = AdminState { catalog_service };

    Router::new()
        .route("/api/admin/categories", post(create_category))
        .route("/api/admin/categories/:category_id", put(update_category))
        .route("/api/admin/items", post(create_menu_item))
        .route("/api/admin/items/:item_id", put(update_menu_item))
        .route("/api/admin/daily-menu", put(publish_daily_menu))
        .route(
            "/api/admin/daily-menus/:menu_id",
            axum::routing::delete(delete_daily_menu),
        )
        .route("/api/admin/seed", post(seed_database))
        .with_state(state)
}

// =============================================================================
// CATEGORY MANAGEMENT
// =============================================================================

/// Create a new category
#[instrument(name = "create_category", skip(state, request), fields(name = %request.name))]
pub async fn create_category(
    State(state): State<AdminState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), (StatusCode, Json<Value>)> {
    info!("Creating category");

    match state.catalog_service.create_category(request).await {
        Ok(category) => {
            info!("Successfully created category: {}", category.id);
            Ok((StatusCode::CREATED, Json(category)))
        }
        Err(err) => {
            error!("Failed to create category: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Update an existing category (full replace of name/name_en/sort_order)
#[instrument(name = "update_category", skip(state, request), fields(category_id = %category_id))]
pub async fn update_category(
    State(state): State<AdminState>,
    Path(category_id): Path<String>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, (StatusCode, Json<Value>)> {
    info!("Updating category");

    match state
        .catalog_service
        .update_category(&category_id, request)
        .await
    {
        Ok(category) => {
            info!("Successfully updated category: {}", category.id);
            Ok(Json(category))
        }
        Err(err) => {
            error!("Failed to update category {}: {}", category_id, err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// MENU ITEM MANAGEMENT
// =============================================================================

/// Create a new menu item
#[instrument(name = "create_menu_item", skip(state, request), fields(name = %request.name))]
pub async fn create_menu_item(
    State(state): State<AdminState>,
    Json(request): Json<CreateMenuItemRequest>,
) -> Result<(StatusCode, Json<MenuItem>), (StatusCode, Json<Value>)> {
    info!("Creating menu item");

    match state.catalog_service.create_menu_item(request).await {
        Ok(item) => {
            info!("Successfully created menu item: {}", item.id);
            Ok((StatusCode::CREATED, Json(item)))
        }
        Err(err) => {
            error!("Failed to create menu item: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Update an existing menu item (full-record replace including active flag)
#[instrument(name = "update_menu_item", skip(state, request), fields(item_id = %item_id))]
pub async fn update_menu_item(
    State(state): State<AdminState>,
    Path(item_id): Path<String>,
    Json(request): Json<UpdateMenuItemRequest>,
) -> Result<Json<MenuItem>, (StatusCode, Json<Value>)> {
    info!("Updating menu item");

    match state
        .catalog_service
        .update_menu_item(&item_id, request)
        .await
    {
        Ok(item) => {
            info!("Successfully updated menu item: {}", item.id);
            Ok(Json(item))
        }
        Err(err) => {
            error!("Failed to update menu item {}: {}", item_id, err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// DAILY MENU MANAGEMENT
// =============================================================================

/// Publish the daily menu for a date. Replace-all: the supplied item list
/// becomes the menu for that date.
#[instrument(name = "publish_daily_menu", skip(state, request), fields(
    date = %request.date,
    item_count = request.menu_items.len(),
))]
pub async fn publish_daily_menu(
    State(state): State<AdminState>,
    Json(request): Json<PublishDailyMenuRequest>,
) -> Result<Json<DailyMenu>, (StatusCode, Json<Value>)> {
    info!("Publishing daily menu");

    match state.catalog_service.publish_daily_menu(request).await {
        Ok(menu) => {
            info!("Successfully published daily menu: {}", menu.id);
            Ok(Json(menu))
        }
        Err(err) => {
            error!("Failed to publish daily menu: {}", err);
            Err(service_error_to_response(err))
        }
    }
}

/// Delete a daily menu and its item associations
#[instrument(name = "delete_daily_menu", skip(state), fields(menu_id = %menu_id))]
pub async fn delete_daily_menu(
    State(state): State<AdminState>,
    Path(menu_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    info!("Deleting daily menu");

    match state.catalog_service.delete_daily_menu(&menu_id).await {
        Ok(()) => {
            info!("Successfully deleted daily menu: {}", menu_id);
            Ok(Json(json!({
                "message": format!("Daily menu {} deleted", menu_id),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })))
        }
        Err(err) => {
            error!("Failed to delete daily menu {}: {}", menu_id, err);
            Err(service_error_to_response(err))
        }
    }
}

// =============================================================================
// SEEDING
// =============================================================================

/// Seed the catalog with a small sample menu
#[instrument(name = "seed_database", skip(state))]
pub async fn seed_database(
    State(state): State<AdminState>,
) -> Result<Json<SeedResponse>, (StatusCode, Json<Value>)> {
    let timestamp = chrono::Utc::now().to_rfc3339();

    info!("Seeding catalog with sample data");

    let mut categories_created = 0;
    let mut items_created = 0;
    let mut errors = Vec::new();

    for (category_request, item_requests) in sample_menu() {
        let category_name = category_request.name.clone();

        let category = match state.catalog_service.create_category(category_request).await {
            Ok(category) => {
                categories_created += 1;
                info!("Successfully seeded category: {}", category.name);
                category
            }
            Err(err) => {
                warn!("Failed to seed category {}: {}", category_name, err);
                errors.push(format!("{}: {}", category_name, err));
                continue;
            }
        };

        for mut item_request in item_requests {
            item_request.category_id = category.id.clone();
            let item_name = item_request.name.clone();

            match state.catalog_service.create_menu_item(item_request).await {
                Ok(_) => {
                    items_created += 1;
                    info!("Successfully seeded menu item: {}", item_name);
                }
                Err(err) => {
                    warn!("Failed to seed menu item {}: {}", item_name, err);
                    errors.push(format!("{}: {}", item_name, err));
                }
            }
        }
    }

    if errors.is_empty() {
        info!(
            "Successfully seeded catalog: {} categories, {} items",
            categories_created, items_created
        );

        Ok(Json(SeedResponse {
            message: format!(
                "Catalog seeded successfully with {} categories and {} items",
                categories_created, items_created
            ),
            categories_created,
            items_created,
            timestamp,
        }))
    } else if categories_created > 0 || items_created > 0 {
        warn!("Catalog seeding completed with {} errors", errors.len());

        Ok(Json(SeedResponse {
            message: format!(
                "Catalog seeded with {} categories and {} items, {} errors occurred",
                categories_created,
                items_created,
                errors.len()
            ),
            categories_created,
            items_created,
            timestamp,
        }))
    } else {
        Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Failed to seed catalog",
                "details": errors,
                "timestamp": timestamp,
            })),
        ))
    }
}

/// Sample menu: categories with their items. Category IDs are filled in
/// after each category row is created.
fn sample_menu() -> Vec<(CreateCategoryRequest, Vec<CreateMenuItemRequest>)> {
    vec![
        (
            CreateCategoryRequest {
                name: "Forretter".to_string(),
                name_en: "Starters".to_string(),
                sort_order: 1,
            },
            vec![
                CreateMenuItemRequest {
                    name: "Dagens suppe".to_string(),
                    description: Some("Served with freshly baked bread".to_string()),
                    price: dec!(89.00),
                    image_url: Some("images/soup.jpg".to_string()),
                    category_id: String::new(),
                },
                CreateMenuItemRequest {
                    name: "Rejecocktail".to_string(),
                    description: Some("Classic shrimp cocktail with dill dressing".to_string()),
                    price: dec!(109.00),
                    image_url: None,
                    category_id: String::new(),
                },
            ],
        ),
        (
            CreateCategoryRequest {
                name: "Hovedretter".to_string(),
                name_en: "Mains".to_string(),
                sort_order: 2,
            },
            vec![
                CreateMenuItemRequest {
                    name: "Grillet laks".to_string(),
                    description: Some("Grilled salmon with seasonal vegetables".to_string()),
                    price: dec!(189.00),
                    image_url: Some("images/salmon.jpg".to_string()),
                    category_id: String::new(),
                },
                CreateMenuItemRequest {
                    name: "Stegt flæsk".to_string(),
                    description: Some("Crispy pork belly with parsley sauce".to_string()),
                    price: dec!(169.00),
                    image_url: None,
                    category_id: String::new(),
                },
            ],
        ),
        (
            CreateCategoryRequest {
                name: "Desserter".to_string(),
                name_en: "Desserts".to_string(),
                sort_order: 3,
            },
            vec![CreateMenuItemRequest {
                name: "Æblekage".to_string(),
                description: Some("Traditional apple trifle with whipped cream".to_string()),
                price: dec!(79.00),
                image_url: None,
                category_id: String::new(),
            }],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_menu_shape() {
        let menu = sample_menu();

        assert_eq!(menu.len(), 3);

        // Categories arrive pre-sorted by sort order
        let orders: Vec<i32> = menu.iter().map(|(c, _)| c.sort_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);

        // Every seeded item carries a positive price
        for (_, items) in &menu {
            assert!(!items.is_empty());
            for item in items {
                assert!(item.price > rust_decimal::Decimal::ZERO);
            }
        }
    }
}
