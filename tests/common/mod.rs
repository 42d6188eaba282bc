#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, http::Request, routing::get, Router};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use bistro_rs::config::ReviewsConfig;
use bistro_rs::handlers::{admin, api, health_check};
use bistro_rs::models::{
    Category, DailyMenu, DailyMenuItem, DailyMenuItemInput, MenuItem, RepositoryError,
    RepositoryResult,
};
use bistro_rs::repositories::{CatalogRepository, DailyMenuRepository};
use bistro_rs::services::{CatalogService, ReviewService};

/// In-memory stand-in for the catalog store. Mirrors the ordering and
/// filtering contract of the PostgreSQL implementation.
#[derive(Default)]
pub struct InMemoryCatalogRepository {
    categories: Mutex<HashMap<String, Category>>,
    items: Mutex<HashMap<String, MenuItem>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self, id: &str) -> Option<Category> {
        self.categories.lock().unwrap().get(id).cloned()
    }

    pub fn item(&self, id: &str) -> Option<MenuItem> {
        self.items.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let mut categories: Vec<Category> =
            self.categories.lock().unwrap().values().cloned().collect();
        categories.sort_by_key(|category| category.sort_order);
        Ok(categories)
    }

    async fn find_category(&self, id: &str) -> RepositoryResult<Option<Category>> {
        Ok(self.category(id))
    }

    async fn create_category(&self, category: Category) -> RepositoryResult<Category> {
        self.categories
            .lock()
            .unwrap()
            .insert(category.id.clone(), category.clone());
        Ok(category)
    }

    async fn update_category(&self, category: Category) -> RepositoryResult<Category> {
        let mut categories = self.categories.lock().unwrap();
        if !categories.contains_key(&category.id) {
            return Err(RepositoryError::NotFound);
        }
        categories.insert(category.id.clone(), category.clone());
        Ok(category)
    }

    async fn list_menu_items(
        &self,
        category_id: Option<String>,
    ) -> RepositoryResult<Vec<(MenuItem, Category)>> {
        let categories = self.categories.lock().unwrap();
        let items = self.items.lock().unwrap();

        let mut pairs: Vec<(MenuItem, Category)> = items
            .values()
            .filter(|item| item.is_active)
            .filter(|item| {
                category_id
                    .as_deref()
                    .map(|id| item.category_id == id)
                    .unwrap_or(true)
            })
            .filter_map(|item| {
                categories
                    .get(&item.category_id)
                    .map(|category| (item.clone(), category.clone()))
            })
            .collect();

        pairs.sort_by(|(a_item, a_cat), (b_item, b_cat)| {
            a_cat
                .sort_order
                .cmp(&b_cat.sort_order)
                .then_with(|| a_item.name.cmp(&b_item.name))
        });

        Ok(pairs)
    }

    async fn find_menu_item(&self, id: &str) -> RepositoryResult<Option<MenuItem>> {
        Ok(self.item(id))
    }

    async fn create_menu_item(&self, item: MenuItem) -> RepositoryResult<MenuItem> {
        self.items
            .lock()
            .unwrap()
            .insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn update_menu_item(&self, item: MenuItem) -> RepositoryResult<MenuItem> {
        let mut items = self.items.lock().unwrap();
        if !items.contains_key(&item.id) {
            return Err(RepositoryError::NotFound);
        }
        items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn menu_item_exists(&self, id: &str) -> RepositoryResult<bool> {
        Ok(self.items.lock().unwrap().contains_key(id))
    }
}

/// In-memory stand-in for the daily menu store. Insertion order doubles as
/// created_at order for first-match lookups.
pub struct InMemoryDailyMenuRepository {
    catalog: Arc<InMemoryCatalogRepository>,
    menus: Mutex<Vec<DailyMenu>>,
    associations: Mutex<Vec<DailyMenuItem>>,
}

impl InMemoryDailyMenuRepository {
    pub fn new(catalog: Arc<InMemoryCatalogRepository>) -> Self {
        Self {
            catalog,
            menus: Mutex::new(Vec::new()),
            associations: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DailyMenuRepository for InMemoryDailyMenuRepository {
    async fn find_active_by_date(&self, date: NaiveDate) -> RepositoryResult<Option<DailyMenu>> {
        Ok(self
            .menus
            .lock()
            .unwrap()
            .iter()
            .find(|menu| menu.menu_date == date && menu.is_active)
            .cloned())
    }

    async fn list_menu_items(
        &self,
        daily_menu_id: &str,
    ) -> RepositoryResult<Vec<(MenuItem, Category, Option<Decimal>)>> {
        let associations = self.associations.lock().unwrap();

        let mut entries: Vec<(MenuItem, Category, Option<Decimal>)> = associations
            .iter()
            .filter(|association| association.daily_menu_id == daily_menu_id)
            .filter_map(|association| {
                let item = self.catalog.item(&association.menu_item_id)?;
                let category = self.catalog.category(&item.category_id)?;
                Some((item, category, association.special_price))
            })
            .collect();

        entries.sort_by(|(a_item, a_cat, _), (b_item, b_cat, _)| {
            a_cat
                .sort_order
                .cmp(&b_cat.sort_order)
                .then_with(|| a_item.name.cmp(&b_item.name))
        });

        Ok(entries)
    }

    async fn publish_replace(
        &self,
        date: NaiveDate,
        items: &[DailyMenuItemInput],
    ) -> RepositoryResult<DailyMenu> {
        let mut menus = self.menus.lock().unwrap();
        let mut associations = self.associations.lock().unwrap();

        let menu = match menus.iter_mut().find(|menu| menu.menu_date == date) {
            Some(menu) => {
                associations.retain(|association| association.daily_menu_id != menu.id);
                menu.is_active = true;
                menu.updated_at = Utc::now();
                menu.clone()
            }
            None => {
                let menu = DailyMenu::new(date);
                menus.push(menu.clone());
                menu
            }
        };

        for item in items {
            associations.push(DailyMenuItem {
                daily_menu_id: menu.id.clone(),
                menu_item_id: item.menu_item_id.clone(),
                special_price: item.special_price,
            });
        }

        Ok(menu)
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let mut menus = self.menus.lock().unwrap();
        let mut associations = self.associations.lock().unwrap();

        let before = menus.len();
        menus.retain(|menu| menu.id != id);
        if menus.len() == before {
            return Err(RepositoryError::NotFound);
        }

        associations.retain(|association| association.daily_menu_id != id);
        Ok(())
    }
}

/// Build the application router over in-memory fakes, mirroring the
/// production composition. The review upstream is unreachable, so review
/// requests exercise the fallback path.
pub fn test_app() -> Router {
    let catalog_repository = Arc::new(InMemoryCatalogRepository::new());
    let daily_menu_repository = Arc::new(InMemoryDailyMenuRepository::new(
        catalog_repository.clone(),
    ));

    let catalog_service = Arc::new(CatalogService::new(
        catalog_repository,
        daily_menu_repository,
    ));
    let review_service = Arc::new(ReviewService::new(ReviewsConfig {
        reviews_api_key: None,
        reviews_endpoint: "http://127.0.0.1:1/details".to_string(),
        reviews_timeout_seconds: 1,
    }));

    Router::new()
        .route("/health/status", get(health_check))
        .merge(api::create_api_router(
            catalog_service.clone(),
            review_service,
        ))
        .merge(admin::create_admin_router(catalog_service))
}

// Request helpers

pub async fn get_json(app: &Router, uri: &str) -> (u16, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (u16, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn delete(app: &Router, uri: &str) -> (u16, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
