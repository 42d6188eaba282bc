use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Category;

/// Core menu item model. Belongs to exactly one category; inactive items
/// are hidden from public listings but never hard-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request model for creating a new menu item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMenuItemRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category_id: String,
}

/// Request model for updating an existing menu item.
/// Every call supplies the full record, including the active flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMenuItemRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category_id: String,
    pub is_active: bool,
}

/// Menu item as the view layer receives it, with the owning category resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItemResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category_id: String,
    pub category: Category,
    pub is_active: bool,
}

/// Response model for menu item listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemListResponse {
    pub items: Vec<MenuItemResponse>,
    pub total_count: usize,
}

impl MenuItem {
    /// Create a new MenuItem with generated ID and timestamps
    pub fn new(request: CreateMenuItemRequest) -> Self {
        let now = Utc::now();
        Self {
            id: format!(
                "M{}",
                Uuid::new_v4()
                    .simple()
                    .to_string()
                    .get(0..8)
                    .unwrap_or("00000000")
            ),
            name: request.name,
            description: request.description,
            price: request.price,
            image_url: request.image_url,
            category_id: request.category_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the full record from an update request
    pub fn apply(&mut self, request: UpdateMenuItemRequest) {
        self.name = request.name;
        self.description = request.description;
        self.price = request.price;
        self.image_url = request.image_url;
        self.category_id = request.category_id;
        self.is_active = request.is_active;
        self.updated_at = Utc::now();
    }

    /// Convert to the consumer-facing shape with the owning category attached
    pub fn to_response(&self, category: Category) -> MenuItemResponse {
        MenuItemResponse {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            image_url: self.image_url.clone(),
            category_id: self.category_id.clone(),
            category,
            is_active: self.is_active,
        }
    }
}
