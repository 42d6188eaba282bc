use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Menu category with a localized primary name and an English secondary name.
/// Display ordering is driven by `sort_order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub name_en: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request model for creating a new category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub name_en: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// Request model for updating an existing category.
/// Full replace of name/name_en/sort_order; there are no partial-field semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: String,
    pub name_en: String,
    pub sort_order: i32,
}

impl Category {
    /// Create a new Category with generated ID and timestamps
    pub fn new(request: CreateCategoryRequest) -> Self {
        let now = Utc::now();
        Self {
            id: format!(
                "C{}",
                Uuid::new_v4()
                    .simple()
                    .to_string()
                    .get(0..8)
                    .unwrap_or("00000000")
            ),
            name: request.name,
            name_en: request.name_en,
            sort_order: request.sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the mutable fields from an update request
    pub fn apply(&mut self, request: UpdateCategoryRequest) {
        self.name = request.name;
        self.name_en = request.name_en;
        self.sort_order = request.sort_order;
        self.updated_at = Utc::now();
    }
}
