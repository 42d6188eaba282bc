use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Category, MenuItem};

/// A per-calendar-day curated menu ("today's specials"). Date is stored at
/// day granularity; at most one active menu per date is a soft expectation,
/// lookups take the first match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMenu {
    pub id: String,
    pub menu_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join row linking a daily menu to a menu item, with an optional
/// per-day override price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMenuItem {
    pub daily_menu_id: String,
    pub menu_item_id: String,
    pub special_price: Option<Decimal>,
}

/// One entry of a publish request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMenuItemInput {
    pub menu_item_id: String,
    pub special_price: Option<Decimal>,
}

/// Request model for publishing a daily menu. Replace-all semantics: the
/// supplied list becomes the menu for that date, omitted items are removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishDailyMenuRequest {
    pub date: DateTime<Utc>,
    pub menu_items: Vec<DailyMenuItemInput>,
}

/// Daily menu item with the underlying menu item projected and the override
/// price substituted for the base price when present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDailyMenuItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub category: Category,
    pub special_price: Option<Decimal>,
}

/// Daily menu as the view layer receives it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMenuResponse {
    pub id: String,
    pub date: NaiveDate,
    pub menu_items: Vec<ResolvedDailyMenuItem>,
}

impl DailyMenu {
    /// Create a new DailyMenu for the given calendar date
    pub fn new(menu_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: format!(
                "D{}",
                Uuid::new_v4()
                    .simple()
                    .to_string()
                    .get(0..8)
                    .unwrap_or("00000000")
            ),
            menu_date,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ResolvedDailyMenuItem {
    /// Project a menu item into a daily menu entry. The override price, when
    /// present, becomes the effective price; the base price is discarded.
    pub fn from_parts(
        item: &MenuItem,
        category: Category,
        special_price: Option<Decimal>,
    ) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            price: special_price.unwrap_or(item.price),
            image_url: item.image_url.clone(),
            category,
            special_price,
        }
    }
}
