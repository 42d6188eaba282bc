use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::models::{Category, MenuItem, RepositoryError, RepositoryResult};

/// Trait defining the interface for category and menu item data access
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// List all categories ordered by sort order ascending
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>>;

    /// Find a category by its ID
    async fn find_category(&self, id: &str) -> RepositoryResult<Option<Category>>;

    /// Create a new category
    async fn create_category(&self, category: Category) -> RepositoryResult<Category>;

    /// Update an existing category; NotFound if the row does not exist
    async fn update_category(&self, category: Category) -> RepositoryResult<Category>;

    /// List active menu items with their owning category, optionally
    /// restricted to one category, ordered by (category sort order, item name)
    async fn list_menu_items(
        &self,
        category_id: Option<String>,
    ) -> RepositoryResult<Vec<(MenuItem, Category)>>;

    /// Find a menu item by its ID
    async fn find_menu_item(&self, id: &str) -> RepositoryResult<Option<MenuItem>>;

    /// Create a new menu item
    async fn create_menu_item(&self, item: MenuItem) -> RepositoryResult<MenuItem>;

    /// Update an existing menu item; NotFound if the row does not exist
    async fn update_menu_item(&self, item: MenuItem) -> RepositoryResult<MenuItem>;

    /// Check if a menu item exists
    async fn menu_item_exists(&self, id: &str) -> RepositoryResult<bool>;
}

/// PostgreSQL implementation of the CatalogRepository trait
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row types for sqlx mapping

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: String,
    name: String,
    name_en: String,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            name_en: row.name_en,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct MenuItemRow {
    id: String,
    name: String,
    description: Option<String>,
    price: Decimal,
    image_url: Option<String>,
    category_id: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MenuItemRow> for MenuItem {
    fn from(row: MenuItemRow) -> Self {
        MenuItem {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            image_url: row.image_url,
            category_id: row.category_id,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Menu item joined with its owning category in one scan
#[derive(Debug, FromRow)]
struct MenuItemWithCategoryRow {
    id: String,
    name: String,
    description: Option<String>,
    price: Decimal,
    image_url: Option<String>,
    category_id: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    c_name: String,
    c_name_en: String,
    c_sort_order: i32,
    c_created_at: DateTime<Utc>,
    c_updated_at: DateTime<Utc>,
}

impl From<MenuItemWithCategoryRow> for (MenuItem, Category) {
    fn from(row: MenuItemWithCategoryRow) -> Self {
        let category = Category {
            id: row.category_id.clone(),
            name: row.c_name,
            name_en: row.c_name_en,
            sort_order: row.c_sort_order,
            created_at: row.c_created_at,
            updated_at: row.c_updated_at,
        };
        let item = MenuItem {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            image_url: row.image_url,
            category_id: row.category_id,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        (item, category)
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    #[instrument(skip(self))]
    async fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        let rows: Vec<CategoryRow> = sqlx::query_as(
            r#"
            SELECT id, name, name_en, sort_order, created_at, updated_at
            FROM categories
            ORDER BY sort_order ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        info!("Found {} categories", rows.len());
        Ok(rows.into_iter().map(Category::from).collect())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn find_category(&self, id: &str) -> RepositoryResult<Option<Category>> {
        let row: Option<CategoryRow> = sqlx::query_as(
            r#"
            SELECT id, name, name_en, sort_order, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Category::from))
    }

    #[instrument(skip(self, category), fields(id = %category.id))]
    async fn create_category(&self, category: Category) -> RepositoryResult<Category> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, name_en, sort_order, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.name_en)
        .bind(category.sort_order)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        info!("Category created");
        Ok(category)
    }

    #[instrument(skip(self, category), fields(id = %category.id))]
    async fn update_category(&self, category: Category) -> RepositoryResult<Category> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, name_en = $3, sort_order = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.name_en)
        .bind(category.sort_order)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("Category updated");
        Ok(category)
    }

    #[instrument(skip(self), fields(category_id = ?category_id))]
    async fn list_menu_items(
        &self,
        category_id: Option<String>,
    ) -> RepositoryResult<Vec<(MenuItem, Category)>> {
        let rows: Vec<MenuItemWithCategoryRow> = sqlx::query_as(
            r#"
            SELECT
                mi.id, mi.name, mi.description, mi.price, mi.image_url,
                mi.category_id, mi.is_active, mi.created_at, mi.updated_at,
                c.name AS c_name, c.name_en AS c_name_en, c.sort_order AS c_sort_order,
                c.created_at AS c_created_at, c.updated_at AS c_updated_at
            FROM menu_items mi
            JOIN categories c ON c.id = mi.category_id
            WHERE mi.is_active = TRUE
              AND ($1::TEXT IS NULL OR mi.category_id = $1)
            ORDER BY c.sort_order ASC, mi.name ASC
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        info!("Found {} menu items", rows.len());
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn find_menu_item(&self, id: &str) -> RepositoryResult<Option<MenuItem>> {
        let row: Option<MenuItemRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, price, image_url,
                   category_id, is_active, created_at, updated_at
            FROM menu_items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MenuItem::from))
    }

    #[instrument(skip(self, item), fields(id = %item.id))]
    async fn create_menu_item(&self, item: MenuItem) -> RepositoryResult<MenuItem> {
        sqlx::query(
            r#"
            INSERT INTO menu_items
                (id, name, description, price, image_url, category_id,
                 is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(&item.image_url)
        .bind(&item.category_id)
        .bind(item.is_active)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        info!("Menu item created");
        Ok(item)
    }

    #[instrument(skip(self, item), fields(id = %item.id))]
    async fn update_menu_item(&self, item: MenuItem) -> RepositoryResult<MenuItem> {
        let result = sqlx::query(
            r#"
            UPDATE menu_items
            SET name = $2, description = $3, price = $4, image_url = $5,
                category_id = $6, is_active = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.price)
        .bind(&item.image_url)
        .bind(&item.category_id)
        .bind(item.is_active)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("Menu item updated");
        Ok(item)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn menu_item_exists(&self, id: &str) -> RepositoryResult<bool> {
        let row: Option<(String,)> = sqlx::query_as("SELECT id FROM menu_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }
}
