use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument};

use crate::models::{
    Category, DailyMenu, DailyMenuItemInput, MenuItem, RepositoryError, RepositoryResult,
};

/// Trait defining the interface for daily menu data access
#[async_trait]
pub trait DailyMenuRepository: Send + Sync {
    /// First active daily menu for the given calendar date, if any
    async fn find_active_by_date(&self, date: NaiveDate) -> RepositoryResult<Option<DailyMenu>>;

    /// Menu items joined into a daily menu, each with its owning category
    /// and the optional override price from the join row
    async fn list_menu_items(
        &self,
        daily_menu_id: &str,
    ) -> RepositoryResult<Vec<(MenuItem, Category, Option<Decimal>)>>;

    /// Replace-all publish for a date: reuse the existing menu row for that
    /// date (reactivating it) or create one, drop all its item associations
    /// and recreate them from the supplied list. Runs in one transaction.
    async fn publish_replace(
        &self,
        date: NaiveDate,
        items: &[DailyMenuItemInput],
    ) -> RepositoryResult<DailyMenu>;

    /// Delete a daily menu and its item associations; NotFound if the
    /// menu row does not exist
    async fn delete(&self, id: &str) -> RepositoryResult<()>;
}

/// PostgreSQL implementation of the DailyMenuRepository trait
pub struct PgDailyMenuRepository {
    pool: PgPool,
}

impl PgDailyMenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DailyMenuRow {
    id: String,
    menu_date: NaiveDate,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DailyMenuRow> for DailyMenu {
    fn from(row: DailyMenuRow) -> Self {
        DailyMenu {
            id: row.id,
            menu_date: row.menu_date,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Join row projecting a daily menu entry with its item and category
#[derive(Debug, FromRow)]
struct DailyMenuItemRow {
    special_price: Option<Decimal>,
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

impl From<DailyMenuItemRow> for (MenuItem, Category, Option<Decimal>) {
    fn from(row: DailyMenuItemRow) -> Self {
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
        (item, category, row.special_price)
    }
}

#[async_trait]
impl DailyMenuRepository for PgDailyMenuRepository {
    #[instrument(skip(self), fields(date = %date))]
    async fn find_active_by_date(&self, date: NaiveDate) -> RepositoryResult<Option<DailyMenu>> {
        // Uniqueness per date is soft; take the first match deterministically
        let row: Option<DailyMenuRow> = sqlx::query_as(
            r#"
            SELECT id, menu_date, is_active, created_at, updated_at
            FROM daily_menus
            WHERE menu_date = $1 AND is_active = TRUE
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DailyMenu::from))
    }

    #[instrument(skip(self), fields(daily_menu_id = %daily_menu_id))]
    async fn list_menu_items(
        &self,
        daily_menu_id: &str,
    ) -> RepositoryResult<Vec<(MenuItem, Category, Option<Decimal>)>> {
        let rows: Vec<DailyMenuItemRow> = sqlx::query_as(
            r#"
            SELECT
                dmi.special_price,
                mi.id, mi.name, mi.description, mi.price, mi.image_url,
                mi.category_id, mi.is_active, mi.created_at, mi.updated_at,
                c.name AS c_name, c.name_en AS c_name_en, c.sort_order AS c_sort_order,
                c.created_at AS c_created_at, c.updated_at AS c_updated_at
            FROM daily_menu_items dmi
            JOIN menu_items mi ON mi.id = dmi.menu_item_id
            JOIN categories c ON c.id = mi.category_id
            WHERE dmi.daily_menu_id = $1
            ORDER BY c.sort_order ASC, mi.name ASC
            "#,
        )
        .bind(daily_menu_id)
        .fetch_all(&self.pool)
        .await?;

        info!("Found {} daily menu items", rows.len());
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, items), fields(date = %date, item_count = items.len()))]
    async fn publish_replace(
        &self,
        date: NaiveDate,
        items: &[DailyMenuItemInput],
    ) -> RepositoryResult<DailyMenu> {
        let mut tx = self.pool.begin().await?;

        // Any menu row for the date qualifies for reuse, active or not
        let existing: Option<DailyMenuRow> = sqlx::query_as(
            r#"
            SELECT id, menu_date, is_active, created_at, updated_at
            FROM daily_menus
            WHERE menu_date = $1
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(date)
        .fetch_optional(&mut *tx)
        .await?;

        let menu = match existing {
            Some(row) => {
                let mut menu = DailyMenu::from(row);

                sqlx::query("DELETE FROM daily_menu_items WHERE daily_menu_id = $1")
                    .bind(&menu.id)
                    .execute(&mut *tx)
                    .await?;

                menu.is_active = true;
                menu.updated_at = Utc::now();

                sqlx::query(
                    "UPDATE daily_menus SET is_active = TRUE, updated_at = $2 WHERE id = $1",
                )
                .bind(&menu.id)
                .bind(menu.updated_at)
                .execute(&mut *tx)
                .await?;

                info!("Reusing existing daily menu {}", menu.id);
                menu
            }
            None => {
                let menu = DailyMenu::new(date);

                sqlx::query(
                    r#"
                    INSERT INTO daily_menus (id, menu_date, is_active, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(&menu.id)
                .bind(menu.menu_date)
                .bind(menu.is_active)
                .bind(menu.created_at)
                .bind(menu.updated_at)
                .execute(&mut *tx)
                .await?;

                info!("Created new daily menu {}", menu.id);
                menu
            }
        };

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO daily_menu_items (daily_menu_id, menu_item_id, special_price)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(&menu.id)
            .bind(&item.menu_item_id)
            .bind(item.special_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!("Daily menu published with {} items", items.len());
        Ok(menu)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        // Associations first; the menu row carries the referential target
        sqlx::query("DELETE FROM daily_menu_items WHERE daily_menu_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM daily_menus WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        info!("Daily menu deleted");
        Ok(())
    }
}
