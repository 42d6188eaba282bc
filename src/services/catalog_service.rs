use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    validate_description, validate_display_name, validate_entity_id, validate_price, Category,
    CreateCategoryRequest, CreateMenuItemRequest, DailyMenu, DailyMenuResponse, MenuItem,
    MenuItemListResponse, MenuItemResponse, PublishDailyMenuRequest, RepositoryError,
    ResolvedDailyMenuItem, ServiceError, ServiceResult, UpdateCategoryRequest,
    UpdateMenuItemRequest,
};
use crate::repositories::{CatalogRepository, DailyMenuRepository};

/// Service for the menu catalog: categories, menu items and daily menus.
/// Each operation is a single read or a short write sequence against the
/// persisted store; there is no in-process caching.
pub struct CatalogService {
    catalog_repository: Arc<dyn CatalogRepository>,
    daily_menu_repository: Arc<dyn DailyMenuRepository>,
}

impl CatalogService {
    pub fn new(
        catalog_repository: Arc<dyn CatalogRepository>,
        daily_menu_repository: Arc<dyn DailyMenuRepository>,
    ) -> Self {
        Self {
            catalog_repository,
            daily_menu_repository,
        }
    }

    /// List all categories ordered by sort order
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> ServiceResult<Vec<Category>> {
        crate::info_with_trace!("Listing categories");

        let categories = self.catalog_repository.list_categories().await?;

        crate::info_with_trace!("Found {} categories", categories.len());
        Ok(categories)
    }

    /// List active menu items, optionally restricted to one category
    #[instrument(skip(self), fields(category_id = ?category_id))]
    pub async fn list_menu_items(
        &self,
        category_id: Option<String>,
    ) -> ServiceResult<MenuItemListResponse> {
        crate::info_with_trace!("Listing menu items");

        let items = self.catalog_repository.list_menu_items(category_id).await?;

        let items: Vec<MenuItemResponse> = items
            .into_iter()
            .map(|(item, category)| item.to_response(category))
            .collect();
        let total_count = items.len();

        crate::info_with_trace!("Found {} menu items", total_count);

        Ok(MenuItemListResponse { items, total_count })
    }

    /// Resolve the daily menu for a date (default: today, UTC). The supplied
    /// timestamp is truncated to its calendar date. Absence of an active
    /// menu is a normal, displayable state, not an error.
    #[instrument(skip(self), fields(date = ?date))]
    pub async fn get_daily_menu(
        &self,
        date: Option<DateTime<Utc>>,
    ) -> ServiceResult<Option<DailyMenuResponse>> {
        let menu_date = date.unwrap_or_else(Utc::now).date_naive();

        crate::info_with_trace!("Resolving daily menu for {}", menu_date);

        let menu = match self
            .daily_menu_repository
            .find_active_by_date(menu_date)
            .await?
        {
            Some(menu) => menu,
            None => {
                crate::info_with_trace!("No active daily menu for {}", menu_date);
                return Ok(None);
            }
        };

        let entries = self.daily_menu_repository.list_menu_items(&menu.id).await?;

        let menu_items = entries
            .into_iter()
            .map(|(item, category, special_price)| {
                ResolvedDailyMenuItem::from_parts(&item, category, special_price)
            })
            .collect();

        Ok(Some(DailyMenuResponse {
            id: menu.id,
            date: menu.menu_date,
            menu_items,
        }))
    }

    /// Create a new category
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> ServiceResult<Category> {
        crate::info_with_trace!("Creating category");

        validate_display_name("name", &request.name)?;
        validate_display_name("name_en", &request.name_en)?;

        let category = Category::new(request);
        let created = self.catalog_repository.create_category(category).await?;

        crate::info_with_trace!("Category created with ID: {}", created.id);
        Ok(created)
    }

    /// Full replace of a category's name/name_en/sort_order
    #[instrument(skip(self, request), fields(id = %id))]
    pub async fn update_category(
        &self,
        id: &str,
        request: UpdateCategoryRequest,
    ) -> ServiceResult<Category> {
        crate::info_with_trace!("Updating category");

        validate_entity_id("id", id)?;
        validate_display_name("name", &request.name)?;
        validate_display_name("name_en", &request.name_en)?;

        let mut category = match self.catalog_repository.find_category(id).await? {
            Some(category) => category,
            None => {
                crate::warn_with_trace!("Category not found");
                return Err(ServiceError::CategoryNotFound { id: id.to_string() });
            }
        };

        category.apply(request);

        match self.catalog_repository.update_category(category).await {
            Ok(updated) => {
                crate::info_with_trace!("Category updated");
                Ok(updated)
            }
            Err(RepositoryError::NotFound) => {
                Err(ServiceError::CategoryNotFound { id: id.to_string() })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Create a new menu item in an existing category
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_menu_item(
        &self,
        request: CreateMenuItemRequest,
    ) -> ServiceResult<MenuItem> {
        crate::info_with_trace!("Creating menu item");

        validate_display_name("name", &request.name)?;
        validate_description(request.description.as_deref())?;
        validate_price("price", &request.price)?;
        validate_entity_id("category_id", &request.category_id)?;

        if self
            .catalog_repository
            .find_category(&request.category_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::CategoryNotFound {
                id: request.category_id,
            });
        }

        let item = MenuItem::new(request);
        let created = self.catalog_repository.create_menu_item(item).await?;

        crate::info_with_trace!("Menu item created with ID: {}", created.id);
        Ok(created)
    }

    /// Full-record replace of a menu item, including the active flag
    #[instrument(skip(self, request), fields(id = %id))]
    pub async fn update_menu_item(
        &self,
        id: &str,
        request: UpdateMenuItemRequest,
    ) -> ServiceResult<MenuItem> {
        crate::info_with_trace!("Updating menu item");

        validate_entity_id("id", id)?;
        validate_display_name("name", &request.name)?;
        validate_description(request.description.as_deref())?;
        validate_price("price", &request.price)?;
        validate_entity_id("category_id", &request.category_id)?;

        let mut item = match self.catalog_repository.find_menu_item(id).await? {
            Some(item) => item,
            None => {
                crate::warn_with_trace!("Menu item not found");
                return Err(ServiceError::MenuItemNotFound { id: id.to_string() });
            }
        };

        if self
            .catalog_repository
            .find_category(&request.category_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::CategoryNotFound {
                id: request.category_id,
            });
        }

        item.apply(request);

        match self.catalog_repository.update_menu_item(item).await {
            Ok(updated) => {
                crate::info_with_trace!("Menu item updated");
                Ok(updated)
            }
            Err(RepositoryError::NotFound) => {
                Err(ServiceError::MenuItemNotFound { id: id.to_string() })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Publish the daily menu for a date with replace-all semantics: the
    /// supplied list becomes the menu, omitted items are removed. Idempotent
    /// upsert-by-date; the stored row is reused and reactivated when present.
    #[instrument(skip(self, request), fields(date = %request.date, item_count = request.menu_items.len()))]
    pub async fn publish_daily_menu(
        &self,
        request: PublishDailyMenuRequest,
    ) -> ServiceResult<DailyMenu> {
        let menu_date = request.date.date_naive();

        crate::info_with_trace!("Publishing daily menu for {}", menu_date);

        for entry in &request.menu_items {
            validate_entity_id("menu_item_id", &entry.menu_item_id)?;
            if let Some(ref special_price) = entry.special_price {
                validate_price("special_price", special_price)?;
            }

            if !self
                .catalog_repository
                .menu_item_exists(&entry.menu_item_id)
                .await?
            {
                return Err(ServiceError::MenuItemNotFound {
                    id: entry.menu_item_id.clone(),
                });
            }
        }

        let menu = self
            .daily_menu_repository
            .publish_replace(menu_date, &request.menu_items)
            .await?;

        crate::info_with_trace!(
            "Daily menu {} published with {} items",
            menu.id,
            request.menu_items.len()
        );
        Ok(menu)
    }

    /// Delete a daily menu and its item associations
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_daily_menu(&self, id: &str) -> ServiceResult<()> {
        crate::info_with_trace!("Deleting daily menu");

        validate_entity_id("id", id)?;

        match self.daily_menu_repository.delete(id).await {
            Ok(()) => {
                crate::info_with_trace!("Daily menu deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => {
                crate::warn_with_trace!("Daily menu not found");
                Err(ServiceError::DailyMenuNotFound { id: id.to_string() })
            }
            Err(err) => Err(err.into()),
        }
    }
}
