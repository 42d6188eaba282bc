// Repositories module - data access layer

pub mod catalog_repository;
pub mod daily_menu_repository;

pub use catalog_repository::{CatalogRepository, PgCatalogRepository};
pub use daily_menu_repository::{DailyMenuRepository, PgDailyMenuRepository};
