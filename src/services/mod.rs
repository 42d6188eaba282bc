// Services module - business logic layer

pub mod catalog_service;
pub mod review_service;

pub use catalog_service::CatalogService;
pub use review_service::ReviewService;
