use axum::{middleware, routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use bistro_rs::{
    handlers::{
        admin, api, cors_middleware, health_check, metrics_handler,
        request_validation_middleware, security_headers_middleware,
    },
    init_observability,
    observability::observability_middleware,
    repositories::{PgCatalogRepository, PgDailyMenuRepository},
    services::{CatalogService, ReviewService},
    shutdown_observability, Config, Metrics,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration first (basic logging only)
    let config = Config::from_environment()?;
    println!("Configuration loaded successfully");

    init_observability(
        &config.observability.service_name,
        &config.observability.service_version,
        config.observability.otlp_endpoint.as_deref(),
        config.observability.enable_json_logging,
    )?;

    info!("Starting bistro-rs service");
    info!(
        "Service: {} v{}",
        config.observability.service_name, config.observability.service_version
    );

    let metrics = Arc::new(Metrics::new()?);
    info!("Metrics initialized successfully");

    // Connect to the database and apply pending migrations
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.database_url)
        .await?;
    info!("Database pool initialized successfully");

    sqlx::migrate!().run(&pool).await?;
    info!("Database migrations applied");

    metrics.set_active_connections(pool.size() as f64);

    // Initialize repositories
    let catalog_repository = Arc::new(PgCatalogRepository::new(pool.clone()));
    let daily_menu_repository = Arc::new(PgDailyMenuRepository::new(pool.clone()));
    info!("Repositories initialized successfully");

    // Initialize services
    let catalog_service = Arc::new(CatalogService::new(
        catalog_repository,
        daily_menu_repository,
    ));
    let review_service = Arc::new(ReviewService::new_with_metrics(
        config.reviews.clone(),
        metrics.clone(),
    ));
    info!("Services initialized successfully");

    if config.reviews.reviews_api_key.is_none() {
        info!("Reviews API key not configured; review data will use the static fallback");
    }

    // Build the application router
    let app = create_app(metrics, catalog_service, review_service);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    // Set up graceful shutdown
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Shutdown signal received");
        shutdown_observability().await;
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn create_app(
    metrics: Arc<Metrics>,
    catalog_service: Arc<CatalogService>,
    review_service: Arc<ReviewService>,
) -> Router {
    let metrics_for_middleware = metrics.clone();

    Router::new()
        // Health and metrics endpoints (with metrics state)
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
        // Public API endpoints
        .merge(api::create_api_router(
            catalog_service.clone(),
            review_service,
        ))
        // Admin endpoints
        .merge(admin::create_admin_router(catalog_service))
        // Add middleware layers (order matters - outer to inner)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(cors_middleware))
        .layer(middleware::from_fn(request_validation_middleware))
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
}
