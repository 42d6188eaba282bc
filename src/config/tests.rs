use super::*;
use std::env;

#[test]
fn test_server_config_defaults() {
    // Ensure no environment variables are set
    env::remove_var("BISTRO_HOST");
    env::remove_var("BISTRO_PORT");
    env::remove_var("BISTRO_REQUEST_TIMEOUT_SECONDS");
    env::remove_var("BISTRO_MAX_REQUEST_SIZE");

    std::thread::sleep(std::time::Duration::from_millis(10));

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8080);
    assert_eq!(config.request_timeout_seconds, 30);
    assert_eq!(config.max_request_size, 1024 * 1024);
}

#[test]
fn test_database_config_from_env() {
    env::set_var("BISTRO_DATABASE_URL", "postgres://test:5432/bistro_test");
    env::set_var("BISTRO_MAX_CONNECTIONS", "2");

    let config = DatabaseConfig::from_env().unwrap();

    assert_eq!(config.database_url, "postgres://test:5432/bistro_test");
    assert_eq!(config.max_connections, 2);

    // Clean up
    env::remove_var("BISTRO_DATABASE_URL");
    env::remove_var("BISTRO_MAX_CONNECTIONS");
}

#[test]
fn test_reviews_config_defaults() {
    env::remove_var("BISTRO_REVIEWS_API_KEY");
    env::remove_var("BISTRO_REVIEWS_ENDPOINT");
    env::remove_var("BISTRO_REVIEWS_TIMEOUT_SECONDS");

    std::thread::sleep(std::time::Duration::from_millis(10));

    let config = ReviewsConfig::from_env().unwrap();

    // Missing credential is a valid state; the aggregator degrades to fallback
    assert_eq!(config.reviews_api_key, None);
    assert_eq!(
        config.reviews_endpoint,
        "https://maps.googleapis.com/maps/api/place/details/json"
    );
    assert_eq!(config.reviews_timeout_seconds, 10);
}

#[test]
fn test_server_config_request_timeout() {
    let config = ServerConfig {
        host: "localhost".to_string(),
        port: 8080,
        request_timeout_seconds: 45,
        max_request_size: 1024,
    };

    assert_eq!(config.request_timeout(), Duration::from_secs(45));
}

#[test]
fn test_validate_rejects_empty_database_url() {
    let config = Config {
        server: ServerConfig {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_timeout(),
            max_request_size: default_max_request_size(),
        },
        database: DatabaseConfig {
            database_url: String::new(),
            max_connections: default_max_connections(),
        },
        reviews: ReviewsConfig {
            reviews_api_key: None,
            reviews_endpoint: default_reviews_endpoint(),
            reviews_timeout_seconds: default_reviews_timeout(),
        },
        observability: ObservabilityConfig {
            service_name: default_service_name(),
            service_version: default_service_version(),
            otlp_endpoint: None,
            metrics_port: default_metrics_port(),
            log_level: default_log_level(),
            enable_json_logging: false,
        },
    };

    let result = config.validate();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Database URL cannot be empty"));
}

#[test]
fn test_config_error_display() {
    let error = ConfigError::ValidationError {
        message: "Invalid configuration".to_string(),
    };
    assert_eq!(error.to_string(), "Validation error: Invalid configuration");

    let error = ConfigError::MissingEnvironmentVariable {
        name: "TEST_VAR".to_string(),
    };
    assert_eq!(error.to_string(), "Environment variable missing: TEST_VAR");
}

#[test]
fn test_default_values() {
    env::remove_var("BISTRO_OTLP_ENDPOINT");
    env::remove_var("BISTRO_ENABLE_JSON_LOGGING");

    assert_eq!(default_host(), "0.0.0.0");
    assert_eq!(default_port(), 8080);
    assert_eq!(default_timeout(), 30);
    assert_eq!(default_max_request_size(), 1024 * 1024);
    assert_eq!(default_database_url(), "postgres://localhost:5432/bistro");
    assert_eq!(default_max_connections(), 5);
    assert_eq!(default_service_name(), "bistro-rs");
    assert_eq!(default_otlp_endpoint_option(), None);
    assert_eq!(default_metrics_port(), 9090);
    assert_eq!(default_log_level(), "info");
}
