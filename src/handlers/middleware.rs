use axum::{
    body::Body,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
};
use serde_json::{json, Value};
use tracing::{error, warn};

/// Request validation middleware
pub async fn request_validation_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<Value>)> {
    // Validate content type for POST/PUT requests
    validate_content_type(&request)?;

    // Validate request size
    validate_request_size(&request)?;

    // Continue with the request
    let response = next.run(request).await;
    Ok(response)
}

/// Validate content type for requests with body
fn validate_content_type(request: &Request<Body>) -> Result<(), (StatusCode, Json<Value>)> {
    let method = request.method();

    // Only validate content type for requests that should have a body
    if method == "POST" || method == "PUT" || method == "PATCH" {
        let headers = request.headers();

        if let Some(content_type) = headers.get("content-type") {
            let content_type_str = content_type.to_str().unwrap_or("");

            if !content_type_str.starts_with("application/json") {
                warn!("Invalid content type: {}", content_type_str);
                return Err((
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    Json(json!({
                        "error": "Unsupported media type",
                        "message": "Content-Type must be application/json",
                        "timestamp": chrono::Utc::now().to_rfc3339(),
                    })),
                ));
            }
        } else {
            warn!("Missing content type header");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Missing content type",
                    "message": "Content-Type header is required for requests with body",
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                })),
            ));
        }
    }

    Ok(())
}

/// Validate request size
fn validate_request_size(request: &Request<Body>) -> Result<(), (StatusCode, Json<Value>)> {
    const MAX_REQUEST_SIZE: u64 = 1024 * 1024; // 1MB

    if let Some(content_length) = request.headers().get("content-length") {
        if let Ok(length_str) = content_length.to_str() {
            if let Ok(length) = length_str.parse::<u64>() {
                if length > MAX_REQUEST_SIZE {
                    error!("Request too large: {} bytes", length);
                    return Err((
                        StatusCode::PAYLOAD_TOO_LARGE,
                        Json(json!({
                            "error": "Request too large",
                            "message": format!("Request size {} bytes exceeds maximum of {} bytes", length, MAX_REQUEST_SIZE),
                            "timestamp": chrono::Utc::now().to_rfc3339(),
                        })),
                    ));
                }
            }
        }
    }

    Ok(())
}

/// CORS middleware for handling cross-origin requests
pub async fn cors_middleware(request: Request<Body>, next: Next) -> Response {
    let response = next.run(request).await;

    let mut response = response;
    let headers = response.headers_mut();

    // Add CORS headers
    headers.insert("Access-Control-Allow-Origin", "*".parse().unwrap());
    headers.insert(
        "Access-Control-Allow-Methods",
        "GET, POST, PUT, DELETE, OPTIONS".parse().unwrap(),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        "Content-Type, Authorization".parse().unwrap(),
    );
    headers.insert("Access-Control-Max-Age", "86400".parse().unwrap());

    response
}

/// Security headers middleware
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let response = next.run(request).await;

    let mut response = response;
    let headers = response.headers_mut();

    // Add security headers
    headers.insert("X-Content-Type-Options", "nosniff".parse().unwrap());
    headers.insert("X-Frame-Options", "DENY".parse().unwrap());
    headers.insert("X-XSS-Protection", "1; mode=block".parse().unwrap());
    headers.insert(
        "Referrer-Policy",
        "strict-origin-when-cross-origin".parse().unwrap(),
    );
    headers.insert(
        "Content-Security-Policy",
        "default-src 'self'".parse().unwrap(),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, Request};

    #[test]
    fn test_validate_content_type_accepts_json() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/admin/categories")
            .header("content-type", "application/json")
            .body(Body::empty())
            .unwrap();

        assert!(validate_content_type(&request).is_ok());
    }

    #[test]
    fn test_validate_content_type_rejects_missing_header() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/admin/categories")
            .body(Body::empty())
            .unwrap();

        let result = validate_content_type(&request);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validate_content_type_skips_get() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/menu/categories")
            .body(Body::empty())
            .unwrap();

        assert!(validate_content_type(&request).is_ok());
    }

    #[test]
    fn test_validate_request_size_rejects_oversized() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/admin/categories")
            .header("content-length", (2 * 1024 * 1024).to_string())
            .body(Body::empty())
            .unwrap();

        let result = validate_request_size(&request);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().0, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
