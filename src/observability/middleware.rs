use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use opentelemetry::trace::TraceContextExt;
use std::{sync::Arc, time::Instant};
use tracing::{error, info, Instrument};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::Metrics;

/// Middleware for automatic request tracing and metrics collection
pub async fn observability_middleware(
    metrics: Arc<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let uri = request.uri().to_string();

    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    // Matched route template groups metrics per endpoint instead of per URL
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched_path| matched_path.as_str().to_string())
        .unwrap_or_else(|| uri.clone());

    let span_name = format!("{} {}", method, endpoint);

    let span = tracing::info_span!(
        target: "bistro_rs::http",
        "{}", span_name,
        otel.name = %span_name,
        otel.kind = "server",
        http.method = %method,
        http.route = %endpoint,
        http.url = %uri,
        http.user_agent = %user_agent,
        http.status_code = tracing::field::Empty,
        http.response_time_ms = tracing::field::Empty,
    );

    async {
        metrics.increment_in_flight(&method, &endpoint);

        let trace_id = tracing::Span::current()
            .context()
            .span()
            .span_context()
            .trace_id()
            .to_string();

        info!(trace_id = %trace_id, method = %method, path = %endpoint, "Processing request");

        let response = next.run(request).await;

        let duration = start_time.elapsed();
        let duration_seconds = duration.as_secs_f64();
        let duration_ms = duration.as_millis();

        let status_code = response.status().as_u16();

        tracing::Span::current().record("http.status_code", status_code);
        tracing::Span::current().record("http.response_time_ms", duration_ms);

        let current_span = tracing::Span::current();
        let span_context = current_span.context();
        let otel_span = span_context.span();
        if status_code >= 400 {
            otel_span.set_status(opentelemetry::trace::Status::error("HTTP error"));
        } else {
            otel_span.set_status(opentelemetry::trace::Status::Ok);
        }

        metrics.record_http_request(&method, &endpoint, status_code, duration_seconds);

        metrics.decrement_in_flight(&method, &endpoint);

        if status_code >= 400 {
            error!(
                trace_id = %trace_id,
                method = %method,
                path = %endpoint,
                status_code = status_code,
                duration_ms = duration_ms,
                "Request completed with error"
            );
        } else {
            info!(
                trace_id = %trace_id,
                method = %method,
                path = %endpoint,
                status_code = status_code,
                duration_ms = duration_ms,
                "Request completed successfully"
            );
        }

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest, routing::get, Router};
    use tower::ServiceExt;

    async fn ok_handler() -> &'static str {
        "ok"
    }

    #[tokio::test]
    async fn test_observability_middleware_records_request() {
        let metrics = Arc::new(Metrics::new().unwrap());
        let metrics_for_layer = metrics.clone();

        let app = Router::new()
            .route("/ping", get(ok_handler))
            .layer(axum::middleware::from_fn(move |req, next| {
                observability_middleware(metrics_for_layer.clone(), req, next)
            }));

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/ping")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);

        let encoded = metrics.encode().unwrap();
        assert!(encoded.contains("http_requests_total"));
    }
}
