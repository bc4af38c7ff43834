use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod scoring;
pub mod services;
pub mod store;

pub use config::Config;
pub use services::AppState;

/// CSP middleware adds Content-Security-Policy header to all responses
async fn csp_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    response
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // The test client is served from another origin
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler).layer(middleware::from_fn_with_state(
                app_state.clone(),
                handlers::metrics_auth_middleware,
            )),
        )
        .merge(api_routes().layer(cors))
        .with_state(app_state)
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(csp_middleware)) // Apply CSP to all responses
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/test-config", get(handlers::get_test_config))
        .route("/api/v1/stats", get(handlers::get_stats))
        .route("/api/v1/sessions", post(handlers::sessions::create_session))
        .route(
            "/api/v1/sessions/{id}",
            get(handlers::sessions::get_session),
        )
        .route(
            "/api/v1/sessions/{id}/responses",
            get(handlers::sessions::list_responses).post(handlers::sessions::submit_response),
        )
        .route(
            "/api/v1/sessions/{id}/complete",
            post(handlers::sessions::complete_session),
        )
        .route(
            "/api/v1/sessions/{id}/results",
            get(handlers::sessions::get_results),
        )
}
