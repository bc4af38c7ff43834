use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use std::sync::Arc;

use crate::metrics;
use crate::models::catalog;
use crate::services::{AppState, ServiceError};

pub mod sessions;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut dependencies = serde_json::Map::new();

    let store_health = match tokio::time::timeout(
        std::time::Duration::from_millis(500),
        state.store.ping(),
    )
    .await
    {
        Ok(Ok(())) => json!({
            "status": "healthy",
            "backend": state.store.backend_name(),
        }),
        Ok(Err(e)) => json!({
            "status": "unhealthy",
            "backend": state.store.backend_name(),
            "error": e.to_string(),
        }),
        Err(_) => json!({
            "status": "unhealthy",
            "backend": state.store.backend_name(),
            "error": "Store timeout after 500ms",
        }),
    };
    let store_healthy = store_health["status"] == "healthy";
    dependencies.insert("store".to_string(), store_health);

    let (status_code, status) = if store_healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status_code,
        Json(json!({
            "status": status,
            "service": "synesthesia-api",
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": dependencies
        })),
    )
}

/// GET /api/v1/test-config - stimulus catalog for all modalities
pub async fn get_test_config() -> impl IntoResponse {
    Json(catalog::test_config())
}

/// GET /api/v1/stats - aggregate counters over all sessions
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let service = crate::services::session_service::SessionService::new(
        state.store.clone(),
        state.locks.clone(),
    );

    let stats = service.stats().await.map_err(service_error)?;
    Ok(Json(stats))
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

/// Metrics authentication middleware - protects /metrics endpoint with HTTP Basic Auth
pub async fn metrics_auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let encoded = auth_header
        .strip_prefix("Basic ")
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let decoded = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let credentials = String::from_utf8(decoded).map_err(|_| StatusCode::UNAUTHORIZED)?;

    if credentials != state.config.metrics_auth {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}

/// Maps a service failure onto the HTTP status the client sees.
pub(crate) fn service_error(e: ServiceError) -> (StatusCode, String) {
    let status = match &e {
        ServiceError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::SessionCompleted(_) | ServiceError::SessionNotCompleted(_) => {
            StatusCode::CONFLICT
        }
        ServiceError::InvalidResponse(_) => StatusCode::BAD_REQUEST,
        ServiceError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    };

    if status.is_server_error() {
        tracing::error!("Request failed: {}", e);
    } else {
        tracing::warn!("Request rejected: {}", e);
    }

    (status, e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn test_service_error_status_codes() {
        assert_eq!(
            service_error(ServiceError::SessionNotFound("x".into())).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            service_error(ServiceError::SessionCompleted("x".into())).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            service_error(ServiceError::InvalidResponse("bad".into())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            service_error(ServiceError::Store(StoreError::Unavailable("down".into()))).0,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
