use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::service_error;
use crate::{
    models::{CreateSessionRequest, Modality, SubmitResponseRequest},
    services::{response_service::ResponseService, session_service::SessionService, AppState},
};

#[derive(Debug, Deserialize)]
pub struct ListResponsesQuery {
    pub modality: Option<Modality>,
}

fn session_service(state: &AppState) -> SessionService {
    SessionService::new(state.store.clone(), state.locks.clone())
}

fn response_service(state: &AppState) -> ResponseService {
    ResponseService::new(
        state.store.clone(),
        state.locks.clone(),
        state.config.max_response_time_ms,
    )
}

/// POST /api/v1/sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    req: Option<Json<CreateSessionRequest>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let req = req.map(|Json(req)| req).unwrap_or_default();
    tracing::info!("Creating session for test_type={:?}", req.test_type);

    let session = session_service(&state)
        .create_session(req)
        .await
        .map_err(service_error)?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Getting session: {}", session_id);

    let session = session_service(&state)
        .get_session(&session_id)
        .await
        .map_err(service_error)?;

    Ok(Json(session))
}

/// POST /api/v1/sessions/{id}/responses
pub async fn submit_response(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(req): Json<SubmitResponseRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    req.validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let record = response_service(&state)
        .submit_response(&session_id, req)
        .await
        .map_err(service_error)?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/sessions/{id}/responses?modality=
pub async fn list_responses(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Query(query): Query<ListResponsesQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let responses = response_service(&state)
        .list_responses(&session_id, query.modality)
        .await
        .map_err(service_error)?;

    Ok(Json(responses))
}

/// POST /api/v1/sessions/{id}/complete
pub async fn complete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    tracing::info!("Completing session: {}", session_id);

    let session = session_service(&state)
        .complete_session(&session_id)
        .await
        .map_err(service_error)?;

    Ok(Json(session))
}

/// GET /api/v1/sessions/{id}/results
pub async fn get_results(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let results = session_service(&state)
        .get_results(&session_id)
        .await
        .map_err(service_error)?;

    Ok(Json(results))
}
