// src/api/handlers.rs

use crate::api::{ApiState, types::*};
use crate::config::LineSpec;
use crate::core::export::ExportLogic;
use crate::core::list::ListLogic;
use crate::core::start::StartLogic;
use crate::core::stop::StopLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::models::WorkSession;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::collections::BTreeMap;

pub type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

/// Map an application error onto its status code and JSON body. Internal
/// failures are logged and answered with a generic message.
pub fn error_response(e: AppError) -> (StatusCode, Json<ErrorResponse>) {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let error = if e.is_internal() {
        tracing::error!(error = %e, "request failed");
        match e {
            AppError::Export(_) => "Failed to export data".to_string(),
            AppError::Db(_) | AppError::Migration(_) => {
                "Failed to retrieve data from database".to_string()
            }
            _ => "Internal server error".to_string(),
        }
    } else {
        e.to_string()
    };

    (status, Json(ErrorResponse { error }))
}

/// Malformed bodies, query strings and path ids answer with the same JSON
/// error shape as every other client mistake.
fn bad_request(detail: String) -> (StatusCode, Json<ErrorResponse>) {
    error_response(AppError::InvalidInput(detail))
}

/// Run `f` with the shared connection locked.
fn with_pool<T>(state: &ApiState, f: impl FnOnce(&mut DbPool) -> AppResult<T>) -> ApiResult<T> {
    let mut pool = state
        .pool
        .lock()
        .map_err(|_| error_response(AppError::Other("database lock poisoned".into())))?;
    f(&mut pool).map_err(error_response)
}

/// POST /api/start_session, POST /api/sessions
pub async fn start_session(
    State(state): State<ApiState>,
    body: Result<Json<StartRequest>, JsonRejection>,
) -> ApiResult<Json<StartResponse>> {
    let Json(body) = body.map_err(|r| bad_request(r.body_text()))?;
    let new = body.to_new_session().normalized().map_err(error_response)?;
    state
        .config
        .lines
        .check(&new.line, &new.leg, &new.machine)
        .map_err(error_response)?;

    let session_id = with_pool(&state, |pool| StartLogic::apply(pool, &new))?;
    tracing::info!(session_id, line = %new.line, leg = %new.leg, machine = %new.machine, "session started");

    Ok(Json(StartResponse { session_id }))
}

/// POST /api/stop_session
pub async fn stop_session(
    State(state): State<ApiState>,
    body: Result<Json<StopRequest>, JsonRejection>,
) -> ApiResult<Json<WorkSession>> {
    let Json(body) = body.map_err(|r| bad_request(r.body_text()))?;
    let id = body
        .session_id
        .ok_or_else(|| error_response(AppError::InvalidInput("session_id is required".into())))?;

    stop(&state, id, body.abh_detected)
}

/// PUT /api/sessions/{id}
pub async fn close_session(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<CloseRequest>, JsonRejection>,
) -> ApiResult<Json<WorkSession>> {
    let Path(id) = id.map_err(|r| bad_request(r.body_text()))?;
    let Json(body) = body.map_err(|r| bad_request(r.body_text()))?;
    stop(&state, id, body.abh_detected)
}

fn stop(state: &ApiState, id: i64, abh_detected: Option<i64>) -> ApiResult<Json<WorkSession>> {
    let session = with_pool(state, |pool| StopLogic::apply(pool, id, abh_detected))?;
    tracing::info!(session_id = id, duration = session.duration, "session stopped");
    Ok(Json(session))
}

/// GET /api/sessions
pub async fn list_sessions(State(state): State<ApiState>) -> ApiResult<Json<Vec<WorkSession>>> {
    with_pool(&state, ListLogic::all).map(Json)
}

/// GET /api/sessions/{id}
pub async fn get_session(
    State(state): State<ApiState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<WorkSession>> {
    let Path(id) = id.map_err(|r| bad_request(r.body_text()))?;
    with_pool(&state, |pool| ListLogic::get(pool, id)).map(Json)
}

/// POST /api/export
pub async fn export_post(
    State(state): State<ApiState>,
    body: Result<Json<ExportRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = body.map_err(|r| bad_request(r.body_text()))?;
    export(&state, body)
}

/// GET /api/export?start_date=..&end_date=..&format=..
pub async fn export_get(
    State(state): State<ApiState>,
    query: Result<Query<ExportRequest>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(query) = query.map_err(|r| bad_request(r.body_text()))?;
    export(&state, query)
}

fn export(state: &ApiState, req: ExportRequest) -> ApiResult<Response> {
    let (Some(start_date), Some(end_date)) = (req.start_date, req.end_date) else {
        return Err(error_response(AppError::InvalidInput(
            "Missing required date parameters".into(),
        )));
    };

    let format = match req.format.as_deref() {
        Some(f) if !f.trim().is_empty() => ExportFormat::from_name(f).map_err(error_response)?,
        _ => ExportFormat::Excel,
    };

    let file = with_pool(state, |pool| {
        ExportLogic::export(pool, &start_date, &end_date, format, &state.config.export)
    })?;

    let headers = [
        (header::CONTENT_TYPE, file.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.file_name),
        ),
    ];

    Ok((StatusCode::OK, headers, file.bytes).into_response())
}

/// GET /api/lines
pub async fn lines(State(state): State<ApiState>) -> Json<BTreeMap<String, LineSpec>> {
    Json(state.config.lines.catalogue.clone())
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}
