// src/api/mod.rs: HTTP API used by the shop-floor terminals

pub mod handlers;
pub mod types;

use axum::Router;
use axum::routing::{get, post};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::Config;
use crate::core::cleanup::CleanupLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    /// Single connection; every handler holds the lock for one operation.
    pub pool: Arc<Mutex<DbPool>>,
    pub config: Arc<Config>,
}

impl ApiState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        Self {
            pool: Arc::new(Mutex::new(pool)),
            config: Arc::new(config),
        }
    }
}

/// Build the axum router with all API routes.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/start_session", post(handlers::start_session))
        .route("/api/stop_session", post(handlers::stop_session))
        .route(
            "/api/sessions",
            get(handlers::list_sessions).post(handlers::start_session),
        )
        .route(
            "/api/sessions/{id}",
            get(handlers::get_session).put(handlers::close_session),
        )
        .route(
            "/api/export",
            get(handlers::export_get).post(handlers::export_post),
        )
        .route("/api/lines", get(handlers::lines))
        .route("/api/health", get(handlers::health))
        .with_state(state)
}

/// One retention pass; failures are logged and never stop the server.
pub fn run_cleanup(state: &ApiState) {
    tracing::debug!("session_cleanup: start");
    let Ok(mut pool) = state.pool.lock() else {
        tracing::error!("session_cleanup failed: database lock poisoned");
        return;
    };

    match CleanupLogic::sweep(&mut pool, state.config.retention_days) {
        Ok(count) => tracing::info!(cleaned = count, "session_cleanup: done"),
        Err(e) => tracing::error!(error = %e, "session_cleanup failed"),
    }
}

/// Sweep immediately, then every `cleanup_interval_secs`.
pub fn spawn_cleanup_task(state: ApiState) -> tokio::task::JoinHandle<()> {
    let period = Duration::from_secs(state.config.cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            // the first tick completes immediately
            ticker.tick().await;
            run_cleanup(&state);
        }
    })
}

/// Start the API server (blocking until shutdown via Ctrl-C).
pub async fn start_server(state: ApiState) -> AppResult<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);

    let cleanup = spawn_cleanup_task(state.clone());
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("API server listening on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down");
        })
        .await
        .map_err(|e| AppError::Other(format!("server error: {e}")))?;

    cleanup.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::start::StartLogic;
    use crate::core::stop::StopLogic;
    use crate::models::NewSession;
    use crate::utils::time;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use chrono::{NaiveDate, TimeDelta};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn test_state() -> ApiState {
        ApiState::new(DbPool::in_memory().unwrap(), Config::default())
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn raw_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = build_router(test_state());
        let resp = app.oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn start_then_stop_round_trip() {
        let state = test_state();
        let app = build_router(state.clone());

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/start_session",
                json!({"line": "Star 1", "leg": "Leg 2", "machine": "HRM", "name": "Ravi"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let id = body_json(resp).await["session_id"].as_i64().unwrap();

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/stop_session",
                json!({"session_id": id, "abh_detected": 2}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let record = body_json(resp).await;
        assert_eq!(record["id"], id);
        assert_eq!(record["abh_detected"], 2);
        assert!(record["end_time"].is_string());

        // second stop is a conflict
        let resp = app
            .oneshot(json_request("PUT", &format!("/api/sessions/{id}"), json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert!(body_json(resp).await["error"].as_str().unwrap().contains("already closed"));
    }

    #[tokio::test]
    async fn unknown_line_is_rejected() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(json_request(
                "POST",
                "/api/sessions",
                json!({"line": "Star 6", "leg": "Leg 1", "machine": "HRM"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stop_unknown_session_is_not_found() {
        let app = build_router(test_state());
        let resp = app
            .oneshot(json_request("POST", "/api/stop_session", json!({"session_id": 42})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"], "Session not found: 42");
    }

    #[tokio::test]
    async fn list_and_get_sessions() {
        let state = test_state();
        let id = {
            let mut pool = state.pool.lock().unwrap();
            StartLogic::apply(&mut pool, &NewSession::new("Star 3", "Leg 1", "TTM", None)).unwrap()
        };
        let app = build_router(state);

        let resp = app.clone().oneshot(get_request("/api/sessions")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let list = body_json(resp).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert!(list[0]["end_time"].is_null());

        let resp = app
            .clone()
            .oneshot(get_request(&format!("/api/sessions/{id}")))
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["machine"], "TTM");

        let resp = app.oneshot(get_request("/api/sessions/999")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn export_downloads_csv() {
        let state = test_state();
        {
            let mut pool = state.pool.lock().unwrap();
            let start = NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap();
            let id = StartLogic::apply_at(
                &mut pool,
                &NewSession::new("Star 1", "Leg 1", "HRM", None),
                start,
            )
            .unwrap();
            StopLogic::apply_at(&mut pool, id, None, start + TimeDelta::seconds(135)).unwrap();
        }
        let app = build_router(state);

        let resp = app
            .oneshot(json_request(
                "POST",
                "/api/export",
                json!({"start_date": "2024-01-01", "end_date": "2024-01-31", "format": "csv"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"cil_sessions_20240101_20240131.csv\""
        );

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("2024-01-01 15:30:00,2024-01-01 15:32:15,02:15"));
    }

    #[tokio::test]
    async fn export_errors_map_to_status_codes() {
        let app = build_router(test_state());

        let missing = app
            .clone()
            .oneshot(get_request("/api/export?start_date=2024-01-01"))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let reversed = app
            .clone()
            .oneshot(get_request("/api/export?start_date=2024-02-01&end_date=2024-01-01"))
            .await
            .unwrap();
        assert_eq!(reversed.status(), StatusCode::BAD_REQUEST);

        let bad_format = app
            .clone()
            .oneshot(get_request(
                "/api/export?start_date=2024-01-01&end_date=2024-01-02&format=pdf",
            ))
            .await
            .unwrap();
        assert_eq!(bad_format.status(), StatusCode::BAD_REQUEST);

        let empty = app
            .oneshot(get_request("/api/export?start_date=2024-01-01&end_date=2024-01-31"))
            .await
            .unwrap();
        assert_eq!(empty.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(empty).await["error"],
            "No completed sessions found for the selected date range"
        );
    }

    async fn assert_json_bad_request(resp: axum::response::Response, needle: &str) {
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
        let error = body_json(resp).await["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("Invalid input: "), "{error}");
        assert!(error.contains(needle), "{error}");
    }

    #[tokio::test]
    async fn malformed_requests_get_json_errors() {
        let app = build_router(test_state());

        let missing_line = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/start_session",
                json!({"leg": "Leg 1", "machine": "HRM"}),
            ))
            .await
            .unwrap();
        assert_json_bad_request(missing_line, "line").await;

        let string_id = app
            .clone()
            .oneshot(json_request("POST", "/api/stop_session", json!({"session_id": "abc"})))
            .await
            .unwrap();
        assert_json_bad_request(string_id, "session_id").await;

        let not_json = app
            .clone()
            .oneshot(raw_request("POST", "/api/export", "not json"))
            .await
            .unwrap();
        assert_json_bad_request(not_json, "JSON").await;

        let bad_path = app
            .clone()
            .oneshot(json_request("PUT", "/api/sessions/abc", json!({})))
            .await
            .unwrap();
        assert_json_bad_request(bad_path, "").await;

        let duplicate_query = app
            .oneshot(get_request(
                "/api/export?start_date=2024-01-01&start_date=2024-01-02&end_date=2024-01-03",
            ))
            .await
            .unwrap();
        assert_json_bad_request(duplicate_query, "start_date").await;
    }

    #[tokio::test]
    async fn lines_lists_catalogue() {
        let app = build_router(test_state());
        let resp = app.oneshot(get_request("/api/lines")).await.unwrap();
        let lines = body_json(resp).await;
        assert_eq!(lines["Star 6"]["machines"], json!(["JTA", "TFR"]));
        assert_eq!(lines["Star 2"]["legs"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn cleanup_pass_purges_old_sessions() {
        let state = test_state();
        {
            let mut pool = state.pool.lock().unwrap();
            let old = time::now() - TimeDelta::days(45);
            StartLogic::apply_at(&mut pool, &NewSession::new("Star 1", "Leg 1", "HRM", None), old)
                .unwrap();
            StartLogic::apply(&mut pool, &NewSession::new("Star 1", "Leg 1", "HRM", None)).unwrap();
        }

        run_cleanup(&state);

        let pool = state.pool.lock().unwrap();
        let remaining: i64 = pool
            .conn
            .query_row("SELECT COUNT(*) FROM work_sessions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(remaining, 1);
    }
}
