// src/api/types.rs

use crate::models::NewSession;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/start_session` and `POST /api/sessions`.
#[derive(Debug, Clone, Deserialize)]
pub struct StartRequest {
    pub line: String,
    pub leg: String,
    pub machine: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl StartRequest {
    pub fn to_new_session(&self) -> NewSession {
        NewSession::new(&self.line, &self.leg, &self.machine, self.name.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub session_id: i64,
}

/// Body of `POST /api/stop_session`.
#[derive(Debug, Clone, Deserialize)]
pub struct StopRequest {
    #[serde(default)]
    pub session_id: Option<i64>,
    #[serde(default)]
    pub abh_detected: Option<i64>,
}

/// Body of `PUT /api/sessions/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloseRequest {
    #[serde(default)]
    pub abh_detected: Option<i64>,
}

/// JSON body (POST) or query string (GET) of `/api/export`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
