use super::session_status::SessionStatus;
use crate::errors::{AppError, AppResult};
use crate::utils::time::format_display;
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// One timed CIL work interval, as stored in `work_sessions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkSession {
    pub id: i64,
    pub name: Option<String>, // ⇔ work_sessions.name (NULL for rows older than the column)
    pub line: String,
    pub leg: String,
    pub machine: String,
    #[serde(serialize_with = "ser_timestamp")]
    pub start_time: NaiveDateTime,
    #[serde(serialize_with = "ser_opt_timestamp")]
    pub end_time: Option<NaiveDateTime>,
    pub duration: Option<i64>, // seconds, set together with end_time
    pub abh_detected: Option<i64>,
}

impl WorkSession {
    pub fn status(&self) -> SessionStatus {
        if self.end_time.is_some() {
            SessionStatus::Closed
        } else {
            SessionStatus::Open
        }
    }

    pub fn is_open(&self) -> bool {
        self.status().is_open()
    }

    pub fn start_str(&self) -> String {
        format_display(&self.start_time)
    }

    pub fn end_str(&self) -> Option<String> {
        self.end_time.as_ref().map(format_display)
    }
}

fn ser_timestamp<S: Serializer>(dt: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_display(dt))
}

fn ser_opt_timestamp<S: Serializer>(dt: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
    match dt {
        Some(v) => s.serialize_str(&format_display(v)),
        None => s.serialize_none(),
    }
}

/// Input of a start operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub line: String,
    pub leg: String,
    pub machine: String,
    pub name: Option<String>,
}

impl NewSession {
    pub fn new(line: &str, leg: &str, machine: &str, name: Option<&str>) -> Self {
        Self {
            line: line.to_string(),
            leg: leg.to_string(),
            machine: machine.to_string(),
            name: name.map(str::to_string),
        }
    }

    /// Trim every field, reject empty identifiers and drop a blank name.
    pub fn normalized(&self) -> AppResult<Self> {
        let field = |label: &str, value: &str| -> AppResult<String> {
            let v = value.trim();
            if v.is_empty() {
                Err(AppError::InvalidInput(format!("'{label}' must not be empty")))
            } else {
                Ok(v.to_string())
            }
        };

        Ok(Self {
            line: field("line", &self.line)?,
            leg: field("leg", &self.leg)?,
            machine: field("machine", &self.machine)?,
            name: self
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        })
    }
}
