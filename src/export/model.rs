// src/export/model.rs

use crate::models::WorkSession;
use crate::utils::formatting::secs2mmss;
use crate::utils::time::{format_display, shift_minutes};

const BASE_HEADERS: [&str; 6] = ["line", "leg", "machine", "start_time", "end_time", "duration"];
const OPERATOR_HEADERS: [&str; 2] = ["name", "abh_detected"];

/// Flat, already formatted view of one session for CSV / XLSX.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionExport {
    pub line: String,
    pub leg: String,
    pub machine: String,
    pub start_time: String,
    pub end_time: String,
    pub duration: String,
    pub name: String,
    pub abh_detected: String,
}

impl SessionExport {
    /// Timestamps are shifted by `offset_minutes` for presentation only.
    pub fn from_session(s: &WorkSession, offset_minutes: i64) -> Self {
        Self {
            line: s.line.clone(),
            leg: s.leg.clone(),
            machine: s.machine.clone(),
            start_time: format_display(&shift_minutes(&s.start_time, offset_minutes)),
            end_time: s
                .end_time
                .map(|e| format_display(&shift_minutes(&e, offset_minutes)))
                .unwrap_or_else(|| "-".to_string()),
            duration: secs2mmss(s.duration),
            name: s.name.clone().unwrap_or_default(),
            abh_detected: s.abh_detected.map(|n| n.to_string()).unwrap_or_default(),
        }
    }

    pub(crate) fn to_record(&self, with_operator: bool) -> Vec<String> {
        let mut rec = vec![
            self.line.clone(),
            self.leg.clone(),
            self.machine.clone(),
            self.start_time.clone(),
            self.end_time.clone(),
            self.duration.clone(),
        ];
        if with_operator {
            rec.push(self.name.clone());
            rec.push(self.abh_detected.clone());
        }
        rec
    }
}

/// Header row for CSV / XLSX, in fixed column order.
pub(crate) fn get_headers(with_operator: bool) -> Vec<&'static str> {
    let mut headers = BASE_HEADERS.to_vec();
    if with_operator {
        headers.extend_from_slice(&OPERATOR_HEADERS);
    }
    headers
}

pub(crate) fn sessions_to_table(rows: &[SessionExport], with_operator: bool) -> Vec<Vec<String>> {
    rows.iter().map(|r| r.to_record(with_operator)).collect()
}
