// src/export/mod.rs

mod csv;
mod fs_utils;
mod model;
mod xlsx;

pub use fs_utils::write_export;
pub use model::SessionExport;

use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[value(alias = "xlsx")]
    Excel,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "excel",
            ExportFormat::Csv => "csv",
        }
    }

    /// Parse a user supplied name (`excel`, `xlsx`, `csv`, any case).
    pub fn from_name(name: &str) -> AppResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(AppError::InvalidExportFormat(name.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv",
        }
    }
}

/// An encoded export, ready to be written to disk or sent as a download.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    /// Format actually produced; `Csv` when a spreadsheet was requested but
    /// could not be encoded.
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    pub rows: usize,
}

impl ExportFile {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// `cil_sessions_<YYYYMMDD>_<YYYYMMDD>.<ext>`
pub fn file_name_for(start: NaiveDate, end: NaiveDate, format: ExportFormat) -> String {
    format!(
        "cil_sessions_{}_{}.{}",
        start.format("%Y%m%d"),
        end.format("%Y%m%d"),
        format.extension()
    )
}

/// Encode `rows` in the requested format. A failing spreadsheet encoding is
/// logged and replaced by CSV; CSV failures are returned as is.
pub fn render(
    rows: &[SessionExport],
    start: NaiveDate,
    end: NaiveDate,
    requested: ExportFormat,
    with_operator: bool,
) -> AppResult<ExportFile> {
    let headers = model::get_headers(with_operator);
    let table = model::sessions_to_table(rows, with_operator);

    let (format, bytes) = match requested {
        ExportFormat::Excel => match xlsx::write_xlsx(&headers, &table) {
            Ok(bytes) => (ExportFormat::Excel, bytes),
            Err(e) => {
                tracing::warn!(error = %e, "XLSX export failed, falling back to CSV");
                (ExportFormat::Csv, csv::write_csv(&headers, &table)?)
            }
        },
        ExportFormat::Csv => (ExportFormat::Csv, csv::write_csv(&headers, &table)?),
    };

    Ok(ExportFile {
        file_name: file_name_for(start, end, format),
        format,
        bytes,
        rows: rows.len(),
    })
}
