use crate::errors::{AppError, AppResult};
use csv::Writer;

/// Encode header + rows as UTF-8, comma separated.
pub fn write_csv(headers: &[&str], rows: &[Vec<String>]) -> AppResult<Vec<u8>> {
    let mut wtr = Writer::from_writer(Vec::new());

    wtr.write_record(headers)
        .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;

    for row in rows {
        wtr.write_record(row)
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Export(format!("CSV flush error: {e}")))
}
