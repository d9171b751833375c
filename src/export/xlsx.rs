// src/export/xlsx.rs

use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet, XlsxError,
};
use unicode_width::UnicodeWidthStr;

/// Name of the single worksheet in the workbook.
pub const SHEET_NAME: &str = "CIL Sessions";

/// Columns written as spreadsheet numbers. Everything else stays text, so
/// operator ids like `007` keep their leading zeros.
const NUMERIC_COLUMNS: &[&str] = &["abh_detected"];

/// Largest integer an f64 cell holds exactly.
const MAX_EXACT_INT: i64 = 1 << 53;

/// Build a one-sheet workbook in memory: styled header row, banded rows,
/// frozen header, columns sized to their widest cell.
pub(crate) fn write_xlsx(headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        // ---------------------------
        // Header
        // ---------------------------
        let header_format = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(0x663399))
            .set_pattern(FormatPattern::Solid)
            .set_border(FormatBorder::Thin);

        for (col, header) in headers.iter().enumerate() {
            worksheet.write_with_format(0, col as u16, *header, &header_format)?;
        }

        worksheet.set_freeze_panes(1, 0)?;

        let mut col_widths: Vec<usize> =
            headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();

        let band1 = Color::RGB(0xF1EAF8);
        let band2 = Color::RGB(0xFFFFFF);

        // ---------------------------
        // Rows
        // ---------------------------
        let numeric: Vec<bool> = headers.iter().map(|h| NUMERIC_COLUMNS.contains(h)).collect();

        for (row_index, values) in rows.iter().enumerate() {
            let row = (row_index + 1) as u32;
            let band_color = if row_index % 2 == 0 { band1 } else { band2 };

            for (col, value) in values.iter().enumerate() {
                let number = if numeric.get(col).copied().unwrap_or(false) {
                    cell_number(value)
                } else {
                    None
                };
                write_cell(worksheet, row, col as u16, value, number, band_color)?;

                if let Some(w) = col_widths.get_mut(col) {
                    *w = (*w).max(UnicodeWidthStr::width(value.as_str()));
                }
            }
        }

        // ---------------------------
        // Column widths
        // ---------------------------
        for (col, w) in col_widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, *w as f64 + 2.0)?;
        }
    }

    workbook.save_to_buffer()
}

/// Integer value of a numeric-column cell, if it fits an f64 exactly.
fn cell_number(value: &str) -> Option<f64> {
    let n = value.trim().parse::<i64>().ok()?;
    (n.abs() <= MAX_EXACT_INT).then_some(n as f64)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &str,
    number: Option<f64>,
    band_color: Color,
) -> Result<(), XlsxError> {
    let base = Format::new()
        .set_background_color(band_color)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    if let Some(num) = number {
        let fmt = base.set_align(FormatAlign::Right);
        worksheet.write_with_format(row, col, num, &fmt)?;
    } else {
        worksheet.write_with_format(row, col, value, &base)?;
    }

    Ok(())
}
