// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::export::ExportFile;
use crate::ui::messages::{info, warning};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Check whether a file can be created or overwritten.
///
/// - file does not exist → Ok
/// - file exists and `force` → Ok
/// - file exists and `force == false` → ask the operator.
pub fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("The file '{}' already exists.", path.display()));

    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer).map_err(AppError::from)?;
    let ans = answer.trim().to_ascii_lowercase();

    if ans == "y" || ans == "yes" {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(
            "Export cancelled: existing file not overwritten".into(),
        ))
    }
}

/// Write `file` into `dir` under its own file name and return the full path.
pub fn write_export(dir: &Path, file: &ExportFile, force: bool) -> AppResult<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let path = dir.join(&file.file_name);
    ensure_writable(&path, force)?;

    let mut out = fs::File::create(&path)?;
    out.write_all(&file.bytes)?;
    out.flush()?;

    Ok(path)
}
