use crate::config::Config;
use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    /// Print the config file as stored, or the effective defaults when no
    /// file has been written yet.
    pub fn print(path: &Path, effective: &Config) -> AppResult<()> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
            println!("{}", content);
        } else {
            println!("# {} not found, showing defaults", path.display());
            println!("{}", effective.to_yaml()?);
        }
        Ok(())
    }

    pub fn edit(path: &Path, editor: &Option<String>) -> AppResult<()> {
        let ed = editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| {
                if cfg!(target_os = "windows") {
                    "notepad".into()
                } else {
                    "nano".into()
                }
            });

        let status = Command::new(&ed)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(format!("cannot launch '{ed}': {e}")))?;

        if !status.success() {
            return Err(AppError::Config(format!("editor '{ed}' exited with {status}")));
        }

        // Reject edits that no longer parse.
        Config::load_from(path)?;
        Ok(())
    }
}
