use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod lines;

pub use lines::{LineSpec, LinesConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: String,
    /// Sessions whose start is older than this many days are purged.
    pub retention_days: i64,
    /// Period of the retention sweep while `serve` is running.
    pub cleanup_interval_secs: u64,
    pub export: ExportConfig,
    pub server: ServerConfig,
    pub lines: LinesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Offset added to stored timestamps when they are rendered in exports.
    pub utc_offset_minutes: i64,
    /// Append the `name` and `abh_detected` columns.
    pub include_operator_columns: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 330,
            include_operator_columns: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            retention_days: 30,
            cleanup_interval_secs: 3600,
            export: ExportConfig::default(),
            server: ServerConfig::default(),
            lines: LinesConfig::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("cil-tracker")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".cil-tracker")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("cil-tracker.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("cil-tracker.sqlite")
    }

    /// Load configuration from file (defaults if not found), then apply
    /// `DATABASE_URL`, `HOST` and `PORT` from the environment.
    pub fn load() -> AppResult<Self> {
        let mut cfg = Self::load_from(&Self::config_file())?;
        cfg.apply_overrides(|key| env::var(key).ok())?;
        Ok(cfg)
    }

    /// Load a specific YAML file, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Apply overrides looked up by variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database = sqlite_path_from_url(&url)?;
        }

        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("PORT is not a valid port: {port}")))?;
        }

        Ok(())
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file()).map_err(|_| AppError::ConfigSave)?;
            file.write_all(yaml.as_bytes())
                .map_err(|_| AppError::ConfigSave)?;
        }

        // Create empty DB file if not exists
        if !db_path.exists() {
            if let Some(parent) = db_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::File::create(&db_path)?;
        }

        Ok(config)
    }
}

/// Accept plain paths as well as `sqlite://` style URLs.
fn sqlite_path_from_url(url: &str) -> AppResult<String> {
    let trimmed = url.trim();
    if trimmed.starts_with("postgres://") || trimmed.starts_with("postgresql://") {
        return Err(AppError::Config(
            "Only SQLite databases are supported by DATABASE_URL".into(),
        ));
    }

    let path = trimmed
        .strip_prefix("sqlite:///")
        .or_else(|| trimmed.strip_prefix("sqlite://"))
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);

    if path.is_empty() {
        return Err(AppError::Config("DATABASE_URL is empty".into()));
    }

    Ok(path.to_string())
}
