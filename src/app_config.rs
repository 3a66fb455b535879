use std::env;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

use crate::records::RecordTypeDef;
use crate::utils;

/// Directory under the media root holding deletion logs and backup
/// bundles. Files beneath it are never deletion candidates.
pub const RESERVED_DIR_NAME: &str = "cleaned_obsolete_uploads";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Default upload root; logs and backups live beneath it.
    pub media_root: String,
    /// Roots to scan. Falls back to `media_root` when empty.
    #[serde(default)]
    pub upload_paths: Vec<String>,
    /// SQLite database holding the host records and the run log.
    /// Falls back to the `DATABASE_URL` environment variable.
    #[serde(default)]
    pub database_url: Option<String>,
    /// Host-application record types with file-reference fields.
    #[serde(default)]
    pub records: Vec<RecordTypeDef>,
}

impl AppConfig {
    pub fn load() -> Result<AppConfig, ConfigError> {
        let builder = Config::builder()
            // Add configuration values from a file named 'Config.toml', if present
            .add_source(ConfigFile::with_name("Config").required(false))
            .add_source(Environment::with_prefix("UPLOAD_CLEANER").separator("__"))
            .build()?;

        builder.try_deserialize::<AppConfig>()
    }

    pub fn scan_roots(&self) -> Vec<String> {
        if self.upload_paths.is_empty() {
            vec![self.media_root.clone()]
        } else {
            self.upload_paths.clone()
        }
    }

    pub fn media_root(&self) -> PathBuf {
        utils::absolutize(Path::new(&self.media_root))
    }

    pub fn reserved_dir(&self) -> PathBuf {
        self.media_root().join(RESERVED_DIR_NAME)
    }

    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| env::var("DATABASE_URL").ok())
    }
}
