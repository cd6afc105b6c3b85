use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use shared::catalog::Catalog;

pub const DEFAULT_CONFIG_FILE: &str = "swipe.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub catalog_path: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/swipe.db".into(),
            catalog_path: None,
            log_filter: "info".into(),
        }
    }
}

pub fn load_settings(config_path: &Path) -> Settings {
    let file = fs::read_to_string(config_path).ok();
    load_settings_from(file.as_deref(), |name| std::env::var(name).ok())
}

/// Defaults, then the optional TOML file, then environment variables.
/// An unreadable file is skipped rather than treated as fatal.
pub fn load_settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
            if let Some(v) = file_cfg.get("database_url") {
                settings.database_url = v.clone();
            }
            if let Some(v) = file_cfg.get("catalog_path") {
                settings.catalog_path = Some(PathBuf::from(v));
            }
            if let Some(v) = file_cfg.get("log") {
                settings.log_filter = v.clone();
            }
        }
    }

    if let Some(v) = env("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = env("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = env("APP__CATALOG_PATH") {
        settings.catalog_path = Some(PathBuf::from(v));
    }

    if let Some(v) = env("APP__LOG") {
        settings.log_filter = v;
    }

    settings
}

pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

pub fn load_catalog(catalog_path: Option<&Path>) -> anyhow::Result<Catalog> {
    let Some(path) = catalog_path else {
        return Ok(Catalog::builtin());
    };

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file '{}'", path.display()))?;
    Catalog::from_json(&raw)
        .with_context(|| format!("invalid catalog file '{}'", path.display()))
}
