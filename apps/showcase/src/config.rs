use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::SortKey;

pub const DEFAULT_CONFIG_FILE: &str = "showcase.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source: String,
    pub debounce_ms: u64,
    pub default_sort: String,
    pub log_filter: String,
    pub http_timeout_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: "projects.json".into(),
            debounce_ms: 300,
            default_sort: SortKey::Priority.as_str().into(),
            log_filter: "info".into(),
            http_timeout_seconds: 10,
        }
    }
}

impl Settings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    source: Option<String>,
    debounce_ms: Option<u64>,
    default_sort: Option<String>,
    log_filter: Option<String>,
    http_timeout_seconds: Option<u64>,
}

/// Defaults, then the config file, then environment variables. An explicitly
/// named config file must exist; the default one is optional.
pub fn load_settings(explicit_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = explicit_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(&path) {
        Ok(raw) => {
            apply_file(&mut settings, &raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
        }
        Err(err) if explicit_path.is_some() => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
        Err(_) => {}
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.source {
        settings.source = v;
    }
    if let Some(v) = file_cfg.debounce_ms {
        settings.debounce_ms = v;
    }
    if let Some(v) = file_cfg.default_sort {
        settings.default_sort = v;
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    if let Some(v) = file_cfg.http_timeout_seconds {
        settings.http_timeout_seconds = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SHOWCASE_SOURCE") {
        settings.source = v;
    }
    if let Some(v) = var("APP__SOURCE") {
        settings.source = v;
    }

    if let Some(v) = var("APP__DEBOUNCE_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.debounce_ms = parsed;
        }
    }

    if let Some(v) = var("APP__DEFAULT_SORT") {
        settings.default_sort = v;
    }

    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = var("APP__HTTP_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.http_timeout_seconds = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
