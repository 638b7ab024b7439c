use std::path::Path;

use serde::Deserialize;

use crate::constants::*;
use crate::models::SortKey;
use crate::ui::theme::Theme;

/// Application configuration with sensible defaults.
///
/// Can be overridden via ~/.config/proc-peek/config.toml
#[derive(Debug, Clone)]
pub struct Config {
    /// Process list refresh cadence in milliseconds
    pub process_refresh_ms: u64,
    /// System panel refresh cadence in milliseconds
    pub system_refresh_ms: u64,
    pub default_sort: SortKey,
    /// Rows printed by `list` without `--count`
    pub default_count: usize,
    /// Filesystem shown in the disk gauge
    pub disk_path: String,
    pub theme: String,
    /// Tracing filter directive, overridden by RUST_LOG
    pub log_level: String,
    /// Problems found while loading, reported once logging is up.
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            process_refresh_ms: DEFAULT_PROCESS_REFRESH_MS,
            system_refresh_ms: DEFAULT_SYSTEM_REFRESH_MS,
            default_sort: SortKey::default(),
            default_count: DEFAULT_LIST_COUNT,
            disk_path: default_disk_path(),
            theme: "default".to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            warnings: Vec::new(),
        }
    }
}

/// TOML-deserializable config file format.
/// All fields are optional; missing fields use defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct FileConfig {
    process_refresh_ms: Option<u64>,
    system_refresh_ms: Option<u64>,
    default_sort: Option<String>,
    default_count: Option<usize>,
    disk_path: Option<String>,
    theme: Option<String>,
    log_level: Option<String>,
}

impl Config {
    /// Load config from ~/.config/proc-peek/config.toml, falling back to defaults
    /// for any missing fields. If the file doesn't exist, returns pure defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Config::default(),
        };
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(content: &str, origin: &str) -> Self {
        let mut config = Config::default();

        let file_config: FileConfig = match toml::from_str(content) {
            Ok(fc) => fc,
            Err(e) => {
                config
                    .warnings
                    .push(format!("Failed to parse {}: {}. Using defaults.", origin, e));
                return config;
            }
        };

        if let Some(v) = file_config.process_refresh_ms {
            config.process_refresh_ms = v.max(MIN_REFRESH_MS);
        }
        if let Some(v) = file_config.system_refresh_ms {
            config.system_refresh_ms = v.max(MIN_REFRESH_MS);
        }
        if let Some(v) = file_config.default_sort {
            match v.parse::<SortKey>() {
                Ok(key) => config.default_sort = key,
                Err(e) => config.warnings.push(format!("default_sort: {}", e)),
            }
        }
        if let Some(v) = file_config.default_count {
            config.default_count = v.max(1);
        }
        if let Some(v) = file_config.disk_path {
            if !v.trim().is_empty() {
                config.disk_path = v;
            }
        }
        if let Some(v) = file_config.theme {
            if Theme::by_name(&v).is_some() {
                config.theme = v;
            } else {
                config.warnings.push(format!("unknown theme '{}'", v));
            }
        }
        if let Some(v) = file_config.log_level {
            if !v.trim().is_empty() {
                config.log_level = v;
            }
        }

        config
    }
}
