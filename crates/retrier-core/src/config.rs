use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

fn default_policy() -> Value {
    serde_json::json!({ "constantDelay": { "delay": 100, "maxRetries": 3 } })
}

/// Global configuration loaded from `~/.config/retrier/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrierConfig {
    /// Policy descriptor used when the caller does not name one, e.g.
    /// `default_policy = { constantDelay = { delay = 100, maxRetries = 3 } }`.
    #[serde(default = "default_policy")]
    pub default_policy: Value,
    /// Optional `tracing` filter directive; `RUST_LOG` still takes precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for RetrierConfig {
    fn default() -> Self {
        Self {
            default_policy: default_policy(),
            log_filter: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("retrier")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Config as loaded, plus where it came from.
///
/// Loading happens before logging is set up (the log filter is part of the
/// config), so callers report `created` once their subscriber is installed.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: RetrierConfig,
    pub path: PathBuf,
    /// True when no file existed and a default one was written.
    pub created: bool,
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LoadedConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<LoadedConfig> {
    if !path.exists() {
        let default_cfg = RetrierConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        return Ok(LoadedConfig {
            config: default_cfg,
            path: path.to_path_buf(),
            created: true,
        });
    }

    let data = fs::read_to_string(path)?;
    let cfg: RetrierConfig =
        toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(LoadedConfig {
        config: cfg,
        path: path.to_path_buf(),
        created: false,
    })
}
