use std::path::PathBuf;
use std::time::Duration;
use std::{env, fs};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use serde::{Deserialize, Serialize};

/// Configuration of one actions column instance.
///
/// `index` names the row field that holds the embedded per-row action map and
/// doubles as the column's own identifier; `index_field` names the row field
/// that holds the record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionsColumnConfig {
    /// Row field holding the embedded per-row action map
    #[serde(default = "default_index")]
    pub index: String,
    /// Row field holding the record's unique identifier
    #[serde(default = "default_index_field")]
    pub index_field: String,
    /// Bounded wait for structured-callback resolution, in milliseconds
    #[serde(default = "default_resolve_timeout_ms")]
    pub resolve_timeout_ms: u64,
}

impl Default for ActionsColumnConfig {
    fn default() -> Self {
        Self {
            index: default_index(),
            index_field: default_index_field(),
            resolve_timeout_ms: default_resolve_timeout_ms(),
        }
    }
}

impl ActionsColumnConfig {
    /// Loads configuration from the default path, falling back to defaults
    /// when the file is missing or malformed.
    pub fn load() -> Self {
        let path = default_config_path();
        if let Ok(content) = fs::read_to_string(&path)
            && let Ok(config) = serde_json::from_str(&content)
        {
            return config;
        }
        Self::default()
    }

    pub fn save(&self) -> Result<()> {
        let path = default_config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }
}

fn default_index() -> String {
    "actions".to_string()
}

fn default_index_field() -> String {
    "id".to_string()
}

fn default_resolve_timeout_ms() -> u64 {
    5_000
}

/// Get the default path for the column configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var("ROWGRID_CONFIG_PATH")
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rowgrid")
        .join("column.json")
}
