//! Configuration loaded from `config/runpage.toml`
//!
//! The config is read once and handed to tools at construction; nothing reads
//! it from ambient global state afterwards.

use crate::core::ToolError;
use crate::pagination::MAX_CHARS_PER_PAGE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "config/runpage.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunpageConfig {
    pub pagination: PaginationConfig,
}

/// Defaults applied when a caller leaves pagination arguments out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_max_chars_per_page: usize,
    pub default_preview_chars: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_max_chars_per_page: 25_000,
            default_preview_chars: 150,
        }
    }
}

impl RunpageConfig {
    /// Load configuration.
    ///
    /// With an explicit `path` the file must exist. Without one,
    /// [`DEFAULT_CONFIG_PATH`] is used when present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ToolError> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ToolError::FileNotFound {
                        path: path.display().to_string(),
                    });
                }
                Self::from_file(path)
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    debug!("no config file found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ToolError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ToolError> {
        let config: Self = toml::from_str(content)?;
        if config.pagination.default_max_chars_per_page > MAX_CHARS_PER_PAGE {
            debug!(
                requested = config.pagination.default_max_chars_per_page,
                ceiling = MAX_CHARS_PER_PAGE,
                "default page budget above ceiling, it will be clamped"
            );
        }
        Ok(config)
    }
}
