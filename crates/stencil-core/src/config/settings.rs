//! Settings file parsing and cache directory resolution

use crate::error::{Result, StencilError};
use crate::product::ProductConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file looked up at the project root
pub const SETTINGS_FILE: &str = "stencil.yaml";

/// How registration lines are placed inside the entry-point file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryPointSettings {
    /// Entry-point file, relative to the project root
    pub file: PathBuf,

    /// Line opening the block registration lines are inserted into
    pub anchor: String,

    /// Indentation prepended to each inserted line
    pub indent: String,

    /// Registration line; `{path}` is replaced with the import path
    pub line_format: String,

    /// Line closing a block created when the anchor is missing
    pub block_close: String,
}

impl Default for EntryPointSettings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("main.go"),
            anchor: "import (".to_string(),
            indent: "\t".to_string(),
            line_format: "_ \"{path}\"".to_string(),
            block_close: ")".to_string(),
        }
    }
}

/// Runtime settings for a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the local template cache
    pub cache_dir: Option<PathBuf>,

    /// Entry-point wiring configuration
    pub entry_point: EntryPointSettings,

    /// Package-manager command run after an installation (empty disables it)
    pub fetch_command: Vec<String>,

    /// Template file declaring the module name used as the import marker
    pub module_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: None,
            entry_point: EntryPointSettings::default(),
            fetch_command: vec!["go".to_string(), "get".to_string()],
            module_file: "go.mod".to_string(),
        }
    }
}

impl Settings {
    /// Load `stencil.yaml` from the project root, falling back to defaults
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| StencilError::SettingsInvalid {
            path: path.clone(),
            source: serde::de::Error::custom(e),
        })?;
        serde_yaml::from_str(&content)
            .map_err(|source| StencilError::SettingsInvalid { path, source })
    }

    /// Resolve the template cache root
    ///
    /// The product's home env var wins over the settings file; otherwise the
    /// cache lives under `~/.stencil/templates`.
    pub fn cache_root<C: ProductConfig>(&self, config: &C) -> PathBuf {
        if let Ok(dir) = std::env::var(config.home_env()) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        if let Some(dir) = &self.cache_dir {
            return dir.clone();
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(format!(".{}", config.name()))
            .join("templates")
    }
}
