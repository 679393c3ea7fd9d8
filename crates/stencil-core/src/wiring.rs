//! Entry-point wiring
//!
//! Generated packages become discoverable by adding one registration line
//! per import path to the project's entry-point file, e.g. a blank import
//! `_ "myproj/app/adapter/in/rest/users"` inside `main.go`'s import block.

use crate::config::EntryPointSettings;
use crate::error::{Result, StencilError};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Entry-point file of a project plus the shape of its registration lines
#[derive(Debug, Clone)]
pub struct EntryPoint {
    path: PathBuf,
    settings: EntryPointSettings,
}

impl EntryPoint {
    pub fn new(project_root: &Path, settings: &EntryPointSettings) -> Self {
        Self {
            path: project_root.join(&settings.file),
            settings: settings.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Registration line for `import_path`, without indentation
    pub fn line_for(&self, import_path: &str) -> String {
        self.settings.line_format.replace("{path}", import_path)
    }

    /// Add the registration line for `import_path` unless already present
    ///
    /// Returns whether the file changed.
    pub async fn register(&self, import_path: &str) -> Result<bool> {
        let write_err = |source: std::io::Error| StencilError::EntryPointWrite {
            path: self.path.clone(),
            source,
        };

        let content = fs::read_to_string(&self.path).await.map_err(write_err)?;
        let Some(updated) = self.insert_line(&content, import_path) else {
            debug!(import = import_path, "already registered");
            return Ok(false);
        };

        fs::write(&self.path, updated).await.map_err(write_err)?;
        debug!(import = import_path, file = %self.path.display(), "registered import");
        Ok(true)
    }

    /// Content with the registration line added, or `None` if already there
    fn insert_line(&self, content: &str, import_path: &str) -> Option<String> {
        let line = self.line_for(import_path);
        if content.lines().any(|l| l.trim() == line) {
            return None;
        }

        let entry = format!("{}{}", self.settings.indent, line);
        let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
        let anchor = self.settings.anchor.trim();

        match lines.iter().position(|l| l.trim() == anchor) {
            Some(idx) => lines.insert(idx + 1, entry),
            None => {
                // No block yet: open one right after the header line
                let at = lines
                    .iter()
                    .position(|l| !l.trim().is_empty())
                    .map(|i| i + 1)
                    .unwrap_or(0);
                let block = [
                    String::new(),
                    self.settings.anchor.clone(),
                    entry,
                    self.settings.block_close.clone(),
                ];
                lines.splice(at..at, block);
            }
        }

        let mut updated = lines.join("\n");
        if content.ends_with('\n') || content.is_empty() {
            updated.push('\n');
        }
        Some(updated)
    }
}
