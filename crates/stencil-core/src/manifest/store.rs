//! Manifest persistence

use super::model::{Installation, ProjectManifest};
use crate::error::{Result, StencilError};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Owner of the persisted project manifest
///
/// Call sites never write the manifest piecemeal: every mutation goes
/// through `update`, which loads, applies the change and saves as one unit.
pub trait ManifestRepository {
    /// Read the persisted manifest
    fn load(&self) -> Result<ProjectManifest>;

    /// Replace the persisted manifest
    fn save(&self, manifest: &ProjectManifest) -> Result<()>;

    /// Whether a manifest has been persisted yet
    fn exists(&self) -> bool;

    /// Read-modify-write; nothing is saved if `change` fails
    fn update<F>(&self, change: F) -> Result<ProjectManifest>
    where
        F: FnOnce(&mut ProjectManifest) -> Result<()>,
    {
        let mut manifest = self.load()?;
        change(&mut manifest)?;
        self.save(&manifest)?;
        Ok(manifest)
    }

    fn append_component(&self, kind: &str, name: &str) -> Result<ProjectManifest> {
        self.update(|m| m.add_component(kind, name))
    }

    fn append_installation(
        &self,
        name: &str,
        libraries: &[String],
        unique: &str,
    ) -> Result<ProjectManifest> {
        self.update(|m| {
            m.add_installation(Installation {
                name: name.to_string(),
                libraries: libraries.to_vec(),
                unique: unique.to_string(),
            })
        })
    }
}

/// JSON manifest stored in a single file
#[derive(Debug, Clone)]
pub struct FileManifestStore {
    path: PathBuf,
}

impl FileManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `file_name` inside `project_root`
    pub fn in_project(project_root: &Path, file_name: &str) -> Self {
        Self::new(project_root.join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_err(&self, source: std::io::Error) -> StencilError {
        StencilError::ManifestWrite {
            path: self.path.clone(),
            source,
        }
    }

    /// Four-space indented JSON with a trailing newline
    fn render(manifest: &ProjectManifest) -> std::result::Result<Vec<u8>, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        manifest.serialize(&mut serializer)?;
        buf.push(b'\n');
        Ok(buf)
    }
}

impl ManifestRepository for FileManifestStore {
    fn load(&self) -> Result<ProjectManifest> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StencilError::ManifestMissing {
                    path: self.path.clone(),
                })
            }
            Err(e) => {
                return Err(StencilError::ManifestCorrupt {
                    path: self.path.clone(),
                    source: serde::de::Error::custom(e),
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| StencilError::ManifestCorrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, manifest: &ProjectManifest) -> Result<()> {
        let bytes = Self::render(manifest).map_err(|e| self.write_err(e.into()))?;

        // Written next to the target, then renamed over it
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.write_err(e))?;
        tmp.write_all(&bytes).map_err(|e| self.write_err(e))?;
        tmp.as_file().sync_all().map_err(|e| self.write_err(e))?;
        tmp.persist(&self.path).map_err(|e| self.write_err(e.error))?;

        debug!(path = %self.path.display(), "saved project manifest");
        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }
}
