//! Project manifest types

use crate::error::{Result, StencilError};
use serde::{Deserialize, Serialize};

/// Template catalog source bound to a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRef {
    pub url: String,

    /// Pinned version tag; empty means "latest"
    #[serde(default)]
    pub tag: String,
}

impl TemplateRef {
    pub fn new(url: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            tag: tag.into(),
        }
    }
}

impl std::fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.tag.is_empty() {
            f.write_str(&self.url)
        } else {
            write!(f, "{}@{}", self.url, self.tag)
        }
    }
}

/// A generated component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub kind: String,
    pub name: String,
}

/// An installed cross-cutting feature
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    pub name: String,

    #[serde(default)]
    pub libraries: Vec<String>,

    /// Optional secondary key, unique across installations when non-empty
    #[serde(default)]
    pub unique: String,
}

impl Installation {
    /// Whether a dependency string refers to this installation
    pub fn satisfies(&self, dependency: &str) -> bool {
        dependency == self.name || dependency == self.unique
    }
}

/// Persistent record of a project's template binding and generated items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectManifest {
    pub project: String,

    pub template: TemplateRef,

    #[serde(default)]
    pub components: Vec<Component>,

    #[serde(default)]
    pub installations: Vec<Installation>,
}

impl ProjectManifest {
    pub fn new(project: impl Into<String>, template: TemplateRef) -> Self {
        Self {
            project: project.into(),
            template,
            components: Vec::new(),
            installations: Vec::new(),
        }
    }

    pub fn has_component(&self, kind: &str, name: &str) -> bool {
        self.components
            .iter()
            .any(|c| c.kind == kind && c.name == name)
    }

    /// Fail with `ComponentExists` if `(kind, name)` is already recorded
    pub fn ensure_component_absent(&self, kind: &str, name: &str) -> Result<()> {
        if self.has_component(kind, name) {
            return Err(StencilError::ComponentExists {
                kind: kind.to_string(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Fail with `InstallationExists` if a non-empty `unique` key is taken
    pub fn ensure_unique_free(&self, unique: &str) -> Result<()> {
        if unique.is_empty() {
            return Ok(());
        }
        if self.installations.iter().any(|i| i.unique == unique) {
            return Err(StencilError::InstallationExists {
                unique: unique.to_string(),
            });
        }
        Ok(())
    }

    pub fn add_component(&mut self, kind: &str, name: &str) -> Result<()> {
        self.ensure_component_absent(kind, name)?;
        self.components.push(Component {
            kind: kind.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn add_installation(&mut self, installation: Installation) -> Result<()> {
        self.ensure_unique_free(&installation.unique)?;
        self.installations.push(installation);
        Ok(())
    }

    /// Whether any installation matches `dependency` by name or unique key
    pub fn is_installed(&self, dependency: &str) -> bool {
        self.installations.iter().any(|i| i.satisfies(dependency))
    }
}
