//! Catalog loading with a single re-fetch

use super::catalog::Catalog;
use super::fetcher::TemplateFetcher;
use crate::error::{Result, StencilError};
use crate::manifest::TemplateRef;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Marker used when neither the catalog nor the module file names the module
pub const DEFAULT_MODULE_MARKER: &str = "archetype";

/// A parsed catalog together with where it lives
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,

    /// Root of the template sources the catalog paths are relative to
    pub template_dir: PathBuf,

    /// Module name the template sources import themselves by
    pub module_marker: String,
}

/// Resolves the catalog bound to a project's template reference
pub struct CatalogLoader {
    fetcher: TemplateFetcher,
    catalog_file: String,
    module_file: String,
}

impl CatalogLoader {
    pub fn new(
        fetcher: TemplateFetcher,
        catalog_file: impl Into<String>,
        module_file: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            catalog_file: catalog_file.into(),
            module_file: module_file.into(),
        }
    }

    pub fn fetcher(&self) -> &TemplateFetcher {
        &self.fetcher
    }

    /// Load the catalog, retrieving the template once if it is missing or
    /// does not parse
    pub async fn load(&self, reference: &TemplateRef) -> Result<LoadedCatalog> {
        let unavailable = |reason: String| StencilError::CatalogUnavailable {
            reference: reference.to_string(),
            reason,
        };

        let template_dir = self
            .fetcher
            .template_dir(reference)
            .map_err(|e| unavailable(format!("{:#}", e)))?;
        let catalog_path = template_dir.join(&self.catalog_file);

        let catalog = match Self::read_catalog(&catalog_path) {
            Ok(catalog) => catalog,
            Err(first) => {
                debug!(
                    path = %catalog_path.display(),
                    "catalog not usable ({}), retrieving template",
                    first
                );
                if let Err(e) = self.fetcher.retrieve(reference).await {
                    warn!("template retrieval failed: {:#}", e);
                    return Err(unavailable(format!("{:#}", e)));
                }
                Self::read_catalog(&catalog_path).map_err(unavailable)?
            }
        };

        let module_marker = match &catalog.module_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => read_module_name(&template_dir.join(&self.module_file))
                .unwrap_or_else(|| DEFAULT_MODULE_MARKER.to_string()),
        };

        Ok(LoadedCatalog {
            catalog,
            template_dir,
            module_marker,
        })
    }

    fn read_catalog(path: &Path) -> std::result::Result<Catalog, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        Catalog::from_json(&content)
            .map_err(|e| format!("failed to parse {}: {}", path.display(), e))
    }
}

/// Module name from a `module <name>` line, as in `go.mod`
fn read_module_name(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    content.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module ")?;
        let name = rest.trim().trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}
