//! Template catalogs: parsing, retrieval and loading
//!
//! This module provides:
//! - Catalog types (`Catalog`, component and installation commands)
//! - Template retrieval from remote archives or local directories
//! - Catalog loading with a one-shot re-fetch
//! - Version tag selection

pub mod catalog;
pub mod fetcher;
pub mod loader;
pub mod version;

pub use catalog::{
    Catalog, ComponentCommand, ComponentFile, Dependent, InstallationCommand, InstallationFile,
    InstallationFolder, LiteralReplacement, PortFile, ReplaceHolder,
};
pub use fetcher::{TemplateFetcher, TemplateSource};
pub use loader::{CatalogLoader, LoadedCatalog, DEFAULT_MODULE_MARKER};
