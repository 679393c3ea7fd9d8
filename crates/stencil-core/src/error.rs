//! Error taxonomy for generation and installation requests
//!
//! Every variant is terminal for the request that produced it. Messages carry
//! the offending identifiers so the CLI can print them as-is.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the engine
pub type Result<T> = std::result::Result<T, StencilError>;

#[derive(Error, Debug)]
pub enum StencilError {
    #[error("project manifest not found at {} (run `init` first)", path.display())]
    ManifestMissing { path: PathBuf },

    #[error("project manifest at {} could not be parsed: {source}", path.display())]
    ManifestCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write project manifest {}: {source}", path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("project at {} is already initialized", path.display())]
    AlreadyInitialized { path: PathBuf },

    #[error("template catalog unavailable for {reference}: {reason}")]
    CatalogUnavailable { reference: String, reason: String },

    #[error("{rule} command not found in template catalog")]
    RuleNotFound { rule: String },

    #[error("the component '{name}' for '{kind}' already exists")]
    ComponentExists { kind: String, name: String },

    #[error("installation with unique '{unique}' already exists")]
    InstallationExists { unique: String },

    #[error("dependencies are not present for '{command}': {}", missing.join(", "))]
    DependenciesMissing { command: String, missing: Vec<String> },

    #[error("error copying file from {} to {}: {source}", from.display(), to.display())]
    FileCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to register import in entry point {}: {source}", path.display())]
    EntryPointWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {}: {source}", path.display())]
    SettingsInvalid {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("package fetch `{command}` failed: {reason}")]
    PackageFetch { command: String, reason: String },
}

impl StencilError {
    pub(crate) fn file_copy(
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileCopy {
            from: from.into(),
            to: to.into(),
            source,
        }
    }
}
