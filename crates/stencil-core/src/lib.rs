//! Stencil Core - Template-driven component generation engine
//!
//! This library turns declarative rules from a template catalog into files
//! inside a project: it picks the rule variant matching the features already
//! installed, copies and rewrites the template sources, registers the new
//! packages in the project's entry point and records everything in a project
//! manifest. It is designed to be used by CLI binaries that bring their own
//! product identity through [`ProductConfig`].
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Pure operations** - path algebra, ordered substitutions,
//!   case conversion, rule ranking and dependency gates
//! - **Layer 2: I/O operations** - manifest store, template retrieval and
//!   catalog loading, file materialization, entry-point wiring
//! - **Layer 3: Workflows** - [`Scaffolder`] composing the above into
//!   `init`, component generation and feature installation
//! - **Layer 4: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use stencil_core::{ProductConfig, Scaffolder};
//!
//! #[derive(Clone)]
//! struct MyConfig;
//! impl ProductConfig for MyConfig {
//!     fn name(&self) -> &'static str { "myapp" }
//!     // ... implement other methods
//! }
//!
//! let scaffolder = Scaffolder::open(&MyConfig, std::env::current_dir()?)?;
//! scaffolder.install_feature("echo").await?;
//! scaffolder.generate_component("get-controller", "billing/invoice").await?;
//! ```

pub mod case;
pub mod config;
pub mod error;
pub mod manifest;
pub mod materialize;
pub mod packages;
pub mod paths;
pub mod product;
pub mod resolver;
pub mod scaffolder;
pub mod substitution;
pub mod templates;
pub mod wiring;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::Settings;
pub use error::{Result, StencilError};
pub use manifest::{FileManifestStore, ManifestRepository, ProjectManifest, TemplateRef};
pub use product::ProductConfig;
pub use resolver::{DependencyPolicy, Resolver};
pub use scaffolder::Scaffolder;
pub use templates::{Catalog, CatalogLoader, TemplateFetcher, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::run;
