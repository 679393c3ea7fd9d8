//! Project manifest: data model and persistence
//!
//! This module provides:
//! - The manifest record (`ProjectManifest`) and its identity rules
//! - The `ManifestRepository` abstraction with read-modify-write `update`
//! - A JSON file store with atomic replacement on save

pub mod model;
pub mod store;

pub use model::{Component, Installation, ProjectManifest, TemplateRef};
pub use store::{FileManifestStore, ManifestRepository};
