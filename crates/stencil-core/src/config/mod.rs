//! Project-level settings
//!
//! Settings are optional: a project without `stencil.yaml` runs with the
//! defaults, which target a Go project wired through `main.go`.

pub mod settings;

pub use settings::{EntryPointSettings, Settings, SETTINGS_FILE};
