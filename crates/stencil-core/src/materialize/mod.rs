//! File materialization
//!
//! This module provides:
//! - Copy primitives that apply ordered substitutions on the way
//! - Component file planning (pure path and placeholder computation)
//! - Component and installation materializers that execute the plans

pub mod component;
pub mod copy;
pub mod feature;

pub use component::{plan_file, ComponentMaterializer, FilePlan, GenerationContext, PortPlan};
pub use copy::{copy_dir, copy_file, first_level_dirs};
pub use feature::{default_substitutions, FeatureMaterializer};
