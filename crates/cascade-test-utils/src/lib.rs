//! Shared test utilities for the Cascade workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`definition`]: [`ConfigYaml`] builder rendering definition files
//! - [`workspace`]: [`TestWorkspace`] temp directory with manifest and project helpers

pub mod definition;
pub mod workspace;

pub use definition::{ConfigYaml, definitions_file};
pub use workspace::TestWorkspace;
