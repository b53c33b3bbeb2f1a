//! Filesystem primitives for Cascade
//!
//! Provides platform-neutral path handling, text I/O, YAML file discovery
//! and the template-loading boundary used by the definition loader.

pub mod config;
pub mod error;
pub mod io;
pub mod path;
pub mod template;

pub use config::{ConfigStore, Format};
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use template::{FileTemplateLoader, Template, TemplateLoader};
