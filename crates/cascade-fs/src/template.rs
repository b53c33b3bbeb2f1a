//! Template loading boundary
//!
//! The loader only needs to know that a template exists and what it
//! contains; rendering happens in the deployment driver. The
//! [`TemplateLoader`] trait is the seam tests use to substitute an
//! in-memory implementation.

use std::fs;

use crate::{Error, NormalizedPath, Result};

/// Content of a configuration template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Path the template was loaded from, used as its identity.
    pub id: String,
    /// Raw template text.
    pub content: String,
}

impl Template {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// Loads template content for a resolved template path.
pub trait TemplateLoader: Send + Sync {
    fn load(&self, path: &NormalizedPath) -> Result<Template>;
}

/// Loads templates from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileTemplateLoader;

impl FileTemplateLoader {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateLoader for FileTemplateLoader {
    fn load(&self, path: &NormalizedPath) -> Result<Template> {
        let native = path.to_native();
        if !native.is_file() {
            return Err(Error::TemplateNotFound { path: native });
        }
        let content = fs::read_to_string(&native).map_err(|e| Error::io(&native, e))?;
        Ok(Template::new(path.as_str(), content))
    }
}
