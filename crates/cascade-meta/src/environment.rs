//! Target environment definitions

use serde::{Deserialize, Serialize};

/// Group used when an environment does not declare one.
pub const DEFAULT_GROUP: &str = "default";

/// A deployment target a definition is expanded for.
///
/// Only the name and the group matter to the loader: group overrides are
/// selected by `group`, environment overrides by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnvironmentDefinition {
    pub name: String,
    pub group: String,
}

impl EnvironmentDefinition {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }

    /// An environment in the default group.
    pub fn ungrouped(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_GROUP)
    }
}
