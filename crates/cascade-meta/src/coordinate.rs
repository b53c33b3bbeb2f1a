//! Configuration identity

use std::cmp::Ordering;
use std::fmt;
use std::iter;

use serde::{Deserialize, Serialize};

/// Unique identity of a configuration object: `(project, api, config id)`.
///
/// Two coordinates are equal iff all three fields match. The canonical
/// string form is `project:api:config`; ordering follows that string so
/// that sorted output matches what users see in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub project: String,
    pub api: String,
    #[serde(rename = "configId")]
    pub config_id: String,
}

impl Coordinate {
    pub fn new(
        project: impl Into<String>,
        api: impl Into<String>,
        config_id: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            api: api.into(),
            config_id: config_id.into(),
        }
    }

    /// Bytes of the canonical `project:api:config` form.
    fn canonical_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.project
            .bytes()
            .chain(iter::once(b':'))
            .chain(self.api.bytes())
            .chain(iter::once(b':'))
            .chain(self.config_id.bytes())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.project, self.api, self.config_id)
    }
}

impl Ord for Coordinate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical_bytes()
            .cmp(other.canonical_bytes())
            .then_with(|| self.project.cmp(&other.project))
            .then_with(|| self.api.cmp(&other.api))
            .then_with(|| self.config_id.cmp(&other.config_id))
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
