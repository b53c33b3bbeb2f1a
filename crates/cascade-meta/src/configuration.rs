//! The resolved unit of deployment

use std::collections::BTreeMap;
use std::sync::Arc;

use cascade_fs::Template;

use crate::{Coordinate, Parameter};

/// Parameter every configuration must carry.
pub const NAME_PARAMETER: &str = "name";

/// Parameter name users may not define; the deployment driver fills it in.
pub const ID_PARAMETER: &str = "id";

/// Parameters of a configuration keyed by name.
pub type Parameters = BTreeMap<String, Arc<dyn Parameter>>;

/// One definition expanded for one environment.
///
/// Produced by the definition loader and immutable afterwards.
/// `references` holds every distinct coordinate the parameters point at,
/// sorted by canonical form, and never contains `coordinate` itself.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub template: Template,
    pub coordinate: Coordinate,
    pub group: String,
    pub environment: String,
    pub parameters: Parameters,
    pub references: Vec<Coordinate>,
    pub skip: bool,
}

impl Configuration {
    /// Whether this configuration references `coordinate`.
    pub fn depends_on(&self, coordinate: &Coordinate) -> bool {
        self.references.contains(coordinate)
    }

    pub fn parameter(&self, name: &str) -> Option<&Arc<dyn Parameter>> {
        self.parameters.get(name)
    }
}
