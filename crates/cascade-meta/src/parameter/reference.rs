//! References to properties of other configurations

use std::sync::Arc;

use serde_yaml::Value;

use super::{Parameter, ParameterReference, ResolveContext};
use crate::registry::{DecodeContext, ParameterDecoder};
use crate::{Coordinate, ParameterError, Result};

pub const REFERENCE_PARAMETER_TYPE: &str = "reference";

/// Resolves to a property of another configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceParameter {
    pub target: ParameterReference,
}

impl ReferenceParameter {
    pub fn new(
        project: impl Into<String>,
        api: impl Into<String>,
        config_id: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        Self {
            target: ParameterReference::new(Coordinate::new(project, api, config_id), property),
        }
    }
}

impl Parameter for ReferenceParameter {
    fn kind(&self) -> &'static str {
        REFERENCE_PARAMETER_TYPE
    }

    fn references(&self) -> Vec<ParameterReference> {
        vec![self.target.clone()]
    }

    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Value> {
        let unresolved = |reason: &str| ParameterError::UnresolvedReference {
            coordinate: self.target.config.clone(),
            property: self.target.property.clone(),
            reason: reason.to_string(),
        };

        let entity = ctx
            .resolved
            .get(&self.target.config)
            .ok_or_else(|| unresolved("configuration has not been resolved"))?;

        if entity.skip {
            return Err(unresolved("configuration is skipped"));
        }

        entity
            .properties
            .get(&self.target.property)
            .cloned()
            .ok_or_else(|| unresolved("property does not exist"))
    }
}

/// Decodes `{type: reference, project?, api?, configId?, property}`.
///
/// Omitted coordinate fields default to the coordinate of the
/// configuration the parameter belongs to.
#[derive(Debug, Default)]
pub struct ReferenceDecoder;

impl ParameterDecoder for ReferenceDecoder {
    fn decode(&self, ctx: &DecodeContext<'_>) -> Result<Arc<dyn Parameter>> {
        let property = ctx
            .string_field("property")?
            .ok_or_else(|| ParameterError::missing_field("property"))?;
        let project = ctx
            .string_field("project")?
            .unwrap_or_else(|| ctx.coordinate.project.clone());
        let api = ctx
            .string_field("api")?
            .unwrap_or_else(|| ctx.coordinate.api.clone());
        let config_id = ctx
            .string_field("configId")?
            .unwrap_or_else(|| ctx.coordinate.config_id.clone());

        Ok(Arc::new(ReferenceParameter::new(
            project, api, config_id, property,
        )))
    }
}
