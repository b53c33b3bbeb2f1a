//! Parameters read from the process environment

use std::sync::Arc;

use serde_yaml::Value;

use super::{Parameter, ResolveContext};
use crate::registry::{DecodeContext, ParameterDecoder};
use crate::{ParameterError, Result};

pub const ENVIRONMENT_PARAMETER_TYPE: &str = "environment";

/// Resolves to the value of an environment variable at resolution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentParameter {
    pub name: String,
    pub default: Option<String>,
}

impl Parameter for EnvironmentParameter {
    fn kind(&self) -> &'static str {
        ENVIRONMENT_PARAMETER_TYPE
    }

    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Value> {
        ctx.env_var(&self.name)
            .or_else(|| self.default.clone())
            .map(Value::String)
            .ok_or_else(|| ParameterError::MissingEnvironmentVariable {
                name: self.name.clone(),
            })
    }
}

/// Decodes `{type: environment, name, default?}`.
#[derive(Debug, Default)]
pub struct EnvironmentDecoder;

impl ParameterDecoder for EnvironmentDecoder {
    fn decode(&self, ctx: &DecodeContext<'_>) -> Result<Arc<dyn Parameter>> {
        let name = ctx
            .string_field("name")?
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ParameterError::missing_field("name"))?;
        let default = ctx.string_field("default")?;

        Ok(Arc::new(EnvironmentParameter { name, default }))
    }
}
