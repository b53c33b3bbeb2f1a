//! Literal parameters

use std::sync::Arc;

use serde_yaml::Value;

use super::{Parameter, ResolveContext};
use crate::registry::{DecodeContext, ParameterDecoder};
use crate::{ParameterError, Result};

pub const VALUE_PARAMETER_TYPE: &str = "value";

/// A literal value, resolved unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueParameter {
    pub value: Value,
}

impl ValueParameter {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Parameter for ValueParameter {
    fn kind(&self) -> &'static str {
        VALUE_PARAMETER_TYPE
    }

    fn resolve(&self, _ctx: &ResolveContext<'_>) -> Result<Value> {
        Ok(self.value.clone())
    }
}

/// Decodes `{type: value, value: ...}`.
#[derive(Debug, Default)]
pub struct ValueDecoder;

impl ParameterDecoder for ValueDecoder {
    fn decode(&self, ctx: &DecodeContext<'_>) -> Result<Arc<dyn Parameter>> {
        let value = ctx
            .field("value")
            .cloned()
            .ok_or_else(|| ParameterError::missing_field("value"))?;
        Ok(Arc::new(ValueParameter { value }))
    }
}
