//! Literal list parameters

use std::sync::Arc;

use serde_yaml::Value;

use super::{Parameter, ResolveContext};
use crate::registry::{DecodeContext, ParameterDecoder};
use crate::{ParameterError, Result};

pub const LIST_PARAMETER_TYPE: &str = "list";

/// A list of literal values.
///
/// Plain YAML sequences are short references, so a literal list has to be
/// spelled out as `{type: list, values: [...]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListParameter {
    pub values: Vec<Value>,
}

impl Parameter for ListParameter {
    fn kind(&self) -> &'static str {
        LIST_PARAMETER_TYPE
    }

    fn resolve(&self, _ctx: &ResolveContext<'_>) -> Result<Value> {
        Ok(Value::Sequence(self.values.clone()))
    }
}

/// Decodes `{type: list, values: [...]}`.
#[derive(Debug, Default)]
pub struct ListDecoder;

impl ParameterDecoder for ListDecoder {
    fn decode(&self, ctx: &DecodeContext<'_>) -> Result<Arc<dyn Parameter>> {
        match ctx.field("values") {
            Some(Value::Sequence(values)) => Ok(Arc::new(ListParameter {
                values: values.clone(),
            })),
            Some(_) => Err(ParameterError::invalid_field("values", "expected a list")),
            None => Err(ParameterError::missing_field("values")),
        }
    }
}
