//! Parameter decoder registry
//!
//! Maps the `type` discriminator of a mapping-form parameter to the
//! decoder that understands it. A registry is built per load invocation
//! and handed to the loader, so tests can substitute their own decoders
//! and concurrent loads never share mutable state.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_yaml::{Mapping, Value};

use crate::parameter::environment::{ENVIRONMENT_PARAMETER_TYPE, EnvironmentDecoder};
use crate::parameter::list::{LIST_PARAMETER_TYPE, ListDecoder};
use crate::parameter::reference::{REFERENCE_PARAMETER_TYPE, ReferenceDecoder};
use crate::parameter::value::{VALUE_PARAMETER_TYPE, ValueDecoder};
use crate::parameter::{Parameter, scalar_to_string};
use crate::{Coordinate, ParameterError, Result};

/// Everything a decoder may look at.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    /// Configuration the parameter belongs to.
    pub coordinate: &'a Coordinate,
    pub parameter_name: &'a str,
    /// The full mapping, including its `type` key.
    pub value: &'a Mapping,
}

impl<'a> DecodeContext<'a> {
    pub fn field(&self, key: &str) -> Option<&'a Value> {
        self.value.get(key)
    }

    /// A scalar field as a string. Absent and null fields are `None`.
    pub fn string_field(&self, key: &str) -> Result<Option<String>> {
        match self.field(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => scalar_to_string(value)
                .map(Some)
                .ok_or_else(|| ParameterError::invalid_field(key, "expected a scalar value")),
        }
    }
}

/// Turns a mapping-form parameter into a typed [`Parameter`].
pub trait ParameterDecoder: Send + Sync {
    fn decode(&self, ctx: &DecodeContext<'_>) -> Result<Arc<dyn Parameter>>;
}

impl<F> ParameterDecoder for F
where
    F: Fn(&DecodeContext<'_>) -> Result<Arc<dyn Parameter>> + Send + Sync,
{
    fn decode(&self, ctx: &DecodeContext<'_>) -> Result<Arc<dyn Parameter>> {
        self(ctx)
    }
}

/// Registry mapping parameter type discriminators to decoders.
///
/// # Example
///
/// ```
/// use cascade_meta::ParameterRegistry;
///
/// let registry = ParameterRegistry::with_builtins();
/// assert!(registry.contains("reference"));
/// assert!(!registry.contains("compound"));
/// ```
#[derive(Clone, Default)]
pub struct ParameterRegistry {
    decoders: HashMap<String, Arc<dyn ParameterDecoder>>,
}

impl ParameterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in parameter kinds registered.
    ///
    /// Currently registers `value`, `reference`, `environment` and `list`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(VALUE_PARAMETER_TYPE, ValueDecoder);
        registry.register(REFERENCE_PARAMETER_TYPE, ReferenceDecoder);
        registry.register(ENVIRONMENT_PARAMETER_TYPE, EnvironmentDecoder);
        registry.register(LIST_PARAMETER_TYPE, ListDecoder);
        registry
    }

    /// Register a decoder, replacing any previous decoder for `kind`.
    pub fn register(&mut self, kind: impl Into<String>, decoder: impl ParameterDecoder + 'static) {
        let kind = kind.into();
        if self.decoders.contains_key(&kind) {
            tracing::debug!(kind = %kind, "Replacing parameter decoder");
        }
        self.decoders.insert(kind, Arc::new(decoder));
    }

    pub fn get(&self, kind: &str) -> Option<&Arc<dyn ParameterDecoder>> {
        self.decoders.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.decoders.contains_key(kind)
    }

    /// Decode a mapping with the decoder its `type` field selects.
    pub fn decode(&self, ctx: &DecodeContext<'_>) -> Result<Arc<dyn Parameter>> {
        let kind = ctx
            .field("type")
            .and_then(scalar_to_string)
            .unwrap_or_default();

        let decoder = self
            .decoders
            .get(&kind)
            .ok_or(ParameterError::UnknownType { kind })?;

        decoder.decode(ctx)
    }

    /// All registered kinds, sorted.
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.decoders.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl fmt::Debug for ParameterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::ValueParameter;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn coordinate() -> Coordinate {
        Coordinate::new("project", "alerting-profile", "profile")
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = ParameterRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_with_builtins() {
        let registry = ParameterRegistry::with_builtins();
        assert_eq!(
            registry.kinds(),
            vec!["environment", "list", "reference", "value"]
        );
    }

    #[test]
    fn test_unknown_type_names_the_type() {
        let registry = ParameterRegistry::with_builtins();
        let value = mapping("type: compound\nformat: x");
        let coordinate = coordinate();
        let ctx = DecodeContext {
            coordinate: &coordinate,
            parameter_name: "p",
            value: &value,
        };

        let err = registry.decode(&ctx).unwrap_err();
        assert_eq!(
            err,
            ParameterError::UnknownType {
                kind: "compound".into()
            }
        );
        assert_eq!(err.to_string(), "unknown parameter type `compound`");
    }

    #[test]
    fn test_missing_type_is_unknown_empty_type() {
        let registry = ParameterRegistry::with_builtins();
        let value = mapping("value: 1");
        let coordinate = coordinate();
        let ctx = DecodeContext {
            coordinate: &coordinate,
            parameter_name: "p",
            value: &value,
        };

        let err = registry.decode(&ctx).unwrap_err();
        assert_eq!(err.to_string(), "unknown parameter type ``");
    }

    #[test]
    fn test_reference_decoder_defaults_to_own_coordinate() {
        let registry = ParameterRegistry::with_builtins();
        let value = mapping("type: reference\nconfigId: zone\nproperty: id");
        let coordinate = coordinate();
        let ctx = DecodeContext {
            coordinate: &coordinate,
            parameter_name: "zone",
            value: &value,
        };

        let parameter = registry.decode(&ctx).unwrap();
        let references = parameter.references();
        assert_eq!(references.len(), 1);
        assert_eq!(
            references[0].config,
            Coordinate::new("project", "alerting-profile", "zone")
        );
        assert_eq!(references[0].property, "id");
    }

    #[test]
    fn test_closure_decoder_replaces_builtin() {
        let mut registry = ParameterRegistry::with_builtins();
        registry.register("reference", |_ctx: &DecodeContext<'_>| -> Result<Arc<dyn Parameter>> {
            Ok(Arc::new(ValueParameter::new("fake")))
        });

        let value = mapping("type: reference\nproperty: id");
        let coordinate = coordinate();
        let ctx = DecodeContext {
            coordinate: &coordinate,
            parameter_name: "p",
            value: &value,
        };

        let parameter = registry.decode(&ctx).unwrap();
        assert_eq!(parameter.kind(), "value");
        assert!(parameter.references().is_empty());
        assert_eq!(registry.len(), 4);
    }
}
