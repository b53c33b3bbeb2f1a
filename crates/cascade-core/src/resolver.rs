//! Raw parameter resolution
//!
//! Turns the loosely typed parameter values of a merged body into typed
//! [`Parameter`]s and accumulates the coordinates they reference.

use std::collections::BTreeMap;
use std::sync::Arc;

use cascade_meta::parameter::{ReferenceParameter, ValueParameter, scalar_to_string};
use cascade_meta::{Coordinate, DecodeContext, ID_PARAMETER, Parameter, ParameterRegistry};
use serde_yaml::Value;

use crate::definition::RawParameter;
use crate::error::ParameterParseError;

type Result<T> = std::result::Result<T, ParameterParseError>;

/// Resolves the parameters of one configuration.
#[derive(Debug)]
pub struct ParameterResolver<'a> {
    registry: &'a ParameterRegistry,
    coordinate: &'a Coordinate,
    /// Keyed by canonical coordinate string.
    references: BTreeMap<String, Coordinate>,
}

impl<'a> ParameterResolver<'a> {
    pub fn new(registry: &'a ParameterRegistry, coordinate: &'a Coordinate) -> Self {
        Self {
            registry,
            coordinate,
            references: BTreeMap::new(),
        }
    }

    /// Turn one raw value into a typed parameter.
    ///
    /// Does not record references; see [`add`](Self::add).
    pub fn resolve(&self, name: &str, raw: &RawParameter) -> Result<Arc<dyn Parameter>> {
        if name == ID_PARAMETER {
            return Err(ParameterParseError::ReservedName);
        }

        match raw {
            RawParameter::ShortReference(elements) => self.short_reference(elements),
            RawParameter::Typed(mapping) => {
                let ctx = DecodeContext {
                    coordinate: self.coordinate,
                    parameter_name: name,
                    value: mapping,
                };
                Ok(self.registry.decode(&ctx)?)
            }
            RawParameter::Literal(value) => Ok(Arc::new(ValueParameter::new(value.clone()))),
        }
    }

    /// Resolve a parameter and record the coordinates it references.
    pub fn add(&mut self, name: &str, raw: &RawParameter) -> Result<Arc<dyn Parameter>> {
        let parameter = self.resolve(name, raw)?;
        self.record_references(parameter.as_ref())?;
        Ok(parameter)
    }

    fn record_references(&mut self, parameter: &dyn Parameter) -> Result<()> {
        let references = parameter.references();

        if let Some(own) = references.iter().find(|r| &r.config == self.coordinate) {
            return Err(ParameterParseError::SelfReference(own.config.clone()));
        }

        for reference in references {
            self.references
                .entry(reference.config.to_string())
                .or_insert(reference.config);
        }
        Ok(())
    }

    fn short_reference(&self, elements: &[Value]) -> Result<Arc<dyn Parameter>> {
        if elements.is_empty() || elements.len() > 4 {
            return Err(ParameterParseError::ShortReferenceLength(elements.len()));
        }

        let mut explicit = elements
            .iter()
            .map(|e| match e {
                Value::Null => Err(ParameterParseError::ShortReferenceElement),
                _ => scalar_to_string(e).ok_or(ParameterParseError::ShortReferenceElement),
            })
            .collect::<Result<Vec<String>>>()?;

        // leading fields the user left out come from the own coordinate
        let own = [
            &self.coordinate.project,
            &self.coordinate.api,
            &self.coordinate.config_id,
        ];
        let mut fields: Vec<String> = own[..4 - explicit.len()]
            .iter()
            .map(|s| s.to_string())
            .collect();
        fields.append(&mut explicit);

        let [project, api, config_id, property]: [String; 4] = fields
            .try_into()
            .map_err(|_| ParameterParseError::ShortReferenceLength(elements.len()))?;

        Ok(Arc::new(ReferenceParameter::new(
            project, api, config_id, property,
        )))
    }

    /// Coordinates referenced so far, sorted by canonical form.
    pub fn references(&self) -> Vec<Coordinate> {
        self.references.values().cloned().collect()
    }

    pub fn into_references(self) -> Vec<Coordinate> {
        self.references.into_values().collect()
    }
}
