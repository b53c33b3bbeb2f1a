//! Raw definition file schema
//!
//! The schema is strict: unknown keys anywhere in a definition file are
//! rejected, which is also how files in the legacy format are recognised.
//! Parameter values stay loosely typed until the resolver sees them, but
//! their shape is fixed here as a [`RawParameter`].

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};

/// Top-level key of files in the legacy definition format.
pub const LEGACY_CONFIGS_KEY: &str = "config";

/// A whole definition file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopLevelDefinition {
    #[serde(default)]
    pub configs: Vec<ConfigDefinition>,
}

/// One definition, before overrides are applied.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ConfigDefinition {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: TypeDefinition,
    #[serde(default)]
    pub config: ConfigBody,
    #[serde(default)]
    pub group_overrides: Vec<GroupOverride>,
    #[serde(default)]
    pub environment_overrides: Vec<EnvironmentOverride>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDefinition {
    #[serde(default)]
    pub api: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupOverride {
    pub group: String,
    #[serde(rename = "override", default)]
    pub body: ConfigBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentOverride {
    pub environment: String,
    #[serde(rename = "override", default)]
    pub body: ConfigBody,
}

/// The overridable part of a definition.
///
/// Every field is optional so the same shape serves as base body and as
/// override body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigBody {
    #[serde(default)]
    pub name: Option<RawParameter>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub skip: Option<Value>,
    #[serde(default)]
    pub parameters: ParameterBlock,
}

/// Shape of a parameter value as written in a definition file.
#[derive(Debug, Clone, PartialEq)]
pub enum RawParameter {
    /// `[property]` up to `[project, api, config, property]`.
    ShortReference(Vec<Value>),
    /// A mapping whose `type` key selects a decoder.
    Typed(Mapping),
    /// Anything else.
    Literal(Value),
}

impl From<Value> for RawParameter {
    fn from(value: Value) -> Self {
        match value {
            Value::Sequence(elements) => Self::ShortReference(elements),
            Value::Mapping(mapping) => Self::Typed(mapping),
            other => Self::Literal(other),
        }
    }
}

impl<'de> Deserialize<'de> for RawParameter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// The `parameters` mapping of one body, in file order.
///
/// Duplicate keys are kept rather than rejected by the YAML decoder, so
/// the loader can report them as a definition error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBlock {
    entries: Vec<(String, RawParameter)>,
}

impl ParameterBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<RawParameter>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawParameter)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names that occur more than once, each reported once, in file order.
    pub fn duplicates(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut duplicates = Vec::new();
        for (name, _) in &self.entries {
            if !seen.insert(name.as_str()) && !duplicates.contains(&name.as_str()) {
                duplicates.push(name.as_str());
            }
        }
        duplicates
    }
}

impl<K: Into<String>, V: Into<RawParameter>> FromIterator<(K, V)> for ParameterBlock {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut block = Self::new();
        for (name, value) in iter {
            block.push(name, value);
        }
        block
    }
}

struct ParameterBlockVisitor;

impl<'de> Visitor<'de> for ParameterBlockVisitor {
    type Value = ParameterBlock;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of parameter names to values")
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(ParameterBlock::new())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut block = ParameterBlock::new();
        while let Some((name, value)) = map.next_entry::<String, RawParameter>()? {
            block.push(name, value);
        }
        Ok(block)
    }
}

impl<'de> Deserialize<'de> for ParameterBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ParameterBlockVisitor)
    }
}
