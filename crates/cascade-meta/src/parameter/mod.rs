//! Typed configuration parameters
//!
//! A parameter is produced once, when a definition is loaded, and resolved
//! to a concrete value later, once every configuration it references has
//! been resolved. The built-in kinds are:
//!
//! | kind          | references | resolves to                              |
//! |---------------|------------|------------------------------------------|
//! | `value`       | none       | the literal                              |
//! | `reference`   | one        | a property of another configuration      |
//! | `environment` | none       | a process environment variable           |
//! | `list`        | none       | a sequence of literals                   |
//!
//! Further kinds are added by registering a
//! [`ParameterDecoder`](crate::ParameterDecoder) with the registry.

pub mod environment;
pub mod list;
pub mod reference;
pub mod value;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde_yaml::Value;

use crate::{Coordinate, Result};

pub use environment::EnvironmentParameter;
pub use list::ListParameter;
pub use reference::ReferenceParameter;
pub use value::ValueParameter;

/// A typed parameter of a configuration.
pub trait Parameter: fmt::Debug + Send + Sync {
    /// Discriminator string this parameter was registered under.
    fn kind(&self) -> &'static str;

    /// Every configuration property this parameter depends on.
    fn references(&self) -> Vec<ParameterReference> {
        Vec::new()
    }

    /// Produce the final value of this parameter.
    fn resolve(&self, ctx: &ResolveContext<'_>) -> Result<Value>;
}

/// A dependency on one property of another configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterReference {
    pub config: Coordinate,
    pub property: String,
}

impl ParameterReference {
    pub fn new(config: Coordinate, property: impl Into<String>) -> Self {
        Self {
            config,
            property: property.into(),
        }
    }
}

impl fmt::Display for ParameterReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.config, self.property)
    }
}

/// Properties of a configuration that has already been resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntity {
    pub coordinate: Coordinate,
    pub properties: BTreeMap<String, Value>,
    pub skip: bool,
}

/// Every configuration resolved so far within one environment.
#[derive(Debug, Clone, Default)]
pub struct ResolvedEntities {
    entities: HashMap<Coordinate, ResolvedEntity>,
}

impl ResolvedEntities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: ResolvedEntity) {
        self.entities.insert(entity.coordinate.clone(), entity);
    }

    pub fn get(&self, coordinate: &Coordinate) -> Option<&ResolvedEntity> {
        self.entities.get(coordinate)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

type EnvLookup<'a> = &'a (dyn Fn(&str) -> Option<String> + Sync);

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Context handed to [`Parameter::resolve`].
pub struct ResolveContext<'a> {
    pub coordinate: &'a Coordinate,
    pub parameter_name: &'a str,
    pub resolved: &'a ResolvedEntities,
    env: EnvLookup<'a>,
}

impl<'a> ResolveContext<'a> {
    /// Context reading environment variables from the current process.
    pub fn new(
        coordinate: &'a Coordinate,
        parameter_name: &'a str,
        resolved: &'a ResolvedEntities,
    ) -> Self {
        Self {
            coordinate,
            parameter_name,
            resolved,
            env: &process_env,
        }
    }

    /// Replace the environment variable lookup.
    pub fn with_env_lookup(mut self, env: EnvLookup<'a>) -> Self {
        self.env = env;
        self
    }

    pub fn env_var(&self, name: &str) -> Option<String> {
        (self.env)(name)
    }
}

/// String form of a scalar YAML value, or `None` for collections.
///
/// Null becomes the empty string, matching how an absent optional field is
/// treated.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}
