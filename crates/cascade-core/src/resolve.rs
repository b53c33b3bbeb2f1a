//! Dry-run value resolution
//!
//! Walks configurations in deployment order and resolves every parameter
//! to its final value, the way a deployment would, without talking to a
//! remote system. The `id` property a deployment would receive from the
//! remote system is filled with the canonical coordinate.

use std::collections::BTreeMap;

use cascade_meta::{
    Configuration, Coordinate, ID_PARAMETER, NAME_PARAMETER, ResolveContext, ResolvedEntities,
    ResolvedEntity,
};
use serde_yaml::Value;

use crate::Error;
use crate::parser::BatchResult;

type EnvLookup<'a> = &'a (dyn Fn(&str) -> Option<String> + Sync);

/// Final values of one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfiguration {
    pub coordinate: Coordinate,
    pub environment: String,
    pub skip: bool,
    pub properties: BTreeMap<String, Value>,
}

/// Resolution state of one environment.
///
/// Feed it configuration lists in deployment order; projects sorted
/// earlier stay visible to projects resolved later.
#[derive(Default)]
pub struct DryRun<'a> {
    environment: String,
    resolved: ResolvedEntities,
    env: Option<EnvLookup<'a>>,
}

impl<'a> DryRun<'a> {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            resolved: ResolvedEntities::new(),
            env: None,
        }
    }

    /// Replace the process environment as the source of `environment`
    /// parameters.
    pub fn with_env_lookup(mut self, env: EnvLookup<'a>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn resolved(&self) -> &ResolvedEntities {
        &self.resolved
    }

    /// Resolve `configs`, which must already be in deployment order.
    ///
    /// Every configuration is attempted; the errors of all of them are
    /// returned together.
    pub fn resolve<'c>(
        &mut self,
        configs: impl IntoIterator<Item = &'c Configuration>,
    ) -> BatchResult<Vec<ResolvedConfiguration>> {
        let mut resolved = Vec::new();
        let mut errors = Vec::new();

        for config in configs {
            match self.resolve_one(config) {
                Ok(result) => resolved.push(result),
                Err(mut e) => errors.append(&mut e),
            }
        }

        if errors.is_empty() {
            Ok(resolved)
        } else {
            Err(errors)
        }
    }

    fn resolve_one(&mut self, config: &Configuration) -> BatchResult<ResolvedConfiguration> {
        if config.skip {
            tracing::debug!(coordinate = %config.coordinate, "Skipping configuration");
            self.resolved.insert(ResolvedEntity {
                coordinate: config.coordinate.clone(),
                properties: BTreeMap::new(),
                skip: true,
            });
            return Ok(ResolvedConfiguration {
                coordinate: config.coordinate.clone(),
                environment: self.environment.clone(),
                skip: true,
                properties: BTreeMap::new(),
            });
        }

        let mut properties = BTreeMap::new();
        let mut errors = Vec::new();

        for name in resolution_order(config) {
            let Some(parameter) = config.parameter(name) else {
                continue;
            };
            let mut ctx = ResolveContext::new(&config.coordinate, name, &self.resolved);
            if let Some(env) = self.env {
                ctx = ctx.with_env_lookup(env);
            }

            match parameter.resolve(&ctx) {
                Ok(value) => {
                    properties.insert(name.to_string(), value);
                }
                Err(source) => errors.push(Error::Resolution {
                    coordinate: config.coordinate.clone(),
                    environment: self.environment.clone(),
                    parameter: name.to_string(),
                    source,
                }),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        properties
            .entry(ID_PARAMETER.to_string())
            .or_insert_with(|| Value::from(config.coordinate.to_string()));

        self.resolved.insert(ResolvedEntity {
            coordinate: config.coordinate.clone(),
            properties: properties.clone(),
            skip: false,
        });

        Ok(ResolvedConfiguration {
            coordinate: config.coordinate.clone(),
            environment: self.environment.clone(),
            skip: false,
            properties,
        })
    }
}

/// `name` first, then every other parameter alphabetically.
fn resolution_order(config: &Configuration) -> impl Iterator<Item = &str> {
    let name = config
        .parameters
        .contains_key(NAME_PARAMETER)
        .then_some(NAME_PARAMETER);
    name.into_iter().chain(
        config
            .parameters
            .keys()
            .map(String::as_str)
            .filter(|key| *key != NAME_PARAMETER),
    )
}
