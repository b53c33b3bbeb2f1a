//! Three-tier override merging
//!
//! A definition's base body is merged with at most one group override and
//! at most one environment override, in that order. Scalar fields are
//! replaced when the override sets them; parameters merge key by key.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use cascade_meta::EnvironmentDefinition;
use serde_yaml::Value;

use crate::definition::{ConfigBody, ConfigDefinition, RawParameter};

/// A body after all applicable overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedBody {
    pub name: Option<RawParameter>,
    pub template: Option<String>,
    pub skip: Option<Value>,
    pub parameters: BTreeMap<String, RawParameter>,
    /// Parameter names defined twice within a single body.
    pub duplicates: BTreeSet<String>,
}

impl MergedBody {
    /// Apply `body` on top of what has been merged so far.
    pub fn apply(&mut self, body: &ConfigBody) {
        if body.name.is_some() {
            self.name = body.name.clone();
        }

        if let Some(template) = body.template.as_ref().filter(|t| !t.is_empty()) {
            self.template = Some(template.clone());
        }

        if body.skip.is_some() {
            self.skip = body.skip.clone();
        }

        for duplicate in body.parameters.duplicates() {
            self.duplicates.insert(duplicate.to_string());
        }

        for (name, value) in body.parameters.iter() {
            self.parameters.insert(name.to_string(), value.clone());
        }
    }
}

/// Group and environment overrides of one definition, indexed by name.
///
/// When a name occurs twice, the later override wins.
#[derive(Debug, Clone, Default)]
pub struct OverrideIndex<'a> {
    groups: HashMap<&'a str, &'a ConfigBody>,
    environments: HashMap<&'a str, &'a ConfigBody>,
}

impl<'a> OverrideIndex<'a> {
    pub fn new(definition: &'a ConfigDefinition) -> Self {
        let groups = definition
            .group_overrides
            .iter()
            .map(|o| (o.group.as_str(), &o.body))
            .collect();
        let environments = definition
            .environment_overrides
            .iter()
            .map(|o| (o.environment.as_str(), &o.body))
            .collect();

        Self {
            groups,
            environments,
        }
    }

    pub fn group(&self, name: &str) -> Option<&'a ConfigBody> {
        self.groups.get(name).copied()
    }

    pub fn environment(&self, name: &str) -> Option<&'a ConfigBody> {
        self.environments.get(name).copied()
    }

    /// Merge `base` with the overrides matching `environment` exactly.
    pub fn merge(&self, base: &ConfigBody, environment: &EnvironmentDefinition) -> MergedBody {
        let mut merged = MergedBody::default();
        merged.apply(base);

        if let Some(body) = self.group(&environment.group) {
            merged.apply(body);
        }

        if let Some(body) = self.environment(&environment.name) {
            merged.apply(body);
        }

        merged
    }
}
