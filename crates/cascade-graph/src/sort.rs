//! Deployment ordering of configurations and projects

use std::collections::{BTreeMap, BTreeSet, HashMap};

use cascade_meta::{Configuration, Coordinate};
use rayon::prelude::*;

use crate::{DependencyGraph, SortError};

/// Deployment order of one environment's configurations.
#[derive(Debug, Clone)]
pub struct SortedConfigurations<'a> {
    pub environment: String,
    /// Every configuration outside a cycle, dependencies first.
    pub order: Vec<&'a Configuration>,
    /// One error per configuration inside a cycle.
    pub errors: Vec<SortError>,
}

impl<'a> SortedConfigurations<'a> {
    /// The complete order, or the cycle errors if there are any.
    pub fn into_result(self) -> Result<Vec<&'a Configuration>, Vec<SortError>> {
        if self.errors.is_empty() {
            Ok(self.order)
        } else {
            Err(self.errors)
        }
    }
}

/// Order the configurations of one environment so that every configuration
/// comes after the configurations it references.
///
/// References to coordinates outside `configs` are treated as satisfied.
pub fn sort_configurations<'a>(
    environment: &str,
    configs: &'a [Configuration],
) -> SortedConfigurations<'a> {
    let mut by_coordinate: HashMap<&Coordinate, &'a Configuration> = HashMap::new();
    let mut graph = DependencyGraph::new();

    for config in configs {
        if by_coordinate.contains_key(&config.coordinate) {
            tracing::warn!(
                environment,
                coordinate = %config.coordinate,
                "Ignoring duplicate configuration while sorting"
            );
            continue;
        }
        by_coordinate.insert(&config.coordinate, config);
        graph.add_node(config.coordinate.clone());
    }

    for config in by_coordinate.values() {
        for reference in &config.references {
            if !by_coordinate.contains_key(reference) {
                tracing::debug!(
                    environment,
                    from = %config.coordinate,
                    to = %reference,
                    "Reference outside the sorted set treated as satisfied"
                );
            }
            graph.add_edge(config.coordinate.clone(), reference.clone());
        }
    }

    let sorted = graph.sort();

    let order = sorted
        .order
        .iter()
        .filter_map(|coordinate| by_coordinate.get(coordinate).copied())
        .collect();

    let errors = sorted
        .cycles
        .into_iter()
        .map(|member| SortError::CircularConfigDependency {
            environment: environment.to_string(),
            location: member.node,
            depends_on: member.depends_on,
        })
        .collect();

    SortedConfigurations {
        environment: environment.to_string(),
        order,
        errors,
    }
}

/// Sort every environment independently and in parallel.
pub fn sort_all_environments(
    configs_per_environment: &BTreeMap<String, Vec<Configuration>>,
) -> BTreeMap<String, SortedConfigurations<'_>> {
    configs_per_environment
        .par_iter()
        .map(|(environment, configs)| {
            (
                environment.clone(),
                sort_configurations(environment, configs),
            )
        })
        .collect()
}

/// Project-level dependencies implied by configuration references.
///
/// Every project owning at least one configuration gets an entry; a project
/// depends on another when any of its configurations references a
/// configuration of the other project.
pub fn rollup_project_dependencies<'a>(
    configs: impl IntoIterator<Item = &'a Configuration>,
) -> BTreeMap<String, BTreeSet<String>> {
    let mut dependencies: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for config in configs {
        let project = &config.coordinate.project;
        let entry = dependencies.entry(project.clone()).or_default();
        for reference in &config.references {
            if &reference.project != project {
                entry.insert(reference.project.clone());
            }
        }
    }

    dependencies
}

/// Deployment order of one environment's projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedProjects {
    pub environment: String,
    pub order: Vec<String>,
    pub errors: Vec<SortError>,
}

impl SortedProjects {
    pub fn into_result(self) -> Result<Vec<String>, Vec<SortError>> {
        if self.errors.is_empty() {
            Ok(self.order)
        } else {
            Err(self.errors)
        }
    }
}

/// Order projects so that every project comes after the projects it
/// depends on.
///
/// The keys of `dependencies` are the projects to sort; dependencies on
/// projects that are not keys are treated as satisfied.
pub fn sort_projects(
    environment: &str,
    dependencies: &BTreeMap<String, BTreeSet<String>>,
) -> SortedProjects {
    let mut graph = DependencyGraph::new();
    for (project, depends_on) in dependencies {
        graph.add_node(project.clone());
        for dependency in depends_on {
            graph.add_edge(project.clone(), dependency.clone());
        }
    }

    let sorted = graph.sort();
    let errors = sorted
        .cycles
        .into_iter()
        .map(|member| SortError::CircularProjectDependency {
            environment: environment.to_string(),
            project: member.node,
            depends_on: member.depends_on,
        })
        .collect();

    SortedProjects {
        environment: environment.to_string(),
        order: sorted.order,
        errors,
    }
}
