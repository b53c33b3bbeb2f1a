//! Manifest and project loading
//!
//! The manifest names the projects to load and the environments to expand
//! them for. Each project is a directory of definition files loaded with
//! its own [`LoaderContext`]; the loaded configurations are grouped per
//! environment and checked for duplicate coordinates.

use std::collections::{BTreeMap, BTreeSet};

use cascade_fs::{ConfigStore, NormalizedPath};
use cascade_graph::rollup_project_dependencies;
use cascade_meta::{Configuration, EnvironmentDefinition};
use rayon::prelude::*;
use serde::Deserialize;

use crate::parser::{BatchResult, LoaderContext, load_configs};
use crate::{Error, Result};

/// The parts of a deployment manifest the loader consumes.
///
/// # Example
///
/// ```
/// use cascade_core::Manifest;
///
/// let manifest: Manifest = serde_yaml::from_str(r#"
/// projects:
///   - name: infrastructure
/// environmentGroups:
///   - name: production
///     environments:
///       - name: prod-eu
/// "#).unwrap();
///
/// assert_eq!(manifest.environments()[0].group, "production");
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub projects: Vec<ProjectDefinition>,
    #[serde(default)]
    pub environment_groups: Vec<EnvironmentGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectDefinition {
    pub name: String,
    /// Directory relative to the manifest; defaults to `name`.
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentGroup {
    pub name: String,
    #[serde(default)]
    pub environments: Vec<EnvironmentEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentEntry {
    pub name: String,
}

impl Manifest {
    /// Load a manifest file. A manifest without projects or without
    /// environments is rejected.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let manifest: Manifest = ConfigStore::new().load(path)?;

        if manifest.projects.is_empty() {
            return Err(Error::EmptyManifest {
                path: path.clone(),
                what: "projects",
            });
        }
        if manifest.environments().is_empty() {
            return Err(Error::EmptyManifest {
                path: path.clone(),
                what: "environments",
            });
        }

        Ok(manifest)
    }

    /// Every environment of every group, in manifest order.
    pub fn environments(&self) -> Vec<EnvironmentDefinition> {
        self.environment_groups
            .iter()
            .flat_map(|group| {
                group
                    .environments
                    .iter()
                    .map(|env| EnvironmentDefinition::new(&env.name, &group.name))
            })
            .collect()
    }

    /// Directory of `project`, resolved against the manifest directory.
    pub fn project_path(&self, project: &ProjectDefinition, root: &NormalizedPath) -> NormalizedPath {
        root.join(project.path.as_deref().unwrap_or(&project.name))
    }
}

/// A loaded project.
#[derive(Debug, Clone)]
pub struct Project {
    pub id: String,
    /// Configurations per environment name.
    pub configs: BTreeMap<String, Vec<Configuration>>,
    /// Other projects referenced per environment name.
    pub dependencies: BTreeMap<String, BTreeSet<String>>,
}

impl Project {
    pub fn configs_for(&self, environment: &str) -> &[Configuration] {
        self.configs.get(environment).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_dependency_on(&self, environment: &str, project: &str) -> bool {
        self.dependencies
            .get(environment)
            .is_some_and(|deps| deps.contains(project))
    }
}

/// Restricts which environments and projects are loaded.
///
/// Empty lists select everything.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub environments: Vec<String>,
    pub projects: Vec<String>,
}

/// Loads the projects of a manifest.
#[derive(Debug, Clone)]
pub struct ProjectLoader<'a> {
    manifest: &'a Manifest,
    root: NormalizedPath,
    base: LoaderContext,
}

impl<'a> ProjectLoader<'a> {
    /// `root` is the directory project paths are relative to.
    pub fn new(manifest: &'a Manifest, root: impl Into<NormalizedPath>) -> Self {
        let root = root.into();
        Self {
            manifest,
            base: LoaderContext::new("", root.clone()),
            root,
        }
    }

    /// Use the registries and template loader of `base` for every project.
    pub fn with_context(mut self, base: LoaderContext) -> Self {
        self.base = base;
        self
    }

    /// Environments selected by `names`, all of them when `names` is empty.
    pub fn environments(&self, names: &[String]) -> BatchResult<Vec<EnvironmentDefinition>> {
        let all = self.manifest.environments();
        if names.is_empty() {
            return Ok(all);
        }

        let unknown: Vec<Error> = names
            .iter()
            .filter(|name| !all.iter().any(|env| &env.name == *name))
            .map(|name| Error::UnknownEnvironment { name: name.clone() })
            .collect();
        if !unknown.is_empty() {
            return Err(unknown);
        }

        Ok(all
            .into_iter()
            .filter(|env| names.contains(&env.name))
            .collect())
    }

    /// Load the projects selected by `filter`, plus every project they
    /// depend on in any selected environment.
    pub fn load(&self, filter: &ProjectFilter) -> BatchResult<Vec<Project>> {
        let environments = self.environments(&filter.environments)?;

        let unknown: Vec<Error> = filter
            .projects
            .iter()
            .filter(|name| !self.manifest.projects.iter().any(|p| &p.name == *name))
            .map(|name| Error::UnknownProject { name: name.clone() })
            .collect();
        if !unknown.is_empty() {
            return Err(unknown);
        }

        let results: Vec<BatchResult<Vec<Project>>> = self
            .manifest
            .projects
            .par_iter()
            .map(|definition| {
                let ctx = LoaderContext {
                    project_id: definition.name.clone(),
                    path: self.manifest.project_path(definition, &self.root),
                    environments: environments.clone(),
                    ..self.base.clone()
                };
                load_project(&ctx).map(|project| vec![project])
            })
            .collect();

        let projects = crate::parser::collect_batches(results)?;
        Ok(select_projects(projects, &filter.projects))
    }
}

/// Load one project and group its configurations per environment.
pub fn load_project(ctx: &LoaderContext) -> BatchResult<Project> {
    let configs = load_configs(ctx)?;

    let mut per_environment: BTreeMap<String, Vec<Configuration>> = ctx
        .environments
        .iter()
        .map(|env| (env.name.clone(), Vec::new()))
        .collect();
    for config in configs {
        per_environment
            .entry(config.environment.clone())
            .or_default()
            .push(config);
    }

    let errors = duplicate_coordinates(&per_environment);
    if !errors.is_empty() {
        return Err(errors);
    }

    let dependencies = per_environment
        .iter()
        .map(|(environment, configs)| {
            let mut rollup = rollup_project_dependencies(configs);
            let own = rollup.remove(&ctx.project_id).unwrap_or_default();
            (environment.clone(), own)
        })
        .collect();

    tracing::debug!(project = %ctx.project_id, "Loaded project");

    Ok(Project {
        id: ctx.project_id.clone(),
        configs: per_environment,
        dependencies,
    })
}

/// One error per coordinate defined more than once in an environment.
fn duplicate_coordinates(per_environment: &BTreeMap<String, Vec<Configuration>>) -> Vec<Error> {
    let mut errors = Vec::new();

    for (environment, configs) in per_environment {
        let mut seen = BTreeSet::new();
        let mut reported = BTreeSet::new();
        for config in configs {
            if !seen.insert(&config.coordinate) && reported.insert(&config.coordinate) {
                errors.push(Error::DuplicateCoordinate {
                    coordinate: config.coordinate.clone(),
                    environment: environment.clone(),
                });
            }
        }
    }

    errors
}

/// Keep `requested` and everything they transitively depend on.
fn select_projects(projects: Vec<Project>, requested: &[String]) -> Vec<Project> {
    if requested.is_empty() {
        return projects;
    }

    let by_id: BTreeMap<&str, &Project> = projects.iter().map(|p| (p.id.as_str(), p)).collect();
    let mut selected: BTreeSet<String> = BTreeSet::new();
    let mut pending: Vec<String> = requested.to_vec();

    while let Some(id) = pending.pop() {
        if !selected.insert(id.clone()) {
            continue;
        }
        if let Some(project) = by_id.get(id.as_str()) {
            for dependency in project.dependencies.values().flatten() {
                if !selected.contains(dependency) {
                    pending.push(dependency.clone());
                }
            }
        }
    }

    tracing::debug!(?selected, "Selected projects");

    projects
        .into_iter()
        .filter(|p| selected.contains(&p.id))
        .collect()
}
