//! Definition loading
//!
//! Reads every definition file of a project directory and expands each
//! definition once per target environment. Errors are collected at every
//! fan-out point (file, definition, environment, parameter) so one run
//! reports every problem; a batch that produced any error yields no
//! configurations at all.

use std::fmt;
use std::sync::Arc;

use cascade_fs::{FileTemplateLoader, NormalizedPath, TemplateLoader, io};
use cascade_meta::{
    ApiRegistry, Configuration, Coordinate, EnvironmentDefinition, NAME_PARAMETER,
    ParameterRegistry, Parameters,
};
use rayon::prelude::*;
use serde_yaml::Value;

use crate::definition::{ConfigDefinition, LEGACY_CONFIGS_KEY, TopLevelDefinition};
use crate::error::{DefinitionError, Error, ParameterParseError};
use crate::merge::{MergedBody, OverrideIndex};
use crate::resolver::ParameterResolver;

/// Result of a batch: every value, or every error.
pub type BatchResult<T> = std::result::Result<T, Vec<Error>>;

/// Everything a load invocation needs besides the files themselves.
///
/// Built once per project load and only read while loading.
#[derive(Clone)]
pub struct LoaderContext {
    pub project_id: String,
    /// Directory holding the definition files.
    pub path: NormalizedPath,
    pub environments: Vec<EnvironmentDefinition>,
    pub known_apis: ApiRegistry,
    pub parameters: ParameterRegistry,
    pub templates: Arc<dyn TemplateLoader>,
}

impl LoaderContext {
    /// Context with the built-in APIs and parameter kinds, loading
    /// templates from disk and expanding for no environment yet.
    pub fn new(project_id: impl Into<String>, path: impl Into<NormalizedPath>) -> Self {
        Self {
            project_id: project_id.into(),
            path: path.into(),
            environments: Vec::new(),
            known_apis: ApiRegistry::with_builtins(),
            parameters: ParameterRegistry::with_builtins(),
            templates: Arc::new(FileTemplateLoader::new()),
        }
    }

    pub fn with_environments(
        mut self,
        environments: impl IntoIterator<Item = EnvironmentDefinition>,
    ) -> Self {
        self.environments = environments.into_iter().collect();
        self
    }

    pub fn with_known_apis(mut self, known_apis: ApiRegistry) -> Self {
        self.known_apis = known_apis;
        self
    }

    pub fn with_parameters(mut self, parameters: ParameterRegistry) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_template_loader(mut self, templates: impl TemplateLoader + 'static) -> Self {
        self.templates = Arc::new(templates);
        self
    }
}

impl fmt::Debug for LoaderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderContext")
            .field("project_id", &self.project_id)
            .field("path", &self.path)
            .field("environments", &self.environments)
            .field("known_apis", &self.known_apis.len())
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Concatenate batch results, keeping values only if no batch failed.
pub(crate) fn collect_batches<T>(
    results: impl IntoIterator<Item = BatchResult<Vec<T>>>,
) -> BatchResult<Vec<T>> {
    let mut values = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(mut batch) => values.append(&mut batch),
            Err(mut batch) => errors.append(&mut batch),
        }
    }

    if errors.is_empty() {
        Ok(values)
    } else {
        Err(errors)
    }
}

/// Load every definition file directly inside `ctx.path`.
///
/// Files are parsed in parallel; the result keeps file order.
pub fn load_configs(ctx: &LoaderContext) -> BatchResult<Vec<Configuration>> {
    let files = io::list_yaml_files(&ctx.path).map_err(|e| vec![Error::from(e)])?;

    tracing::debug!(
        project = %ctx.project_id,
        path = %ctx.path,
        files = files.len(),
        "Loading definitions"
    );

    let results: Vec<_> = files.par_iter().map(|file| parse_file(ctx, file)).collect();
    collect_batches(results)
}

/// Load one definition file.
pub fn parse_file(ctx: &LoaderContext, path: &NormalizedPath) -> BatchResult<Vec<Configuration>> {
    let content = io::read_text(path).map_err(|e| vec![Error::from(e)])?;
    let definition = parse_definition_file(path, &content).map_err(|e| vec![e])?;
    let folder = path.parent().unwrap_or_else(|| NormalizedPath::new("."));

    let results: Vec<_> = definition
        .configs
        .iter()
        .map(|config| parse_definition(ctx, path, &folder, config))
        .collect();

    let configs = collect_batches(results)?;
    tracing::debug!(path = %path, configs = configs.len(), "Parsed definition file");
    Ok(configs)
}

/// Decode a definition file, telling legacy files apart from broken ones.
pub fn parse_definition_file(
    path: &NormalizedPath,
    content: &str,
) -> crate::Result<TopLevelDefinition> {
    let blank = content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'));
    if blank {
        return Err(Error::NoConfigurations { path: path.clone() });
    }

    let definition: TopLevelDefinition = serde_yaml::from_str(content).map_err(|e| {
        let message = e.to_string();
        // nested errors carry a `configs[..].` path prefix; only the top level
        // tells the legacy layout apart
        if message.starts_with(&format!("unknown field `{LEGACY_CONFIGS_KEY}`")) {
            Error::LegacyFormat {
                path: path.clone(),
                message,
            }
        } else {
            Error::Malformed {
                path: path.clone(),
                message,
            }
        }
    })?;

    if definition.configs.is_empty() {
        return Err(Error::NoConfigurations { path: path.clone() });
    }

    Ok(definition)
}

/// Expand one definition for every environment of the context.
fn parse_definition(
    ctx: &LoaderContext,
    path: &NormalizedPath,
    folder: &NormalizedPath,
    definition: &ConfigDefinition,
) -> BatchResult<Vec<Configuration>> {
    let api = definition.kind.api.as_str();

    if api.is_empty() {
        return Err(vec![Error::MissingApi {
            path: path.clone(),
            config_id: definition.id.clone(),
        }]);
    }

    if !ctx.known_apis.contains(api) {
        return Err(vec![Error::UnknownApi {
            api: api.to_string(),
            path: path.clone(),
        }]);
    }

    if let Some(replacement) = ctx.known_apis.deprecated_by(api) {
        tracing::warn!("API '{api}' is deprecated. Please migrate to '{replacement}'.");
    }

    let expansion = Expansion {
        ctx,
        path,
        folder,
        coordinate: Coordinate::new(&ctx.project_id, api, &definition.id),
        overrides: OverrideIndex::new(definition),
        definition,
    };

    let results: Vec<_> = ctx
        .environments
        .par_iter()
        .map(|environment| expansion.build(environment).map(|config| vec![config]))
        .collect();

    collect_batches(results)
}

/// Shared state for expanding one definition across environments.
struct Expansion<'a> {
    ctx: &'a LoaderContext,
    path: &'a NormalizedPath,
    folder: &'a NormalizedPath,
    coordinate: Coordinate,
    overrides: OverrideIndex<'a>,
    definition: &'a ConfigDefinition,
}

impl Expansion<'_> {
    fn error(&self, environment: &EnvironmentDefinition, reason: impl Into<String>) -> Error {
        DefinitionError::new(self.coordinate.clone(), self.path.clone(), reason)
            .in_environment(environment)
            .into()
    }

    fn parameter_error(
        &self,
        environment: &EnvironmentDefinition,
        name: &str,
        reason: &ParameterParseError,
    ) -> Error {
        DefinitionError::new(self.coordinate.clone(), self.path.clone(), reason.to_string())
            .in_environment(environment)
            .for_parameter(name)
            .into()
    }

    fn build(&self, environment: &EnvironmentDefinition) -> BatchResult<Configuration> {
        let merged = self.overrides.merge(&self.definition.config, environment);

        let Some(template_path) = merged.template.as_deref() else {
            return Err(vec![self.error(environment, "missing property `template`")]);
        };

        let mut errors = Vec::new();

        let template = match self.ctx.templates.load(&self.folder.join(template_path)) {
            Ok(template) => Some(template),
            Err(e) => {
                errors.push(self.error(
                    environment,
                    format!("error while loading template: `{e}`"),
                ));
                None
            }
        };

        for duplicate in &merged.duplicates {
            errors.push(self.error(environment, format!("duplicate parameter `{duplicate}`")));
        }

        let mut resolver = ParameterResolver::new(&self.ctx.parameters, &self.coordinate);
        let parameters = self.resolve_parameters(environment, &merged, &mut resolver, &mut errors);

        let skip = match &merged.skip {
            Some(value) => parse_skip(value).unwrap_or_else(|reason| {
                errors.push(self.error(environment, reason));
                false
            }),
            None => false,
        };

        match template {
            Some(template) if errors.is_empty() => Ok(Configuration {
                template,
                coordinate: self.coordinate.clone(),
                group: environment.group.clone(),
                environment: environment.name.clone(),
                parameters,
                references: resolver.into_references(),
                skip,
            }),
            _ => Err(errors),
        }
    }

    fn resolve_parameters(
        &self,
        environment: &EnvironmentDefinition,
        merged: &MergedBody,
        resolver: &mut ParameterResolver<'_>,
        errors: &mut Vec<Error>,
    ) -> Parameters {
        let mut parameters = Parameters::new();

        for (name, raw) in &merged.parameters {
            if merged.duplicates.contains(name) {
                continue;
            }
            if name == NAME_PARAMETER && merged.name.is_some() {
                tracing::debug!(
                    coordinate = %self.coordinate,
                    "`name` parameter shadowed by the `name` property"
                );
                continue;
            }
            match resolver.add(name, raw) {
                Ok(parameter) => {
                    parameters.insert(name.clone(), parameter);
                }
                Err(e) => errors.push(self.parameter_error(environment, name, &e)),
            }
        }

        match &merged.name {
            Some(raw) => match resolver.add(NAME_PARAMETER, raw) {
                Ok(parameter) => {
                    parameters.insert(NAME_PARAMETER.to_string(), parameter);
                }
                Err(e) => errors.push(self.parameter_error(environment, NAME_PARAMETER, &e)),
            },
            None => errors.push(self.error(environment, "missing parameter `name`")),
        }

        parameters
    }
}

/// Interpret a `skip` value.
///
/// Accepts booleans and the strings `true` and `false` in any case.
pub fn parse_skip(value: &Value) -> std::result::Result<bool, String> {
    match value {
        Value::Bool(skip) => Ok(*skip),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(format!(
                "invalid value for `skip`: `{s}`. only `true` and `false` are allowed"
            )),
        },
        _ => Err("invalid value for `skip`: only bool or string types are allowed".to_string()),
    }
}
