//! Error types for cascade-core

use std::fmt;

use cascade_fs::NormalizedPath;
use cascade_meta::{Coordinate, EnvironmentDefinition, ParameterError};

/// Result type for cascade-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Group and name of the environment an error occurred in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDetails {
    pub group: String,
    pub name: String,
}

impl From<&EnvironmentDefinition> for EnvironmentDetails {
    fn from(environment: &EnvironmentDefinition) -> Self {
        Self {
            group: environment.group.clone(),
            name: environment.name.clone(),
        }
    }
}

/// A definition that could not be turned into a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionError {
    pub location: Coordinate,
    pub path: NormalizedPath,
    /// Set when the failure is specific to one environment expansion.
    pub environment: Option<EnvironmentDetails>,
    /// Set when the failure is specific to one parameter.
    pub parameter: Option<String>,
    pub reason: String,
}

impl DefinitionError {
    pub fn new(location: Coordinate, path: NormalizedPath, reason: impl Into<String>) -> Self {
        Self {
            location,
            path,
            environment: None,
            parameter: None,
            reason: reason.into(),
        }
    }

    pub fn in_environment(mut self, environment: &EnvironmentDefinition) -> Self {
        self.environment = Some(environment.into());
        self
    }

    pub fn for_parameter(mut self, name: impl Into<String>) -> Self {
        self.parameter = Some(name.into());
        self
    }
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.location)?;
        if let Some(environment) = &self.environment {
            write!(f, " [{}/{}]", environment.group, environment.name)?;
        }
        match &self.parameter {
            Some(parameter) => write!(
                f,
                ": {parameter}: cannot parse parameter definition in `{}`: {}",
                self.path, self.reason
            ),
            None => write!(
                f,
                ": cannot parse definition in `{}`: {}",
                self.path, self.reason
            ),
        }
    }
}

impl std::error::Error for DefinitionError {}

/// Why a single raw parameter could not be turned into a typed parameter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParameterParseError {
    #[error("parameter name `id` is not allowed (reserved)")]
    ReservedName,

    #[error("short references must have between 1 and 4 elements. you provided `{0}`")]
    ShortReferenceLength(usize),

    #[error("short reference elements must be non-null scalar values")]
    ShortReferenceElement,

    #[error("references its own configuration `{0}`")]
    SelfReference(Coordinate),

    #[error(transparent)]
    Decode(#[from] ParameterError),
}

/// Errors that can occur while loading and resolving definitions
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem error from cascade-fs
    #[error(transparent)]
    Fs(#[from] cascade_fs::Error),

    /// A file written in the superseded definition format
    #[error(
        "config '{path}' is not a valid configuration definition - it looks like the legacy format, please convert it first:\n{message}"
    )]
    LegacyFormat {
        path: NormalizedPath,
        message: String,
    },

    #[error("failed to load config '{path}':\n{message}")]
    Malformed {
        path: NormalizedPath,
        message: String,
    },

    #[error("no configurations found in file '{path}'")]
    NoConfigurations { path: NormalizedPath },

    #[error("missing config-property type.api for `{config_id}` in {path}")]
    MissingApi {
        path: NormalizedPath,
        config_id: String,
    },

    #[error("unknown API: '{api}' in {path}")]
    UnknownApi { api: String, path: NormalizedPath },

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error("{environment}:{coordinate}: duplicate configuration coordinate")]
    DuplicateCoordinate {
        coordinate: Coordinate,
        environment: String,
    },

    #[error("environment `{name}` is not defined in the manifest")]
    UnknownEnvironment { name: String },

    #[error("project `{name}` is not defined in the manifest")]
    UnknownProject { name: String },

    #[error("manifest '{path}' defines no {what}")]
    EmptyManifest {
        path: NormalizedPath,
        what: &'static str,
    },

    /// A parameter that could not be resolved to a value
    #[error("{environment}:{coordinate}: cannot resolve parameter `{parameter}`: {source}")]
    Resolution {
        coordinate: Coordinate,
        environment: String,
        parameter: String,
        #[source]
        source: ParameterError,
    },
}
