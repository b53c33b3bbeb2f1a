//! Definition loading and resolution for Cascade
//!
//! This crate turns directories of definition files into resolved,
//! per-environment [`Configuration`](cascade_meta::Configuration)s:
//!
//! - **Definition schema**: strict YAML model of definition files
//! - **Override merging**: base body, then group override, then environment override
//! - **Parameter resolution**: raw values to typed parameters, with reference extraction
//! - **Loading**: parallel per-file parsing with per-environment expansion
//! - **Projects**: manifest-driven loading of several projects
//! - **Dry run**: value resolution in deployment order
//!
//! # Architecture
//!
//! ```text
//!                cascade-cli
//!                     |
//!               cascade-core
//!                     |
//!      +--------------+--------------+
//!      |              |              |
//! cascade-fs    cascade-meta    cascade-graph
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cascade_core::{LoaderContext, load_configs};
//! use cascade_meta::EnvironmentDefinition;
//!
//! let ctx = LoaderContext::new("infrastructure", "projects/infrastructure")
//!     .with_environments([EnvironmentDefinition::new("dev", "development")]);
//!
//! match load_configs(&ctx) {
//!     Ok(configs) => println!("loaded {} configurations", configs.len()),
//!     Err(errors) => errors.iter().for_each(|e| eprintln!("{e}")),
//! }
//! ```

pub mod definition;
pub mod error;
pub mod merge;
pub mod parser;
pub mod project;
pub mod resolve;
pub mod resolver;

pub use definition::{ConfigBody, ConfigDefinition, ParameterBlock, RawParameter, TopLevelDefinition};
pub use error::{DefinitionError, EnvironmentDetails, Error, ParameterParseError, Result};
pub use merge::{MergedBody, OverrideIndex};
pub use parser::{BatchResult, LoaderContext, load_configs, parse_file, parse_skip};
pub use project::{Manifest, Project, ProjectFilter, ProjectLoader, load_project};
pub use resolve::{DryRun, ResolvedConfiguration};
pub use resolver::ParameterResolver;
