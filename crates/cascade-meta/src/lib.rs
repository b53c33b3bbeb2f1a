//! Identity and value model for Cascade.
//!
//! This crate provides the types every other layer operates on:
//! [`Coordinate`] identities, the polymorphic [`Parameter`] family with its
//! pluggable [`ParameterRegistry`], the [`ApiRegistry`] of known
//! configuration types and the resolved [`Configuration`] unit.

pub mod api;
pub mod configuration;
pub mod coordinate;
pub mod environment;
pub mod error;
pub mod parameter;
pub mod registry;

pub use api::{ApiEntry, ApiRegistry};
pub use configuration::{Configuration, ID_PARAMETER, NAME_PARAMETER, Parameters};
pub use coordinate::Coordinate;
pub use environment::EnvironmentDefinition;
pub use error::{ParameterError, Result};
pub use parameter::{
    Parameter, ParameterReference, ResolveContext, ResolvedEntities, ResolvedEntity,
};
pub use registry::{DecodeContext, ParameterDecoder, ParameterRegistry};
