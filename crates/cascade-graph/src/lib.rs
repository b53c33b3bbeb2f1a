//! Dependency ordering for Cascade.
//!
//! Configurations reference each other through parameters; projects depend
//! on each other through those references. This crate turns either kind of
//! dependency into a deterministic deployment order, and reports every
//! member of every cycle when no order exists.
//!
//! # Example
//!
//! ```
//! use cascade_graph::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_node("dashboard");
//! graph.add_node("zone");
//! graph.add_edge("dashboard", "zone");
//!
//! let sorted = graph.sort();
//! assert_eq!(sorted.order, vec!["zone", "dashboard"]);
//! assert!(sorted.cycles.is_empty());
//! ```

pub mod error;
pub mod graph;
pub mod sort;

pub use error::SortError;
pub use graph::{CycleMember, DependencyGraph, Sorted};
pub use sort::{
    SortedConfigurations, SortedProjects, rollup_project_dependencies, sort_all_environments,
    sort_configurations, sort_projects,
};
