//! Error types for cascade-graph

use cascade_meta::Coordinate;

/// A node that cannot be ordered because it is part of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    #[error("{environment}:{location}: is part of circular dependency.\n depends on: {}", join(.depends_on))]
    CircularConfigDependency {
        environment: String,
        location: Coordinate,
        depends_on: Vec<Coordinate>,
    },

    #[error("{environment}:{project}: circular dependency detected.\n check project dependencies: {}", join(.depends_on))]
    CircularProjectDependency {
        environment: String,
        project: String,
        depends_on: Vec<String>,
    },
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
