//! Error types for cascade-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from cascade-core
    #[error(transparent)]
    Core(#[from] cascade_core::Error),

    /// Cycle reported by cascade-graph
    #[error(transparent)]
    Sort(#[from] cascade_graph::SortError),

    /// Errors were already printed; only their count is carried
    #[error("{count} error(s) while {stage}")]
    Failed { stage: &'static str, count: usize },
}
