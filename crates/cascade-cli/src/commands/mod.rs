//! Command implementations

mod plan;

pub use plan::run_plan;
