//! Query Strategies
//!
//! - Parallel: many queries against one shared, read-only document (Rayon)

pub mod parallel;

pub use parallel::{evaluate_each, evaluate_map, evaluate_parallel, select_parallel};
