//! Path Expression Engine
//!
//! A compact XPath subset:
//! - Parent, self and child steps, with `[n]`, `[@attr]` and `[@attr=value]`
//! - `//name` over direct children
//! - `text()`, `//text()` and `@attr` terminal steps
//! - Compiled expression caching

pub mod cache;
pub mod compiler;
pub mod eval;
pub mod value;

pub use cache::PathCache;
pub use compiler::{compile, Action, CompiledPath};
pub use eval::{evaluate, execute, try_evaluate, EvalContext};
pub use value::PathResult;
