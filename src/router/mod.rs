//! # Router Module
//!
//! Registration, pattern aggregation and match resolution.
//!
//! ## Overview
//!
//! Routes are registered as regular expressions, each with a handler table
//! keyed by HTTP method. Instead of testing patterns one by one, the router
//! joins them into a single combined pattern, wrapping each in its own
//! capturing group:
//!
//! ```text
//! register("/blog/(\d+)/post/(\d+)")  ->  (/blog/(\d+)/post/(\d+))
//! register("/blog/(\d+)")             ->  (/blog/(\d+)/post/(\d+))|(/blog/(\d+))
//! register("other")                   ->  (/blog/(\d+)/post/(\d+))|(/blog/(\d+))|(other)
//! ```
//!
//! ## Architecture
//!
//! - [`flatten`] walks one parenthesized group and collects the capture
//!   numbers nested inside it, skipping non-capturing groups.
//! - [`index`] walks the combined pattern, flattening every top-level group,
//!   and maps each top-level capture number to its route slot and sub-groups.
//!   For the pattern above: `1 -> (0, [2, 3])`, `4 -> (1, [5])`, `6 -> (2, [])`.
//! - [`registry`] owns the routes, the combined pattern and the index, and
//!   compiles the combined pattern lazily.
//! - [`Router`] wraps the registry in a lock and exposes the public API.
//!
//! ## Priority
//!
//! The regex engine tries alternatives left to right and commits to the
//! first that matches at a position, so an earlier registration wins over a
//! later one that would also match.

mod core;
pub mod flatten;
pub mod index;
pub mod registry;

pub use core::{Router, RouterState};
pub use index::{build_index, GroupIndexEntry, PatternIndex};
pub use registry::{CompiledMatcher, Route, RouteRegistry};
