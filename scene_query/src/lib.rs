//! The query engine: an immutable, composable [`Query`] value plus the
//! generalized `children`/`find`/`get`/... traversal surface that accepts
//! either a bare tag or a full query.
//!
//! This crate sits one layer above `scene_graph`: the arena itself knows
//! nothing about `Query` values, only about tags and buckets, so `scene_query`
//! can be the one place that owns planning (`Query::optimal_key`) without
//! creating a dependency cycle.

mod ops;
mod query;
mod sugar;

pub use ops::{children, children_with, find, find_with, get, get_with, matches, parent, IntoQueryArgRef};
pub use query::{Predicate, Query};
pub use sugar::{IntoQueryArg, QueryArg};
