//! Coercion for the "bare tag or full query" argument accepted by the
//! generalized traversal functions in [`crate::ops`].
//!
//! The source engine dispatches on the runtime type of the argument passed
//! to `children`/`find`/... (a class, a string, a tuple, a predicate, or a
//! `Query` instance all mean something different). Rust has no reflection
//! and no sound way to give one generic constructor that many distinct
//! meanings, so the dispatch-heavy sugar constructors (`Tag[x]`, attribute
//! strings, `(attr, value)` pairs) are rendered instead as the explicitly
//! named builder methods on [`Query`] (`combine`, `filter`, `trim`,
//! `child_matches`, `parent_matches`). What remains genuinely polymorphic —
//! and genuinely needed, since `children`/`find`/`get` have a real fast path
//! for a bare tag that a full `Query` does not — is coerced through
//! [`IntoQueryArg`].

use scene_common::tag::{NodeType, TagId};

use crate::query::Query;

/// Either a bare tag (the direct-children-only fast path) or a full
/// [`Query`] (delegates to [`Query::find_on`]/[`Query::find_in`]).
pub enum QueryArg {
    /// A bare tag: no traversal beyond direct children is implied.
    Bare(TagId),
    /// A fully composed query.
    Full(Query),
}

/// Coerces a caller-supplied argument into a [`QueryArg`].
pub trait IntoQueryArg {
    /// Performs the coercion.
    fn into_query_arg(self) -> QueryArg;
}

impl<T: NodeType + 'static> IntoQueryArg for T {
    fn into_query_arg(self) -> QueryArg {
        QueryArg::Bare(T::tag())
    }
}

impl IntoQueryArg for Query {
    fn into_query_arg(self) -> QueryArg {
        QueryArg::Full(self)
    }
}

impl IntoQueryArg for TagId {
    fn into_query_arg(self) -> QueryArg {
        QueryArg::Bare(self)
    }
}
