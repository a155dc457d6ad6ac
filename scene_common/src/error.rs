//! Error kinds shared across the scene-graph crates.
//!
//! Query evaluation itself never produces one of these: predicates that
//! panic are the caller's problem and unwind as-is. These are reserved for
//! the handful of operations the spec documents as fallible (`parent`,
//! `get`/`get_with`, query construction, and internal invariant checks).

use thiserror::Error;

/// Errors produced by the node-graph and query-construction surface.
#[derive(Debug, Error)]
pub enum SceneError {
    /// `parent(query)` walked to the root without finding a match.
    #[error("no ancestor satisfies the given query")]
    NoMatch,

    /// `get`/`get_with` found a number of matches other than exactly one.
    #[error("expected exactly one match, found {found}")]
    CardinalityError {
        /// The number of matches actually found.
        found: usize,
    },

    /// A sugar constructor received an input it cannot interpret.
    #[error("could not build a query from this input: {0}")]
    QueryConstruction(String),

    /// An index update detected an inconsistency. Fatal; carries the
    /// identity of the offending node for diagnostics.
    #[error("node graph invariant violated at {node}: {detail}")]
    InvariantViolation {
        /// `Display` of the node the inconsistency was detected at.
        node: String,
        /// What went wrong.
        detail: String,
    },
}

impl SceneError {
    /// Builds a [`SceneError::CardinalityError`].
    #[must_use]
    pub const fn cardinality(found: usize) -> Self {
        Self::CardinalityError { found }
    }

    /// Builds a [`SceneError::QueryConstruction`] from any displayable input.
    pub fn query_construction(msg: impl Into<String>) -> Self {
        Self::QueryConstruction(msg.into())
    }

    /// Builds a [`SceneError::InvariantViolation`].
    pub fn invariant(node: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            node: node.into(),
            detail: detail.into(),
        }
    }
}
