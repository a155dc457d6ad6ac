//! The node graph: a rooted tree of typed nodes, each carrying a per-node
//! index mapping tags to descendant sets.
//!
//! This crate owns the arena ([`SceneGraph`]), node identity ([`NodeId`]),
//! and the mutating/read-side primitives: `spawn`/`attach`/`detach`/`destroy`
//! and the index accessors the query engine (`scene_query`) is built on top
//! of. It deliberately does not know about `Query` values — the generalized
//! `children`/`find`/`get`/... family that accepts either a bare tag or a
//! full query lives one layer up, so that the query engine can depend on
//! this crate without a cycle.

mod diag;
mod graph;
mod node_id;

pub use diag::node_tree_summary;
pub use graph::SceneGraph;
pub use node_id::NodeId;

pub use scene_common::tag::{NodeType, Root, TagId};
