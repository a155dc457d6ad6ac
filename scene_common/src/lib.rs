//! Shared identity, hashing, and error types for the scene-graph core.
//!
//! This crate has no notion of a node graph itself; it only fixes the
//! vocabulary (`TagId`, `NodeType`, `SceneError`) that `scene_graph`,
//! `scene_query`, and `scene_hooks` all build on.

pub mod error;
pub mod hash;
pub mod tag;

pub use error::SceneError;
pub use hash::{GxMap, GxSet};
pub use tag::{NodeType, Root, TagId};
