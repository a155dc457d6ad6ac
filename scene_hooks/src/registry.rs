//! The process-wide instantiation-hook registry.
//!
//! A hook is keyed by a [`MarkerKey`]; every node construction that declares
//! that marker (via its [`crate::Markers`] impl) runs every callback
//! registered under it, in registration order.

use std::sync::{Arc, Mutex};

use lazy_static::lazy_static;
use scene_common::hash::GxMap;
use scene_graph::{NodeId, SceneGraph};
use tracing::trace;

/// A callback run when a newly constructed node declares the marker it was
/// registered under.
pub type HookFn = Arc<dyn Fn(&mut SceneGraph, NodeId) + Send + Sync>;

/// An opaque, hashable identity usable as an instantiation-hook marker.
///
/// The source engine keys its hook registry by an arbitrary attribute
/// *value* found on the constructed type — in practice, almost always the
/// undecorated handler function itself (`hooks[f] = [g]`; function objects
/// are hashable by identity there). The function pointer's address is the
/// direct Rust analogue: stable for the lifetime of the binary, cheap to
/// compare, and requires no runtime reflection to obtain.
///
/// The source's registry additionally swallows unhashable attribute values
/// silently when scanning a type's namespace (§9's "surprising eat-the-error
/// path"). There is no equivalent failure mode here: every [`MarkerKey`] is
/// constructed from a plain `usize` and is always hashable, so the
/// corresponding constraint becomes "you cannot build a `MarkerKey` from
/// something that isn't a function pointer" — a compile-time fact rather
/// than a runtime-silent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerKey(usize);

impl MarkerKey {
    /// Builds a marker key from a raw address (typically a coerced function
    /// pointer's `as usize`).
    #[must_use]
    pub const fn from_addr(addr: usize) -> Self {
        Self(addr)
    }
}

lazy_static! {
    static ref HOOKS: Mutex<GxMap<MarkerKey, Vec<HookFn>>> = Mutex::new(GxMap::default());
}

/// Registers `f` to run whenever a newly constructed node declares `marker`
/// among its [`crate::Markers::markers`].
///
/// Process-wide mutable state; per the spec's resource model (§5), writes
/// should happen at initialization time (typically memoized behind a
/// `OnceLock` inside the declaring type's `Markers` impl), not per-instance.
pub fn add_instantiation_call(marker: MarkerKey, f: HookFn) {
    HOOKS.lock().unwrap().entry(marker).or_default().push(f);
}

/// Runs every hook registered for any of `markers`, in the order the markers
/// are listed and, within a marker, in registration order.
///
/// Called by [`crate::spawn`] after the node itself has been constructed and
/// seeded into the arena, mirroring the source engine's "hooks fire after
/// index seeding, before `__new__` returns".
pub fn run_instantiation_hooks(graph: &mut SceneGraph, node: NodeId, markers: &[MarkerKey]) {
    if markers.is_empty() {
        return;
    }
    let callbacks: Vec<HookFn> = {
        let hooks = HOOKS.lock().unwrap();
        markers
            .iter()
            .filter_map(|marker| hooks.get(marker))
            .flatten()
            .cloned()
            .collect()
    };
    for callback in callbacks {
        trace!(node = %node, "running instantiation hook");
        callback(graph, node);
    }
}
