//! The instantiation-hook registry: a small indirection that runs registered
//! callbacks when a freshly constructed node's type declares specific marker
//! values. This is what lets "event handler" decorations attach sub-nodes
//! automatically at construction, per the source engine's
//! `add_instantiation_call`/`on(event_type)` pair.
//!
//! Layered above `scene_graph` rather than inside it, so the arena crate
//! itself never has to know hooks exist: [`spawn`] is the hook-aware
//! counterpart of [`scene_graph::SceneGraph::spawn`].

mod event;
mod markers;
mod registry;

use std::any::Any;
use std::sync::Arc;

use scene_common::tag::NodeType;
use scene_graph::{NodeId, SceneGraph};

pub use event::Event;
pub use markers::Markers;
pub use registry::{add_instantiation_call, run_instantiation_hooks, HookFn, MarkerKey};

/// Constructs a node, then runs every instantiation hook registered for one
/// of `T`'s declared [`Markers`].
///
/// The hook-unaware low-level primitive is
/// [`scene_graph::SceneGraph::spawn`]; this wraps it, matching the source
/// engine's "every hook fires once per `__new__`, after index seeding"
/// contract (§4.E) without requiring `scene_graph` to depend on this crate.
pub fn spawn<T>(graph: &mut SceneGraph, payload: T) -> NodeId
where
    T: NodeType + Markers + Any,
{
    let node = graph.spawn(payload);
    run_instantiation_hooks(graph, node, T::markers());
    node
}

/// Registers that, whenever a node declares `handler` as one of its markers,
/// an `E`-tagged [`Event`] node wrapping `handler` is attached to it at
/// construction, and returns the [`MarkerKey`] the registration was filed
/// under.
///
/// The Rust rendering of the source engine's `on(event_type)` decorator:
/// `handler`'s own address is used as the marker key, since the source keys
/// hooks by the undecorated handler function's identity. Typically called
/// once per type from inside that type's [`Markers`] impl, memoized behind a
/// `OnceLock` so the registration itself only happens the first time
/// `markers()` runs.
pub fn on<E>(handler: fn(&mut SceneGraph, NodeId)) -> MarkerKey
where
    E: NodeType + 'static,
{
    let marker = MarkerKey::from_addr(handler as usize);
    add_instantiation_call(
        marker,
        Arc::new(move |graph: &mut SceneGraph, node: NodeId| {
            let event = graph.spawn(Event::<E, _>::new(handler));
            graph.attach(node, event);
        }),
    );
    marker
}

/// Declares that invoking `$handler` during construction of the annotated
/// type attaches a fresh `$event_ty`-tagged [`Event`] node wrapping it.
///
/// Sugar over [`on`], matching the source engine's `@on(EventType)`
/// decorator as closely as a function-based (non-decorator) macro can.
#[macro_export]
macro_rules! on {
    ($event_ty:ty, $handler:expr) => {
        $crate::on::<$event_ty>($handler)
    };
}
