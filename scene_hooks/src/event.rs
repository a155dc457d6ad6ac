//! Closure-carrying event nodes.
//!
//! The Rust rendering of the source engine's `Event` base class (`event.py`):
//! a node whose call protocol forwards to a wrapped function. Subclasses in
//! the source (`class SuperUpdate(Event): pass`) exist only to give
//! different event kinds distinct tags so they can be found separately;
//! here that's the `E` type parameter, supplying [`Event`]'s tag identity.

use std::marker::PhantomData;

use scene_common::tag::{NodeType, TagId};
use scene_graph::{NodeId, SceneGraph};

/// A node wrapping a callable, tagged as `E`.
///
/// `E` is typically a zero-sized marker declared with
/// [`scene_common::declare_tag!`] (mirroring the source's `Event` subclass
/// convention); `F` is the concrete closure/fn-pointer type. Invoking
/// [`Event::fire`] forwards the call.
pub struct Event<E, F> {
    _kind: PhantomData<fn() -> E>,
    func: F,
}

impl<E, F> Event<E, F>
where
    E: NodeType,
    F: Fn(&mut SceneGraph, NodeId) + Send + Sync + 'static,
{
    /// Wraps `func` as an `E`-tagged event node.
    #[must_use]
    pub fn new(func: F) -> Self {
        Self {
            _kind: PhantomData,
            func,
        }
    }

    /// Forwards the call to the wrapped function.
    pub fn fire(&self, graph: &mut SceneGraph, node: NodeId) {
        (self.func)(graph, node);
    }
}

impl<E: NodeType, F> NodeType for Event<E, F> {
    fn tag() -> TagId
    where
        Self: Sized,
    {
        E::tag()
    }

    fn tag_path() -> &'static [TagId]
    where
        Self: Sized,
    {
        E::tag_path()
    }
}
