//! End-to-end scenarios from the spec's testable-properties section (§8
//! scenario 6): registering a hook against a marker fires it once per
//! construction of a node declaring that marker, and `on::<E>` wires up an
//! automatic `Event` attachment.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use rstest::rstest;
use scene_common::declare_tag;
use scene_common::tag::{NodeType, Root};
use scene_graph::{NodeId, SceneGraph};
use scene_hooks::{add_instantiation_call, on, Event, MarkerKey, Markers};

#[rstest]
fn tracing_is_initialized_once_for_this_binary() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

declare_tag!(pub struct World: Root;);
declare_tag!(pub struct SuperUpdate: Root;);

static HANDLER_CALLS: AtomicUsize = AtomicUsize::new(0);

fn handle_super_update(_graph: &mut SceneGraph, _node: NodeId) {
    HANDLER_CALLS.fetch_add(1, Ordering::SeqCst);
}

impl Markers for World {
    fn markers() -> &'static [MarkerKey] {
        static MARKERS: OnceLock<[MarkerKey; 1]> = OnceLock::new();
        MARKERS.get_or_init(|| [on::<SuperUpdate>(handle_super_update)])
    }
}

static PLAIN_HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

fn plain_hook(_graph: &mut SceneGraph, _node: NodeId) {
    PLAIN_HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
}

declare_tag!(pub struct HasMarker: Root;);
impl Markers for HasMarker {
    fn markers() -> &'static [MarkerKey] {
        static MARKERS: OnceLock<[MarkerKey; 1]> = OnceLock::new();
        MARKERS.get_or_init(|| {
            let marker = MarkerKey::from_addr(plain_hook as usize);
            add_instantiation_call(marker, Arc::new(|g: &mut SceneGraph, n: NodeId| plain_hook(g, n)));
            [marker]
        })
    }
}

#[test]
fn instantiation_hook_fires_on_construction() {
    let mut graph = SceneGraph::new();
    let before = PLAIN_HOOK_CALLS.load(Ordering::SeqCst);

    let _node = scene_hooks::spawn(&mut graph, HasMarker);

    assert_eq!(PLAIN_HOOK_CALLS.load(Ordering::SeqCst), before + 1);
}

#[test]
fn on_attaches_an_event_subnode_at_construction() {
    let mut graph = SceneGraph::new();
    let before = HANDLER_CALLS.load(Ordering::SeqCst);

    let world = scene_hooks::spawn(&mut graph, World);

    // No hook runs until the handler is actually invoked; `on` only wires up
    // the attachment, it does not fire the handler itself.
    assert_eq!(HANDLER_CALLS.load(Ordering::SeqCst), before);

    let events: Vec<NodeId> = graph
        .children_by_tag_iter(world, SuperUpdate::tag())
        .collect();
    assert_eq!(events.len(), 1);

    let event = graph
        .get::<Event<SuperUpdate, fn(&mut SceneGraph, NodeId)>>(events[0])
        .expect("attached node should be the Event wrapper");
    event.fire(&mut graph, world);
    assert_eq!(HANDLER_CALLS.load(Ordering::SeqCst), before + 1);
}
