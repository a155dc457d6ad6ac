//! The node arena: attach/detach/destroy and the read-side index accessors
//! the query engine builds on.

use std::any::Any;

use contracts::requires;
use scene_common::hash::{GxMap, GxSet};
use scene_common::tag::{NodeType, Root, TagId};
use tracing::{debug, trace};

use crate::node_id::NodeId;

struct NodeData {
    /// Own tag followed by every declared ancestor tag, root last.
    tags: &'static [TagId],
    parent: Option<NodeId>,
    /// Direct children, bucketed by every tag they carry.
    children_by_tag: GxMap<TagId, GxSet<NodeId>>,
    /// Per-tag descendant index; see the invariants in the crate docs.
    index: GxMap<TagId, GxSet<NodeId>>,
    payload: Box<dyn Any>,
}

struct Slot {
    generation: u32,
    data: Option<NodeData>,
}

/// A rooted forest of nodes, each carrying a per-node tag index.
///
/// `SceneGraph` owns every node's storage in a single arena; nodes refer to
/// each other by [`NodeId`] rather than by smart pointer, so mutation
/// (`&mut SceneGraph`) and querying (`&SceneGraph`) are naturally exclusive
/// at the borrow-checker level, which is the concurrency contract the spec
/// asks callers to maintain by convention (single-threaded, no locking,
/// mutations must not interleave with in-flight queries).
#[derive(Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl SceneGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, detached node seeded with its own tag path.
    ///
    /// This is the low-level construction primitive; it does not run
    /// instantiation hooks (`scene_hooks::spawn` wraps this to add that).
    pub fn spawn<T: NodeType + Any>(&mut self, payload: T) -> NodeId {
        let slot_index = self.free.pop().unwrap_or_else(|| {
            self.slots.push(Slot {
                generation: 0,
                data: None,
            });
            (self.slots.len() - 1) as u32
        });
        let generation = self.slots[slot_index as usize].generation;
        let id = NodeId::new(slot_index, generation);

        let tags = T::tag_path();
        let mut index: GxMap<TagId, GxSet<NodeId>> = GxMap::default();
        for &tag in tags {
            index.entry(tag).or_default().insert(id);
        }

        self.slots[slot_index as usize].data = Some(NodeData {
            tags,
            parent: None,
            children_by_tag: GxMap::default(),
            index,
            payload: Box::new(payload),
        });

        trace!(node = %id, num_tags = tags.len(), "spawned node");
        id
    }

    /// Attaches `child` under `parent`, detaching it from any current parent
    /// first.
    ///
    /// Caller contract: `child != parent` and `child` is not an ancestor of
    /// `parent` — the arena does not walk the tree to validate global
    /// acyclicity, matching the source engine.
    #[requires(child != parent)]
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> NodeId {
        if self.parent_of(child).is_some() {
            self.detach(child);
        }

        for tag in self.tags_of(child) {
            self.children_by_tag_mut(parent, tag).insert(child);
        }

        self.data_mut(child).parent = Some(parent);

        let propagate: Vec<TagId> = self
            .data(child)
            .index
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(tag, _)| *tag)
            .collect();
        for tag in propagate {
            self.add_index_key(parent, tag, child);
        }

        debug!(parent = %parent, child = %child, "attached node");
        child
    }

    /// Detaches `child` from its current parent. A no-op if `child` is
    /// already detached (idempotent, like `destroy`).
    pub fn detach(&mut self, child: NodeId) -> NodeId {
        let Some(parent) = self.parent_of(child) else {
            return child;
        };

        let propagate: Vec<TagId> = self
            .data(child)
            .index
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(tag, _)| *tag)
            .collect();
        for tag in propagate {
            self.remove_index_key(parent, tag, child);
        }

        for tag in self.tags_of(child) {
            self.children_by_tag_mut(parent, tag).remove(&child);
        }

        self.data_mut(child).parent = None;
        debug!(parent = %parent, child = %child, "detached node");
        child
    }

    /// Recursively destroys `node` and every descendant, post-order, then
    /// detaches `node` from its own parent (if any) and frees its slot.
    pub fn destroy(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self.children_by_tag_iter(node, Root::tag()).collect();
        for child in children {
            self.destroy(child);
        }
        self.detach(node);
        self.free_slot(node);
    }

    /// The direct parent, if any.
    #[must_use]
    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).parent
    }

    /// Own tag followed by declared ancestor tags, root last.
    #[must_use]
    pub fn tags_of(&self, node: NodeId) -> &'static [TagId] {
        self.data(node).tags
    }

    /// Whether `node` itself carries `tag` (as opposed to merely having a
    /// descendant that does).
    #[must_use]
    pub fn has_tag(&self, node: NodeId, tag: TagId) -> bool {
        self.tags_of(node).contains(&tag)
    }

    /// Number of entries in `node.index[tag]`.
    #[must_use]
    pub fn index_len(&self, node: NodeId, tag: TagId) -> usize {
        self.data(node).index.get(&tag).map_or(0, |set| set.len())
    }

    /// Whether `candidate` is present in `node.index[tag]`.
    #[must_use]
    pub fn index_contains(&self, node: NodeId, tag: TagId, candidate: NodeId) -> bool {
        self.data(node)
            .index
            .get(&tag)
            .is_some_and(|set| set.contains(&candidate))
    }

    /// Iterates `node.index[tag]` (direct-child representatives, plus
    /// `node` itself if `node` carries `tag`).
    pub fn index_iter(&self, node: NodeId, tag: TagId) -> impl Iterator<Item = NodeId> + '_ {
        self.data(node)
            .index
            .get(&tag)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Iterates `node.children_by_tag[tag]`.
    pub fn children_by_tag_iter(
        &self,
        node: NodeId,
        tag: TagId,
    ) -> impl Iterator<Item = NodeId> + '_ {
        self.data(node)
            .children_by_tag
            .get(&tag)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Whether `child` is a direct child of `node` carrying `tag`.
    #[must_use]
    pub fn is_direct_child_with_tag(&self, node: NodeId, tag: TagId, child: NodeId) -> bool {
        self.data(node)
            .children_by_tag
            .get(&tag)
            .is_some_and(|set| set.contains(&child))
    }

    /// Downcasts the node's opaque payload.
    #[must_use]
    pub fn get<T: 'static>(&self, node: NodeId) -> Option<&T> {
        self.data(node).payload.downcast_ref()
    }

    /// Downcasts the node's opaque payload, mutably.
    pub fn get_mut<T: 'static>(&mut self, node: NodeId) -> Option<&mut T> {
        self.data_mut(node).payload.downcast_mut()
    }

    /// Number of live nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether the arena has no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn children_by_tag_mut(&mut self, node: NodeId, tag: TagId) -> &mut GxSet<NodeId> {
        self.data_mut(node).children_by_tag.entry(tag).or_default()
    }

    fn index_bucket_mut(&mut self, node: NodeId, tag: TagId) -> &mut GxSet<NodeId> {
        self.data_mut(node).index.entry(tag).or_default()
    }

    /// Adds `repr` to `at.index[tag]`; if the bucket was empty and `at` has
    /// a parent, propagates `at` itself upward as the representative.
    ///
    /// See `scene_graph::tests::node_index` for the worked trace this
    /// mirrors line-for-line from the source engine's `_add_index_key`.
    fn add_index_key(&mut self, mut at: NodeId, tag: TagId, mut repr: NodeId) {
        loop {
            let was_empty = self.index_len(at, tag) == 0;
            self.index_bucket_mut(at, tag).insert(repr);
            if !was_empty {
                break;
            }
            match self.parent_of(at) {
                Some(parent) => {
                    repr = at;
                    at = parent;
                }
                None => break,
            }
        }
    }

    /// Removes `repr` from `at.index[tag]`; if the bucket becomes empty and
    /// `at` has a parent, propagates the removal of `at` from the parent's
    /// bucket.
    fn remove_index_key(&mut self, mut at: NodeId, tag: TagId, mut repr: NodeId) {
        loop {
            self.index_bucket_mut(at, tag).remove(&repr);
            if self.index_len(at, tag) != 0 {
                break;
            }
            match self.parent_of(at) {
                Some(parent) => {
                    repr = at;
                    at = parent;
                }
                None => break,
            }
        }
    }

    fn free_slot(&mut self, node: NodeId) {
        let slot = &mut self.slots[node.slot()];
        slot.data = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(node.slot() as u32);
    }

    fn data(&self, node: NodeId) -> &NodeData {
        let slot = &self.slots[node.slot()];
        assert_eq!(
            slot.generation,
            node.generation(),
            "stale or destroyed NodeId {node}"
        );
        slot.data
            .as_ref()
            .unwrap_or_else(|| panic!("stale or destroyed NodeId {node}"))
    }

    fn data_mut(&mut self, node: NodeId) -> &mut NodeData {
        let slot = &mut self.slots[node.slot()];
        assert_eq!(
            slot.generation,
            node.generation(),
            "stale or destroyed NodeId {node}"
        );
        slot.data
            .as_mut()
            .unwrap_or_else(|| panic!("stale or destroyed NodeId {node}"))
    }
}
