//! The `Query` value type: an immutable, composable description of "which
//! descendants of a node qualify", plus the planner that picks which tag
//! bucket to iterate when evaluating one.

use std::sync::Arc;

use scene_common::tag::{NodeType, TagId};
use scene_graph::{NodeId, SceneGraph};
use tracing::trace;

/// A boolean predicate over a node, evaluated against the graph it lives in.
pub type Predicate = Arc<dyn Fn(&SceneGraph, NodeId) -> bool>;

/// An immutable, composable query against a node's descendants.
///
/// Cloning a `Query` is cheap: every field is an `Arc`, so `combine` never
/// deep-clones a closure, only the handle to it.
#[derive(Clone)]
pub struct Query {
    key: TagId,
    condition: Predicate,
    trim: Predicate,
    child_query: Option<Arc<Query>>,
    parent_query: Option<Arc<Query>>,
}

fn always(_: &SceneGraph, _: NodeId) -> bool {
    true
}

fn never(_: &SceneGraph, _: NodeId) -> bool {
    false
}

fn and(a: Predicate, b: Predicate) -> Predicate {
    Arc::new(move |g, n| a(g, n) && b(g, n))
}

fn or(a: Predicate, b: Predicate) -> Predicate {
    Arc::new(move |g, n| a(g, n) || b(g, n))
}

fn combine_sub(a: Option<Arc<Query>>, b: Option<Arc<Query>>) -> Option<Arc<Query>> {
    match (a, b) {
        (None, None) => None,
        (Some(q), None) | (None, Some(q)) => Some(q),
        (Some(a), Some(b)) => Some(Arc::new((*a).clone().combine((*b).clone()))),
    }
}

impl Query {
    /// The identity query: matches every node, narrows nothing.
    ///
    /// `Root::tag()` is the broadest possible key — every node carries it —
    /// so it never accidentally excludes a candidate the way a narrower
    /// default would.
    #[must_use]
    pub fn any() -> Self {
        Self {
            key: scene_common::tag::Root::tag(),
            condition: Arc::new(always),
            trim: Arc::new(never),
            child_query: None,
            parent_query: None,
        }
    }

    /// A query matching every node carrying `T`'s tag, nothing else.
    #[must_use]
    pub fn tag<T: NodeType>() -> Self {
        Self::from_key(T::tag())
    }

    /// A query matching every node carrying `key`, nothing else.
    #[must_use]
    pub(crate) fn from_key(key: TagId) -> Self {
        Self {
            key,
            ..Self::any()
        }
    }

    /// The dominant tag a candidate must carry.
    #[must_use]
    pub const fn key(&self) -> TagId {
        self.key
    }

    /// Narrows by an additional predicate (logical AND with any existing
    /// condition).
    #[must_use]
    pub fn filter(mut self, f: impl Fn(&SceneGraph, NodeId) -> bool + 'static) -> Self {
        self.condition = and(self.condition, Arc::new(f));
        self
    }

    /// Adds a subtree cutoff predicate (logical OR with any existing trim).
    #[must_use]
    pub fn trim(mut self, f: impl Fn(&SceneGraph, NodeId) -> bool + 'static) -> Self {
        self.trim = or(self.trim, Arc::new(f));
        self
    }

    /// Same as [`Query::trim`], but for an already-built [`Predicate`]
    /// handle rather than a fresh closure. Used by `scene_query::ops::find`
    /// to attach a caller-supplied trim to a bare-tag query.
    #[must_use]
    pub(crate) fn with_trim_predicate(mut self, other: Predicate) -> Self {
        self.trim = or(self.trim, other);
        self
    }

    /// Requires that some direct child of the candidate satisfy `query`.
    #[must_use]
    pub fn child_matches(mut self, query: Query) -> Self {
        self.child_query = combine_sub(self.child_query, Some(Arc::new(query)));
        self
    }

    /// Requires that the candidate's direct parent satisfy `query`.
    #[must_use]
    pub fn parent_matches(mut self, query: Query) -> Self {
        self.parent_query = combine_sub(self.parent_query, Some(Arc::new(query)));
        self
    }

    /// Merges `self` and `other` into a single query matching the
    /// intersection of what both would match.
    ///
    /// `key` becomes whichever of the two is the more specific tag (the
    /// subtype of the other); a node carrying the subtype automatically
    /// carries the supertype too, so no extra check is needed in that case.
    /// When the two keys are unrelated, `self.key` is always kept and
    /// `other.key` is pushed into `condition` as an explicit tag check —
    /// deterministic, unlike picking whichever operand happened to be on
    /// the left.
    #[must_use]
    pub fn combine(self, other: Query) -> Self {
        let condition = and(self.condition.clone(), other.condition.clone());
        let trim = or(self.trim.clone(), other.trim.clone());
        let child_query = combine_sub(self.child_query.clone(), other.child_query.clone());
        let parent_query = combine_sub(self.parent_query.clone(), other.parent_query.clone());

        let (key, extra_check) = if self.key == other.key {
            (self.key, None)
        } else if other.key.is_subtype_of(self.key) {
            (other.key, None)
        } else if self.key.is_subtype_of(other.key) {
            (self.key, None)
        } else {
            (self.key, Some(other.key))
        };

        let condition = match extra_check {
            Some(tag) => and(condition, Arc::new(move |g: &SceneGraph, n: NodeId| g.has_tag(n, tag))),
            None => condition,
        };

        Self {
            key,
            condition,
            trim,
            child_query,
            parent_query,
        }
    }

    /// `self.key` followed by every key reachable by walking `child_query`
    /// chains, outer-first.
    fn keys(&self) -> Vec<TagId> {
        let mut out = vec![self.key];
        if let Some(cq) = &self.child_query {
            out.extend(cq.keys());
        }
        out
    }

    /// The cheapest tag bucket of `node` to iterate when evaluating this
    /// query: the candidate tag (among `self.key` and every key reachable
    /// through `child_query`) with the smallest index bucket at `node`.
    /// Ties favour the outer `key`.
    #[must_use]
    pub fn optimal_key(&self, graph: &SceneGraph, node: NodeId) -> TagId {
        // `keys()` starts with `self.key`, and `min_by_key` returns the
        // first element on a tie, so the outer key wins ties automatically.
        let (optimal, count) = self
            .keys()
            .into_iter()
            .map(|key| (key, graph.index_len(node, key)))
            .min_by_key(|&(_, count)| count)
            .expect("keys() always yields at least self.key");
        trace!(node = %node, key = ?optimal, bucket_size = count, "planner chose iteration key");
        optimal
    }

    /// Tests whether `node` itself satisfies this query.
    #[must_use]
    pub fn test(&self, graph: &SceneGraph, node: NodeId) -> bool {
        if !graph.has_tag(node, self.key) {
            return false;
        }
        if !(self.condition)(graph, node) {
            return false;
        }
        if (self.trim)(graph, node) {
            return false;
        }
        if let Some(cq) = &self.child_query {
            let satisfied = graph
                .index_iter(node, cq.key)
                .filter(|&child| child != node)
                .any(|child| cq.test(graph, child));
            if !satisfied {
                return false;
            }
        }
        if let Some(pq) = &self.parent_query {
            match graph.parent_of(node) {
                Some(parent) if pq.test(graph, parent) => {}
                _ => return false,
            }
        }
        true
    }

    /// Direct children of `node` satisfying this query. Does not recurse.
    pub fn find_on<'a>(&'a self, graph: &'a SceneGraph, node: NodeId) -> impl Iterator<Item = NodeId> + 'a {
        let key = self.optimal_key(graph, node);
        graph
            .index_iter(node, key)
            .filter(move |&child| child != node && self.test(graph, child))
    }

    /// Every descendant of `node` satisfying this query, depth-first.
    ///
    /// A child for which `trim` holds is skipped entirely: neither emitted
    /// nor recursed into. Every other child is recursed into regardless of
    /// whether it itself satisfied the query.
    pub fn find_in<'a>(&'a self, graph: &'a SceneGraph, node: NodeId) -> Box<dyn Iterator<Item = NodeId> + 'a> {
        let key = self.optimal_key(graph, node);
        let candidates: Vec<NodeId> = graph
            .index_iter(node, key)
            .filter(|&child| child != node)
            .collect();

        Box::new(candidates.into_iter().flat_map(move |child| {
            if (self.trim)(graph, child) {
                return Box::new(std::iter::empty()) as Box<dyn Iterator<Item = NodeId>>;
            }
            let emitted = if self.test(graph, child) { Some(child) } else { None };
            Box::new(emitted.into_iter().chain(self.find_in(graph, child)))
        }))
    }
}

/// `a >> b` reads "`b` somewhere under an `a`": sugar for
/// `b.parent_matches(a)`.
///
/// One revision of the source engine documented this as "direct descendant"
/// but implemented it as ancestor-match through `parent_query`; this keeps
/// the implemented behaviour. Chaining (`a >> b >> c`) nests `parent_query`
/// one level per `>>`, so reaching further ancestors composes naturally
/// rather than needing a separate "any ancestor" primitive.
impl std::ops::Shr for Query {
    type Output = Self;

    fn shr(self, rhs: Self) -> Self {
        rhs.parent_matches(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_common::declare_tag;
    use scene_common::tag::Root;

    declare_tag!(pub struct World: Root;);
    declare_tag!(pub struct Level: World;);
    declare_tag!(pub struct Player: Root;);
    declare_tag!(pub struct Enemy: Root;);

    #[test]
    fn any_is_a_combine_identity() {
        let mut graph = SceneGraph::new();
        let world = graph.spawn(World);
        let player = graph.spawn(Player);
        graph.attach(world, player);

        let plain = Query::tag::<Player>();
        let combined = Query::tag::<Player>().combine(Query::any());
        assert_eq!(plain.key(), combined.key());
        assert!(combined.test(&graph, player));
        assert_eq!(
            combined.find_on(&graph, world).collect::<Vec<_>>(),
            plain.find_on(&graph, world).collect::<Vec<_>>(),
        );
    }

    #[test]
    fn combine_prefers_the_more_specific_subtype_key() {
        let combined = Query::tag::<World>().combine(Query::tag::<Level>());
        assert_eq!(combined.key(), Level::tag());
        let combined_reversed = Query::tag::<Level>().combine(Query::tag::<World>());
        assert_eq!(combined_reversed.key(), Level::tag());
    }

    #[test]
    fn combine_of_unrelated_keys_keeps_self_key_deterministically() {
        let combined = Query::tag::<Player>().combine(Query::tag::<Enemy>());
        assert_eq!(combined.key(), Player::tag());

        let mut graph = SceneGraph::new();
        let player = graph.spawn(Player);
        assert!(!combined.test(&graph, player));
    }

    declare_tag!(pub struct DummyA: Root;);
    declare_tag!(pub struct DummyB: Root;);
    declare_tag!(pub struct DummyAB: DummyA, DummyB;);

    #[test]
    fn combine_of_unrelated_keys_matches_exactly_their_diamond_subtype() {
        // spec.md §8 scenario 5: AB ⊂ A and AB ⊂ B in the type lattice;
        // Query(A).combine(Query(B)) must match exactly the AB nodes, not
        // plain A or plain B nodes.
        let mut graph = SceneGraph::new();
        let plain_a = graph.spawn(DummyA);
        let plain_b = graph.spawn(DummyB);
        let both = graph.spawn(DummyAB);

        let query = Query::tag::<DummyA>().combine(Query::tag::<DummyB>());
        assert!(!query.test(&graph, plain_a));
        assert!(!query.test(&graph, plain_b));
        assert!(query.test(&graph, both));

        let query_reversed = Query::tag::<DummyB>().combine(Query::tag::<DummyA>());
        assert!(!query_reversed.test(&graph, plain_a));
        assert!(!query_reversed.test(&graph, plain_b));
        assert!(query_reversed.test(&graph, both));
    }

    #[test]
    fn find_on_does_not_recurse() {
        let mut graph = SceneGraph::new();
        let world = graph.spawn(World);
        let level = graph.spawn(Level);
        let player = graph.spawn(Player);
        graph.attach(world, level);
        graph.attach(level, player);

        let results: Vec<_> = Query::tag::<Player>().find_on(&graph, world).collect();
        assert!(results.is_empty());
        let results: Vec<_> = Query::tag::<Player>().find_on(&graph, level).collect();
        assert_eq!(results, vec![player]);
    }

    #[test]
    fn find_in_recurses_depth_first() {
        let mut graph = SceneGraph::new();
        let world = graph.spawn(World);
        let level = graph.spawn(Level);
        let player = graph.spawn(Player);
        graph.attach(world, level);
        graph.attach(level, player);

        let results: Vec<_> = Query::tag::<Player>().find_in(&graph, world).collect();
        assert_eq!(results, vec![player]);
    }

    #[test]
    fn trim_excludes_subtree_from_find_in() {
        let mut graph = SceneGraph::new();
        let world = graph.spawn(World);
        let level = graph.spawn(Level);
        let player = graph.spawn(Player);
        graph.attach(world, level);
        graph.attach(level, player);

        let query = Query::tag::<Player>().trim(move |g, n| g.has_tag(n, Level::tag()));
        let results: Vec<_> = query.find_in(&graph, world).collect();
        assert!(results.is_empty());
    }

    #[test]
    fn child_matches_requires_a_matching_direct_child() {
        let mut graph = SceneGraph::new();
        let level = graph.spawn(Level);
        let player = graph.spawn(Player);
        graph.attach(level, player);

        let has_player = Query::tag::<Level>().child_matches(Query::tag::<Player>());
        assert!(has_player.test(&graph, level));

        let has_enemy = Query::tag::<Level>().child_matches(Query::tag::<Enemy>());
        assert!(!has_enemy.test(&graph, level));
    }

    #[test]
    fn parent_matches_requires_the_direct_parent() {
        let mut graph = SceneGraph::new();
        let world = graph.spawn(World);
        let level = graph.spawn(Level);
        let player = graph.spawn(Player);
        graph.attach(world, level);
        graph.attach(level, player);

        let player_under_level = Query::tag::<Player>().parent_matches(Query::tag::<Level>());
        assert!(player_under_level.test(&graph, player));

        let player_under_world = Query::tag::<Player>().parent_matches(Query::tag::<World>());
        assert!(!player_under_world.test(&graph, player));
    }

    #[test]
    fn shr_operator_is_ancestor_match_sugar() {
        let mut graph = SceneGraph::new();
        let world = graph.spawn(World);
        let level = graph.spawn(Level);
        let player = graph.spawn(Player);
        graph.attach(world, level);
        graph.attach(level, player);

        let query = Query::tag::<World>() >> Query::tag::<Player>();
        assert!(!query.test(&graph, player));

        let query = Query::tag::<Level>() >> Query::tag::<Player>();
        assert!(query.test(&graph, player));
    }

    #[test]
    fn optimal_key_picks_the_rarer_bucket() {
        let mut graph = SceneGraph::new();
        let world = graph.spawn(World);
        for _ in 0..5 {
            let e = graph.spawn(Enemy);
            graph.attach(world, e);
        }
        let player = graph.spawn(Player);
        graph.attach(world, player);

        let query = Query::tag::<Enemy>().child_matches(Query::tag::<Player>());
        assert_eq!(query.optimal_key(&graph, world), Player::tag());
    }
}
