//! The generalized traversal surface: `children`/`find`/`get`/
//! `children_with`/`find_with`/`get_with`/`matches`, each accepting either a
//! bare tag or a full [`Query`].
//!
//! These live one layer above `scene_graph` rather than as inherent
//! `SceneGraph` methods, so that `scene_graph` itself never has to depend on
//! the `Query` value type.

use scene_common::error::SceneError;
use scene_common::tag::TagId;
use scene_graph::{NodeId, SceneGraph};

use crate::query::{Predicate, Query};
use crate::sugar::{IntoQueryArg, QueryArg};

/// Direct children of `node` matching `query`.
///
/// A bare tag takes the fast path straight to the `children_by_tag` bucket,
/// with no traversal beyond direct children. A full [`Query`] delegates to
/// [`Query::find_on`].
pub fn children<'a>(
    graph: &'a SceneGraph,
    node: NodeId,
    query: impl IntoQueryArg,
) -> Box<dyn Iterator<Item = NodeId> + 'a> {
    match query.into_query_arg() {
        QueryArg::Bare(tag) => Box::new(graph.children_by_tag_iter(node, tag)),
        QueryArg::Full(query) => Box::new(query.find_on(graph, node)),
    }
}

/// Every descendant of `node` (not including `node` itself) matching
/// `query`, depth-first.
///
/// For a bare tag with no `trim`, this walks `node.index[tag]` directly:
/// every candidate is recursed into, but only those that themselves carry
/// the tag are yielded. Supplying `trim`, or a full [`Query`], goes through
/// [`Query::find_in`] instead.
pub fn find<'a>(
    graph: &'a SceneGraph,
    node: NodeId,
    query: impl IntoQueryArg,
    trim: Option<Predicate>,
) -> Box<dyn Iterator<Item = NodeId> + 'a> {
    match (query.into_query_arg(), trim) {
        (QueryArg::Bare(tag), None) => find_bare(graph, node, tag),
        (QueryArg::Bare(tag), Some(trim)) => {
            Box::new(Query::from_key(tag).with_trim_predicate(trim).find_in(graph, node))
        }
        (QueryArg::Full(query), None) => Box::new(query.find_in(graph, node)),
        (QueryArg::Full(query), Some(trim)) => {
            Box::new(query.with_trim_predicate(trim).find_in(graph, node))
        }
    }
}

fn find_bare(graph: &SceneGraph, node: NodeId, tag: TagId) -> Box<dyn Iterator<Item = NodeId> + '_> {
    let candidates: Vec<NodeId> = graph
        .index_iter(node, tag)
        .filter(|&child| child != node)
        .collect();

    Box::new(candidates.into_iter().flat_map(move |child| {
        let emitted = if graph.has_tag(child, tag) { Some(child) } else { None };
        Box::new(emitted.into_iter().chain(find_bare(graph, child, tag)))
            as Box<dyn Iterator<Item = NodeId>>
    }))
}

/// Like [`children`], but requires exactly one result.
///
/// # Errors
/// Returns [`SceneError::CardinalityError`] if the number of matches is not
/// exactly one.
pub fn get(graph: &SceneGraph, node: NodeId, query: impl IntoQueryArg) -> Result<NodeId, SceneError> {
    exactly_one(children(graph, node, query))
}

/// Nodes reachable from `node` whose own direct children contain at least
/// one match for `query` — i.e. a candidate `x` qualifies iff some direct
/// child of `x` satisfies `query`, not `x` itself.
///
/// Bare-tag fast path: iterate `node.index[tag]` and yield `c != node` such
/// that `c.children_by_tag[tag]` is non-empty.
pub fn children_with<'a>(
    graph: &'a SceneGraph,
    node: NodeId,
    query: impl IntoQueryArg,
) -> Box<dyn Iterator<Item = NodeId> + 'a> {
    match query.into_query_arg() {
        QueryArg::Bare(tag) => Box::new(
            graph
                .index_iter(node, tag)
                .filter(move |&c| c != node && graph.children_by_tag_iter(c, tag).next().is_some()),
        ),
        QueryArg::Full(query) => Box::new(wrapper(query).find_on(graph, node)),
    }
}

/// Descendant-reaching version of [`children_with`]: every descendant of
/// `node` whose own direct children contain at least one match.
pub fn find_with<'a>(
    graph: &'a SceneGraph,
    node: NodeId,
    query: impl IntoQueryArg,
) -> Box<dyn Iterator<Item = NodeId> + 'a> {
    match query.into_query_arg() {
        QueryArg::Bare(tag) => Box::new(wrapper(Query::from_key(tag)).find_in(graph, node)),
        QueryArg::Full(query) => Box::new(wrapper(query).find_in(graph, node)),
    }
}

/// Like [`children_with`], but requires exactly one result.
///
/// # Errors
/// Returns [`SceneError::CardinalityError`] if the number of matches is not
/// exactly one.
pub fn get_with(graph: &SceneGraph, node: NodeId, query: impl IntoQueryArg) -> Result<NodeId, SceneError> {
    exactly_one(children_with(graph, node, query))
}

/// Coerces `query` and tests it directly against `node`.
#[must_use]
pub fn matches(graph: &SceneGraph, node: NodeId, query: impl IntoQueryArg) -> bool {
    match query.into_query_arg() {
        QueryArg::Bare(tag) => graph.has_tag(node, tag),
        QueryArg::Full(query) => query.test(graph, node),
    }
}

/// The direct parent of `node` if `query` is `None`; otherwise walks
/// ancestors and returns the first that satisfies `query`.
///
/// # Errors
/// Returns [`SceneError::NoMatch`] if a query is given and the root is
/// reached without a match.
pub fn parent(
    graph: &SceneGraph,
    node: NodeId,
    query: Option<impl IntoQueryArgRef>,
) -> Result<Option<NodeId>, SceneError> {
    let Some(query) = query else {
        return Ok(graph.parent_of(node));
    };
    let mut current = node;
    loop {
        let Some(candidate) = graph.parent_of(current) else {
            return Err(SceneError::NoMatch);
        };
        if matches(graph, candidate, query.as_query_arg()) {
            return Ok(Some(candidate));
        }
        current = candidate;
    }
}

/// Query-like values that `parent` can re-test at every ancestor on its walk
/// to the root, without consuming the query: a bare tag (`Copy`) or an
/// already-built `Query` (cloned cheaply through its internal `Arc`s).
pub trait IntoQueryArgRef {
    /// Borrows out a fresh [`QueryArg`] usable for one `matches` call.
    fn as_query_arg(&self) -> QueryArg;
}

impl IntoQueryArgRef for TagId {
    fn as_query_arg(&self) -> QueryArg {
        QueryArg::Bare(*self)
    }
}

impl IntoQueryArgRef for Query {
    fn as_query_arg(&self) -> QueryArg {
        QueryArg::Full(self.clone())
    }
}

fn wrapper(query: Query) -> Query {
    Query::any().child_matches(query)
}

fn exactly_one(mut iter: impl Iterator<Item = NodeId>) -> Result<NodeId, SceneError> {
    let Some(first) = iter.next() else {
        return Err(SceneError::cardinality(0));
    };
    if iter.next().is_some() {
        let mut found = 2;
        found += iter.count();
        return Err(SceneError::cardinality(found));
    }
    Ok(first)
}
