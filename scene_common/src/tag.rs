//! Type-tag system: the identity of a user-declared node subtype.
//!
//! A tag is assigned once per Rust type the first time it is referenced, via
//! [`TagId::fresh`]; identity, hashing, and ordering all fall out of the
//! underlying counter. There is no reflection at runtime: [`declare_tag!`]
//! computes each type's full ancestor path once, lazily, and caches it in a
//! type-local static.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, OnceLock};

use crate::hash::GxMap;

/// Opaque identity of a user-declared node subtype.
///
/// Totally ordered and hashable by construction order, not by any property
/// of the type it names; two `TagId`s are equal iff they were produced by
/// the same [`declare_tag!`]-generated `tag()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(u32);

impl TagId {
    /// Allocates the next process-wide-unique tag identity.
    ///
    /// Called at most once per declared type, from inside a `OnceLock`
    /// initializer generated by [`declare_tag!`].
    #[must_use]
    pub fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag#{}", self.0)
    }
}

/// Process-wide map from a tag to its own full ancestor path, populated by
/// [`declare_tag!`] the first time each type's `tag_path()` is computed.
///
/// This is what lets [`TagId::is_subtype_of`] answer ancestry questions from
/// a bare `TagId`, without the caller having the original Rust type in hand
/// (the situation the query planner's `combine` is in).
fn registry() -> &'static Mutex<GxMap<TagId, &'static [TagId]>> {
    static REGISTRY: OnceLock<Mutex<GxMap<TagId, &'static [TagId]>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(GxMap::default()))
}

#[doc(hidden)]
pub fn register_path(id: TagId, path: &'static [TagId]) {
    registry().lock().unwrap().entry(id).or_insert(path);
}

impl TagId {
    /// Whether `self` is `other`, or declared (transitively) as a subtype of
    /// `other` via [`declare_tag!`]'s `: Parent` form.
    #[must_use]
    pub fn is_subtype_of(self, other: TagId) -> bool {
        self == other
            || registry()
                .lock()
                .unwrap()
                .get(&self)
                .is_some_and(|path| path.contains(&other))
    }
}

/// Implemented by every type declared with [`declare_tag!`].
///
/// `tag_path()` is the linearisation of the type's declared ancestry,
/// most-derived first, ending with [`Root`]'s tag.
pub trait NodeType: 'static {
    /// This type's own tag.
    fn tag() -> TagId
    where
        Self: Sized;

    /// This type's tag followed by every ancestor's tag, root last.
    fn tag_path() -> &'static [TagId]
    where
        Self: Sized;
}

/// Declares a marker type that participates in the tag system.
///
/// `declare_tag!(pub struct Foo;)` declares a root tag (only [`Root`] itself
/// should normally do this). `declare_tag!(pub struct Foo: Bar;)` declares
/// `Foo` as an immediate subtype of `Bar`, chaining `Bar`'s tag path.
/// `declare_tag!(pub struct Foo: Bar, Baz;)` declares `Foo` as a subtype of
/// every listed parent at once — the diamond/multiple-inheritance case
/// (spec.md §8 scenario 5's `AB ⊂ A ∧ AB ⊂ B`, grounded in the source
/// engine's `DummyNodeAB(DummyNodeA, DummyNodeB)` fixture): the expanded
/// `tag_path` is `Foo`'s own tag followed by each parent's `tag_path` in
/// declaration order, skipping any tag already present so a shared ancestor
/// (`Root`, or any common grandparent) isn't duplicated.
#[macro_export]
macro_rules! declare_tag {
    ($(#[$meta:meta])* pub struct $name:ident;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $crate::tag::NodeType for $name {
            fn tag() -> $crate::tag::TagId {
                static ID: ::std::sync::OnceLock<$crate::tag::TagId> =
                    ::std::sync::OnceLock::new();
                *ID.get_or_init($crate::tag::TagId::fresh)
            }

            fn tag_path() -> &'static [$crate::tag::TagId] {
                static PATH: ::std::sync::OnceLock<::std::vec::Vec<$crate::tag::TagId>> =
                    ::std::sync::OnceLock::new();
                static REGISTERED: ::std::sync::OnceLock<()> = ::std::sync::OnceLock::new();
                let path = PATH
                    .get_or_init(|| vec![<$name as $crate::tag::NodeType>::tag()])
                    .as_slice();
                REGISTERED.get_or_init(|| {
                    $crate::tag::register_path(<$name as $crate::tag::NodeType>::tag(), path);
                });
                path
            }
        }
    };
    ($(#[$meta:meta])* pub struct $name:ident: $($parent:ty),+ $(,)?;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl $crate::tag::NodeType for $name {
            fn tag() -> $crate::tag::TagId {
                static ID: ::std::sync::OnceLock<$crate::tag::TagId> =
                    ::std::sync::OnceLock::new();
                *ID.get_or_init($crate::tag::TagId::fresh)
            }

            fn tag_path() -> &'static [$crate::tag::TagId] {
                static PATH: ::std::sync::OnceLock<::std::vec::Vec<$crate::tag::TagId>> =
                    ::std::sync::OnceLock::new();
                static REGISTERED: ::std::sync::OnceLock<()> = ::std::sync::OnceLock::new();
                let path = PATH
                    .get_or_init(|| {
                        let mut path = vec![<$name as $crate::tag::NodeType>::tag()];
                        $(
                            for ancestor in <$parent as $crate::tag::NodeType>::tag_path() {
                                if !path.contains(ancestor) {
                                    path.push(*ancestor);
                                }
                            }
                        )+
                        path
                    })
                    .as_slice();
                REGISTERED.get_or_init(|| {
                    $crate::tag::register_path(<$name as $crate::tag::NodeType>::tag(), path);
                });
                path
            }
        }
    };
}

declare_tag! {
    /// The abstract root of every node hierarchy.
    ///
    /// Every declared type eventually chains back to `Root`, so
    /// `Root::tag()` is present in every node's tag path and is treated by
    /// the query planner as the worst-case bucket (it never narrows a
    /// search more than direct-children iteration already would).
    pub struct Root;
}

#[cfg(test)]
mod tests {
    use super::*;

    declare_tag!(pub struct TestA: Root;);
    declare_tag!(pub struct TestB: TestA;);
    declare_tag!(pub struct TestC: TestB;);

    declare_tag!(pub struct DiamondLeft: Root;);
    declare_tag!(pub struct DiamondRight: Root;);
    declare_tag!(pub struct DiamondBoth: DiamondLeft, DiamondRight;);

    #[test]
    fn tag_identity_is_stable_across_calls() {
        assert_eq!(TestA::tag(), TestA::tag());
        assert_ne!(TestA::tag(), TestB::tag());
    }

    #[test]
    fn tag_path_ends_at_root() {
        let path = TestC::tag_path();
        assert_eq!(path.first(), Some(&TestC::tag()));
        assert_eq!(path.last(), Some(&Root::tag()));
        assert_eq!(path, &[TestC::tag(), TestB::tag(), TestA::tag(), Root::tag()]);
    }

    #[test]
    fn every_declared_type_reaches_root() {
        assert_eq!(TestA::tag_path(), &[TestA::tag(), Root::tag()]);
    }

    #[test]
    fn is_subtype_of_walks_the_declared_chain() {
        assert!(TestC::tag().is_subtype_of(TestB::tag()));
        assert!(TestC::tag().is_subtype_of(TestA::tag()));
        assert!(TestC::tag().is_subtype_of(Root::tag()));
        assert!(TestC::tag().is_subtype_of(TestC::tag()));
        assert!(!TestA::tag().is_subtype_of(TestC::tag()));
        assert!(!TestB::tag().is_subtype_of(TestC::tag()));
    }

    #[test]
    fn multiple_supertypes_produce_a_diamond_tag_path() {
        let path = DiamondBoth::tag_path();
        assert_eq!(path.first(), Some(&DiamondBoth::tag()));
        assert!(path.contains(&DiamondLeft::tag()));
        assert!(path.contains(&DiamondRight::tag()));
        // Root is reachable through both parents but must appear only once.
        assert_eq!(path.iter().filter(|&&tag| tag == Root::tag()).count(), 1);
    }

    #[test]
    fn diamond_type_is_a_subtype_of_both_unrelated_parents() {
        assert!(DiamondBoth::tag().is_subtype_of(DiamondLeft::tag()));
        assert!(DiamondBoth::tag().is_subtype_of(DiamondRight::tag()));
        assert!(!DiamondLeft::tag().is_subtype_of(DiamondRight::tag()));
        assert!(!DiamondRight::tag().is_subtype_of(DiamondLeft::tag()));
    }
}
