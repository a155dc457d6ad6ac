//! Fast-hashing collection aliases used for per-tag buckets.
//!
//! Index and children-by-tag buckets are rebuilt on every attach/detach, so
//! the hasher is on the hot path; `gxhash` replaces the default SipHash the
//! way the rest of the workspace does for its own per-cell maps.

use std::collections::{HashMap, HashSet};

use gxhash::GxBuildHasher;

/// A `HashMap` keyed with `gxhash`'s build hasher.
pub type GxMap<K, V> = HashMap<K, V, GxBuildHasher>;

/// A `HashSet` keyed with `gxhash`'s build hasher.
pub type GxSet<T> = HashSet<T, GxBuildHasher>;
