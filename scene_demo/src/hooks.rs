//! Wiring a `Player`-specific instantiation hook: the Rust rendering of the
//! source engine's
//!
//! ```python
//! class Player(Entity):
//!     @on(SuperUpdate)
//!     def handle_super_update(self):
//!         ...
//! ```
//!
//! `Player::handle_super_update` is the handler; declaring it as a marker in
//! `Player`'s [`Markers`] impl means every `Player` constructed through
//! [`scene_hooks::spawn`] gets a `SuperUpdate`-tagged [`Event`] subnode
//! attached automatically.

use std::sync::OnceLock;

use scene_graph::{NodeId, SceneGraph};
use scene_hooks::{on, MarkerKey, Markers};
use tracing::info;

use crate::hierarchy::{Player, SuperUpdate};

impl Player {
    /// Runs once per tick for every `Player` in the scene, via its attached
    /// `SuperUpdate` event.
    pub fn handle_super_update(graph: &mut SceneGraph, node: NodeId) {
        info!(player = %node, "super-update fired");
    }
}

impl Markers for Player {
    fn markers() -> &'static [MarkerKey] {
        static MARKERS: OnceLock<[MarkerKey; 1]> = OnceLock::new();
        MARKERS.get_or_init(|| [on::<SuperUpdate>(Player::handle_super_update)])
    }
}
