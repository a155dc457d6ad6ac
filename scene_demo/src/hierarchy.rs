//! A small worked type hierarchy, ported from the source engine's
//! `tgm.sys`/`tgm.game` base classes (`World`, `Tag`, `Component`, `Entity`,
//! `Layer`) plus a couple of game-specific leaf types used by the scenarios
//! in `main.rs`.
//!
//! The spec treats these as arbitrary user-defined tag types that exist only
//! to seed the index (§1); they carry no behavior of their own here either.

use scene_common::declare_tag;
use scene_common::tag::Root;

declare_tag!(
    /// A logically self-contained universe (a level, a HUD overlay, ...).
    pub struct World: Root;
);

declare_tag!(
    /// Informational marker describing its parent, not a thing in its own
    /// right (e.g. "this entity is solid").
    pub struct Tag: Root;
);

// Not instantiated by any scenario here, but kept as the worked base type
// `tgm.sys.component.Component` corresponds to.
#[allow(dead_code)]
declare_tag!(
    /// Behavior that enhances another node rather than standing alone.
    pub struct Component: Root;
);

declare_tag!(
    /// Something that exists in the world in some corporeal sense.
    pub struct Entity: Root;
);

declare_tag!(
    /// A container distinguishing render/update order within a world.
    pub struct Layer: Entity;
);

declare_tag!(
    /// A world holding one playable level's worth of content.
    pub struct Level: World;
);

declare_tag!(
    /// The player-controlled entity.
    pub struct Player: Entity;
);

declare_tag!(
    /// A hostile, non-player entity.
    pub struct Enemy: Entity;
);

declare_tag!(
    /// Marks an entity as occupying space and blocking movement.
    pub struct Solid: Tag;
);

declare_tag!(
    /// Event kind fired once per update tick, after all regular updates.
    pub struct SuperUpdate: Root;
);
