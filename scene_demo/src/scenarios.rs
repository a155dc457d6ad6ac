//! Worked examples exercising the node graph and query engine end to end,
//! one function per `--scenario` value.

use scene_common::tag::NodeType;
use scene_graph::{node_tree_summary, SceneGraph};
use scene_query::{children_with, find, get, parent, Query};
use tracing::info;

use crate::hierarchy::{Enemy, Layer, Level, Player, Solid, World};

/// Builds `World -> Level -> Layer -> {Player, Enemy x4}`, attaches a `Solid`
/// tag to the player, then exercises `find`/`get`/`parent`/`children_with`
/// against it — the scene-graph analogue of spec §8 scenarios 2, 3 and 7.
pub fn tree() {
    let mut graph = SceneGraph::new();
    let world = graph.spawn(World);
    let level = graph.spawn(Level);
    let layer = graph.spawn(Layer);
    graph.attach(world, level);
    graph.attach(level, layer);

    let player = scene_hooks::spawn(&mut graph, Player);
    graph.attach(layer, player);
    let solid = graph.spawn(Solid);
    graph.attach(player, solid);

    for _ in 0..4 {
        let enemy = graph.spawn(Enemy);
        graph.attach(layer, enemy);
    }

    info!(
        "world.index[Player] has {} entr{}",
        graph.index_len(world, Player::tag()),
        if graph.index_len(world, Player::tag()) == 1 { "y" } else { "ies" }
    );

    let found_player: Vec<_> = find(&graph, world, Player, None).collect();
    assert_eq!(found_player, vec![player]);
    info!(player = %player, "world.find(Player) located the player");

    let ancestor_level = parent(&graph, player, Some(Level::tag()))
        .expect("player has a Level ancestor")
        .expect("parent walk should find Level, not stop at None");
    assert_eq!(ancestor_level, level);
    info!(player = %player, level = %ancestor_level, "player.parent(Level) resolved");

    let layer_with_player: Vec<_> = children_with(&graph, level, Player).collect();
    assert_eq!(layer_with_player, vec![layer]);
    info!("level.children_with(Player) == [layer], since layer directly owns the player");

    let solid_player = get(&graph, player, Solid).expect("player has exactly one Solid tag");
    assert_eq!(solid_player, solid);

    println!("{}", node_tree_summary(&graph, world, |n| format!("{n}")));
}

/// Spawns a `Player` through [`scene_hooks::spawn`] and shows that the
/// `on::<SuperUpdate>` hook wired up in `hooks.rs` attached the event
/// automatically (spec §8 scenario 6, `on(EventType)` form).
pub fn hooks() {
    use crate::hierarchy::SuperUpdate;
    use scene_hooks::Event;

    let mut graph = SceneGraph::new();
    let player = scene_hooks::spawn(&mut graph, Player);

    let event_node = get(&graph, player, SuperUpdate).expect("Player always gets one SuperUpdate event");
    let event = graph
        .get::<Event<SuperUpdate, fn(&mut SceneGraph, scene_graph::NodeId)>>(event_node)
        .expect("attached node is the Event wrapper for handle_super_update");

    info!("firing the attached SuperUpdate event by hand");
    event.fire(&mut graph, player);
}

/// 100 `Enemy` nodes and 2 `Player` nodes under one `Layer`; the query
/// `Enemy[Player]` (an enemy with a player child — contrived, but it is
/// exactly spec §8 scenario 4's shape) must plan against the 2-entry
/// `Player` bucket, not the 100-entry `Enemy` bucket.
pub fn planner() {
    let mut graph = SceneGraph::new();
    let layer = graph.spawn(Layer);

    for _ in 0..100 {
        let enemy = graph.spawn(Enemy);
        graph.attach(layer, enemy);
    }
    let mut players = Vec::new();
    for _ in 0..2 {
        let player = graph.spawn(Player);
        graph.attach(layer, player);
        players.push(player);
    }

    let query = Query::tag::<Enemy>().child_matches(Query::tag::<Player>());
    let chosen_key = query.optimal_key(&graph, layer);
    assert_eq!(chosen_key, Player::tag());
    info!(
        enemy_bucket = graph.index_len(layer, Enemy::tag()),
        player_bucket = graph.index_len(layer, Player::tag()),
        "optimal_key picked the smaller bucket"
    );

    let matches: Vec<_> = query.find_on(&graph, layer).collect();
    assert!(matches.is_empty(), "no enemy actually owns a player child in this scenario");
    info!(candidates = graph.index_len(layer, Player::tag()), "planner avoided scanning all 100 enemies");
}
