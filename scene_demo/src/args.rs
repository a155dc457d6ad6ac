//! Command-line argument parsing: which worked example to run.

use clap::Parser;

/// Scene-graph core — worked examples.
#[derive(Parser, Debug)]
#[command(name = "scene_demo")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Which worked example to run.
    #[arg(short, long, value_enum, default_value = "tree")]
    pub scenario: Scenario,
}

/// Selects one of the worked examples in [`crate::scenarios`].
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Scenario {
    /// Build a small node tree and exercise `find`/`get`/`parent`/`children_with`.
    Tree,
    /// Spawn a `Player` and show its `SuperUpdate` event hook firing.
    Hooks,
    /// Show the planner picking the rarer of two tag buckets.
    Planner,
}
