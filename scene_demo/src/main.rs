//! Worked examples for the scene-graph core: build a small node tree, run
//! queries over it, and show the instantiation-hook registry attaching an
//! event node automatically.

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

mod args;
mod hierarchy;
mod hooks;
mod scenarios;

use clap::Parser;

use args::{Args, Scenario};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    match args.scenario {
        Scenario::Tree => scenarios::tree(),
        Scenario::Hooks => scenarios::hooks(),
        Scenario::Planner => scenarios::planner(),
    }
}
