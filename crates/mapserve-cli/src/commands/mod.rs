// Command handlers for the mapserve subcommands. main.rs parses arguments and
// dispatches here.

pub mod places;
pub mod raster;
pub mod route;

use std::path::Path;

use anyhow::{Context, Result};

use mapserve_lib::{load_feed, resolve_data_dir, RoadGraph};

/// Resolve the feed directory and load the road graph from it.
pub fn load_graph(target: Option<&Path>) -> Result<RoadGraph> {
    let data_dir =
        resolve_data_dir(target).context("failed to locate the road feed directory")?;
    load_feed(&data_dir)
        .with_context(|| format!("failed to load road feed from {}", data_dir.display()))
}
