//! Raster command handler. Selects tiles for a viewport without loading the
//! road graph.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use mapserve_cli::output::{format_raster, render_json, OutputFormat};
use mapserve_lib::{RasterConfig, RasterRequest, TileSelector};

pub fn load_raster_config(path: Option<&Path>) -> Result<RasterConfig> {
    match path {
        Some(path) => RasterConfig::from_path(path)
            .with_context(|| format!("failed to load raster configuration from {}", path.display())),
        None => Ok(RasterConfig::default()),
    }
}

pub fn handle_raster_command(
    config_path: Option<&Path>,
    format: OutputFormat,
    request: RasterRequest,
) -> Result<()> {
    let selector = TileSelector::new(load_raster_config(config_path)?);
    let result = selector.select(&request);
    debug!(depth = result.depth, success = result.query_success, "raster command complete");

    match format {
        OutputFormat::Json => render_json(&result)?,
        OutputFormat::Text => print!("{}", format_raster(&result)),
    }
    Ok(())
}
