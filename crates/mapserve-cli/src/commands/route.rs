//! Route command handler for computing directions between two positions.

use std::path::Path;

use anyhow::Result;

use mapserve_lib::{plan_route, Error as RouteError, RouteRequest};
use mapserve_cli::output::{format_route, render_json, OutputFormat};

use crate::commands::load_graph;

/// Arguments for the route command.
#[derive(Debug, Clone, Copy)]
pub struct RouteCommandArgs {
    pub from_lon: f64,
    pub from_lat: f64,
    pub to_lon: f64,
    pub to_lat: f64,
}

impl RouteCommandArgs {
    pub fn to_request(self) -> RouteRequest {
        RouteRequest::new(self.from_lon, self.from_lat, self.to_lon, self.to_lat)
    }
}

/// Handle the route subcommand.
pub fn handle_route_command(
    target_path: Option<&Path>,
    format: OutputFormat,
    args: RouteCommandArgs,
) -> Result<()> {
    let graph = load_graph(target_path)?;
    let plan = plan_route(&graph, &args.to_request()).map_err(handle_route_failure)?;

    match format {
        OutputFormat::Json => render_json(&plan)?,
        OutputFormat::Text => print!("{}", format_route(&plan)),
    }
    Ok(())
}

fn handle_route_failure(err: RouteError) -> anyhow::Error {
    match err {
        RouteError::PathNotFound { start, goal } => {
            anyhow::anyhow!(format_route_not_found_message(start, goal))
        }
        RouteError::EmptyGraph => {
            anyhow::anyhow!("The road feed contains no routable vertices.")
        }
        other => anyhow::Error::new(other),
    }
}

fn format_route_not_found_message(start: u64, goal: u64) -> String {
    format!(
        "No route found between vertex {start} and vertex {goal}. \
         The positions snap to disconnected parts of the road network; \
         try positions closer to a connected road."
    )
}
