//! Output formatting for command results.
//!
//! Every command can print either human-readable text or pretty JSON. The
//! text formatters return a `String` so they can be checked without capturing
//! stdout.

use std::fmt::Write as _;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use mapserve_lib::{Place, RasterResult, RoutePlan, Vertex};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// JSON payload for the `search` command.
#[derive(Debug, Serialize)]
pub struct SearchResult<'a> {
    pub prefix: &'a str,
    pub names: &'a [String],
}

/// JSON payload for the `locate` command.
#[derive(Debug, Serialize)]
pub struct LocateResult<'a> {
    pub name: &'a str,
    pub places: &'a [Place],
}

/// Write `value` to stdout as pretty JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

pub fn format_nearest(vertex: &Vertex) -> String {
    format!(
        "Nearest vertex: {} ({:.6}, {:.6})\n",
        vertex.id, vertex.lon, vertex.lat
    )
}

/// Numbered turn-by-turn listing with a summary header.
pub fn format_route(plan: &RoutePlan) -> String {
    if plan.directions.is_empty() {
        return format!(
            "Start and destination both snap to vertex {}; nothing to route.\n",
            plan.start
        );
    }

    let mut out = format!(
        "Route from vertex {} to vertex {} ({} hops, {:.3} miles):\n",
        plan.start,
        plan.goal,
        plan.hop_count(),
        plan.distance
    );
    for (index, direction) in plan.directions.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", index + 1, direction);
    }
    out
}

pub fn format_search(prefix: &str, names: &[String]) -> String {
    if names.is_empty() {
        return format!("No places match '{prefix}'.\n");
    }
    let mut out = String::new();
    for name in names {
        let _ = writeln!(out, "- {name}");
    }
    out
}

pub fn format_places(name: &str, places: &[Place]) -> String {
    let mut out = format!("Places named '{name}':\n");
    for place in places {
        let _ = writeln!(
            out,
            " - {} at vertex {} ({:.6}, {:.6})",
            place.name, place.id, place.lon, place.lat
        );
    }
    out
}

/// Tile grid summary followed by one line of file names per row.
pub fn format_raster(result: &RasterResult) -> String {
    let rows = result.render_grid.len();
    let columns = result.render_grid.first().map_or(0, Vec::len);
    let mut out = format!(
        "Depth {}: {} rows x {} columns (query_success: {})\n",
        result.depth, rows, columns, result.query_success
    );
    let _ = writeln!(
        out,
        "Bounds: ({:.6}, {:.6}) to ({:.6}, {:.6})",
        result.raster_ul_lon, result.raster_ul_lat, result.raster_lr_lon, result.raster_lr_lat
    );
    for row in &result.render_grid {
        let _ = writeln!(out, "{}", row.join(" "));
    }
    out
}
