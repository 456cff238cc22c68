//! Place lookup handlers: nearest vertex, prefix search, and exact location.

use std::path::Path;

use anyhow::{Context, Result};

use mapserve_cli::output::{
    format_nearest, format_places, format_search, render_json, LocateResult, OutputFormat,
    SearchResult,
};
use mapserve_lib::Error as LookupError;

use crate::commands::load_graph;

pub fn handle_nearest_command(
    target_path: Option<&Path>,
    format: OutputFormat,
    lon: f64,
    lat: f64,
) -> Result<()> {
    let graph = load_graph(target_path)?;
    let id = graph
        .nearest(lon, lat)
        .context("failed to find the nearest vertex")?;
    let vertex = graph
        .vertex(id)
        .with_context(|| format!("vertex {id} missing from graph"))?;

    match format {
        OutputFormat::Json => render_json(vertex)?,
        OutputFormat::Text => print!("{}", format_nearest(vertex)),
    }
    Ok(())
}

pub fn handle_search_command(
    target_path: Option<&Path>,
    format: OutputFormat,
    prefix: &str,
) -> Result<()> {
    let graph = load_graph(target_path)?;
    let names = graph.prefix_search(prefix);

    match format {
        OutputFormat::Json => render_json(&SearchResult {
            prefix,
            names: &names,
        })?,
        OutputFormat::Text => print!("{}", format_search(prefix, &names)),
    }
    Ok(())
}

pub fn handle_locate_command(
    target_path: Option<&Path>,
    format: OutputFormat,
    name: &str,
) -> Result<()> {
    let graph = load_graph(target_path)?;
    let places = graph.locate(name).map_err(handle_lookup_failure)?;

    match format {
        OutputFormat::Json => render_json(&LocateResult {
            name,
            places: &places,
        })?,
        OutputFormat::Text => print!("{}", format_places(name, &places)),
    }
    Ok(())
}

fn handle_lookup_failure(err: LookupError) -> anyhow::Error {
    match err {
        LookupError::UnknownLocation { name, suggestions } => {
            anyhow::anyhow!(format_unknown_location_message(&name, &suggestions))
        }
        other => anyhow::Error::new(other),
    }
}

fn format_unknown_location_message(name: &str, suggestions: &[String]) -> String {
    let mut message = format!("Unknown location '{}'.", name);
    match suggestions {
        [] => {}
        [only] => message.push_str(&format!(" Did you mean '{only}'?")),
        many => {
            let joined = many
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ");
            message.push_str(&format!(" Did you mean one of: {}?", joined));
        }
    }
    message
}
