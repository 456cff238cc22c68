//! CSV ingestion feed.
//!
//! The map data parser upstream of this crate emits three CSV files into a
//! data directory:
//!
//! - `vertices.csv` with columns `id,lon,lat`
//! - `edges.csv` with columns `from,to,way` (an empty `way` means the way is
//!   unnamed and is stored as [`UNKNOWN_ROAD`])
//! - `places.csv` with columns `name,id`
//!
//! The loader replays these records into a [`GraphBuilder`] and finalizes it.
//! Edges and place names that reference unknown vertices are skipped with a
//! warning, mirroring how partial map extracts reference nodes outside their
//! bounds. Duplicate vertex ids and unparsable rows are hard errors.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::directions::UNKNOWN_ROAD;
use crate::error::{Error, Result};
use crate::graph::{GraphBuilder, RoadGraph, VertexId};

pub const VERTICES_FILE: &str = "vertices.csv";
pub const EDGES_FILE: &str = "edges.csv";
pub const PLACES_FILE: &str = "places.csv";

#[derive(Debug, Deserialize)]
struct VertexRecord {
    id: VertexId,
    lon: f64,
    lat: f64,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    from: VertexId,
    to: VertexId,
    #[serde(default)]
    way: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceRecord {
    name: String,
    id: VertexId,
}

/// Load and finalize the road graph stored in `data_dir`.
///
/// `vertices.csv` and `edges.csv` are required; `places.csv` is optional.
pub fn load_feed(data_dir: &Path) -> Result<RoadGraph> {
    if !data_dir.is_dir() {
        return Err(Error::DatasetNotFound {
            path: data_dir.to_path_buf(),
        });
    }
    debug!(path = %data_dir.display(), "loading road feed");

    let vertices = open_required(data_dir, VERTICES_FILE)?;
    let edges = open_required(data_dir, EDGES_FILE)?;
    let places_path = data_dir.join(PLACES_FILE);
    let places = if places_path.exists() {
        Some(File::open(&places_path)?)
    } else {
        debug!(path = %places_path.display(), "no places file; name search will be empty");
        None
    };

    load_feed_from_readers(vertices, edges, places)
}

/// Load and finalize a road graph from in-memory or already opened CSV
/// sources.
pub fn load_feed_from_readers<V, E, P>(
    vertices: V,
    edges: E,
    places: Option<P>,
) -> Result<RoadGraph>
where
    V: Read,
    E: Read,
    P: Read,
{
    let mut builder = GraphBuilder::new();

    for (row, record) in records::<VertexRecord, _>(vertices, VERTICES_FILE)? {
        builder
            .add_vertex(record.id, record.lon, record.lat)
            .map_err(|err| Error::FeedValidation {
                file: VERTICES_FILE.to_string(),
                row,
                message: err.to_string(),
            })?;
    }

    let mut skipped_edges = 0usize;
    for (_, record) in records::<EdgeRecord, _>(edges, EDGES_FILE)? {
        let way = record
            .way
            .filter(|way| !way.is_empty())
            .unwrap_or_else(|| UNKNOWN_ROAD.to_string());
        if builder.add_edge(record.from, record.to, way).is_err() {
            skipped_edges += 1;
        }
    }
    if skipped_edges > 0 {
        warn!(skipped_edges, "ignored edges referencing unknown vertices");
    }

    if let Some(places) = places {
        let mut skipped_places = 0usize;
        for (_, record) in records::<PlaceRecord, _>(places, PLACES_FILE)? {
            if builder.add_place_name(record.name, record.id).is_err() {
                skipped_places += 1;
            }
        }
        if skipped_places > 0 {
            warn!(skipped_places, "ignored place names referencing unknown vertices");
        }
    }

    let graph = builder.finalize();
    info!(
        vertices = graph.len(),
        edges = graph.edge_count(),
        "loaded road feed"
    );
    Ok(graph)
}

fn open_required(data_dir: &Path, name: &str) -> Result<File> {
    let path = data_dir.join(name);
    if !path.is_file() {
        return Err(Error::DatasetNotFound { path });
    }
    Ok(File::open(path)?)
}

/// Deserialize every record, pairing it with its 1-based line number (the
/// header is line 1).
fn records<T, R>(reader: R, file: &str) -> Result<Vec<(u64, T)>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);
    let mut rows = Vec::new();
    let mut row: u64 = 1;
    for result in csv_reader.deserialize::<T>() {
        row += 1;
        let record = result.map_err(|err| Error::FeedValidation {
            file: file.to_string(),
            row,
            message: err.to_string(),
        })?;
        rows.push((row, record));
    }
    Ok(rows)
}
