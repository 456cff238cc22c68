use std::path::PathBuf;

use thiserror::Error;

use crate::graph::VertexId;

/// Convenient result alias for the mapserve library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a vertex id is inserted twice during graph loading.
    #[error("vertex {id} already exists")]
    DuplicateId { id: VertexId },

    /// Raised when an edge, place name, or query references a missing vertex.
    #[error("unknown vertex {id}")]
    UnknownVertex { id: VertexId },

    /// Raised when a nearest-vertex query runs against a graph with no vertices.
    #[error("road graph contains no vertices")]
    EmptyGraph,

    /// Raised when the search frontier empties before reaching the goal.
    #[error("no path found between vertex {start} and vertex {goal}")]
    PathNotFound { start: VertexId, goal: VertexId },

    /// Raised when directions are requested for fewer than two vertices.
    #[error("route must contain at least two vertices, got {len}")]
    UnderspecifiedRoute { len: usize },

    /// Raised when two consecutive route vertices are not joined by an edge.
    #[error("route is not connected between vertex {from} and vertex {to}")]
    InvalidRoute { from: VertexId, to: VertexId },

    /// Raised when a direction string does not match the rendered format.
    #[error("malformed direction string: {input:?}")]
    MalformedDirectionString { input: String },

    /// Raised when a place name could not be found in the name index.
    #[error("unknown location: {name}{}", format_suggestions(.suggestions))]
    UnknownLocation {
        name: String,
        suggestions: Vec<String>,
    },

    /// Feed directory or file could not be located at the resolved path.
    #[error("dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the data directory")]
    ProjectDirsUnavailable,

    /// Raised when a feed file contains a malformed or inconsistent record.
    #[error("invalid feed data in {file} at row {row}: {message}")]
    FeedValidation {
        file: String,
        row: u64,
        message: String,
    },

    /// Raised when a raster configuration is unusable.
    #[error("invalid raster configuration: {message}")]
    RasterConfig { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for CSV reader errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
