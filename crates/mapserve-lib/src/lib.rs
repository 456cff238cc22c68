//! mapserve library entry points.
//!
//! This crate owns the road graph built from an ingestion feed, nearest-vertex
//! and place-name lookups, A* routing with turn-by-turn directions, and the
//! selection of map tiles for a viewport. Higher-level consumers (the CLI, a
//! serving layer) should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod dataset;
pub mod directions;
pub mod error;
pub mod feed;
pub mod geo;
pub mod graph;
pub mod names;
pub mod path;
pub mod raster;
pub mod routing;

pub use dataset::{default_data_dir, resolve_data_dir, DATA_DIR_ENV};
pub use directions::{route_directions, Direction, DirectionKind, UNKNOWN_ROAD};
pub use error::{Error, Result};
pub use feed::{load_feed, load_feed_from_readers};
pub use geo::{bearing, distance, relative_bearing, GeoPoint, EARTH_RADIUS_MILES};
pub use graph::{GraphBuilder, Place, RoadGraph, Vertex, VertexId};
pub use names::{normalize, Trie};
pub use path::{shortest_path, shortest_path_between};
pub use raster::{BoundingBox, RasterConfig, RasterRequest, RasterResult, TileId, TileSelector};
pub use routing::{plan_route, RoutePlan, RouteRequest};
