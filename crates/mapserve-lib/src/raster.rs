//! Viewport to tile-grid selection.
//!
//! The map is pre-rendered as a quadtree of square image tiles. Depth `d`
//! splits the root bounding box into `2^d × 2^d` tiles of `tile_size` pixels
//! each. For a requested viewport, [`TileSelector::select`] picks the coarsest
//! depth whose longitudinal resolution (LonDPP, degrees of longitude per pixel)
//! is at least as fine as the viewport's, then returns every tile at that
//! depth that intersects the query box.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Upper-left longitude of the default map.
pub const ROOT_ULLON: f64 = -122.2998046875;
/// Upper-left latitude of the default map.
pub const ROOT_ULLAT: f64 = 37.892195547244356;
/// Lower-right longitude of the default map.
pub const ROOT_LRLON: f64 = -122.2119140625;
/// Lower-right latitude of the default map.
pub const ROOT_LRLAT: f64 = 37.82280243352756;
/// Edge length of a tile in pixels.
pub const TILE_SIZE: u32 = 256;
/// Deepest level of the tile quadtree.
pub const MAX_DEPTH: u32 = 7;

/// Deepest level representable without overflowing tile indices.
const MAX_SUPPORTED_DEPTH: u32 = 30;

/// Axis-aligned box given by its upper-left and lower-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub ullon: f64,
    pub ullat: f64,
    pub lrlon: f64,
    pub lrlat: f64,
}

impl BoundingBox {
    pub fn new(ullon: f64, ullat: f64, lrlon: f64, lrlat: f64) -> Self {
        Self {
            ullon,
            ullat,
            lrlon,
            lrlat,
        }
    }

    /// Whether the corners are ordered west-to-east and north-to-south.
    pub fn is_well_formed(&self) -> bool {
        self.ullon <= self.lrlon && self.lrlat <= self.ullat
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.ullon <= other.lrlon
            && other.ullon <= self.lrlon
            && self.lrlat <= other.ullat
            && other.lrlat <= self.ullat
    }

    pub fn contains(&self, other: &Self) -> bool {
        self.ullon <= other.ullon
            && other.lrlon <= self.lrlon
            && self.lrlat <= other.lrlat
            && other.ullat <= self.ullat
    }
}

/// Fixed description of the tile pyramid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    pub root: BoundingBox,
    pub tile_size: u32,
    pub max_depth: u32,
    /// File extension appended to tile names, without the dot.
    pub extension: String,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            root: BoundingBox::new(ROOT_ULLON, ROOT_ULLAT, ROOT_LRLON, ROOT_LRLAT),
            tile_size: TILE_SIZE,
            max_depth: MAX_DEPTH,
            extension: "png".to_string(),
        }
    }
}

impl RasterConfig {
    /// Load a configuration from a JSON file. Missing fields take their
    /// defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded raster configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.root.is_well_formed() || self.root.ullon == self.root.lrlon {
            return Err(Error::RasterConfig {
                message: format!("root bounding box {:?} is empty or inverted", self.root),
            });
        }
        if self.tile_size == 0 {
            return Err(Error::RasterConfig {
                message: "tile_size must be positive".to_string(),
            });
        }
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(Error::RasterConfig {
                message: format!(
                    "max_depth {} exceeds {}",
                    self.max_depth, MAX_SUPPORTED_DEPTH
                ),
            });
        }
        Ok(())
    }

    /// Longitude degrees per pixel of a depth-0 tile.
    pub fn root_lon_dpp(&self) -> f64 {
        (self.root.lrlon - self.root.ullon) / f64::from(self.tile_size)
    }
}

/// Viewport requested by a client: the box to show and its size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterRequest {
    pub ullon: f64,
    pub ullat: f64,
    pub lrlon: f64,
    pub lrlat: f64,
    pub width: f64,
    pub height: f64,
}

impl RasterRequest {
    pub fn query_box(&self) -> BoundingBox {
        BoundingBox::new(self.ullon, self.ullat, self.lrlon, self.lrlat)
    }

    /// Longitude degrees per pixel requested by the viewport.
    pub fn lon_dpp(&self) -> f64 {
        (self.lrlon - self.ullon) / self.width
    }
}

/// Address of one tile in the pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    pub depth: u32,
    pub x: u32,
    pub y: u32,
}

impl TileId {
    /// Tile name with the given extension, e.g. `d2_x1_y3.png`.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{self}.{extension}")
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}_x{}_y{}", self.depth, self.x, self.y)
    }
}

/// Tiles selected for a viewport.
///
/// `query_success` is advisory: when it is `false` the grid and bounding box
/// are still populated on a best-effort basis and may not be meaningful.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RasterResult {
    pub render_grid: Vec<Vec<String>>,
    pub raster_ul_lon: f64,
    pub raster_ul_lat: f64,
    pub raster_lr_lon: f64,
    pub raster_lr_lat: f64,
    pub depth: u32,
    pub query_success: bool,
}

impl RasterResult {
    pub fn raster_box(&self) -> BoundingBox {
        BoundingBox::new(
            self.raster_ul_lon,
            self.raster_ul_lat,
            self.raster_lr_lon,
            self.raster_lr_lat,
        )
    }
}

/// Chooses tiles from a fixed [`RasterConfig`].
#[derive(Debug, Clone, Default)]
pub struct TileSelector {
    config: RasterConfig,
}

impl TileSelector {
    pub fn new(config: RasterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// Coarsest depth whose tiles resolve at least `lon_dpp` degrees per pixel,
    /// capped at the configured maximum.
    pub fn depth_for(&self, lon_dpp: f64) -> u32 {
        let root_lon_dpp = self.config.root_lon_dpp();
        let mut scaled = lon_dpp;
        let max_depth = self.config.max_depth.min(MAX_SUPPORTED_DEPTH);
        let mut depth = 0;
        while scaled < root_lon_dpp && depth < max_depth {
            depth += 1;
            scaled *= 2.0;
        }
        depth
    }

    /// Select the tiles covering `request`. Never fails.
    pub fn select(&self, request: &RasterRequest) -> RasterResult {
        let root = self.config.root;
        let query = request.query_box();
        let query_success = query.is_well_formed() && query.overlaps(&root);
        if !query_success {
            warn!(?query, "raster query is outside the map or inverted");
        }

        let depth = self.depth_for(request.lon_dpp());
        let tiles_per_side = 1u64 << depth;
        let tile_width = (root.lrlon - root.ullon) / tiles_per_side as f64;
        // Latitude decreases from top to bottom, so this is negative.
        let tile_height = (root.lrlat - root.ullat) / tiles_per_side as f64;

        let last = tiles_per_side - 1;
        let ul_x = tile_index((query.ullon - root.ullon) / tile_width, last);
        let lr_x = tile_index((query.lrlon - root.ullon) / tile_width, last).max(ul_x);
        let ul_y = tile_index((query.ullat - root.ullat) / tile_height, last);
        let lr_y = tile_index((query.lrlat - root.ullat) / tile_height, last).max(ul_y);

        let render_grid = (ul_y..=lr_y)
            .map(|y| {
                (ul_x..=lr_x)
                    .map(|x| {
                        TileId {
                            depth,
                            x: x as u32,
                            y: y as u32,
                        }
                        .file_name(&self.config.extension)
                    })
                    .collect()
            })
            .collect();

        let result = RasterResult {
            render_grid,
            raster_ul_lon: root.ullon + ul_x as f64 * tile_width,
            raster_ul_lat: root.ullat + ul_y as f64 * tile_height,
            raster_lr_lon: root.ullon + (lr_x + 1) as f64 * tile_width,
            raster_lr_lat: root.ullat + (lr_y + 1) as f64 * tile_height,
            depth,
            query_success,
        };
        debug!(
            depth,
            columns = lr_x - ul_x + 1,
            rows = lr_y - ul_y + 1,
            query_success,
            "selected raster tiles"
        );
        result
    }
}

/// Floor a fractional tile offset and clamp it into `[0, last]`.
fn tile_index(offset: f64, last: u64) -> u64 {
    let floored = offset.floor();
    if floored.is_nan() || floored <= 0.0 {
        0
    } else if floored >= last as f64 {
        last
    } else {
        floored as u64
    }
}
