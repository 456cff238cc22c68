//! Road graph storage.
//!
//! Loading and querying are split across two types. A [`GraphBuilder`] accepts
//! vertices, edges, and place names from the ingestion feed; calling
//! [`GraphBuilder::finalize`] consumes it, prunes isolated vertices, and
//! returns a [`RoadGraph`]. The road graph has no mutating methods, so once a
//! graph exists it can be shared between threads (directly or behind an `Arc`)
//! without any locking.

use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geo::{self, GeoPoint};
use crate::names::{normalize, Trie};

/// Externally supplied identifier of a road-network vertex.
pub type VertexId = u64;

/// Number of suggestions offered for an unknown place name.
const MAX_SUGGESTIONS: usize = 3;

/// Minimum Jaro-Winkler similarity for a name to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Intersection or point along a way.
///
/// Vertices compare and hash by id only.
#[derive(Debug, Clone, Serialize)]
pub struct Vertex {
    pub id: VertexId,
    pub lon: f64,
    pub lat: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip)]
    ways: BTreeMap<VertexId, String>,
}

impl Vertex {
    fn new(id: VertexId, lon: f64, lat: f64) -> Self {
        Self {
            id,
            lon,
            lat,
            display_name: None,
            ways: BTreeMap::new(),
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }

    /// Number of adjacent vertices.
    pub fn degree(&self) -> usize {
        self.ways.len()
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Named location returned by [`RoadGraph::locations`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub id: VertexId,
    pub lon: f64,
    pub lat: f64,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
struct NameIndex {
    trie: Trie,
    /// Normalized name -> display names that normalize to it, first seen first.
    originals: HashMap<String, Vec<String>>,
    /// Normalized name -> places registered under it.
    places: HashMap<String, BTreeMap<VertexId, Place>>,
}

impl NameIndex {
    fn insert(&mut self, place: Place) {
        let key = normalize(&place.name);
        self.trie.insert(&key);

        let originals = self.originals.entry(key.clone()).or_default();
        if !originals.contains(&place.name) {
            originals.push(place.name.clone());
        }

        self.places.entry(key).or_default().insert(place.id, place);
    }

    fn display_names(&self, key: &str) -> &[String] {
        self.originals.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Mutable road graph used while the ingestion feed is being replayed.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    vertices: Vec<Vertex>,
    index: HashMap<VertexId, usize>,
    names: NameIndex,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices added so far.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Insert a vertex. Ids are never overwritten; a repeated id is rejected.
    pub fn add_vertex(&mut self, id: VertexId, lon: f64, lat: f64) -> Result<()> {
        if self.index.contains_key(&id) {
            return Err(Error::DuplicateId { id });
        }
        self.index.insert(id, self.vertices.len());
        self.vertices.push(Vertex::new(id, lon, lat));
        Ok(())
    }

    /// Connect `v` and `w` in both directions. Re-adding an edge replaces its
    /// way name.
    pub fn add_edge(&mut self, v: VertexId, w: VertexId, way_name: impl Into<String>) -> Result<()> {
        let v_slot = self.slot(v)?;
        let w_slot = self.slot(w)?;
        let way_name = way_name.into();

        self.vertices[v_slot].ways.insert(w, way_name.clone());
        self.vertices[w_slot].ways.insert(v, way_name);
        Ok(())
    }

    /// Register `name` for a vertex and make it searchable.
    pub fn add_place_name(&mut self, name: impl Into<String>, id: VertexId) -> Result<()> {
        let slot = self.slot(id)?;
        let name = name.into();
        let vertex = &mut self.vertices[slot];
        vertex.display_name = Some(name.clone());

        self.names.insert(Place {
            id,
            lon: vertex.lon,
            lat: vertex.lat,
            name,
        });
        Ok(())
    }

    /// Seal the graph: drop every vertex without neighbours and return the
    /// read-only [`RoadGraph`].
    ///
    /// Place records survive pruning, so a named point that is not on any way
    /// stays visible to [`RoadGraph::prefix_search`] and
    /// [`RoadGraph::locations`] even though it can no longer be routed to.
    pub fn finalize(self) -> RoadGraph {
        let total = self.vertices.len();
        let vertices: Vec<Vertex> = self
            .vertices
            .into_iter()
            .filter(|vertex| !vertex.ways.is_empty())
            .collect();
        let index = vertices
            .iter()
            .enumerate()
            .map(|(slot, vertex)| (vertex.id, slot))
            .collect();

        let adjacency_entries: usize = vertices.iter().map(Vertex::degree).sum();
        let self_loops = vertices
            .iter()
            .filter(|vertex| vertex.ways.contains_key(&vertex.id))
            .count();
        let edge_count = (adjacency_entries + self_loops) / 2;

        info!(
            vertices = vertices.len(),
            edges = edge_count,
            pruned = total - vertices.len(),
            names = self.names.trie.len(),
            "finalized road graph"
        );

        RoadGraph {
            vertices,
            index,
            edge_count,
            names: self.names,
        }
    }

    fn slot(&self, id: VertexId) -> Result<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(Error::UnknownVertex { id })
    }
}

/// Finalized, query-only road graph.
#[derive(Debug, Clone)]
pub struct RoadGraph {
    vertices: Vec<Vertex>,
    index: HashMap<VertexId, usize>,
    edge_count: usize,
    names: NameIndex,
}

impl RoadGraph {
    /// Number of routable vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.index.get(&id).map(|&slot| &self.vertices[slot])
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Neighbours of `id` mapped to the name of the way joining them.
    pub fn ways(&self, id: VertexId) -> Result<&BTreeMap<VertexId, String>> {
        self.require(id).map(|vertex| &vertex.ways)
    }

    /// Name of the way joining `v` and `w`, if they are adjacent.
    pub fn way_between(&self, v: VertexId, w: VertexId) -> Option<&str> {
        self.vertex(v)
            .and_then(|vertex| vertex.ways.get(&w))
            .map(String::as_str)
    }

    /// Great-circle distance between two vertices in miles.
    pub fn distance(&self, v: VertexId, w: VertexId) -> Result<f64> {
        let a = self.require(v)?;
        let b = self.require(w)?;
        Ok(geo::distance(a.lon, a.lat, b.lon, b.lat))
    }

    /// Initial bearing from `v` toward `w` in degrees.
    pub fn bearing(&self, v: VertexId, w: VertexId) -> Result<f64> {
        let a = self.require(v)?;
        let b = self.require(w)?;
        Ok(geo::bearing(a.lon, a.lat, b.lon, b.lat))
    }

    /// Vertex closest to the given position.
    ///
    /// This is a linear scan. When several vertices are equally close the one
    /// inserted first wins.
    pub fn nearest(&self, lon: f64, lat: f64) -> Result<VertexId> {
        let mut best: Option<(VertexId, f64)> = None;
        for vertex in &self.vertices {
            let d = geo::distance(vertex.lon, vertex.lat, lon, lat);
            match best {
                Some((_, best_distance)) if d >= best_distance => {}
                _ => best = Some((vertex.id, d)),
            }
        }
        let (id, d) = best.ok_or(Error::EmptyGraph)?;
        debug!(lon, lat, vertex = id, distance = d, "resolved nearest vertex");
        Ok(id)
    }

    /// Display names whose normalized form starts with `normalize(prefix)`,
    /// ordered by normalized name.
    pub fn prefix_search(&self, prefix: &str) -> Vec<String> {
        let prefix = normalize(prefix);
        self.names
            .trie
            .keys_with_prefix(&prefix)
            .iter()
            .flat_map(|key| self.names.display_names(key).iter().cloned())
            .collect()
    }

    /// Places registered under exactly `normalize(name)`, ordered by id.
    pub fn locations(&self, name: &str) -> Vec<Place> {
        self.names
            .places
            .get(&normalize(name))
            .map(|places| places.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Like [`locations`](Self::locations), but an unknown name is an error
    /// carrying close matches.
    pub fn locate(&self, name: &str) -> Result<Vec<Place>> {
        let places = self.locations(name);
        if places.is_empty() {
            return Err(Error::UnknownLocation {
                name: name.to_string(),
                suggestions: self.suggest_names(name),
            });
        }
        Ok(places)
    }

    /// Display names most similar to `name` by Jaro-Winkler similarity over
    /// normalized names.
    pub fn suggest_names(&self, name: &str) -> Vec<String> {
        let query = normalize(name);
        let mut scored: Vec<(f64, &String)> = self
            .names
            .originals
            .iter()
            .map(|(key, originals)| (strsim::jaro_winkler(&query, key), originals))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .flat_map(|(score, originals)| originals.iter().map(move |name| (score, name)))
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, name)| name.clone())
            .collect()
    }

    fn require(&self, id: VertexId) -> Result<&Vertex> {
        self.vertex(id).ok_or(Error::UnknownVertex { id })
    }
}
