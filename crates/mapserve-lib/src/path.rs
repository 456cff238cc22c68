use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::graph::{RoadGraph, VertexId};

/// Shortest road path between the vertices nearest to two positions.
///
/// Both positions are first snapped to their nearest vertex, then the graph is
/// searched with A* using the straight-line distance to the destination as
/// the heuristic. Because every edge costs exactly its great-circle length the
/// heuristic never overestimates, so the returned path is optimal.
pub fn shortest_path(
    graph: &RoadGraph,
    start_lon: f64,
    start_lat: f64,
    dest_lon: f64,
    dest_lat: f64,
) -> Result<Vec<VertexId>> {
    let start = graph.nearest(start_lon, start_lat)?;
    let goal = graph.nearest(dest_lon, dest_lat)?;
    shortest_path_between(graph, start, goal)
}

/// Run A* search between two known vertices.
///
/// Fails with [`Error::PathNotFound`] when `goal` is not reachable from
/// `start`; a partial path is never returned.
pub fn shortest_path_between(
    graph: &RoadGraph,
    start: VertexId,
    goal: VertexId,
) -> Result<Vec<VertexId>> {
    let goal_vertex = graph
        .vertex(goal)
        .ok_or(Error::UnknownVertex { id: goal })?;
    if !graph.contains(start) {
        return Err(Error::UnknownVertex { id: start });
    }
    if start == goal {
        return Ok(vec![start]);
    }

    let goal_position = goal_vertex.position();
    let mut heuristic = Heuristic {
        graph,
        goal: goal_position,
        cache: HashMap::new(),
    };

    let mut best_distance: HashMap<VertexId, f64> = HashMap::new();
    let mut parents: HashMap<VertexId, VertexId> = HashMap::new();
    let mut visited: HashSet<VertexId> = HashSet::new();
    let mut frontier = BinaryHeap::new();
    let mut sequence: u64 = 0;

    best_distance.insert(start, 0.0);
    frontier.push(AStarEntry::new(start, 0.0, heuristic.estimate(start)?, sequence));

    while let Some(entry) = frontier.pop() {
        let current = entry.node;
        if !visited.insert(current) {
            continue;
        }

        if current == goal {
            let path = reconstruct_path(&parents, start, goal);
            debug!(
                start,
                goal,
                hops = path.len() - 1,
                expanded = visited.len(),
                "found shortest path"
            );
            return Ok(path);
        }

        let current_distance = best_distance
            .get(&current)
            .copied()
            .unwrap_or(f64::INFINITY);

        for &neighbour in graph.ways(current)?.keys() {
            if visited.contains(&neighbour) {
                continue;
            }

            let candidate = current_distance + graph.distance(current, neighbour)?;
            let known = best_distance
                .get(&neighbour)
                .copied()
                .unwrap_or(f64::INFINITY);
            if candidate < known {
                best_distance.insert(neighbour, candidate);
                parents.insert(neighbour, current);
                sequence += 1;
                frontier.push(AStarEntry::new(
                    neighbour,
                    candidate,
                    heuristic.estimate(neighbour)?,
                    sequence,
                ));
            }
        }
    }

    debug!(start, goal, expanded = visited.len(), "frontier exhausted");
    Err(Error::PathNotFound { start, goal })
}

/// Straight-line distance to the goal, computed at most once per vertex.
struct Heuristic<'a> {
    graph: &'a RoadGraph,
    goal: GeoPoint,
    cache: HashMap<VertexId, f64>,
}

impl Heuristic<'_> {
    fn estimate(&mut self, node: VertexId) -> Result<f64> {
        if let Some(&cached) = self.cache.get(&node) {
            return Ok(cached);
        }
        let vertex = self
            .graph
            .vertex(node)
            .ok_or(Error::UnknownVertex { id: node })?;
        let value = vertex.position().distance_to(&self.goal);
        self.cache.insert(node, value);
        Ok(value)
    }
}

fn reconstruct_path(
    parents: &HashMap<VertexId, VertexId>,
    start: VertexId,
    goal: VertexId,
) -> Vec<VertexId> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match parents.get(&current) {
            Some(&parent) => {
                path.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct AStarEntry {
    node: VertexId,
    estimate: FloatOrd,
    sequence: u64,
}

impl AStarEntry {
    fn new(node: VertexId, cost: f64, heuristic: f64, sequence: u64) -> Self {
        Self {
            node,
            estimate: FloatOrd(cost + heuristic),
            sequence,
        }
    }
}

impl Ord for AStarEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap; equal estimates
        // pop in push order.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for AStarEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
