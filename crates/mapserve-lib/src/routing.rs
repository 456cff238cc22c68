//! Route planning facade.
//!
//! [`plan_route`] is the entry point a serving layer calls: it snaps the two
//! requested positions onto the road graph, runs A*, totals the distance, and
//! attaches turn-by-turn directions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::directions::{route_directions, Direction};
use crate::error::Result;
use crate::geo::GeoPoint;
use crate::graph::{RoadGraph, VertexId};
use crate::path::shortest_path_between;

/// High-level route planning request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: GeoPoint,
    pub goal: GeoPoint,
}

impl RouteRequest {
    pub fn new(start_lon: f64, start_lat: f64, goal_lon: f64, goal_lat: f64) -> Self {
        Self {
            start: GeoPoint::new(start_lon, start_lat),
            goal: GeoPoint::new(goal_lon, goal_lat),
        }
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub start: VertexId,
    pub goal: VertexId,
    pub steps: Vec<VertexId>,
    /// Total length in miles.
    pub distance: f64,
    pub directions: Vec<Direction>,
}

impl RoutePlan {
    /// Number of edges in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Compute a route between the vertices nearest to the requested positions.
pub fn plan_route(graph: &RoadGraph, request: &RouteRequest) -> Result<RoutePlan> {
    let start = graph.nearest(request.start.lon, request.start.lat)?;
    let goal = graph.nearest(request.goal.lon, request.goal.lat)?;
    let steps = shortest_path_between(graph, start, goal)?;

    let mut distance = 0.0;
    for pair in steps.windows(2) {
        distance += graph.distance(pair[0], pair[1])?;
    }

    let directions = if steps.len() < 2 {
        Vec::new()
    } else {
        route_directions(graph, &steps)?
    };

    debug!(
        start,
        goal,
        hops = steps.len().saturating_sub(1),
        distance,
        "planned route"
    );

    Ok(RoutePlan {
        start,
        goal,
        steps,
        distance,
        directions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directions::DirectionKind;
    use crate::error::Error;
    use crate::graph::GraphBuilder;

    fn two_islands() -> RoadGraph {
        let mut builder = GraphBuilder::new();
        builder.add_vertex(1, 0.0, 0.0).unwrap();
        builder.add_vertex(2, 0.0, 0.1).unwrap();
        builder.add_vertex(3, 10.0, 10.0).unwrap();
        builder.add_vertex(4, 10.0, 10.1).unwrap();
        builder.add_edge(1, 2, "West Ln").unwrap();
        builder.add_edge(3, 4, "East Ln").unwrap();
        builder.finalize()
    }

    #[test]
    fn plan_includes_distance_and_directions() {
        let graph = two_islands();
        let plan = plan_route(&graph, &RouteRequest::new(0.0, 0.0, 0.0, 0.1)).unwrap();

        assert_eq!(plan.steps, vec![1, 2]);
        assert_eq!(plan.hop_count(), 1);
        assert!((plan.distance - graph.distance(1, 2).unwrap()).abs() < 1e-12);
        assert_eq!(plan.directions.len(), 1);
        assert_eq!(plan.directions[0].kind, DirectionKind::Start);
        assert_eq!(plan.directions[0].way_name, "West Ln");
    }

    #[test]
    fn same_vertex_plan_has_no_directions() {
        let graph = two_islands();
        let plan = plan_route(&graph, &RouteRequest::new(0.0, 0.0, 0.001, 0.001)).unwrap();
        assert_eq!(plan.steps, vec![1]);
        assert_eq!(plan.distance, 0.0);
        assert!(plan.directions.is_empty());
    }

    #[test]
    fn disconnected_islands_fail() {
        let graph = two_islands();
        let err = plan_route(&graph, &RouteRequest::new(0.0, 0.0, 10.0, 10.0)).unwrap_err();
        assert!(matches!(err, Error::PathNotFound { start: 1, goal: 3 }));
    }

    #[test]
    fn plan_serializes_directions() {
        let graph = two_islands();
        let plan = plan_route(&graph, &RouteRequest::new(0.0, 0.0, 0.0, 0.1)).unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["steps"], serde_json::json!([1, 2]));
        assert_eq!(json["directions"][0]["kind"], "start");
    }
}
