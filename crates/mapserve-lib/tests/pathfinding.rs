mod common;

use std::sync::Arc;
use std::thread;

use mapserve_lib::{
    plan_route, route_directions, shortest_path, shortest_path_between, Direction, DirectionKind,
    Error, GraphBuilder, RoadGraph, RouteRequest,
};

#[test]
fn collinear_main_street_scenario() {
    let graph = common::main_street();
    let path = shortest_path(&graph, 0.001, -0.001, -0.001, 3.001).unwrap();
    assert_eq!(path, vec![1, 2, 3, 4]);

    let directions = route_directions(&graph, &path).unwrap();
    assert_eq!(directions.len(), 1);
    assert_eq!(directions[0].kind, DirectionKind::Start);
    assert_eq!(directions[0].way_name, "Main St");
    let full = common::path_length(&graph, &path);
    assert!((directions[0].distance - full).abs() < 1e-9);
}

#[test]
fn every_path_step_is_a_stored_edge() {
    let graph = common::downtown();
    let ids: Vec<_> = graph.vertices().map(|vertex| vertex.id).collect();
    for &start in &ids {
        for &goal in &ids {
            let path = shortest_path_between(&graph, start, goal).unwrap();
            assert_eq!(path.first(), Some(&start));
            assert_eq!(path.last(), Some(&goal));
            for pair in path.windows(2) {
                assert!(
                    graph.way_between(pair[0], pair[1]).is_some(),
                    "{} -> {} is not an edge",
                    pair[0],
                    pair[1]
                );
            }
        }
    }
}

#[test]
fn a_star_matches_exhaustive_search() {
    let graph = common::downtown();
    let ids: Vec<_> = graph.vertices().map(|vertex| vertex.id).collect();
    for &start in &ids {
        for &goal in &ids {
            let path = shortest_path_between(&graph, start, goal).unwrap();
            let found = common::path_length(&graph, &path);
            let best = common::brute_force_shortest(&graph, start, goal).unwrap();
            assert!(
                found <= best + 1e-9,
                "{start} -> {goal}: a* {found} vs exhaustive {best}"
            );
        }
    }
}

#[test]
fn plan_distance_equals_sum_of_edges() {
    let graph = common::downtown();
    let plan = plan_route(
        &graph,
        &RouteRequest::new(-122.2690, 37.8700, -122.2650, 37.8661),
    )
    .unwrap();
    assert_eq!(plan.start, 10);
    assert_eq!(plan.goal, 32);
    let expected = common::path_length(&graph, &plan.steps);
    assert!((plan.distance - expected).abs() < 1e-12);

    let direction_total: f64 = plan.directions.iter().map(|d| d.distance).sum();
    assert!((direction_total - plan.distance).abs() < 1e-9);
    assert_eq!(plan.directions[0].kind, DirectionKind::Start);
}

fn split_graph() -> RoadGraph {
    let mut builder = GraphBuilder::new();
    builder.add_vertex(1, 0.0, 0.0).unwrap();
    builder.add_vertex(2, 0.0, 0.01).unwrap();
    builder.add_vertex(3, 1.0, 0.0).unwrap();
    builder.add_vertex(4, 1.0, 0.01).unwrap();
    builder.add_edge(1, 2, "Left Loop").unwrap();
    builder.add_edge(3, 4, "Right Loop").unwrap();
    builder.finalize()
}

#[test]
fn disconnected_components_report_path_not_found() {
    let graph = split_graph();
    let err = shortest_path(&graph, 0.0, 0.0, 1.0, 0.01).unwrap_err();
    assert!(matches!(err, Error::PathNotFound { start: 1, goal: 4 }));
    assert!(err.to_string().contains("no path found"));
}

#[test]
fn turn_sequence_through_grid() {
    let graph = common::downtown();
    // West on University, south on Shattuck, east on Allston.
    let directions = route_directions(&graph, &[12, 11, 21, 31, 32]).unwrap();
    let summary: Vec<_> = directions
        .iter()
        .map(|d| (d.kind, d.way_name.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (DirectionKind::Start, "University Ave"),
            (DirectionKind::Left, "Shattuck Ave"),
            (DirectionKind::Left, "Allston Way"),
        ]
    );
}

#[test]
fn rendered_directions_parse_back() {
    let graph = common::downtown();
    let directions = route_directions(&graph, &[10, 20, 21, 22, 32]).unwrap();
    for direction in directions {
        let rounded = Direction::new(
            direction.kind,
            direction.way_name.clone(),
            format!("{:.3}", direction.distance).parse().unwrap(),
        );
        let parsed: Direction = direction.to_string().parse().unwrap();
        assert_eq!(parsed, rounded);
    }
}

#[test]
fn finalized_graph_is_shared_across_threads() {
    let graph = Arc::new(common::downtown());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                let request = if i % 2 == 0 {
                    RouteRequest::new(-122.2690, 37.8700, -122.2650, 37.8661)
                } else {
                    RouteRequest::new(-122.2650, 37.8661, -122.2690, 37.8700)
                };
                let plan = plan_route(&graph, &request).expect("route exists");
                let names = graph.prefix_search("berk");
                (plan.distance, names.len())
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("thread completes"))
        .collect();
    for (distance, names) in &results {
        assert!((distance - results[0].0).abs() < 1e-9);
        assert_eq!(*names, 2);
    }
}
