//! Common test utilities and fixture graphs.

use mapserve_lib::{GraphBuilder, RoadGraph, VertexId};

/// Four collinear vertices A(0,0) B(0,1) C(0,2) D(0,3) joined along "Main St".
#[allow(dead_code)]
pub fn main_street() -> RoadGraph {
    let mut builder = GraphBuilder::new();
    for (id, lat) in [(1, 0.0), (2, 1.0), (3, 2.0), (4, 3.0)] {
        builder.add_vertex(id, 0.0, lat).expect("unique vertex");
    }
    for (v, w) in [(1, 2), (2, 3), (3, 4)] {
        builder.add_edge(v, w, "Main St").expect("known endpoints");
    }
    builder.finalize()
}

/// Small neighbourhood around downtown Berkeley with named places.
#[allow(dead_code)]
pub fn downtown() -> RoadGraph {
    let vertices: [(VertexId, f64, f64); 9] = [
        (10, -122.2690, 37.8700),
        (11, -122.2670, 37.8700),
        (12, -122.2650, 37.8700),
        (20, -122.2690, 37.8680),
        (21, -122.2670, 37.8682),
        (22, -122.2650, 37.8680),
        (30, -122.2690, 37.8660),
        (31, -122.2670, 37.8660),
        (32, -122.2650, 37.8661),
    ];
    let edges: [(VertexId, VertexId, &str); 12] = [
        (10, 11, "University Ave"),
        (11, 12, "University Ave"),
        (20, 21, "Center St"),
        (21, 22, "Center St"),
        (30, 31, "Allston Way"),
        (31, 32, "Allston Way"),
        (10, 20, "Milvia St"),
        (20, 30, "Milvia St"),
        (11, 21, "Shattuck Ave"),
        (21, 31, "Shattuck Ave"),
        (12, 22, "Oxford St"),
        (22, 32, "Oxford St"),
    ];
    let places: [(&str, VertexId); 6] = [
        ("Downtown Berkeley BART", 21),
        ("Berkeley Public Library", 31),
        ("Berkeley Rep", 22),
        ("Top Dog", 12),
        ("Top Dog", 30),
        ("Toy Shop", 11),
    ];

    let mut builder = GraphBuilder::new();
    for (id, lon, lat) in vertices {
        builder.add_vertex(id, lon, lat).expect("unique vertex");
    }
    // Isolated landmark that is pruned from routing but stays searchable.
    builder
        .add_vertex(99, -122.2600, 37.8720)
        .expect("unique vertex");
    for (v, w, way) in edges {
        builder.add_edge(v, w, way).expect("known endpoints");
    }
    for (name, id) in places {
        builder.add_place_name(name, id).expect("known vertex");
    }
    builder
        .add_place_name("Campanile", 99)
        .expect("known vertex");
    builder.finalize()
}

/// Total great-circle length of a path.
#[allow(dead_code)]
pub fn path_length(graph: &RoadGraph, path: &[VertexId]) -> f64 {
    path.windows(2)
        .map(|pair| graph.distance(pair[0], pair[1]).expect("known vertices"))
        .sum()
}

/// Shortest simple-path length by exhaustive depth-first enumeration.
#[allow(dead_code)]
pub fn brute_force_shortest(graph: &RoadGraph, start: VertexId, goal: VertexId) -> Option<f64> {
    fn explore(
        graph: &RoadGraph,
        current: VertexId,
        goal: VertexId,
        travelled: f64,
        on_path: &mut Vec<VertexId>,
        best: &mut Option<f64>,
    ) {
        if current == goal {
            if best.map_or(true, |b| travelled < b) {
                *best = Some(travelled);
            }
            return;
        }
        let neighbours: Vec<VertexId> = graph
            .ways(current)
            .expect("known vertex")
            .keys()
            .copied()
            .collect();
        for next in neighbours {
            if on_path.contains(&next) {
                continue;
            }
            let step = graph.distance(current, next).expect("known vertices");
            on_path.push(next);
            explore(graph, next, goal, travelled + step, on_path, best);
            on_path.pop();
        }
    }

    let mut best = None;
    let mut on_path = vec![start];
    explore(graph, start, goal, 0.0, &mut on_path, &mut best);
    best
}
