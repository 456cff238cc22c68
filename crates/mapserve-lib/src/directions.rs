//! Turn-by-turn directions synthesized from a vertex path.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geo::relative_bearing;
use crate::graph::{RoadGraph, VertexId};

/// Way name used by the ingestion feed for ways that carry no name.
pub const UNKNOWN_ROAD: &str = "unknown road";

const DISTANCE_SEPARATOR: &str = " and continue for ";
const WAY_SEPARATOR: &str = " on ";
const UNIT_SUFFIX: &str = " miles.";

/// Manoeuvre that begins a [`Direction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionKind {
    Start,
    Straight,
    SlightLeft,
    SlightRight,
    Left,
    Right,
    SharpLeft,
    SharpRight,
}

impl DirectionKind {
    pub const ALL: [DirectionKind; 8] = [
        DirectionKind::Start,
        DirectionKind::Straight,
        DirectionKind::SlightLeft,
        DirectionKind::SlightRight,
        DirectionKind::Left,
        DirectionKind::Right,
        DirectionKind::SharpLeft,
        DirectionKind::SharpRight,
    ];

    /// Human-readable label used in rendered directions.
    pub fn label(self) -> &'static str {
        match self {
            DirectionKind::Start => "Start",
            DirectionKind::Straight => "Go straight",
            DirectionKind::SlightLeft => "Slight left",
            DirectionKind::SlightRight => "Slight right",
            DirectionKind::Left => "Turn left",
            DirectionKind::Right => "Turn right",
            DirectionKind::SharpLeft => "Sharp left",
            DirectionKind::SharpRight => "Sharp right",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    /// Classify a relative bearing in degrees. Negative is left.
    pub fn from_relative_bearing(relative: f64) -> Self {
        if (-15.0..=15.0).contains(&relative) {
            DirectionKind::Straight
        } else if (-30.0..0.0).contains(&relative) {
            DirectionKind::SlightLeft
        } else if relative > 0.0 && relative <= 30.0 {
            DirectionKind::SlightRight
        } else if (-100.0..0.0).contains(&relative) {
            DirectionKind::Left
        } else if relative > 0.0 && relative <= 100.0 {
            DirectionKind::Right
        } else if relative < 0.0 {
            DirectionKind::SharpLeft
        } else {
            DirectionKind::SharpRight
        }
    }
}

impl fmt::Display for DirectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One leg of turn-by-turn directions: a manoeuvre onto a way followed by a
/// distance travelled along it.
///
/// Equality compares all three fields by value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Direction {
    pub kind: DirectionKind,
    pub way_name: String,
    /// Distance in miles.
    pub distance: f64,
}

impl Direction {
    pub fn new(kind: DirectionKind, way_name: impl Into<String>, distance: f64) -> Self {
        Self {
            kind,
            way_name: way_name.into(),
            distance,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{:.3}{}",
            self.kind.label(),
            WAY_SEPARATOR,
            self.way_name,
            DISTANCE_SEPARATOR,
            self.distance,
            UNIT_SUFFIX
        )
    }
}

impl FromStr for Direction {
    type Err = Error;

    /// Parse the exact text produced by [`Display`](fmt::Display).
    fn from_str(input: &str) -> Result<Self> {
        let malformed = || Error::MalformedDirectionString {
            input: input.to_string(),
        };

        let body = input.strip_suffix(UNIT_SUFFIX).ok_or_else(malformed)?;
        let (head, distance) = body.rsplit_once(DISTANCE_SEPARATOR).ok_or_else(malformed)?;
        let (label, way_name) = head.split_once(WAY_SEPARATOR).ok_or_else(malformed)?;

        let kind = DirectionKind::from_label(label).ok_or_else(malformed)?;
        if distance.is_empty() || !distance.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(malformed());
        }
        let distance: f64 = distance.parse().map_err(|_| malformed())?;

        Ok(Direction::new(kind, way_name, distance))
    }
}

/// Turn a vertex path into directions.
///
/// Consecutive edges on the same way are merged into one entry. When the way
/// changes, a new entry starts whose kind is derived from the turn between
/// the incoming and outgoing edges.
pub fn route_directions(graph: &RoadGraph, route: &[VertexId]) -> Result<Vec<Direction>> {
    if route.len() < 2 {
        return Err(Error::UnderspecifiedRoute { len: route.len() });
    }

    let mut legs = Vec::with_capacity(route.len() - 1);
    for pair in route.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let way = graph
            .way_between(from, to)
            .ok_or(Error::InvalidRoute { from, to })?;
        legs.push((from, to, way, graph.distance(from, to)?));
    }

    let (_, _, first_way, first_distance) = legs[0];
    let mut open = Direction::new(DirectionKind::Start, first_way, first_distance);
    let mut directions = Vec::new();

    for window in legs.windows(2) {
        let (previous, current, _, _) = window[0];
        let (_, next, way, distance) = window[1];

        if open.way_name != way {
            let heading = graph.bearing(previous, current)?;
            let next_bearing = graph.bearing(current, next)?;
            let kind = DirectionKind::from_relative_bearing(relative_bearing(heading, next_bearing));
            directions.push(std::mem::replace(&mut open, Direction::new(kind, way, 0.0)));
        }
        open.distance += distance;
    }

    directions.push(open);
    Ok(directions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    #[test]
    fn classifies_bearing_boundaries() {
        use DirectionKind::*;
        let cases = [
            (0.0, Straight),
            (15.0, Straight),
            (-15.0, Straight),
            (-15.5, SlightLeft),
            (-30.0, SlightLeft),
            (15.5, SlightRight),
            (30.0, SlightRight),
            (-30.5, Left),
            (-100.0, Left),
            (30.5, Right),
            (100.0, Right),
            (-100.5, SharpLeft),
            (-180.0, SharpLeft),
            (100.5, SharpRight),
            (179.9, SharpRight),
        ];
        for (relative, expected) in cases {
            assert_eq!(
                DirectionKind::from_relative_bearing(relative),
                expected,
                "relative bearing {relative}"
            );
        }
    }

    #[test]
    fn renders_expected_text() {
        let direction = Direction::new(DirectionKind::SlightLeft, "Shattuck Ave", 0.12345);
        assert_eq!(
            direction.to_string(),
            "Slight left on Shattuck Ave and continue for 0.123 miles."
        );
    }

    #[test]
    fn round_trips_every_kind() {
        for kind in DirectionKind::ALL {
            let direction = Direction::new(kind, "College Ave", 1.25);
            let parsed: Direction = direction.to_string().parse().unwrap();
            assert_eq!(parsed, direction);
        }
    }

    #[test]
    fn parses_way_names_containing_separators() {
        let parsed: Direction = "Turn right on Road on the Hill and continue for 2.000 miles."
            .parse()
            .unwrap();
        assert_eq!(parsed.kind, DirectionKind::Right);
        assert_eq!(parsed.way_name, "Road on the Hill");
        assert_eq!(parsed.distance, 2.0);
    }

    #[test]
    fn rejects_malformed_strings() {
        for input in [
            "",
            "Start on Main St",
            "Hop left on Main St and continue for 1.000 miles.",
            "Start on Main St and continue for -1.000 miles.",
            "Start on Main St and continue for abc miles.",
            "Start on Main St and continue for 1.000 km.",
            "Start Main St and continue for 1.000 miles.",
            "Start on Main St and continue for . miles.",
        ] {
            let err = input.parse::<Direction>().unwrap_err();
            assert!(
                matches!(err, Error::MalformedDirectionString { .. }),
                "{input:?} should be malformed"
            );
        }
    }

    fn city_block() -> RoadGraph {
        // 1 -> 2 heads north on Oxford St, 2 -> 3 turns east onto Hearst Ave,
        // 3 -> 4 keeps east on Hearst Ave.
        let mut builder = GraphBuilder::new();
        builder.add_vertex(1, 0.0, 0.0).unwrap();
        builder.add_vertex(2, 0.0, 0.01).unwrap();
        builder.add_vertex(3, 0.01, 0.01).unwrap();
        builder.add_vertex(4, 0.02, 0.01).unwrap();
        builder.add_vertex(5, 0.02, 0.0).unwrap();
        builder.add_edge(1, 2, "Oxford St").unwrap();
        builder.add_edge(2, 3, "Hearst Ave").unwrap();
        builder.add_edge(3, 4, "Hearst Ave").unwrap();
        builder.add_edge(4, 5, "Euclid Ave").unwrap();
        builder.finalize()
    }

    #[test]
    fn synthesizes_turns_and_merges_same_way() {
        let graph = city_block();
        let directions = route_directions(&graph, &[1, 2, 3, 4, 5]).unwrap();

        let kinds: Vec<_> = directions.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DirectionKind::Start,
                DirectionKind::Right,
                DirectionKind::Right
            ]
        );
        assert_eq!(directions[0].way_name, "Oxford St");
        assert_eq!(directions[1].way_name, "Hearst Ave");
        assert_eq!(directions[2].way_name, "Euclid Ave");

        let hearst = graph.distance(2, 3).unwrap() + graph.distance(3, 4).unwrap();
        assert!((directions[1].distance - hearst).abs() < 1e-12);
    }

    #[test]
    fn reversed_route_turns_left() {
        let graph = city_block();
        let directions = route_directions(&graph, &[5, 4, 3, 2, 1]).unwrap();
        let kinds: Vec<_> = directions.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DirectionKind::Start,
                DirectionKind::Left,
                DirectionKind::Left
            ]
        );
    }

    #[test]
    fn single_edge_route_is_one_start_entry() {
        let graph = city_block();
        let directions = route_directions(&graph, &[1, 2]).unwrap();
        assert_eq!(
            directions,
            vec![Direction::new(
                DirectionKind::Start,
                "Oxford St",
                graph.distance(1, 2).unwrap()
            )]
        );
    }

    #[test]
    fn short_routes_are_underspecified() {
        let graph = city_block();
        assert!(matches!(
            route_directions(&graph, &[]),
            Err(Error::UnderspecifiedRoute { len: 0 })
        ));
        assert!(matches!(
            route_directions(&graph, &[1]),
            Err(Error::UnderspecifiedRoute { len: 1 })
        ));
    }

    #[test]
    fn disconnected_pairs_are_invalid() {
        let graph = city_block();
        assert!(matches!(
            route_directions(&graph, &[1, 2, 4]),
            Err(Error::InvalidRoute { from: 2, to: 4 })
        ));
    }
}
