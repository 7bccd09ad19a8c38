use serde::{Deserialize, Serialize};
use splice_oracle::{edge_id::EdgeId, route_request::RequestId, route_response::RouteAlternative};
use tracing::debug;

use crate::problem::truck::TruckIdx;

/// How the stitcher picks one path out of a route distribution.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlternativeSelection {
    /// The alternative the router marked as chosen
    Chosen,
    /// The cheapest alternative continuing the previous leg's terminal edge,
    /// falling back to the cheapest overall.
    ///
    /// Validated responses all start on their request's origin, so within a
    /// search this is the cheapest alternative of each distribution.
    #[default]
    Continuity,
}

/// A routed leg with every alternative the oracle returned for it.
#[derive(Debug, Clone)]
pub struct RouteLeg {
    pub id: RequestId,
    pub alternatives: Vec<RouteAlternative>,
    pub chosen: usize,
}

/// The alternative a leg was stitched with. Its cost is the one aggregated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StitchedLeg {
    pub id: RequestId,
    pub alternative: usize,
    pub cost: f64,
}

/// One truck's legs merged into a single continuous edge sequence.
#[derive(Debug, Clone, Serialize)]
pub struct MergedRoute {
    pub truck: TruckIdx,
    pub edges: Vec<EdgeId>,
    pub legs: Vec<StitchedLeg>,
}

/// Appends `segment` to `edges`, dropping its first edge when it repeats the
/// last edge of `edges`. Returns whether an edge was dropped.
pub fn append_segment(edges: &mut Vec<EdgeId>, segment: &[EdgeId]) -> bool {
    match (edges.last(), segment.first()) {
        (Some(last), Some(first)) if last == first => {
            edges.extend_from_slice(&segment[1..]);
            true
        }
        _ => {
            edges.extend_from_slice(segment);
            false
        }
    }
}

fn cheapest<'a>(alternatives: impl Iterator<Item = (usize, &'a RouteAlternative)>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, alternative) in alternatives {
        if best.is_none_or(|(_, cost)| alternative.cost < cost) {
            best = Some((index, alternative.cost));
        }
    }

    best.map(|(index, _)| index)
}

pub struct RouteStitcher {
    selection: AlternativeSelection,
}

impl RouteStitcher {
    pub fn new(selection: AlternativeSelection) -> Self {
        RouteStitcher { selection }
    }

    /// Index of the alternative used for `leg` given the edge the route
    /// currently ends on.
    pub fn select(&self, leg: &RouteLeg, previous: Option<&EdgeId>) -> usize {
        match self.selection {
            AlternativeSelection::Chosen => leg.chosen,
            AlternativeSelection::Continuity => {
                let continuing = previous.and_then(|previous| {
                    cheapest(
                        leg.alternatives
                            .iter()
                            .enumerate()
                            .filter(|(_, alternative)| alternative.first_edge() == Some(previous)),
                    )
                });

                continuing
                    .or_else(|| cheapest(leg.alternatives.iter().enumerate()))
                    .unwrap_or(leg.chosen)
            }
        }
    }

    /// Merges a truck's legs, given in stitching order.
    pub fn stitch(&self, truck: TruckIdx, legs: &[RouteLeg]) -> MergedRoute {
        let mut edges: Vec<EdgeId> = Vec::new();
        let mut stitched = Vec::with_capacity(legs.len());
        let mut duplicates = 0;

        for leg in legs {
            let index = self.select(leg, edges.last());
            let alternative = &leg.alternatives[index];

            if append_segment(&mut edges, &alternative.edges) {
                duplicates += 1;
            }

            stitched.push(StitchedLeg {
                id: leg.id,
                alternative: index,
                cost: alternative.cost,
            });
        }

        debug!(
            "RouteStitcher: truck {} merged {} legs into {} edges ({} shared boundaries)",
            truck,
            legs.len(),
            edges.len(),
            duplicates
        );

        MergedRoute {
            truck,
            edges,
            legs: stitched,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{alternative, edges, route_leg};

    use super::*;

    #[test]
    fn test_shared_boundary_edge_is_kept_once() {
        let a = edges(&["a", "m", "b"]);
        let b = edges(&["b", "n", "c", "d"]);
        let mut merged = Vec::new();

        assert!(!append_segment(&mut merged, &a));
        assert!(append_segment(&mut merged, &b));

        assert_eq!(merged.len(), a.len() + b.len() - 1);
        assert_eq!(merged, edges(&["a", "m", "b", "n", "c", "d"]));
        assert_eq!(merged.iter().filter(|e| e.as_str() == "b").count(), 1);
    }

    #[test]
    fn test_disjoint_segments_are_concatenated() {
        let a = edges(&["a", "b"]);
        let b = edges(&["-b", "c"]);
        let mut merged = Vec::new();

        append_segment(&mut merged, &a);
        assert!(!append_segment(&mut merged, &b));

        assert_eq!(merged.len(), a.len() + b.len());
        assert_eq!(merged, edges(&["a", "b", "-b", "c"]));
    }

    #[test]
    fn test_single_edge_segment_on_boundary() {
        let mut merged = edges(&["a", "b"]);
        assert!(append_segment(&mut merged, &edges(&["b"])));
        assert_eq!(merged, edges(&["a", "b"]));
    }

    #[test]
    fn test_stitch_records_chosen_alternatives() {
        let stitcher = RouteStitcher::new(AlternativeSelection::Chosen);
        let legs = vec![
            route_leg((0, 0, 0), vec![alternative(&["a", "b"], 2.0)], 0),
            route_leg(
                (0, 1, 0),
                vec![alternative(&["b", "c"], 3.0), alternative(&["x", "c"], 1.0)],
                0,
            ),
            route_leg((0, 2, 0), vec![alternative(&["c", "d"], 4.0)], 0),
        ];

        let route = stitcher.stitch(TruckIdx::new(0), &legs);

        assert_eq!(route.edges, edges(&["a", "b", "c", "d"]));
        assert_eq!(
            route.legs.iter().map(|l| l.cost).collect::<Vec<_>>(),
            vec![2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn test_continuity_picks_cheapest_continuing_alternative() {
        let stitcher = RouteStitcher::new(AlternativeSelection::Continuity);
        let legs = vec![
            route_leg((0, 0, 0), vec![alternative(&["a", "b"], 2.0)], 0),
            route_leg(
                (0, 1, 0),
                vec![
                    alternative(&["b", "y", "c"], 6.0),
                    alternative(&["b", "z", "c"], 5.0),
                    alternative(&["b", "w", "c"], 5.0),
                ],
                0,
            ),
        ];

        let route = stitcher.stitch(TruckIdx::new(0), &legs);

        assert_eq!(route.legs[1].alternative, 1);
        assert_eq!(route.legs[1].cost, 5.0);
        assert_eq!(route.edges, edges(&["a", "b", "z", "c"]));
    }

    #[test]
    fn test_continuity_after_reversed_trip() {
        let stitcher = RouteStitcher::new(AlternativeSelection::Continuity);
        let legs = vec![
            route_leg((0, 0, 0), vec![alternative(&["a", "b"], 2.0)], 0),
            route_leg(
                (0, 1, 0),
                vec![
                    alternative(&["-b", "y", "c"], 4.0),
                    alternative(&["-b", "c"], 3.0),
                ],
                0,
            ),
        ];

        let route = stitcher.stitch(TruckIdx::new(0), &legs);

        assert_eq!(route.legs[1].alternative, 1);
        assert_eq!(route.edges, edges(&["a", "b", "-b", "c"]));
    }

    #[test]
    fn test_continuity_falls_back_to_cheapest() {
        let stitcher = RouteStitcher::new(AlternativeSelection::Continuity);
        let leg = route_leg(
            (0, 0, 0),
            vec![
                alternative(&["a", "x", "b"], 4.0),
                alternative(&["a", "b"], 3.0),
                alternative(&["a", "y", "b"], 3.0),
            ],
            0,
        );

        assert_eq!(stitcher.select(&leg, None), 1);
        assert_eq!(stitcher.select(&leg, Some(&EdgeId::from("q"))), 1);
    }
}
