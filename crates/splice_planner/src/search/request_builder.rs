use splice_oracle::route_request::{RequestId, RouteBatch, RouteRequest};
use tracing::debug;

use crate::problem::{
    candidate::{CandidateInsertion, InsertionPosition},
    insertion_problem::InsertionProblem,
    stop::Stop,
    trip::Trip,
};

/// Builds the routing requests realizing a candidate for the whole fleet.
///
/// The candidate's truck gets the new stop spliced in, other trucks are requested
/// unchanged. Request ids sort in stitching order.
pub struct RequestBuilder<'a> {
    problem: &'a InsertionProblem,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(problem: &'a InsertionProblem) -> Self {
        RequestBuilder { problem }
    }

    pub fn build(&self, candidate: &CandidateInsertion) -> RouteBatch {
        let mut requests = Vec::with_capacity(self.problem.fleet().len() + 2);

        for truck in self.problem.trucks() {
            let trips = self.problem.truck_trips(truck.id());

            if truck.id() == candidate.truck() {
                self.push_candidate_truck(&mut requests, candidate, trips);
            } else {
                for (order, trip) in trips.iter().enumerate() {
                    push_trip(&mut requests, RequestId::new(truck.id().get(), order, 0), trip);
                }
            }
        }

        RouteBatch {
            id: candidate.id().to_string(),
            requests,
        }
    }

    fn push_candidate_truck(
        &self,
        requests: &mut Vec<RouteRequest>,
        candidate: &CandidateInsertion,
        trips: &[Trip],
    ) {
        let truck = candidate.truck().get();
        let stop = candidate.stop();

        match candidate.position() {
            InsertionPosition::Prepend => {
                push_stop_leg(
                    requests,
                    RequestId::new(truck, 0, 0),
                    stop,
                    trips[0].origin(),
                );

                for (order, trip) in trips.iter().enumerate() {
                    let sub_leg = if order == 0 { 1 } else { 0 };
                    push_trip(requests, RequestId::new(truck, order, sub_leg), trip);
                }
            }
            InsertionPosition::Splice { leg } => {
                for (order, trip) in trips.iter().enumerate() {
                    if order == leg {
                        push_stop_leg(
                            requests,
                            RequestId::new(truck, order, 0),
                            trip.origin(),
                            stop,
                        );
                        push_stop_leg(
                            requests,
                            RequestId::new(truck, order, 1),
                            stop,
                            trip.destination(),
                        );
                    } else {
                        push_trip(requests, RequestId::new(truck, order, 0), trip);
                    }
                }
            }
            InsertionPosition::Append => {
                for (order, trip) in trips.iter().enumerate() {
                    push_trip(requests, RequestId::new(truck, order, 0), trip);
                }

                if let Some(last) = trips.last() {
                    push_stop_leg(
                        requests,
                        RequestId::new(truck, trips.len(), 0),
                        last.destination(),
                        stop,
                    );
                }
            }
        }
    }
}

fn push_trip(requests: &mut Vec<RouteRequest>, id: RequestId, trip: &Trip) {
    requests.push(RouteRequest {
        id,
        from: trip.origin().edge().clone(),
        to: trip.destination().edge().clone(),
    });
}

/// Legs touching the new stop are skipped when they would start and end on the
/// same edge.
fn push_stop_leg(requests: &mut Vec<RouteRequest>, id: RequestId, from: &Stop, to: &Stop) {
    if from == to {
        debug!("RequestBuilder: skipping zero-length request {} at {}", id, from);
        return;
    }

    requests.push(RouteRequest {
        id,
        from: from.edge().clone(),
        to: to.edge().clone(),
    });
}

#[cfg(test)]
mod tests {
    use crate::test_utils::create_problem;

    use super::*;

    fn pairs(batch: &RouteBatch) -> Vec<(String, &str, &str)> {
        batch
            .requests
            .iter()
            .map(|r| (r.id.to_string(), r.from.as_str(), r.to.as_str()))
            .collect()
    }

    #[test]
    fn test_splice_replaces_one_leg() {
        let problem = create_problem(&[("a", "b"), ("b", "c"), ("c", "d")], "x");
        let candidates = problem.candidates(false);
        let batch = RequestBuilder::new(&problem).build(&candidates[1]);

        assert_eq!(batch.id, "1");
        assert_eq!(
            pairs(&batch),
            vec![
                (String::from("0_0_0"), "a", "b"),
                (String::from("0_1_0"), "b", "x"),
                (String::from("0_1_1"), "x", "c"),
                (String::from("0_2_0"), "c", "d"),
            ]
        );
    }

    #[test]
    fn test_append_and_other_trucks_unchanged() {
        let problem = create_problem(&[("a", "b"), ("p", "q"), ("q", "r")], "x");
        let candidates = problem.candidates(false);
        // truck 0: splice 0, append; truck 1: splice 0, splice 1, append
        let batch = RequestBuilder::new(&problem).build(&candidates[4]);

        assert_eq!(
            pairs(&batch),
            vec![
                (String::from("0_0_0"), "a", "b"),
                (String::from("1_0_0"), "p", "q"),
                (String::from("1_1_0"), "q", "r"),
                (String::from("1_2_0"), "r", "x"),
            ]
        );
    }

    #[test]
    fn test_prepend_orders_before_first_leg() {
        let problem = create_problem(&[("a", "b"), ("b", "c")], "x");
        let candidates = problem.candidates(true);
        let prepend = candidates.last().unwrap();
        let batch = RequestBuilder::new(&problem).build(prepend);

        assert_eq!(
            pairs(&batch),
            vec![
                (String::from("0_0_0"), "x", "a"),
                (String::from("0_0_1"), "a", "b"),
                (String::from("0_1_0"), "b", "c"),
            ]
        );

        let mut sorted = batch.requests.clone();
        sorted.sort_by_key(|r| r.id);
        assert_eq!(sorted, batch.requests);
    }

    #[test]
    fn test_skips_zero_length_request_to_new_stop() {
        let problem = create_problem(&[("a", "b"), ("b", "c")], "b");
        let candidates = problem.candidates(false);

        // Splicing leg 1 (b -> c) would request b -> b first
        let batch = RequestBuilder::new(&problem).build(&candidates[1]);
        assert_eq!(
            pairs(&batch),
            vec![
                (String::from("0_0_0"), "a", "b"),
                (String::from("0_1_1"), "b", "c"),
            ]
        );

        // Splicing leg 0 (a -> b) would request b -> b second
        let batch = RequestBuilder::new(&problem).build(&candidates[0]);
        assert_eq!(
            pairs(&batch),
            vec![
                (String::from("0_0_0"), "a", "b"),
                (String::from("0_1_0"), "b", "c"),
            ]
        );
    }

    #[test]
    fn test_skips_zero_length_prepend() {
        let problem = create_problem(&[("a", "b"), ("b", "c")], "a");
        let candidates = problem.candidates(true);
        let prepend = candidates.last().unwrap();
        assert_eq!(prepend.position(), InsertionPosition::Prepend);

        let batch = RequestBuilder::new(&problem).build(prepend);

        assert_eq!(
            pairs(&batch),
            vec![
                (String::from("0_0_1"), "a", "b"),
                (String::from("0_1_0"), "b", "c"),
            ]
        );
    }

    #[test]
    fn test_skips_zero_length_append() {
        let problem = create_problem(&[("a", "b"), ("b", "c")], "c");
        let candidates = problem.candidates(false);
        assert_eq!(candidates[2].position(), InsertionPosition::Append);

        let batch = RequestBuilder::new(&problem).build(&candidates[2]);

        assert_eq!(
            pairs(&batch),
            vec![
                (String::from("0_0_0"), "a", "b"),
                (String::from("0_1_0"), "b", "c"),
            ]
        );
    }
}
