use serde::Serialize;

use super::route_stitcher::MergedRoute;

/// Merged routes of every truck for one candidate, with their costs.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateRoutes {
    pub routes: Vec<MergedRoute>,
    pub truck_costs: Vec<f64>,
    pub total_cost: f64,
}

pub struct CostAggregator;

impl CostAggregator {
    /// Sum of the costs of the alternatives the truck's legs were stitched with.
    pub fn truck_cost(route: &MergedRoute) -> f64 {
        route.legs.iter().map(|leg| leg.cost).sum()
    }

    pub fn aggregate(routes: Vec<MergedRoute>) -> CandidateRoutes {
        let truck_costs: Vec<f64> = routes.iter().map(Self::truck_cost).collect();
        let total_cost = truck_costs.iter().sum();

        CandidateRoutes {
            routes,
            truck_costs,
            total_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use splice_oracle::route_request::RequestId;

    use crate::{problem::truck::TruckIdx, search::route_stitcher::StitchedLeg};

    use super::*;

    fn merged_route(truck: usize, costs: &[f64]) -> MergedRoute {
        MergedRoute {
            truck: TruckIdx::new(truck),
            edges: vec![],
            legs: costs
                .iter()
                .enumerate()
                .map(|(order, &cost)| StitchedLeg {
                    id: RequestId::new(truck, order, 0),
                    alternative: 0,
                    cost,
                })
                .collect(),
        }
    }

    #[test]
    fn test_truck_cost_sums_legs() {
        let costs = [0.1, 0.2, 0.3, 1234.567, 1e-3];
        let route = merged_route(0, &costs);

        assert!((CostAggregator::truck_cost(&route) - 1234.868).abs() < 1e-6);
    }

    #[test]
    fn test_aggregate_sums_trucks() {
        let candidate = CostAggregator::aggregate(vec![
            merged_route(0, &[2.0, 2.0, 3.0, 4.0]),
            merged_route(1, &[1.5]),
            merged_route(2, &[]),
        ]);

        assert_eq!(candidate.truck_costs, vec![11.0, 1.5, 0.0]);
        assert!((candidate.total_cost - 12.5).abs() < 1e-6);
    }
}
