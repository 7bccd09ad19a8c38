pub mod artifacts;
pub mod candidate_evaluation;
pub mod cost_aggregator;
pub mod insertion_search;
pub mod report;
pub mod request_builder;
pub mod route_stitcher;
pub mod search_outcome;
pub mod search_params;
