pub mod candidate;
pub mod fleet;
pub mod insertion_problem;
pub mod stop;
pub mod trip;
pub mod truck;
