use super::route_stitcher::AlternativeSelection;

#[derive(Clone, Debug)]
pub struct SearchParams {
    /// Workers evaluating candidates, each blocking on its own oracle call
    pub threads: Threads,
    pub selection: AlternativeSelection,
    pub include_fleet_start: bool,
}

#[derive(Clone, Debug)]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => (*num).max(1),
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            threads: Threads::Auto,
            selection: AlternativeSelection::Continuity,
            include_fleet_start: true,
        }
    }
}
