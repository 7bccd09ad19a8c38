pub mod error;
pub mod json;
pub mod problem;
pub mod search;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
