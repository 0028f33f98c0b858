pub mod bellman;
pub mod error;
pub mod evaluation;
pub mod ids;
pub mod model;
pub mod policy;
pub mod snapshot;
pub mod value_iteration;

#[cfg(test)]
mod tests;
