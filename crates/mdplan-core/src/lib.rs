mod solve;

pub use solve::bellman::{action_value, greedy_policy};
pub use solve::error::SolveError;
pub use solve::evaluation::{evaluate_policy, reward_vector, transition_matrix};
pub use solve::ids::{ActionId, StateId};
pub use solve::model::TabularMdp;
pub use solve::policy::{Policy, ValueFunction};
pub use solve::snapshot::SolutionSnapshot;
pub use solve::value_iteration::{
    Solution, SolverConfig, SolverConfigError, SweepMetrics, value_iteration,
    value_iteration_with_hook,
};
