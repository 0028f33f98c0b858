use proptest::prelude::*;

use super::TableMdp;
use crate::{SolverConfig, StateId, TabularMdp, action_value, evaluate_policy, value_iteration};

const MAX_STATES: usize = 5;
const MAX_ACTIONS: usize = 3;
const CELLS: usize = MAX_STATES * MAX_ACTIONS * MAX_STATES;

/// Turn raw weights into a model where every state has at least one action.
fn build_mdp(states: usize, actions: usize, weights: &[u8], rewards: &[f64]) -> TableMdp {
    let mut rows = Vec::new();
    for s in 0..states {
        for a in 0..actions {
            let base = (s * MAX_ACTIONS + a) * MAX_STATES;
            let mut cell: Vec<u8> = weights[base..base + states].to_vec();
            if a == 0 && cell.iter().all(|w| *w == 0) {
                cell[s] = 1;
            }
            let total: f64 = cell.iter().map(|w| f64::from(*w)).sum();
            for (next, w) in cell.iter().enumerate() {
                if *w > 0 {
                    rows.push((s, a, next, f64::from(*w) / total, rewards[base + next]));
                }
            }
        }
    }
    TableMdp::new(states, actions, &rows)
}

proptest! {
    #[test]
    fn greedy_policy_value_matches_value_iteration(
        states in 1usize..=MAX_STATES,
        actions in 1usize..=MAX_ACTIONS,
        weights in proptest::collection::vec(0u8..4, CELLS),
        rewards in proptest::collection::vec(-5.0f64..5.0, CELLS),
        gamma in 0.1f64..0.9,
    ) {
        let mdp = build_mdp(states, actions, &weights, &rewards);
        let config = SolverConfig { gamma, max_iterations: 100_000, epsilon: 1e-9 };

        let solution = value_iteration(&mdp, &config).expect("solve should succeed");
        prop_assert!(solution.converged);

        let exact =
            evaluate_policy(&mdp, &solution.policy, gamma).expect("evaluation should succeed");
        for (state, value) in exact.iter() {
            prop_assert!((value - solution.values[state]).abs() < 1e-6);
        }

        // No single-step deviation improves on the greedy policy.
        for s in 0..states {
            let state = StateId::from(s);
            for &action in mdp.applicable_actions(state) {
                let q = action_value(&mdp, state, action, gamma, &exact).expect("q should compute");
                prop_assert!(q <= exact[state] + 1e-6);
            }
        }
    }
}
