mod evaluation_tests;
mod property_solver_tests;

use std::collections::HashMap;

use crate::{ActionId, StateId, TabularMdp};

/// Minimal table-backed MDP used by the unit tests.
#[derive(Debug, Clone)]
pub(super) struct TableMdp {
    applicable: Vec<Vec<ActionId>>,
    successors: Vec<Vec<Vec<StateId>>>,
    probabilities: HashMap<(usize, usize, usize), f64>,
    rewards: HashMap<(usize, usize, usize), f64>,
}

impl TableMdp {
    /// Build from `(state, action, next, prob, reward)` rows.
    pub(super) fn new(
        states: usize,
        actions: usize,
        rows: &[(usize, usize, usize, f64, f64)],
    ) -> Self {
        let mut successors = vec![vec![Vec::new(); actions]; states];
        let mut probabilities = HashMap::new();
        let mut rewards = HashMap::new();

        for &(s, a, next, prob, reward) in rows {
            successors[s][a].push(StateId::from(next));
            probabilities.insert((s, a, next), prob);
            rewards.insert((s, a, next), reward);
        }
        for per_action in &mut successors {
            for list in per_action.iter_mut() {
                list.sort();
            }
        }

        let applicable = successors
            .iter()
            .map(|per_action| {
                per_action
                    .iter()
                    .enumerate()
                    .filter(|(_, list)| !list.is_empty())
                    .map(|(a, _)| ActionId::from(a))
                    .collect()
            })
            .collect();

        TableMdp {
            applicable,
            successors,
            probabilities,
            rewards,
        }
    }

    pub(super) fn without_reward(mut self, s: usize, a: usize, next: usize) -> Self {
        self.rewards.remove(&(s, a, next));
        self
    }

    /// States (s1, s2), actions (a1, a2).
    pub(super) fn two_state() -> Self {
        TableMdp::new(
            2,
            2,
            &[
                (0, 0, 0, 0.9, 20.0),
                (0, 0, 1, 0.1, 0.0),
                (1, 1, 0, 1.0, 0.0),
            ],
        )
    }

    /// States (a, b, c), actions (1, 2).
    pub(super) fn three_state() -> Self {
        TableMdp::new(
            3,
            2,
            &[
                (0, 0, 1, 1.0, 0.0),
                (0, 1, 2, 1.0, 0.0),
                (1, 0, 0, 0.5, 1.0),
                (1, 0, 2, 0.5, 1.0),
                (1, 1, 0, 0.5, 1.0),
                (1, 1, 2, 0.5, 1.0),
                (2, 0, 0, 0.2, 2.0),
                (2, 0, 1, 0.8, 2.0),
                (2, 1, 0, 0.7, 2.0),
                (2, 1, 1, 0.3, 2.0),
            ],
        )
    }
}

impl TabularMdp for TableMdp {
    fn state_count(&self) -> usize {
        self.successors.len()
    }

    fn applicable_actions(&self, state: StateId) -> &[ActionId] {
        self.applicable
            .get(state.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn successor_states(&self, state: StateId, action: ActionId) -> &[StateId] {
        self.successors
            .get(state.index())
            .and_then(|per_action| per_action.get(action.index()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn probability(&self, state: StateId, action: ActionId, next: StateId) -> Option<f64> {
        self.probabilities
            .get(&(state.index(), action.index(), next.index()))
            .copied()
    }

    fn reward(&self, state: StateId, action: ActionId, next: StateId) -> Option<f64> {
        self.rewards
            .get(&(state.index(), action.index(), next.index()))
            .copied()
    }
}

pub(super) fn policy(actions: &[usize]) -> crate::Policy {
    actions.iter().map(|&a| ActionId::from(a)).collect()
}
