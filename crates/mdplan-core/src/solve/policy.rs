use std::ops::Index;

use crate::solve::{
    error::SolveError,
    ids::{ActionId, StateId},
    model::TabularMdp,
};

/// Deterministic policy: one action per state, indexed by `StateId`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Policy {
    actions: Vec<ActionId>,
}

impl Policy {
    pub fn new(actions: Vec<ActionId>) -> Self {
        Policy { actions }
    }

    /// Action chosen in `state`, if the state is covered.
    pub fn action(&self, state: StateId) -> Option<ActionId> {
        self.actions.get(state.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn as_slice(&self) -> &[ActionId] {
        &self.actions
    }

    /// Iterate `(state, action)` pairs in state order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, ActionId)> + '_ {
        self.actions
            .iter()
            .enumerate()
            .map(|(idx, action)| (StateId::from(idx), *action))
    }

    /// Check that the policy is total over `mdp` and only picks applicable actions.
    pub fn validate<M: TabularMdp + ?Sized>(&self, mdp: &M) -> Result<(), SolveError> {
        if self.actions.len() != mdp.state_count() {
            return Err(SolveError::PolicyLength {
                expected: mdp.state_count(),
                actual: self.actions.len(),
            });
        }

        for (state, action) in self.iter() {
            if !mdp.applicable_actions(state).contains(&action) {
                return Err(SolveError::InapplicableAction { state, action });
            }
        }

        Ok(())
    }
}

impl FromIterator<ActionId> for Policy {
    fn from_iter<T: IntoIterator<Item = ActionId>>(iter: T) -> Self {
        Policy::new(iter.into_iter().collect())
    }
}

/// State values indexed by `StateId`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueFunction {
    values: Vec<f64>,
}

impl ValueFunction {
    pub fn new(values: Vec<f64>) -> Self {
        ValueFunction { values }
    }

    /// The all-zero value function `V0` over `state_count` states.
    pub fn zeros(state_count: usize) -> Self {
        ValueFunction::new(vec![0.0; state_count])
    }

    pub fn value(&self, state: StateId) -> Option<f64> {
        self.values.get(state.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(idx, value)| (StateId::from(idx), *value))
    }

    /// Largest absolute per-state difference; `0.0` for empty functions.
    pub fn max_abs_diff(&self, other: &ValueFunction) -> f64 {
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl Index<StateId> for ValueFunction {
    type Output = f64;

    fn index(&self, state: StateId) -> &f64 {
        &self.values[state.index()]
    }
}

impl From<Vec<f64>> for ValueFunction {
    fn from(values: Vec<f64>) -> Self {
        ValueFunction::new(values)
    }
}
