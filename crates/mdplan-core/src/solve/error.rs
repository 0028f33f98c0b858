use std::fmt;

use crate::solve::ids::{ActionId, StateId};

/// Error type for policy evaluation and value iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// A successor was listed for `(state, action)` but no probability is registered.
    MissingProbability {
        state: StateId,
        action: ActionId,
        next: StateId,
    },
    /// A transition exists for `(state, action, next)` but no reward is registered.
    MissingReward {
        state: StateId,
        action: ActionId,
        next: StateId,
    },
    /// The Bellman maximum is undefined because the state has no applicable action.
    NoApplicableAction { state: StateId },
    /// `I - gamma * P` has no inverse, so the policy has no unique value function.
    SingularMatrix,
    /// The policy does not assign exactly one action per state.
    PolicyLength { expected: usize, actual: usize },
    /// The policy picks an action with no registered transition from its state.
    InapplicableAction { state: StateId, action: ActionId },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::MissingProbability {
                state,
                action,
                next,
            } => write!(
                f,
                "no transition probability for state {}, action {}, next state {}",
                state.index(),
                action.index(),
                next.index()
            ),
            SolveError::MissingReward {
                state,
                action,
                next,
            } => write!(
                f,
                "no reward for state {}, action {}, next state {}",
                state.index(),
                action.index(),
                next.index()
            ),
            SolveError::NoApplicableAction { state } => {
                write!(f, "state {} has no applicable action", state.index())
            }
            SolveError::SingularMatrix => {
                write!(f, "policy evaluation system is singular")
            }
            SolveError::PolicyLength { expected, actual } => write!(
                f,
                "policy covers {actual} states but the model has {expected}"
            ),
            SolveError::InapplicableAction { state, action } => write!(
                f,
                "policy selects action {} which is not applicable in state {}",
                action.index(),
                state.index()
            ),
        }
    }
}

impl std::error::Error for SolveError {}
