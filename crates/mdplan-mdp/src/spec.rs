use std::collections::{HashMap, HashSet};

use mdplan_core::SolverConfig;
use serde::{Deserialize, Serialize};

use crate::interner::describe;
use crate::{MdpError, Model};

/// Floating point tolerance used when validating probability sums.
pub(crate) const PROB_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Serializable MDP schema used for YAML IO and validation.
pub struct ModelSpec {
    /// Schema version for future compatibility checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// State ids, in index order.
    pub states: Vec<String>,
    /// Action ids, in index order.
    pub actions: Vec<String>,
    /// Sparse transition relation.
    #[serde(default)]
    pub transitions: Vec<TransitionSpec>,
    /// Solver settings to use with this model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One registered `(state, action, next)` triple with its probability and reward.
pub struct TransitionSpec {
    pub state: String,
    pub action: String,
    pub next: String,
    pub prob: f64,
    pub reward: f64,
}

impl ModelSpec {
    /// Validate schema invariants using the crate default tolerance.
    pub fn validate(&self) -> Result<(), MdpError> {
        self.validate_with_tolerance(PROB_TOLERANCE)
    }

    /// Validate ids, references, values, and probability sums.
    pub fn validate_with_tolerance(&self, tolerance: f64) -> Result<(), MdpError> {
        let mut state_ids = HashSet::with_capacity(self.states.len());
        for state in &self.states {
            if state.trim().is_empty() {
                return Err(MdpError::EmptyId);
            }
            if !state_ids.insert(state.as_str()) {
                return Err(MdpError::DuplicateState {
                    state: describe(state),
                });
            }
        }

        let mut action_ids = HashSet::with_capacity(self.actions.len());
        for action in &self.actions {
            if action.trim().is_empty() {
                return Err(MdpError::EmptyId);
            }
            if !action_ids.insert(action.as_str()) {
                return Err(MdpError::DuplicateAction {
                    action: describe(action),
                });
            }
        }

        let mut seen = HashSet::with_capacity(self.transitions.len());
        // Insertion-ordered sums so the first offending pair is reported.
        let mut sums: Vec<((&str, &str), f64)> = Vec::new();
        let mut sum_index: HashMap<(&str, &str), usize> = HashMap::new();

        for t in &self.transitions {
            for id in [&t.state, &t.next] {
                if !state_ids.contains(id.as_str()) {
                    return Err(MdpError::UnknownState { state: describe(id) });
                }
            }
            if !action_ids.contains(t.action.as_str()) {
                return Err(MdpError::UnknownAction {
                    action: describe(&t.action),
                });
            }
            if !seen.insert((t.state.as_str(), t.action.as_str(), t.next.as_str())) {
                return Err(MdpError::DuplicateTransition {
                    state: describe(&t.state),
                    action: describe(&t.action),
                    next: describe(&t.next),
                });
            }
            if !t.prob.is_finite() || !(0.0..=1.0).contains(&t.prob) {
                return Err(MdpError::InvalidProbability {
                    state: describe(&t.state),
                    action: describe(&t.action),
                    next: describe(&t.next),
                    value: t.prob,
                });
            }
            if !t.reward.is_finite() {
                return Err(MdpError::InvalidReward {
                    state: describe(&t.state),
                    action: describe(&t.action),
                    next: describe(&t.next),
                    value: t.reward,
                });
            }

            let pair = (t.state.as_str(), t.action.as_str());
            let slot = *sum_index.entry(pair).or_insert_with(|| {
                sums.push((pair, 0.0));
                sums.len() - 1
            });
            sums[slot].1 += t.prob;
        }

        for ((state, action), sum) in sums {
            if (sum - 1.0).abs() > tolerance {
                return Err(MdpError::ProbabilitySum {
                    state: describe(&state),
                    action: describe(&action),
                    sum,
                    tolerance,
                });
            }
        }

        if let Some(config) = &self.solver {
            config.validate()?;
        }

        Ok(())
    }

    /// Validate this spec and build the runtime model.
    pub fn compile(&self) -> Result<Model<String, String>, MdpError> {
        self.validate()?;

        let probabilities = self.transitions.iter().map(|t| {
            (
                (t.state.clone(), t.action.clone(), t.next.clone()),
                t.prob,
            )
        });
        let rewards = self.transitions.iter().map(|t| {
            (
                (t.state.clone(), t.action.clone(), t.next.clone()),
                t.reward,
            )
        });

        Model::new(
            self.states.iter().cloned(),
            self.actions.iter().cloned(),
            probabilities,
            rewards,
        )
    }

    /// Solver settings of this spec, or the defaults.
    pub fn solver_config(&self) -> SolverConfig {
        self.solver.unwrap_or_default()
    }
}
