use std::collections::HashMap;

use mdplan_core::{
    ActionId, Policy, Solution, SolveError, SolverConfig, StateId, SweepMetrics, TabularMdp,
    ValueFunction, evaluate_policy, value_iteration_with_hook,
};
use serde::Serialize;

use crate::interner::describe;
use crate::{Label, MdpError, Model, Table};

/// One row of a labeled solution: the chosen action and the value of a state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateReport<S, A> {
    pub state: S,
    pub action: A,
    pub value: f64,
}

/// Labeled summary of a value iteration run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionReport<S, A> {
    pub iterations: usize,
    pub converged: bool,
    pub states: Vec<StateReport<S, A>>,
}

impl<S: Serialize, A: Serialize> SolutionReport<S, A> {
    pub fn to_yaml(&self) -> Result<String, MdpError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl<S: Label, A: Label> Model<S, A> {
    /// Convert a labeled policy into a dense one.
    ///
    /// Every state must be mapped, every key and action must belong to the model,
    /// and every chosen action must be applicable in its state.
    pub fn policy_from_map(&self, policy: &HashMap<S, A>) -> Result<Policy, MdpError> {
        for state in policy.keys() {
            self.require_state(state)?;
        }

        let mut actions = Vec::with_capacity(self.states().len());
        for (idx, state) in self.states().iter().enumerate() {
            let label = policy
                .get(state)
                .ok_or_else(|| MdpError::MissingPolicyAction {
                    state: describe(state),
                })?;
            let action = self.require_action(label)?;
            if !TabularMdp::applicable_actions(self, StateId::from(idx)).contains(&action) {
                return Err(MdpError::InapplicableAction {
                    state: describe(state),
                    action: describe(label),
                });
            }
            actions.push(action);
        }

        Ok(Policy::new(actions))
    }

    /// Labeled view of a dense policy.
    pub fn policy_map(&self, policy: &Policy) -> HashMap<S, A> {
        policy
            .iter()
            .filter_map(|(state, action)| {
                Some((self.state(state)?.clone(), self.action(action)?.clone()))
            })
            .collect()
    }

    /// Labeled view of a dense value function.
    pub fn value_map(&self, values: &ValueFunction) -> HashMap<S, f64> {
        values
            .iter()
            .filter_map(|(state, value)| Some((self.state(state)?.clone(), value)))
            .collect()
    }

    /// Value of `state` in `values`, if both know it.
    pub fn value_of(&self, values: &ValueFunction, state: &S) -> Option<f64> {
        values.value(self.state_id(state)?)
    }

    /// Exact value function of a labeled policy for discount `gamma`.
    pub fn evaluate(&self, policy: &HashMap<S, A>, gamma: f64) -> Result<ValueFunction, MdpError> {
        let policy = self.policy_from_map(policy)?;
        self.evaluate_policy(&policy, gamma)
    }

    /// Exact value function of a dense policy for discount `gamma`.
    pub fn evaluate_policy(&self, policy: &Policy, gamma: f64) -> Result<ValueFunction, MdpError> {
        evaluate_policy(self, policy, gamma).map_err(|err| self.label_error(err))
    }

    /// Optimal policy and values by value iteration.
    pub fn solve(&self, config: &SolverConfig) -> Result<Solution, MdpError> {
        self.solve_with_hook(config, |_| {})
    }

    /// Like [`Model::solve`], reporting each sweep to `on_sweep`.
    pub fn solve_with_hook<FHook>(
        &self,
        config: &SolverConfig,
        on_sweep: FHook,
    ) -> Result<Solution, MdpError>
    where
        FHook: FnMut(&SweepMetrics),
    {
        value_iteration_with_hook(self, config, on_sweep).map_err(|err| self.label_error(err))
    }

    /// Value iteration returning labeled mappings.
    pub fn value_iteration(
        &self,
        gamma: f64,
        max_iterations: usize,
        epsilon: f64,
    ) -> Result<(HashMap<S, A>, HashMap<S, f64>), MdpError> {
        let config = SolverConfig {
            gamma,
            max_iterations,
            epsilon,
        };
        let solution = self.solve(&config)?;
        Ok((
            self.policy_map(&solution.policy),
            self.value_map(&solution.values),
        ))
    }

    /// Labeled rows of `solution`, in state order.
    pub fn report(&self, solution: &Solution) -> SolutionReport<S, A> {
        let states = solution
            .policy
            .iter()
            .zip(solution.values.as_slice())
            .filter_map(|((state, action), value)| {
                Some(StateReport {
                    state: self.state(state)?.clone(),
                    action: self.action(action)?.clone(),
                    value: *value,
                })
            })
            .collect();

        SolutionReport {
            iterations: solution.iterations,
            converged: solution.converged,
            states,
        }
    }

    /// Translate an index-level planner error into labels of this model.
    pub fn label_error(&self, err: SolveError) -> MdpError {
        match err {
            SolveError::MissingProbability {
                state,
                action,
                next,
            } => self.key_not_found(Table::Probability, state, action, next),
            SolveError::MissingReward {
                state,
                action,
                next,
            } => self.key_not_found(Table::Reward, state, action, next),
            SolveError::NoApplicableAction { state } => MdpError::NoApplicableAction {
                state: self.state_label(state),
            },
            SolveError::SingularMatrix => MdpError::SingularMatrix,
            SolveError::PolicyLength { expected, actual } => {
                MdpError::PolicyLength { expected, actual }
            }
            SolveError::InapplicableAction { state, action } => MdpError::InapplicableAction {
                state: self.state_label(state),
                action: self.action_label(action),
            },
        }
    }

    fn key_not_found(
        &self,
        table: Table,
        state: StateId,
        action: ActionId,
        next: StateId,
    ) -> MdpError {
        MdpError::KeyNotFound {
            table,
            state: self.state_label(state),
            action: self.action_label(action),
            next: self.state_label(next),
        }
    }
}
