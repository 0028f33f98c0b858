use std::collections::HashMap;

use mdplan_core::{ActionId, StateId, TabularMdp};

use crate::interner::describe;
use crate::{Interner, Label, MdpError, Table};

type Triple = (StateId, ActionId, StateId);

/// Finite MDP over labeled states and actions with sparse transition and reward
/// tables.
///
/// States and actions keep the order they were given in; that order fixes every
/// `StateId`/`ActionId` and therefore every matrix and vector index. The model is
/// read-only after construction.
///
/// Transition probabilities of an applicable `(state, action)` are expected to sum
/// to 1. This is not checked on construction; use
/// [`Model::check_distributions`] when the tables come from an untrusted source.
#[derive(Debug, Clone)]
pub struct Model<S: Label, A: Label> {
    states: Interner<S>,
    actions: Interner<A>,
    probabilities: HashMap<Triple, f64>,
    rewards: HashMap<Triple, f64>,
    /// `successors[s][a]`, sorted in state order.
    successors: Vec<Vec<Vec<StateId>>>,
    /// Actions with at least one successor, in action order.
    applicable: Vec<Vec<ActionId>>,
}

impl<S: Label, A: Label> Model<S, A> {
    /// Build a model from ordered state and action sequences plus sparse tables keyed
    /// by `(state, action, next)`.
    ///
    /// Fails on duplicate labels and on triples that name unknown labels. If a table
    /// yields the same triple twice the last value is kept.
    pub fn new<P, R>(
        states: impl IntoIterator<Item = S>,
        actions: impl IntoIterator<Item = A>,
        probabilities: P,
        rewards: R,
    ) -> Result<Self, MdpError>
    where
        P: IntoIterator<Item = ((S, A, S), f64)>,
        R: IntoIterator<Item = ((S, A, S), f64)>,
    {
        let mut state_set = Interner::new();
        for state in states {
            let label = describe(&state);
            state_set
                .insert_unique(state)
                .ok_or(MdpError::DuplicateState { state: label })?;
        }

        let mut action_set = Interner::new();
        for action in actions {
            let label = describe(&action);
            action_set
                .insert_unique(action)
                .ok_or(MdpError::DuplicateAction { action: label })?;
        }

        let mut model = Model {
            successors: vec![vec![Vec::new(); action_set.len()]; state_set.len()],
            applicable: Vec::new(),
            states: state_set,
            actions: action_set,
            probabilities: HashMap::new(),
            rewards: HashMap::new(),
        };

        for (triple, prob) in probabilities {
            let key = model.resolve(&triple)?;
            model.probabilities.insert(key, prob);
        }
        for (triple, reward) in rewards {
            let key = model.resolve(&triple)?;
            model.rewards.insert(key, reward);
        }

        for &(state, action, next) in model.probabilities.keys() {
            model.successors[state.index()][action.index()].push(next);
        }
        for per_action in &mut model.successors {
            for list in per_action.iter_mut() {
                list.sort_unstable();
            }
        }
        model.applicable = model
            .successors
            .iter()
            .map(|per_action| {
                per_action
                    .iter()
                    .enumerate()
                    .filter(|(_, list)| !list.is_empty())
                    .map(|(idx, _)| ActionId::from(idx))
                    .collect()
            })
            .collect();

        Ok(model)
    }

    fn resolve(&self, (state, action, next): &(S, A, S)) -> Result<Triple, MdpError> {
        Ok((
            self.require_state(state)?,
            self.require_action(action)?,
            self.require_state(next)?,
        ))
    }

    pub(crate) fn require_state(&self, state: &S) -> Result<StateId, MdpError> {
        self.state_id(state).ok_or_else(|| MdpError::UnknownState {
            state: describe(state),
        })
    }

    pub(crate) fn require_action(&self, action: &A) -> Result<ActionId, MdpError> {
        self.action_id(action)
            .ok_or_else(|| MdpError::UnknownAction {
                action: describe(action),
            })
    }

    /// States in construction order.
    pub fn states(&self) -> &[S] {
        self.states.as_slice()
    }

    /// Actions in construction order.
    pub fn actions(&self) -> &[A] {
        self.actions.as_slice()
    }

    pub fn state_id(&self, state: &S) -> Option<StateId> {
        self.states.key_of(state).map(StateId::from)
    }

    pub fn action_id(&self, action: &A) -> Option<ActionId> {
        self.actions.key_of(action).map(ActionId::from)
    }

    pub fn state(&self, id: StateId) -> Option<&S> {
        self.states.get(id.index())
    }

    pub fn action(&self, id: ActionId) -> Option<&A> {
        self.actions.get(id.index())
    }

    /// Registered probability of `next` after taking `action` in `state`.
    ///
    /// Unregistered triples are `KeyNotFound`, never an implicit zero.
    pub fn probability(&self, state: &S, action: &A, next: &S) -> Result<f64, MdpError> {
        self.lookup(Table::Probability, state, action, next)
    }

    /// Registered reward for the triple; same contract as [`Model::probability`].
    pub fn reward(&self, state: &S, action: &A, next: &S) -> Result<f64, MdpError> {
        self.lookup(Table::Reward, state, action, next)
    }

    fn lookup(&self, table: Table, state: &S, action: &A, next: &S) -> Result<f64, MdpError> {
        let key = (self.state_id(state), self.action_id(action), self.state_id(next));
        let found = match key {
            (Some(s), Some(a), Some(n)) => match table {
                Table::Probability => self.probabilities.get(&(s, a, n)),
                Table::Reward => self.rewards.get(&(s, a, n)),
            },
            _ => None,
        };
        found.copied().ok_or_else(|| MdpError::KeyNotFound {
            table,
            state: describe(state),
            action: describe(action),
            next: describe(next),
        })
    }

    /// Actions with at least one registered transition from `state`, in action order.
    ///
    /// A state the model does not know has no registered transitions, so the list
    /// is empty.
    pub fn applicable_actions(&self, state: &S) -> Vec<&A> {
        let Some(id) = self.state_id(state) else {
            return Vec::new();
        };
        TabularMdp::applicable_actions(self, id)
            .iter()
            .filter_map(|action| self.action(*action))
            .collect()
    }

    /// States reachable through a registered `(state, action, next)`, in state order.
    ///
    /// Empty when nothing is registered for the pair, including unknown labels.
    pub fn successor_states(&self, state: &S, action: &A) -> Vec<&S> {
        let (Some(state_id), Some(action_id)) = (self.state_id(state), self.action_id(action))
        else {
            return Vec::new();
        };
        TabularMdp::successor_states(self, state_id, action_id)
            .iter()
            .filter_map(|next| self.state(*next))
            .collect()
    }

    /// Check that every registered probability lies in `[0, 1]` and that each
    /// applicable `(state, action)` sums to 1 within `tolerance`.
    pub fn check_distributions(&self, tolerance: f64) -> Result<(), MdpError> {
        for (s, per_action) in self.successors.iter().enumerate() {
            let state = StateId::from(s);
            for (a, successors) in per_action.iter().enumerate() {
                if successors.is_empty() {
                    continue;
                }
                let action = ActionId::from(a);
                let mut sum = 0.0_f64;
                for &next in successors {
                    let prob = self.probabilities[&(state, action, next)];
                    if !prob.is_finite() || !(0.0..=1.0).contains(&prob) {
                        return Err(MdpError::InvalidProbability {
                            state: self.state_label(state),
                            action: self.action_label(action),
                            next: self.state_label(next),
                            value: prob,
                        });
                    }
                    sum += prob;
                }
                if (sum - 1.0).abs() > tolerance {
                    return Err(MdpError::ProbabilitySum {
                        state: self.state_label(state),
                        action: self.action_label(action),
                        sum,
                        tolerance,
                    });
                }
            }
        }
        Ok(())
    }

    pub(crate) fn state_label(&self, id: StateId) -> String {
        self.state(id)
            .map(describe)
            .unwrap_or_else(|| format!("#{}", id.index()))
    }

    pub(crate) fn action_label(&self, id: ActionId) -> String {
        self.action(id)
            .map(describe)
            .unwrap_or_else(|| format!("#{}", id.index()))
    }
}

impl<S: Label, A: Label> TabularMdp for Model<S, A> {
    fn state_count(&self) -> usize {
        self.states.len()
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
        self.probabilities.get(&(state, action, next)).copied()
    }

    fn reward(&self, state: StateId, action: ActionId, next: StateId) -> Option<f64> {
        self.rewards.get(&(state, action, next)).copied()
    }
}
