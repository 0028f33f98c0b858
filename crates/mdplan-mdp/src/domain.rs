use std::collections::VecDeque;

use crate::{Interner, Label, MdpError, Model};

/// One possible result of taking an action.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<S> {
    pub next: S,
    pub prob: f64,
    pub reward: f64,
}

/// Generic interface for MDPs described by code instead of tables.
pub trait MdpDomain {
    type State: Label;
    type Action: Label;

    /// Return the state exploration starts from.
    fn start_state(&self) -> Self::State;

    /// Return every action of the domain, in the order ids should be assigned.
    fn actions(&self) -> Vec<Self::Action>;

    /// Return the outcomes of `action` in `state`; empty if it is not applicable.
    fn outcomes(&self, state: &Self::State, action: &Self::Action) -> Vec<Outcome<Self::State>>;
}

impl<S: Label, A: Label> Model<S, A> {
    /// Enumerate every state reachable from the domain's start state into a model.
    ///
    /// States are numbered in breadth-first discovery order.
    pub fn from_domain<D>(domain: &D) -> Result<Self, MdpError>
    where
        D: MdpDomain<State = S, Action = A>,
    {
        let actions = domain.actions();
        let mut states = Interner::new();
        let mut queue = VecDeque::new();
        let mut probabilities = Vec::new();
        let mut rewards = Vec::new();

        let start = domain.start_state();
        states.intern(start.clone());
        queue.push_back(start);

        while let Some(state) = queue.pop_front() {
            for action in &actions {
                for outcome in domain.outcomes(&state, action) {
                    if states.key_of(&outcome.next).is_none() {
                        states.intern(outcome.next.clone());
                        queue.push_back(outcome.next.clone());
                    }
                    let triple = (state.clone(), action.clone(), outcome.next);
                    probabilities.push((triple.clone(), outcome.prob));
                    rewards.push((triple, outcome.reward));
                }
            }
        }

        log::debug!(
            "enumerated {} states and {} transitions from domain",
            states.len(),
            probabilities.len()
        );
        Model::new(states.as_slice().to_vec(), actions, probabilities, rewards)
    }
}
