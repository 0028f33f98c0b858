use crate::solve::ids::{ActionId, StateId};

/// Index-level view of a finite MDP, as consumed by the planners.
///
/// Implementors assign `StateId`s `0..state_count()` in a stable order and answer
/// structural queries from precomputed tables:
/// - `applicable_actions(s)` lists every action with at least one registered
///   transition from `s`, in action order.
/// - `successor_states(s, a)` lists every `s2` with a registered `(s, a, s2)`, in
///   state order.
/// - `probability` / `reward` return `None` for unregistered triples; there is no
///   implicit zero.
///
/// Out-of-range ids yield empty slices and `None`.
pub trait TabularMdp {
    fn state_count(&self) -> usize;

    fn applicable_actions(&self, state: StateId) -> &[ActionId];

    fn successor_states(&self, state: StateId, action: ActionId) -> &[StateId];

    fn probability(&self, state: StateId, action: ActionId, next: StateId) -> Option<f64>;

    fn reward(&self, state: StateId, action: ActionId, next: StateId) -> Option<f64>;
}

impl<M: TabularMdp + ?Sized> TabularMdp for &M {
    fn state_count(&self) -> usize {
        (**self).state_count()
    }

    fn applicable_actions(&self, state: StateId) -> &[ActionId] {
        (**self).applicable_actions(state)
    }

    fn successor_states(&self, state: StateId, action: ActionId) -> &[StateId] {
        (**self).successor_states(state, action)
    }

    fn probability(&self, state: StateId, action: ActionId, next: StateId) -> Option<f64> {
        (**self).probability(state, action, next)
    }

    fn reward(&self, state: StateId, action: ActionId, next: StateId) -> Option<f64> {
        (**self).reward(state, action, next)
    }
}
