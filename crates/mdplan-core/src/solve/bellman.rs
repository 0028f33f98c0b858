use crate::solve::{
    error::SolveError,
    ids::{ActionId, StateId},
    model::TabularMdp,
    policy::{Policy, ValueFunction},
};

pub(crate) fn probability_of<M: TabularMdp + ?Sized>(
    mdp: &M,
    state: StateId,
    action: ActionId,
    next: StateId,
) -> Result<f64, SolveError> {
    mdp.probability(state, action, next)
        .ok_or(SolveError::MissingProbability {
            state,
            action,
            next,
        })
}

pub(crate) fn reward_of<M: TabularMdp + ?Sized>(
    mdp: &M,
    state: StateId,
    action: ActionId,
    next: StateId,
) -> Result<f64, SolveError> {
    mdp.reward(state, action, next)
        .ok_or(SolveError::MissingReward {
            state,
            action,
            next,
        })
}

/// One-step lookahead value `Q(s, a) = sum_{s2} P(s2|s,a) * (R(s,a,s2) + gamma * V(s2))`.
///
/// Successors are accumulated in state order.
pub fn action_value<M: TabularMdp + ?Sized>(
    mdp: &M,
    state: StateId,
    action: ActionId,
    gamma: f64,
    values: &ValueFunction,
) -> Result<f64, SolveError> {
    let mut q = 0.0;
    for &next in mdp.successor_states(state, action) {
        let prob = probability_of(mdp, state, action, next)?;
        let reward = reward_of(mdp, state, action, next)?;
        q += prob * (reward + gamma * values[next]);
    }
    Ok(q)
}

/// Best action and its value for `state`.
///
/// Ties go to the earliest action in `applicable_actions` order.
pub(crate) fn greedy_backup<M: TabularMdp + ?Sized>(
    mdp: &M,
    state: StateId,
    gamma: f64,
    values: &ValueFunction,
) -> Result<(ActionId, f64), SolveError> {
    let mut best: Option<(ActionId, f64)> = None;
    for &action in mdp.applicable_actions(state) {
        let q = action_value(mdp, state, action, gamma, values)?;
        match best {
            Some((_, best_q)) if q <= best_q => {}
            _ => best = Some((action, q)),
        }
    }
    best.ok_or(SolveError::NoApplicableAction { state })
}

/// Derive the policy that is greedy with respect to `values`.
pub fn greedy_policy<M: TabularMdp + ?Sized>(
    mdp: &M,
    values: &ValueFunction,
    gamma: f64,
) -> Result<Policy, SolveError> {
    (0..mdp.state_count())
        .map(|idx| greedy_backup(mdp, StateId::from(idx), gamma, values).map(|(a, _)| a))
        .collect::<Result<Vec<_>, _>>()
        .map(Policy::new)
}
