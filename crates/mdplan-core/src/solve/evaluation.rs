use nalgebra::{DMatrix, DVector};

use crate::solve::{
    bellman::{probability_of, reward_of},
    error::SolveError,
    model::TabularMdp,
    policy::{Policy, ValueFunction},
};

/// Markov chain induced by `policy`, column-oriented.
///
/// Entry `(j, i)` holds the probability of moving from state `i` to state `j` under
/// the action the policy picks in `i`. Only successors of that action are set.
pub fn transition_matrix<M: TabularMdp + ?Sized>(
    mdp: &M,
    policy: &Policy,
) -> Result<DMatrix<f64>, SolveError> {
    check_length(mdp, policy)?;

    let n = mdp.state_count();
    let mut p = DMatrix::zeros(n, n);
    for (state, action) in policy.iter() {
        for &next in mdp.successor_states(state, action) {
            p[(next.index(), state.index())] = probability_of(mdp, state, action, next)?;
        }
    }
    Ok(p)
}

/// Expected immediate reward of every state under `policy`.
pub fn reward_vector<M: TabularMdp + ?Sized>(
    mdp: &M,
    policy: &Policy,
) -> Result<DVector<f64>, SolveError> {
    check_length(mdp, policy)?;

    let mut r = DVector::zeros(mdp.state_count());
    for (state, action) in policy.iter() {
        for &next in mdp.successor_states(state, action) {
            let prob = probability_of(mdp, state, action, next)?;
            let reward = reward_of(mdp, state, action, next)?;
            r[state.index()] += prob * reward;
        }
    }
    Ok(r)
}

/// Exact value function of `policy`: the unique `V` with `V = R + gamma * Pᵀ V`.
///
/// Solved as the dense system `(I - gamma * P)ᵀ V = R` through an LU
/// decomposition with partial pivoting. A policy that leaves the system without a
/// unique solution (for example `gamma = 1` on a recurrent chain) is reported as
/// `SolveError::SingularMatrix`.
pub fn evaluate_policy<M: TabularMdp + ?Sized>(
    mdp: &M,
    policy: &Policy,
    gamma: f64,
) -> Result<ValueFunction, SolveError> {
    policy.validate(mdp)?;

    let n = mdp.state_count();
    if n == 0 {
        return Ok(ValueFunction::default());
    }

    let p = transition_matrix(mdp, policy)?;
    let r = reward_vector(mdp, policy)?;
    let system = (DMatrix::<f64>::identity(n, n) - p * gamma).transpose();

    let lu = system.lu();
    if is_numerically_singular(&lu.u(), n) {
        return Err(SolveError::SingularMatrix);
    }
    let v = lu.solve(&r).ok_or(SolveError::SingularMatrix)?;
    if v.iter().any(|value| !value.is_finite()) {
        return Err(SolveError::SingularMatrix);
    }

    log::debug!("evaluated policy over {n} states with gamma={gamma}");
    Ok(ValueFunction::new(v.iter().copied().collect()))
}

fn check_length<M: TabularMdp + ?Sized>(mdp: &M, policy: &Policy) -> Result<(), SolveError> {
    if policy.len() != mdp.state_count() {
        return Err(SolveError::PolicyLength {
            expected: mdp.state_count(),
            actual: policy.len(),
        });
    }
    Ok(())
}

/// Pivots at or below `n * eps * max|pivot|` are rounding noise, not information.
fn is_numerically_singular(u: &DMatrix<f64>, n: usize) -> bool {
    let pivots = u.diagonal();
    let largest = pivots.iter().fold(0.0_f64, |acc, p| acc.max(p.abs()));
    if largest == 0.0 || !largest.is_finite() {
        return true;
    }
    let tolerance = n as f64 * f64::EPSILON * largest;
    pivots.iter().any(|p| p.abs() <= tolerance)
}
