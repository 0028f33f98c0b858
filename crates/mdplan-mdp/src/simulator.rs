use mdplan_core::{ActionId, Policy, SolveError, StateId, TabularMdp};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{Label, MdpError, Model};

#[derive(Debug, Clone)]
/// Seeded sampler over a model, used to cross-check planned values.
pub struct MdpSimulator<S: Label, A: Label> {
    model: Model<S, A>,
    rng: ChaCha8Rng,
}

impl<S: Label, A: Label> MdpSimulator<S, A> {
    /// Create a simulator with deterministic RNG seed.
    pub fn new(model: Model<S, A>, seed: u64) -> Self {
        Self {
            model,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Borrow the underlying model.
    pub fn model(&self) -> &Model<S, A> {
        &self.model
    }

    /// Sample one `(next_state, reward)` transition.
    ///
    /// Returns `Ok(None)` when `action` is not applicable in `state`.
    pub fn step(
        &mut self,
        state: StateId,
        action: ActionId,
    ) -> Result<Option<(StateId, f64)>, MdpError> {
        let successors = TabularMdp::successor_states(&self.model, state, action);
        let Some(&last) = successors.last() else {
            return Ok(None);
        };

        let sample = (self.rng.next_u64() as f64) / ((u64::MAX as f64) + 1.0);
        let mut cumulative = 0.0;
        let mut chosen = last;
        for &next in successors {
            cumulative += self.probability(state, action, next)?;
            if sample < cumulative {
                chosen = next;
                break;
            }
        }

        let reward = TabularMdp::reward(&self.model, state, action, chosen).ok_or_else(|| {
            self.model.label_error(SolveError::MissingReward {
                state,
                action,
                next: chosen,
            })
        })?;
        Ok(Some((chosen, reward)))
    }

    fn probability(
        &self,
        state: StateId,
        action: ActionId,
        next: StateId,
    ) -> Result<f64, MdpError> {
        TabularMdp::probability(&self.model, state, action, next).ok_or_else(|| {
            self.model.label_error(SolveError::MissingProbability {
                state,
                action,
                next,
            })
        })
    }

    /// Discounted return of one episode of `horizon` steps following `policy`.
    pub fn rollout(
        &mut self,
        start: StateId,
        policy: &Policy,
        gamma: f64,
        horizon: usize,
    ) -> Result<f64, MdpError> {
        policy
            .validate(&self.model)
            .map_err(|err| self.model.label_error(err))?;

        let mut state = start;
        let mut total_return = 0.0;
        let mut discount = 1.0;

        for _ in 0..horizon {
            let Some(action) = policy.action(state) else {
                break;
            };
            let Some((next, reward)) = self.step(state, action)? else {
                break;
            };
            total_return += discount * reward;
            discount *= gamma;
            state = next;
        }

        Ok(total_return)
    }

    /// Monte Carlo estimate of the value of `start` under `policy`.
    ///
    /// Meant for cross-checking exact values; `episodes` must be positive.
    pub fn estimate_value(
        &mut self,
        start: StateId,
        policy: &Policy,
        gamma: f64,
        horizon: usize,
        episodes: usize,
    ) -> Result<f64, MdpError> {
        if episodes == 0 {
            return Err(MdpError::NoEpisodes);
        }
        let mut sum = 0.0;
        for _ in 0..episodes {
            sum += self.rollout(start, policy, gamma, horizon)?;
        }
        Ok(sum / episodes as f64)
    }
}
