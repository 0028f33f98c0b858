use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::solve::{
    bellman::{greedy_backup, greedy_policy},
    error::SolveError,
    ids::StateId,
    model::TabularMdp,
    policy::{Policy, ValueFunction},
};

const DEFAULT_SOLVER_CONFIG_YAML: &str = include_str!("../../config/solver.default.yaml");

/// Value iteration settings.
///
/// `gamma` is expected in `(0, 1)`. `gamma = 0` reduces to a one-step greedy
/// choice and `gamma = 1` may never converge; neither is rejected when the struct
/// is built directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub gamma: f64,
    pub max_iterations: usize,
    pub epsilon: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            gamma: 0.9,
            max_iterations: 10_000,
            epsilon: 1e-7,
        }
    }
}

impl SolverConfig {
    /// Config with the default iteration cap and tolerance.
    pub fn with_gamma(gamma: f64) -> Self {
        SolverConfig {
            gamma,
            ..SolverConfig::default()
        }
    }

    /// Parse a solver config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SolverConfigError> {
        let config: SolverConfig = serde_yaml::from_str(yaml).map_err(SolverConfigError::Yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a solver config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, SolverConfigError> {
        let yaml = fs::read_to_string(path).map_err(SolverConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_SOLVER_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, SolverConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub fn validate(&self) -> Result<(), SolverConfigError> {
        if !self.gamma.is_finite() || !(0.0..=1.0).contains(&self.gamma) {
            return Err(SolverConfigError::Invalid(
                "gamma must be finite and within [0, 1]".to_string(),
            ));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(SolverConfigError::Invalid(
                "epsilon must be finite and > 0".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(SolverConfigError::Invalid(
                "max_iterations must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Sweep-to-sweep change below which the greedy policy is `epsilon`-optimal.
    pub fn stopping_threshold(&self) -> f64 {
        self.epsilon * (1.0 - self.gamma) / (2.0 * self.gamma)
    }
}

/// Error type for loading and validating `SolverConfig`.
#[derive(Debug)]
pub enum SolverConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for SolverConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverConfigError::Io(err) => write!(f, "failed to read config file: {err}"),
            SolverConfigError::Yaml(err) => write!(f, "failed to parse config YAML: {err}"),
            SolverConfigError::Invalid(err) => write!(f, "invalid solver config: {err}"),
        }
    }
}

impl std::error::Error for SolverConfigError {}

/// Progress of one Bellman sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepMetrics {
    /// 1-based sweep counter.
    pub iteration: usize,
    pub max_diff: f64,
    pub threshold: f64,
}

/// Output of value iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub policy: Policy,
    pub values: ValueFunction,
    /// Number of sweeps performed.
    pub iterations: usize,
    /// `false` when the iteration cap was hit before the stopping bound.
    pub converged: bool,
    /// Change measured in the last sweep, `f64::INFINITY` if none ran.
    pub final_max_diff: f64,
}

/// Run value iteration and derive the greedy policy.
pub fn value_iteration<M: TabularMdp + ?Sized>(
    mdp: &M,
    config: &SolverConfig,
) -> Result<Solution, SolveError> {
    value_iteration_with_hook(mdp, config, |_| {})
}

/// Run value iteration and invoke a callback after each sweep.
///
/// Stops once `max_s |V_{n+1}(s) - V_n(s)|` drops below
/// `SolverConfig::stopping_threshold`. Running out of sweeps is not an error: the
/// latest values are kept and `Solution::converged` is `false`.
pub fn value_iteration_with_hook<M, FHook>(
    mdp: &M,
    config: &SolverConfig,
    mut on_sweep: FHook,
) -> Result<Solution, SolveError>
where
    M: TabularMdp + ?Sized,
    FHook: FnMut(&SweepMetrics),
{
    let gamma = config.gamma;
    let threshold = config.stopping_threshold();
    let mut values = ValueFunction::zeros(mdp.state_count());
    let mut iterations = 0;
    let mut converged = false;
    let mut final_max_diff = f64::INFINITY;

    for _ in 0..config.max_iterations {
        let next = bellman_sweep(mdp, &values, gamma)?;
        let max_diff = values.max_abs_diff(&next);
        values = next;
        iterations += 1;
        final_max_diff = max_diff;

        let metrics = SweepMetrics {
            iteration: iterations,
            max_diff,
            threshold,
        };
        log::trace!("sweep {iterations}: max_diff={max_diff:e} threshold={threshold:e}");
        on_sweep(&metrics);

        if max_diff < threshold {
            converged = true;
            break;
        }
    }

    if converged {
        log::debug!("value iteration converged after {iterations} sweeps");
    } else {
        log::warn!(
            "value iteration stopped at the {} sweep limit with max_diff={final_max_diff:e}",
            config.max_iterations
        );
    }

    let policy = greedy_policy(mdp, &values, gamma)?;
    Ok(Solution {
        policy,
        values,
        iterations,
        converged,
        final_max_diff,
    })
}

/// Apply the Bellman optimality operator once to every state.
fn bellman_sweep<M: TabularMdp + ?Sized>(
    mdp: &M,
    values: &ValueFunction,
    gamma: f64,
) -> Result<ValueFunction, SolveError> {
    (0..mdp.state_count())
        .map(|idx| greedy_backup(mdp, StateId::from(idx), gamma, values).map(|(_, q)| q))
        .collect::<Result<Vec<_>, _>>()
        .map(ValueFunction::new)
}
