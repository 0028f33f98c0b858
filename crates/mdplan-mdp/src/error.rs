use std::fmt;

use mdplan_core::SolverConfigError;
use thiserror::Error;

/// Which sparse table a lookup missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Probability,
    Reward,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Probability => f.write_str("probability"),
            Table::Reward => f.write_str("reward"),
        }
    }
}

#[derive(Debug, Error)]
/// Error type for model construction, lookups, planning, and YAML IO.
///
/// Label fields hold the `Debug` rendering of the offending label, so string
/// labels appear quoted.
pub enum MdpError {
    #[error("failed to read YAML file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Config(#[from] SolverConfigError),

    #[error("state and action ids must be non-empty")]
    EmptyId,

    #[error("duplicate state {state}")]
    DuplicateState { state: String },

    #[error("duplicate action {action}")]
    DuplicateAction { action: String },

    #[error("unknown state {state}")]
    UnknownState { state: String },

    #[error("unknown action {action}")]
    UnknownAction { action: String },

    #[error("transition ({state}, {action}, {next}) is declared more than once")]
    DuplicateTransition {
        state: String,
        action: String,
        next: String,
    },

    #[error("no {table} registered for ({state}, {action}, {next})")]
    KeyNotFound {
        table: Table,
        state: String,
        action: String,
        next: String,
    },

    #[error("state {state} has no applicable action")]
    NoApplicableAction { state: String },

    #[error("value estimate needs at least one episode")]
    NoEpisodes,

    #[error("policy evaluation system is singular")]
    SingularMatrix,

    #[error("policy assigns no action to state {state}")]
    MissingPolicyAction { state: String },

    #[error("policy covers {actual} states but the model has {expected}")]
    PolicyLength { expected: usize, actual: usize },

    #[error("action {action} is not applicable in state {state}")]
    InapplicableAction { state: String, action: String },

    #[error("invalid probability for ({state}, {action}, {next}): {value}")]
    InvalidProbability {
        state: String,
        action: String,
        next: String,
        value: f64,
    },

    #[error("invalid reward for ({state}, {action}, {next}): {value}")]
    InvalidReward {
        state: String,
        action: String,
        next: String,
        value: f64,
    },

    #[error("probabilities of state {state}, action {action} sum to {sum}, not 1 +/- {tolerance}")]
    ProbabilitySum {
        state: String,
        action: String,
        sum: f64,
        tolerance: f64,
    },
}
