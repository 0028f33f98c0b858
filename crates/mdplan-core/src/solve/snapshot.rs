use serde::Serialize;

use crate::solve::value_iteration::Solution;

/// Index-level, serializable view of a `Solution`.
#[derive(Debug, Clone, Serialize)]
pub struct SolutionSnapshot {
    pub schema_version: u32,
    pub iterations: usize,
    pub converged: bool,
    pub policy: Vec<usize>,
    pub values: Vec<f64>,
}

impl SolutionSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Solution {
    pub fn snapshot(&self) -> SolutionSnapshot {
        SolutionSnapshot {
            schema_version: 1,
            iterations: self.iterations,
            converged: self.converged,
            policy: self.policy.as_slice().iter().map(|a| a.index()).collect(),
            values: self.values.as_slice().to_vec(),
        }
    }
}
