use mdplan_core::SolverConfig;

use crate::interner::describe;
use crate::{MdpError, Model, ModelSpec, TransitionSpec};

#[derive(Debug, Clone, Default)]
/// Incremental builder for string-labeled models.
pub struct ModelBuilder {
    states: Vec<String>,
    actions: Vec<String>,
    transitions: Vec<TransitionSpec>,
    solver: Option<SolverConfig>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a state; its position is its index.
    pub fn add_state(&mut self, id: impl Into<String>) -> &mut Self {
        self.states.push(id.into());
        self
    }

    /// Append an action; its position is its index.
    pub fn add_action(&mut self, id: impl Into<String>) -> &mut Self {
        self.actions.push(id.into());
        self
    }

    /// Register a transition between already added states.
    pub fn add_transition(
        &mut self,
        state: impl Into<String>,
        action: impl Into<String>,
        next: impl Into<String>,
        prob: f64,
        reward: f64,
    ) -> Result<&mut Self, MdpError> {
        let state = state.into();
        let action = action.into();
        let next = next.into();

        for id in [&state, &next] {
            if !self.states.contains(id) {
                return Err(MdpError::UnknownState { state: describe(id) });
            }
        }
        if !self.actions.contains(&action) {
            return Err(MdpError::UnknownAction {
                action: describe(&action),
            });
        }

        self.transitions.push(TransitionSpec {
            state,
            action,
            next,
            prob,
            reward,
        });
        Ok(self)
    }

    /// Attach solver settings to the resulting spec.
    pub fn set_solver(&mut self, config: SolverConfig) -> &mut Self {
        self.solver = Some(config);
        self
    }

    pub fn build_spec(self) -> Result<ModelSpec, MdpError> {
        let spec = ModelSpec {
            version: Some(1),
            states: self.states,
            actions: self.actions,
            transitions: self.transitions,
            solver: self.solver,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn compile(self) -> Result<Model<String, String>, MdpError> {
        let spec = self.build_spec()?;
        spec.compile()
    }
}
