mod builder;
mod domain;
mod error;
mod interner;
mod io;
mod model;
mod planning;
mod simulator;
mod spec;

pub use builder::ModelBuilder;
pub use domain::{MdpDomain, Outcome};
pub use error::{MdpError, Table};
pub use interner::{Interner, Label};
pub use io::{compile_yaml, load_yaml, parse_yaml, save_yaml};
pub use model::Model;
pub use planning::{SolutionReport, StateReport};
pub use simulator::MdpSimulator;
pub use spec::{ModelSpec, TransitionSpec};

pub use mdplan_core::{
    ActionId, Policy, Solution, SolveError, SolverConfig, SolverConfigError, StateId,
    SweepMetrics, TabularMdp, ValueFunction,
};
