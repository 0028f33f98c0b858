#![allow(unsafe_op_in_unsafe_fn)]

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use ::mdplan_core::{reward_vector, transition_matrix};
use ::mdplan_mdp::{MdpError, Model, ModelSpec, Policy, SolverConfig, load_yaml, parse_yaml};
use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyString;
use serde::{Serialize, Serializer, ser};

type Triple = (PyLabel, PyLabel, PyLabel);

/// A hashable Python object used as a state or action.
///
/// The Python hash is taken once on ingestion; equality defers to `==`.
struct PyLabel {
    object: Py<PyAny>,
    hash: isize,
}

impl PyLabel {
    fn new(object: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(Self {
            hash: object.hash()?,
            object: object.clone().unbind(),
        })
    }

    fn text(py: Python<'_>, text: &str) -> PyResult<Self> {
        Self::new(PyString::new_bound(py, text).as_any())
    }
}

impl Clone for PyLabel {
    fn clone(&self) -> Self {
        Python::with_gil(|py| Self {
            object: self.object.clone_ref(py),
            hash: self.hash,
        })
    }
}

impl PartialEq for PyLabel {
    fn eq(&self, other: &Self) -> bool {
        if self.hash != other.hash {
            return false;
        }
        if self.object.is(&other.object) {
            return true;
        }
        Python::with_gil(|py| {
            self.object
                .bind(py)
                .eq(other.object.bind(py))
                .unwrap_or(false)
        })
    }
}

impl Eq for PyLabel {}

impl Hash for PyLabel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Debug for PyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Python::with_gil(|py| match self.object.bind(py).repr() {
            Ok(repr) => write!(f, "{repr}"),
            Err(_) => f.write_str("<unrepresentable>"),
        })
    }
}

impl Serialize for PyLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Python::with_gil(|py| {
            let text = self
                .object
                .bind(py)
                .str()
                .map_err(<S::Error as ser::Error>::custom)?;
            serializer.serialize_str(&text.to_string_lossy())
        })
    }
}

impl<'py> FromPyObject<'py> for PyLabel {
    fn extract_bound(object: &Bound<'py, PyAny>) -> PyResult<Self> {
        Self::new(object)
    }
}

impl IntoPy<PyObject> for PyLabel {
    fn into_py(self, _py: Python<'_>) -> PyObject {
        self.object
    }
}

fn mdp_err_to_py(err: MdpError) -> PyErr {
    match err {
        MdpError::KeyNotFound { .. } => PyKeyError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

#[pyclass(name = "Mdp", module = "mdplan")]
#[derive(Clone)]
/// Mdp(states, actions, probabilities, rewards, /)
/// --
///
/// Finite Markov Decision Process.
///
/// States and actions may be any hashable objects (strings, ints, tuples, ...).
/// `probabilities` and `rewards` map `(state, action, next_state)` tuples to
/// floats. Absent triples are not implicit zeros: lookups raise `KeyError`.
///
/// Raises:
///     ValueError: If a label is repeated or a table names an undeclared label.
///     TypeError: If a label is unhashable.
pub struct PyMdp {
    inner: Model<PyLabel, PyLabel>,
}

impl PyMdp {
    fn policy(&self, policy: &HashMap<PyLabel, PyLabel>) -> PyResult<Policy> {
        self.inner.policy_from_map(policy).map_err(mdp_err_to_py)
    }

    /// Build from a validated spec; labels become Python strings.
    fn from_spec(py: Python<'_>, spec: &ModelSpec) -> PyResult<Self> {
        let states = spec
            .states
            .iter()
            .map(|state| PyLabel::text(py, state))
            .collect::<PyResult<Vec<_>>>()?;
        let actions = spec
            .actions
            .iter()
            .map(|action| PyLabel::text(py, action))
            .collect::<PyResult<Vec<_>>>()?;

        let mut probabilities = Vec::with_capacity(spec.transitions.len());
        let mut rewards = Vec::with_capacity(spec.transitions.len());
        for t in &spec.transitions {
            let triple: Triple = (
                PyLabel::text(py, &t.state)?,
                PyLabel::text(py, &t.action)?,
                PyLabel::text(py, &t.next)?,
            );
            probabilities.push((triple.clone(), t.prob));
            rewards.push((triple, t.reward));
        }

        let inner = Model::new(states, actions, probabilities, rewards).map_err(mdp_err_to_py)?;
        Ok(Self { inner })
    }
}

#[pymethods]
impl PyMdp {
    #[new]
    #[pyo3(text_signature = "(states, actions, probabilities, rewards, /)")]
    fn new(
        states: Vec<PyLabel>,
        actions: Vec<PyLabel>,
        probabilities: HashMap<Triple, f64>,
        rewards: HashMap<Triple, f64>,
    ) -> PyResult<Self> {
        let inner =
            Model::new(states, actions, probabilities, rewards).map_err(mdp_err_to_py)?;
        Ok(Self { inner })
    }

    /// get_states($self, /)
    /// --
    ///
    /// Return the states in index order.
    #[pyo3(text_signature = "($self, /)")]
    fn get_states(&self) -> Vec<PyLabel> {
        self.inner.states().to_vec()
    }

    /// get_actions($self, /)
    /// --
    ///
    /// Return the actions in index order.
    #[pyo3(text_signature = "($self, /)")]
    fn get_actions(&self) -> Vec<PyLabel> {
        self.inner.actions().to_vec()
    }

    /// get_probability($self, s, action, s_successor, /)
    /// --
    ///
    /// Return P(s_successor | s, action).
    ///
    /// Raises:
    ///     KeyError: If the triple was never registered.
    #[pyo3(text_signature = "($self, s, action, s_successor, /)")]
    fn get_probability(
        &self,
        s: PyLabel,
        action: PyLabel,
        s_successor: PyLabel,
    ) -> PyResult<f64> {
        self.inner
            .probability(&s, &action, &s_successor)
            .map_err(mdp_err_to_py)
    }

    /// get_reward($self, s, action, s_successor, /)
    /// --
    ///
    /// Return R(s, action, s_successor).
    ///
    /// Raises:
    ///     KeyError: If the triple was never registered.
    #[pyo3(text_signature = "($self, s, action, s_successor, /)")]
    fn get_reward(&self, s: PyLabel, action: PyLabel, s_successor: PyLabel) -> PyResult<f64> {
        self.inner
            .reward(&s, &action, &s_successor)
            .map_err(mdp_err_to_py)
    }

    /// applicable_actions($self, s, /)
    /// --
    ///
    /// Return the actions with at least one registered transition from `s`.
    /// Unknown states have none.
    #[pyo3(text_signature = "($self, s, /)")]
    fn applicable_actions(&self, s: PyLabel) -> Vec<PyLabel> {
        self.inner
            .applicable_actions(&s)
            .into_iter()
            .cloned()
            .collect()
    }

    /// successor_states($self, s, a, /)
    /// --
    ///
    /// Return the states reachable from `s` under `a`, in state order.
    #[pyo3(text_signature = "($self, s, a, /)")]
    fn successor_states(&self, s: PyLabel, a: PyLabel) -> Vec<PyLabel> {
        self.inner
            .successor_states(&s, &a)
            .into_iter()
            .cloned()
            .collect()
    }

    /// build_P($self, policy, /)
    /// --
    ///
    /// Return the policy's transition matrix as nested lists; entry `[j][i]` is the
    /// probability of moving from state `i` to state `j`.
    #[pyo3(name = "build_P", text_signature = "($self, policy, /)")]
    fn build_p(&self, policy: HashMap<PyLabel, PyLabel>) -> PyResult<Vec<Vec<f64>>> {
        let policy = self.policy(&policy)?;
        let p = transition_matrix(&self.inner, &policy)
            .map_err(|err| mdp_err_to_py(self.inner.label_error(err)))?;
        Ok(p.row_iter()
            .map(|row| row.iter().copied().collect())
            .collect())
    }

    /// build_R($self, policy, /)
    /// --
    ///
    /// Return the expected immediate reward of every state under `policy`.
    #[pyo3(name = "build_R", text_signature = "($self, policy, /)")]
    fn build_r(&self, policy: HashMap<PyLabel, PyLabel>) -> PyResult<Vec<f64>> {
        let policy = self.policy(&policy)?;
        let r = reward_vector(&self.inner, &policy)
            .map_err(|err| mdp_err_to_py(self.inner.label_error(err)))?;
        Ok(r.iter().copied().collect())
    }

    /// bellman_eq_policy($self, policy, gamma, /)
    /// --
    ///
    /// Solve the Bellman equation of `policy` exactly.
    ///
    /// Returns:
    ///     dict: value of every state.
    ///
    /// Raises:
    ///     ValueError: If the policy is incomplete or inapplicable, or the system
    ///         is singular.
    #[pyo3(text_signature = "($self, policy, gamma, /)")]
    fn bellman_eq_policy(
        &self,
        policy: HashMap<PyLabel, PyLabel>,
        gamma: f64,
    ) -> PyResult<HashMap<PyLabel, f64>> {
        let values = self.inner.evaluate(&policy, gamma).map_err(mdp_err_to_py)?;
        Ok(self.inner.value_map(&values))
    }

    /// value_iteration($self, gamma, max_iterations=10000, epsilon=1e-7, /)
    /// --
    ///
    /// Compute an epsilon-optimal policy by value iteration.
    ///
    /// Returns:
    ///     tuple[dict, dict]: `(policy, values)`.
    #[pyo3(signature = (gamma, max_iterations=10000, epsilon=1e-7))]
    #[pyo3(text_signature = "($self, gamma, max_iterations=10000, epsilon=1e-7, /)")]
    fn value_iteration(
        &self,
        gamma: f64,
        max_iterations: usize,
        epsilon: f64,
    ) -> PyResult<(HashMap<PyLabel, PyLabel>, HashMap<PyLabel, f64>)> {
        self.inner
            .value_iteration(gamma, max_iterations, epsilon)
            .map_err(mdp_err_to_py)
    }

    /// solve_report($self, /)
    /// --
    ///
    /// Run value iteration with the default solver settings and return the
    /// report as YAML text. Labels are written with `str()`.
    #[pyo3(text_signature = "($self, /)")]
    fn solve_report(&self) -> PyResult<String> {
        let solution = self
            .inner
            .solve(&SolverConfig::default())
            .map_err(mdp_err_to_py)?;
        self.inner
            .report(&solution)
            .to_yaml()
            .map_err(mdp_err_to_py)
    }
}

#[pyfunction]
#[pyo3(text_signature = "(path, /)")]
/// load_yaml_file(path, /)
/// --
///
/// Load and validate an MDP from a YAML file path. Labels are strings.
///
/// Raises:
///     ValueError: If file loading, YAML parsing, or validation fails.
fn load_yaml_file(py: Python<'_>, path: &str) -> PyResult<PyMdp> {
    let spec = load_yaml(path).map_err(mdp_err_to_py)?;
    PyMdp::from_spec(py, &spec)
}

#[pyfunction]
#[pyo3(text_signature = "(yaml, /)")]
/// load_yaml_str(yaml, /)
/// --
///
/// Load and validate an MDP directly from a YAML string. Labels are strings.
///
/// Raises:
///     ValueError: If YAML parsing or validation fails.
fn load_yaml_str(py: Python<'_>, yaml: &str) -> PyResult<PyMdp> {
    let spec = parse_yaml(yaml).map_err(mdp_err_to_py)?;
    PyMdp::from_spec(py, &spec)
}

#[pymodule]
fn mdplan(_py: Python<'_>, module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyMdp>()?;
    module.add_function(wrap_pyfunction!(load_yaml_file, module)?)?;
    module.add_function(wrap_pyfunction!(load_yaml_str, module)?)?;
    Ok(())
}
