use std::{fs, path::Path};

use crate::{MdpError, Model, ModelSpec};

/// Parse and validate a model spec from YAML text.
///
/// A spec that parses but breaks a schema invariant (unknown references,
/// duplicate triples, bad sums, bad solver settings) is rejected here rather
/// than at compile time.
pub fn parse_yaml(yaml: &str) -> Result<ModelSpec, MdpError> {
    let spec: ModelSpec = serde_yaml::from_str(yaml)?;
    spec.validate()?;
    Ok(spec)
}

/// Read, parse and validate a model spec from disk.
pub fn load_yaml(path: impl AsRef<Path>) -> Result<ModelSpec, MdpError> {
    parse_yaml(&fs::read_to_string(path)?)
}

/// Load a YAML file straight into a string-labeled model.
pub fn compile_yaml(path: impl AsRef<Path>) -> Result<Model<String, String>, MdpError> {
    load_yaml(path)?.compile()
}

/// Write `spec` as YAML. Invalid specs are refused so that every saved file
/// loads back.
pub fn save_yaml(path: impl AsRef<Path>, spec: &ModelSpec) -> Result<(), MdpError> {
    spec.validate()?;
    fs::write(path, serde_yaml::to_string(spec)?)?;
    Ok(())
}
