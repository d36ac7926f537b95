use anyhow::{Context, Result};
use std::path::Path;

use w65c02_opgen::{generate, Artifacts, InstructionSet};

/// Built-in set when `path` is `None`, otherwise a JSON record list.
pub fn load_set(path: Option<&Path>) -> Result<InstructionSet> {
    let Some(path) = path else { return Ok(InstructionSet::canonical()) };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    InstructionSet::from_json(&text).with_context(|| format!("loading {}", path.display()))
}

pub fn load(path: Option<&Path>, origin: u16) -> Result<Artifacts> {
    let set = load_set(path)?;
    Ok(generate(&set, origin)?)
}
