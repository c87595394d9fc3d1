use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::heuristic::Distance;

/// Tunables for [`find_path`](crate::find_path). Missing fields take their defaults when
/// deserialized, so `{}` is a valid configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub heuristic: Distance,
    /// stop the search as cancelled after this many iterations
    pub max_iterations: Option<usize>,
}

impl SearchConfig {
    pub fn from_json(json: &str) -> Result<Self, anyhow::Error> {
        serde_json::from_str(json).context("Invalid search configuration")
    }

    pub fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::from_json(&json)
    }
}
