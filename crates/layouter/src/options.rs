use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

/// Knobs for the block flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowOptions {
    /// Collapse adjoining vertical margins. When off, declared margins are
    /// applied as-is on every box.
    pub collapsing_margins: bool,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            collapsing_margins: true,
        }
    }
}

impl FlowOptions {
    /// Parse options from JSON; missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns an error if `json` is not a valid options object.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid flow options")
    }
}
