//! Per-snapshot configuration.
//!
//! Options are plain data with defaults for every field, so an empty JSON
//! object is a valid configuration:
//!
//! ```json
//! { "maxHierarchyDepth": 64, "queryTracing": true }
//! ```

use anyhow::{Context, Result};
use dexter_common::limits::MAX_HIERARCHY_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct GraphOptions {
    /// Superclass links followed by a single walk before it is cut off.
    pub max_hierarchy_depth: u32,
    /// Emit `dexter::query_json` events for resolver entry points.
    pub query_tracing: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            max_hierarchy_depth: MAX_HIERARCHY_DEPTH,
            query_tracing: true,
        }
    }
}

impl GraphOptions {
    pub fn from_json_str(source: &str) -> Result<Self> {
        let options: GraphOptions =
            serde_json::from_str(source).context("failed to parse graph options")?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json_str(&source).with_context(|| format!("in {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.max_hierarchy_depth == 0 {
            anyhow::bail!("maxHierarchyDepth must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
