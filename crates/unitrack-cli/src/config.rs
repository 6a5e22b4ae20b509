//! Optional TOML configuration.
//!
//! ```toml
//! [tracking]
//! sense_policy = "cached_lazy"
//! logic_notation = "infix"
//! max_leaf_size = 4
//! tol = { rel = 1e-9, abs = 1e-12 }
//!
//! [trace]
//! max_steps = 500
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use unitrack::UnitOptions;

/// Settings read from a config file, all optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Options used to build the unit.
    pub tracking: UnitOptions,
    /// Limits for ray walks.
    pub trace: TraceConfig,
}

/// Limits for ray walks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceConfig {
    /// Crossings after which a walk is abandoned.
    pub max_steps: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self { max_steps: 10_000 }
    }
}

impl CliConfig {
    /// Read a config file, or use defaults without one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }
}
