use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level aepsel configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AepselConfig {
    /// I/O settings.
    #[serde(default)]
    pub io: IoConfig,

    /// Ranking and ensemble settings.
    #[serde(default)]
    pub selection: SelectionToml,

    /// Rainfall zones, in grouping-table order.
    #[serde(default)]
    pub zones: Vec<ZoneToml>,
}

impl AepselConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct IoConfig {
    pub levels: Option<PathBuf>,
    pub targets: Option<PathBuf>,
    pub rainfall_depths: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionToml {
    #[serde(default = "default_accumulation_depth")]
    pub accumulation_depth: usize,
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Event labels (`DDD_RRRR`) never allowed into an ensemble.
    #[serde(default)]
    pub denylist: Vec<String>,
    #[serde(default)]
    pub fail_on_non_monotonic: bool,
    #[serde(default)]
    pub overrides: Vec<OverrideToml>,
    #[serde(default)]
    pub patches: Vec<PatchToml>,
}

impl Default for SelectionToml {
    fn default() -> Self {
        Self {
            accumulation_depth: default_accumulation_depth(),
            parallel: true,
            denylist: Vec::new(),
            fail_on_non_monotonic: false,
            overrides: Vec::new(),
            patches: Vec::new(),
        }
    }
}

fn default_accumulation_depth() -> usize {
    1
}
fn default_true() -> bool {
    true
}

/// Replaces one site's rank-0 pick in a tier with its rank-`rank` pick.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideToml {
    /// Tier return period (e.g. `5` for 1-in-5).
    pub tier: u32,
    pub site: usize,
    pub rank: usize,
}

/// Replaces one level in the result tensor before ranking.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchToml {
    /// Event label (`DDD_RRRR`).
    pub event: String,
    pub site: usize,
    pub level: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneToml {
    pub name: String,
    pub sites: Vec<usize>,
    /// Path to this zone's IFD table.
    pub ifd: PathBuf,
}
