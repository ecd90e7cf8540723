//! Rain-AEP command: convert rainfall depths into rainfall AEPs per site.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span};

use aepsel_events::ResultTensor;
use aepsel_ifd::rainfall_aep;
use aepsel_io::{read_tensor, write_tensor};

use crate::cli::RainAepArgs;
use crate::config::{AepselConfig, ZoneToml};
use crate::convert;

/// Reads a rainfall-depth tensor and converts it with the configured zones.
pub fn load_rainfall_aep(path: &Path, zones: &[ZoneToml]) -> Result<ResultTensor> {
    info!(path = %path.display(), "reading rainfall depths");
    let depths = read_tensor(path)
        .with_context(|| format!("failed to read rainfall depths: {}", path.display()))?;
    let zone_map = convert::build_zone_map(zones, depths.n_sites())?;
    let tables = convert::load_ifd_set(zones)?;
    info!(
        n_zones = zone_map.zones().len(),
        n_tables = tables.len(),
        "zones and IFD tables loaded"
    );
    rainfall_aep(&depths, &zone_map, &tables).context("rainfall AEP conversion failed")
}

/// Run the rainfall-AEP conversion.
pub fn run(args: RainAepArgs) -> Result<()> {
    let _cmd = info_span!("rain_aep").entered();
    let config = AepselConfig::load(&args.config)?;

    let input = args
        .input
        .as_ref()
        .or(config.io.rainfall_depths.as_ref())
        .ok_or_else(|| {
            anyhow!("no rainfall depths: set [io].rainfall_depths in config or use --input")
        })?;

    let aep = load_rainfall_aep(input, &config.zones)?;
    let missing = aep.values().iter().filter(|v| v.is_nan()).count();
    info!(missing, "rainfall AEP computed");

    write_tensor(&args.output, &aep)
        .with_context(|| format!("failed to write tensor: {}", args.output.display()))?;
    info!(path = %args.output.display(), "rainfall AEP written");
    Ok(())
}
