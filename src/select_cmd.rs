//! Select command: rank candidates, build ensembles and export the envelope.

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span, warn};

use aepsel_io::{read_targets, read_tensor, write_report};
use aepsel_select::{CancelToken, run_selection};

use crate::cli::SelectArgs;
use crate::config::AepselConfig;
use crate::convert;
use crate::rain_aep_cmd::load_rainfall_aep;

/// Run the selection pipeline.
pub fn run(args: SelectArgs) -> Result<()> {
    let _cmd = info_span!("select").entered();
    let config = AepselConfig::load(&args.config)?;

    // 1. Resolve paths
    let levels_path = config
        .io
        .levels
        .as_ref()
        .ok_or_else(|| anyhow!("no levels path: set [io].levels in config"))?;
    let targets_path = config
        .io
        .targets
        .as_ref()
        .ok_or_else(|| anyhow!("no targets path: set [io].targets in config"))?;
    let output = args
        .output
        .as_ref()
        .or(config.io.output.as_ref())
        .ok_or_else(|| anyhow!("no output path: set [io].output in config or use --output"))?;

    // 2. Read inputs
    info!(path = %levels_path.display(), "reading result tensor");
    let tensor = read_tensor(levels_path)
        .with_context(|| format!("failed to read result tensor: {}", levels_path.display()))?;
    let targets = read_targets(targets_path)
        .with_context(|| format!("failed to read targets: {}", targets_path.display()))?;
    info!(
        n_events = tensor.catalog().n_events(),
        n_sites = tensor.n_sites(),
        n_tiers = targets.tiers().len(),
        "inputs loaded"
    );

    // 3. Build selection config, CLI flags win over the file
    let mut select_cfg = convert::build_select_config(&config.selection, tensor.catalog())?;
    if let Some(depth) = args.depth {
        select_cfg = select_cfg.with_accumulation_depth(depth);
    }
    if args.sequential {
        select_cfg = select_cfg.with_parallel(false);
    }

    // 4. Optional rainfall AEP
    let rain = config
        .io
        .rainfall_depths
        .as_ref()
        .map(|path| load_rainfall_aep(path, &config.zones))
        .transpose()?;

    // 5. Select
    let report = run_selection(
        &tensor,
        &targets,
        rain.as_ref(),
        &select_cfg,
        &CancelToken::new(),
    )
    .context("selection failed")?;

    if !report.failures.is_empty() {
        warn!(
            failed = report.failures.len(),
            "some tiers produced no ensemble; see the report's failure list"
        );
    }
    info!(
        records = report.envelope.len(),
        violations = report.violations.len(),
        total_ensemble_size = report.total_ensemble_size,
        "selection complete"
    );

    // 6. Write report
    write_report(output, &report)
        .with_context(|| format!("failed to write report: {}", output.display()))?;
    Ok(())
}
