//! Batch selection across all tiers.

use std::borrow::Cow;

use aepsel_events::ResultTensor;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::config::{LevelPatch, SelectConfig};
use crate::ensemble::{EnsembleOutcome, build_ensemble};
use crate::envelope::EnvelopeTable;
use crate::error::SelectError;
use crate::monotonic::validate_monotonic;
use crate::rank::rank_candidates_with_overrides;
use crate::report::{EnsembleRecord, SelectionReport, TierFailure};
use crate::targets::TargetTable;
use crate::tier::AepTier;

/// Returns `tensor` with `patches` applied, borrowing when there are none.
fn patched<'a>(
    tensor: &'a ResultTensor,
    patches: &[LevelPatch],
) -> Result<Cow<'a, ResultTensor>, SelectError> {
    if patches.is_empty() {
        return Ok(Cow::Borrowed(tensor));
    }
    let mut owned = tensor.clone();
    for p in patches {
        let old = owned.patch(p.event, p.site, p.level)?;
        debug!(event = %p.event, site = p.site, old, new = p.level, "level patched");
    }
    Ok(Cow::Owned(owned))
}

fn select_tier(
    tier: AepTier,
    tensor: &ResultTensor,
    targets: &TargetTable,
    config: &SelectConfig,
    cancel: &CancelToken,
) -> Result<EnsembleOutcome, SelectError> {
    if cancel.is_cancelled() {
        return Err(SelectError::Cancelled { tier });
    }
    let depth = config.accumulation_depth();
    let rows = rank_candidates_with_overrides(tier, tensor, targets, depth, config.overrides())?;
    let outcome = build_ensemble(tier, &rows, tensor, targets, config.denylist(), depth)?;
    debug!(tier = %tier, size = outcome.size(), "tier selected");
    Ok(outcome)
}

/// Runs ranking, ensemble building and envelope export for every tier in
/// `targets`.
///
/// Level patches from `config` are applied to a copy of `tensor` first.
/// Tiers are independent: a failing tier is logged, recorded in
/// [`SelectionReport::failures`] and left out of the envelope while the
/// others proceed. Tiers not started when `cancel` fires fail with
/// [`SelectError::Cancelled`]. When `rainfall_aep` is given, each envelope
/// record carries the chosen event's rainfall AEP at its site.
///
/// # Errors
///
/// Run-level problems only: invalid configuration, input shape mismatches,
/// overrides or patches naming unknown tiers, events or sites, and
/// [`SelectError::NonMonotonic`] when violations are configured to be fatal.
#[tracing::instrument(
    skip_all,
    fields(n_tiers = targets.tiers().len(), n_sites = tensor.n_sites())
)]
pub fn run_selection(
    tensor: &ResultTensor,
    targets: &TargetTable,
    rainfall_aep: Option<&ResultTensor>,
    config: &SelectConfig,
    cancel: &CancelToken,
) -> Result<SelectionReport, SelectError> {
    config.validate()?;
    if targets.n_sites() != tensor.n_sites() {
        return Err(SelectError::ShapeMismatch {
            what: "target table sites".to_string(),
            expected: tensor.n_sites(),
            got: targets.n_sites(),
        });
    }
    if let Some(r) = rainfall_aep {
        if r.catalog() != tensor.catalog() {
            return Err(SelectError::InvalidConfig {
                reason: "rainfall AEP tensor uses a different event catalog".to_string(),
            });
        }
        if r.n_sites() != tensor.n_sites() {
            return Err(SelectError::ShapeMismatch {
                what: "rainfall AEP sites".to_string(),
                expected: tensor.n_sites(),
                got: r.n_sites(),
            });
        }
    }
    for o in config.overrides() {
        targets.tier_index(o.tier)?;
    }
    let patched_tensor = patched(tensor, config.patches())?;
    let tensor: &ResultTensor = &patched_tensor;

    let run = |&tier: &AepTier| (tier, select_tier(tier, tensor, targets, config, cancel));
    let results: Vec<(AepTier, Result<EnsembleOutcome, SelectError>)> = if config.parallel() {
        targets.tiers().par_iter().map(run).collect()
    } else {
        targets.tiers().iter().map(run).collect()
    };

    let mut outcomes = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (tier, result) in results {
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                warn!(tier = %tier, error = %e, "tier failed");
                failures.push(TierFailure::new(tier, e));
            }
        }
    }

    let catalog = tensor.catalog();
    let envelope = EnvelopeTable::from_outcomes(&outcomes, catalog, rainfall_aep)?;
    let ensembles = outcomes
        .iter()
        .map(|o| EnsembleRecord::new(o, catalog))
        .collect::<Result<Vec<_>, _>>()?;

    let violations = validate_monotonic(&envelope);
    for v in &violations {
        warn!(
            site = v.site,
            lower = %v.lower_tier,
            upper = %v.upper_tier,
            lower_level = v.lower_level,
            upper_level = v.upper_level,
            "envelope not monotonic"
        );
    }

    let total_ensemble_size = ensembles.iter().map(|e| e.size).sum();
    info!(
        succeeded = outcomes.len(),
        failed = failures.len(),
        violations = violations.len(),
        total_ensemble_size,
        "selection complete"
    );

    if config.fail_on_non_monotonic() && !violations.is_empty() {
        return Err(SelectError::NonMonotonic {
            count: violations.len(),
        });
    }

    Ok(SelectionReport {
        envelope,
        ensembles,
        violations,
        failures,
        total_ensemble_size,
    })
}
