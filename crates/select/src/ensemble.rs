//! Ensemble accumulation and per-site maximum deviation.

use std::collections::BTreeSet;

use aepsel_events::{EventId, ResultTensor};
use serde::Serialize;

use crate::error::SelectError;
use crate::rank::RankedCandidate;
use crate::targets::TargetTable;
use crate::tier::AepTier;

/// A denylisted event dropped from an ensemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Removal {
    /// Removed event.
    pub event: EventId,
    /// Rank at which it was first picked.
    pub rank: usize,
}

/// The ensemble event producing the largest deviation at one site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteMaximum {
    /// Site index.
    pub site: usize,
    /// Event producing the maximum.
    pub event: EventId,
    /// Event level at the site.
    pub level: f64,
    /// Tier target level at the site.
    pub target: f64,
    /// `level - target`.
    pub deviation: f64,
}

/// Ensemble and envelope inputs for one tier.
#[derive(Debug, Clone)]
pub struct EnsembleOutcome {
    tier: AepTier,
    members: BTreeSet<EventId>,
    removed: Vec<Removal>,
    sites: Vec<SiteMaximum>,
}

impl EnsembleOutcome {
    /// Returns the tier.
    pub fn tier(&self) -> AepTier {
        self.tier
    }

    /// Returns the ensemble events, ascending.
    pub fn members(&self) -> &BTreeSet<EventId> {
        &self.members
    }

    /// Returns the denylisted events removed, in the order first seen.
    pub fn removed(&self) -> &[Removal] {
        &self.removed
    }

    /// Returns the maximum for every site, in site order.
    pub fn sites(&self) -> &[SiteMaximum] {
        &self.sites
    }

    /// Returns the number of distinct events producing a site maximum.
    pub fn size(&self) -> usize {
        self.sites
            .iter()
            .map(|s| s.event)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Builds the ensemble for `tier` from the first `depth` candidate rows.
///
/// Each site's raw picks from ranks `0..depth` are pooled and every
/// denylisted event is dropped (and recorded with the rank where it first
/// appeared). At each
/// site the ensemble event with the largest `level - target` wins, ties to
/// the smaller event id. Only finite levels compete.
///
/// # Errors
///
/// - [`SelectError::InvalidConfig`] if `depth` is zero or exceeds the rows given
/// - [`SelectError::EmptyEnsemble`] if nothing survives the denylist, or a
///   site has no ensemble event with a finite level
#[tracing::instrument(skip_all, fields(tier = %tier, depth = depth))]
pub fn build_ensemble(
    tier: AepTier,
    candidates: &[RankedCandidate],
    tensor: &ResultTensor,
    targets: &TargetTable,
    denylist: &BTreeSet<EventId>,
    depth: usize,
) -> Result<EnsembleOutcome, SelectError> {
    if depth == 0 || depth > candidates.len() {
        return Err(SelectError::InvalidConfig {
            reason: format!(
                "accumulation depth {depth} outside 1..={}",
                candidates.len()
            ),
        });
    }
    if targets.n_sites() != tensor.n_sites() {
        return Err(SelectError::ShapeMismatch {
            what: "target table sites".to_string(),
            expected: tensor.n_sites(),
            got: targets.n_sites(),
        });
    }
    let t = targets.tier_index(tier)?;

    let mut members = BTreeSet::new();
    let mut removed: Vec<Removal> = Vec::new();
    for row in &candidates[..depth] {
        for event in row.events() {
            if !denylist.contains(&event) {
                members.insert(event);
            } else if removed.iter().all(|r| r.event != event) {
                removed.push(Removal {
                    event,
                    rank: row.rank(),
                });
            }
        }
    }
    if members.is_empty() {
        return Err(SelectError::EmptyEnsemble { tier, site: None });
    }

    let mut sites = Vec::with_capacity(tensor.n_sites());
    for site in 0..tensor.n_sites() {
        let target = targets.target(t, site);
        let mut best: Option<SiteMaximum> = None;
        for &event in &members {
            let level = tensor.value(event, site)?;
            if !level.is_finite() {
                continue;
            }
            let deviation = level - target;
            if best.is_none_or(|b| deviation > b.deviation) {
                best = Some(SiteMaximum {
                    site,
                    event,
                    level,
                    target,
                    deviation,
                });
            }
        }
        sites.push(best.ok_or(SelectError::EmptyEnsemble {
            tier,
            site: Some(site),
        })?);
    }

    tracing::debug!(
        members = members.len(),
        removed = removed.len(),
        "ensemble built"
    );
    Ok(EnsembleOutcome {
        tier,
        members,
        removed,
        sites,
    })
}
