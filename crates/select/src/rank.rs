//! Per-site candidate ranking against biased target levels.

use std::cmp::Ordering;

use aepsel_events::{EventId, ResultTensor};

use crate::config::SiteOverride;
use crate::error::SelectError;
use crate::targets::TargetTable;
use crate::tier::AepTier;

/// One site's pick at one rank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SitePick {
    /// Picked event.
    pub event: EventId,
    /// Event level at the site.
    pub level: f64,
    /// `level - (target + tolerance)`.
    pub diff: f64,
}

/// The picks of every site at one rank.
///
/// `picks` is the folded best-so-far row; `raw` holds each site's own
/// rank-`k` event, which is what the ensemble pools.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    rank: usize,
    picks: Vec<Option<SitePick>>,
    raw: Vec<Option<SitePick>>,
}

impl RankedCandidate {
    /// Returns the rank, starting at 0.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Returns the pick of every site. `None` marks a site with no finite level.
    pub fn picks(&self) -> &[Option<SitePick>] {
        &self.picks
    }

    /// Returns the pick at `site`.
    pub fn pick(&self, site: usize) -> Option<&SitePick> {
        self.picks.get(site).and_then(Option::as_ref)
    }

    /// Returns every site's raw rank-`k` pick. `None` marks a site with
    /// fewer than `k + 1` finite levels.
    pub fn raw_picks(&self) -> &[Option<SitePick>] {
        &self.raw
    }

    /// Returns the raw rank-`k` pick at `site`.
    pub fn raw_pick(&self, site: usize) -> Option<&SitePick> {
        self.raw.get(site).and_then(Option::as_ref)
    }

    /// Iterates the raw rank-`k` events, in site order, repeats included.
    pub fn events(&self) -> impl Iterator<Item = EventId> + '_ {
        self.raw.iter().flatten().map(|p| p.event)
    }
}

/// Orders one site's finite-level events by distance to `biased_target`,
/// keeping the closest `n`. Ties go to the smaller event id.
fn rank_site(
    tensor: &ResultTensor,
    site: usize,
    biased_target: f64,
    n: usize,
) -> Result<Vec<SitePick>, SelectError> {
    let mut picks: Vec<SitePick> = tensor
        .site_values(site)?
        .map(|(event, level)| SitePick {
            event,
            level,
            diff: level - biased_target,
        })
        .collect();
    picks.sort_unstable_by(|a, b| match a.diff.abs().total_cmp(&b.diff.abs()) {
        Ordering::Equal => a.event.cmp(&b.event),
        other => other,
    });
    picks.truncate(n);
    Ok(picks)
}

/// Keeps a site's previous pick unless the raw pick is strictly closer.
fn carry_forward(prev: Option<SitePick>, raw: Option<SitePick>) -> Option<SitePick> {
    match (prev, raw) {
        (Some(p), Some(r)) if p.diff.abs() <= r.diff.abs() => Some(p),
        (_, Some(r)) => Some(r),
        (p, None) => p,
    }
}

/// Ranks candidates for `tier` without manual overrides.
///
/// See [`rank_candidates_with_overrides`].
pub fn rank_candidates(
    tier: AepTier,
    tensor: &ResultTensor,
    targets: &TargetTable,
    n_ranks: usize,
) -> Result<Vec<RankedCandidate>, SelectError> {
    rank_candidates_with_overrides(tier, tensor, targets, n_ranks, &[])
}

/// Ranks candidates for `tier` and folds them into `n_ranks` rows.
///
/// Each site's finite-level events are ordered by `|level - (target +
/// tolerance)|`. Overrides for `tier` then replace a site's rank-0 pick with
/// its raw pick at the override rank. Row `k > 0` keeps a site's row `k - 1`
/// pick unless the raw rank-`k` pick is strictly closer; a site without a
/// rank-`k` event keeps its previous pick. Each row also keeps the raw
/// rank-`k` picks so deeper accumulation can pool them.
///
/// # Errors
///
/// - [`SelectError::InvalidConfig`] if `n_ranks` is zero
/// - [`SelectError::ShapeMismatch`] if tensor and targets disagree on sites
/// - [`SelectError::UnknownTier`] if `tier` has no targets
/// - [`SelectError::InvalidOverride`] if an override names an unknown site
///   or a rank the site does not have
#[tracing::instrument(skip_all, fields(tier = %tier, n_ranks = n_ranks))]
pub fn rank_candidates_with_overrides(
    tier: AepTier,
    tensor: &ResultTensor,
    targets: &TargetTable,
    n_ranks: usize,
    overrides: &[SiteOverride],
) -> Result<Vec<RankedCandidate>, SelectError> {
    if n_ranks == 0 {
        return Err(SelectError::InvalidConfig {
            reason: "n_ranks must be >= 1".to_string(),
        });
    }
    let n_sites = tensor.n_sites();
    if targets.n_sites() != n_sites {
        return Err(SelectError::ShapeMismatch {
            what: "target table sites".to_string(),
            expected: n_sites,
            got: targets.n_sites(),
        });
    }
    let t = targets.tier_index(tier)?;
    let overrides: Vec<&SiteOverride> = overrides.iter().filter(|o| o.tier == tier).collect();
    let depth = overrides
        .iter()
        .map(|o| o.rank + 1)
        .fold(n_ranks, usize::max);

    let mut columns = (0..n_sites)
        .map(|site| rank_site(tensor, site, targets.biased_target(t, site), depth))
        .collect::<Result<Vec<_>, _>>()?;

    for o in overrides {
        let invalid = |reason: String| SelectError::InvalidOverride {
            tier,
            site: o.site,
            rank: o.rank,
            reason,
        };
        let column = columns
            .get_mut(o.site)
            .ok_or_else(|| invalid(format!("site outside 0..{n_sites}")))?;
        let pick = *column
            .get(o.rank)
            .ok_or_else(|| invalid(format!("site has only {} candidate(s)", column.len())))?;
        tracing::debug!(site = o.site, rank = o.rank, event = %pick.event, "override applied");
        column[0] = pick;
    }

    let raw_at = |k: usize| -> Vec<Option<SitePick>> {
        columns.iter().map(|c| c.get(k).copied()).collect()
    };
    let first = raw_at(0);
    let mut rows = Vec::with_capacity(n_ranks);
    rows.push(RankedCandidate {
        rank: 0,
        picks: first.clone(),
        raw: first,
    });
    for k in 1..n_ranks {
        let raw = raw_at(k);
        let picks = rows[k - 1]
            .picks
            .iter()
            .zip(&raw)
            .map(|(&prev, &r)| carry_forward(prev, r))
            .collect();
        rows.push(RankedCandidate { rank: k, picks, raw });
    }
    Ok(rows)
}
