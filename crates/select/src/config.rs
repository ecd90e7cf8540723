//! Configuration for a selection run.

use std::collections::{BTreeSet, HashSet};

use aepsel_events::EventId;

use crate::error::SelectError;
use crate::tier::AepTier;

/// Replaces a site's rank-0 pick for one tier with its pick at `rank`.
///
/// Used where the closest event produced a non-monotonic detailed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteOverride {
    /// Tier the override applies to.
    pub tier: AepTier,
    /// Site whose pick is replaced.
    pub site: usize,
    /// Raw rank whose pick takes the place of rank 0.
    pub rank: usize,
}

/// Replaces the level of one event at one site before ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelPatch {
    /// Patched event.
    pub event: EventId,
    /// Patched site.
    pub site: usize,
    /// Replacement level. NaN marks the result as missing.
    pub level: f64,
}

/// Configuration for [`run_selection`](crate::run_selection).
///
/// # Example
///
/// ```
/// use aepsel_events::EventId;
/// use aepsel_select::SelectConfig;
///
/// let config = SelectConfig::new()
///     .with_accumulation_depth(2)
///     .with_denylist([EventId::new(5183), EventId::new(10113)]);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.denylist().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SelectConfig {
    /// Number of ranks pooled into each ensemble.
    accumulation_depth: usize,
    /// Build tiers on the rayon pool.
    parallel: bool,
    /// Events never admitted to an ensemble.
    denylist: BTreeSet<EventId>,
    /// Manual pick replacements.
    overrides: Vec<SiteOverride>,
    /// Level replacements applied before ranking.
    patches: Vec<LevelPatch>,
    /// Turn monotonicity violations into a run error.
    fail_on_non_monotonic: bool,
}

impl SelectConfig {
    /// Creates a configuration with default values.
    ///
    /// Defaults: `accumulation_depth = 1`, `parallel = true`, empty denylist,
    /// no overrides or patches, `fail_on_non_monotonic = false`.
    pub fn new() -> Self {
        Self {
            accumulation_depth: 1,
            parallel: true,
            denylist: BTreeSet::new(),
            overrides: Vec::new(),
            patches: Vec::new(),
            fail_on_non_monotonic: false,
        }
    }

    /// Sets the number of ranks pooled into each ensemble.
    pub fn with_accumulation_depth(mut self, depth: usize) -> Self {
        self.accumulation_depth = depth;
        self
    }

    /// Enables or disables parallel tier processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the denylist.
    pub fn with_denylist(mut self, events: impl IntoIterator<Item = EventId>) -> Self {
        self.denylist = events.into_iter().collect();
        self
    }

    /// Sets the manual overrides.
    pub fn with_overrides(mut self, overrides: Vec<SiteOverride>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Sets the level patches.
    pub fn with_patches(mut self, patches: Vec<LevelPatch>) -> Self {
        self.patches = patches;
        self
    }

    /// Makes monotonicity violations fatal.
    pub fn with_fail_on_non_monotonic(mut self, fail: bool) -> Self {
        self.fail_on_non_monotonic = fail;
        self
    }

    /// Returns the accumulation depth.
    pub fn accumulation_depth(&self) -> usize {
        self.accumulation_depth
    }

    /// Returns whether tiers run in parallel.
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Returns the denylist.
    pub fn denylist(&self) -> &BTreeSet<EventId> {
        &self.denylist
    }

    /// Returns the manual overrides.
    pub fn overrides(&self) -> &[SiteOverride] {
        &self.overrides
    }

    /// Returns the level patches.
    pub fn patches(&self) -> &[LevelPatch] {
        &self.patches
    }

    /// Returns whether violations are fatal.
    pub fn fail_on_non_monotonic(&self) -> bool {
        self.fail_on_non_monotonic
    }

    /// Validates this configuration.
    ///
    /// Returns an error if the depth is zero, an override uses rank 0 or
    /// repeats a (tier, site) pair, or a patch level is infinite.
    pub fn validate(&self) -> Result<(), SelectError> {
        if self.accumulation_depth < 1 {
            return Err(SelectError::InvalidConfig {
                reason: "accumulation_depth must be >= 1".to_string(),
            });
        }
        let mut seen = HashSet::new();
        for o in &self.overrides {
            if o.rank == 0 {
                return Err(SelectError::InvalidOverride {
                    tier: o.tier,
                    site: o.site,
                    rank: o.rank,
                    reason: "rank must be >= 1".to_string(),
                });
            }
            if !seen.insert((o.tier, o.site)) {
                return Err(SelectError::InvalidOverride {
                    tier: o.tier,
                    site: o.site,
                    rank: o.rank,
                    reason: "duplicate override for this tier and site".to_string(),
                });
            }
        }
        if let Some(p) = self.patches.iter().find(|p| p.level.is_infinite()) {
            return Err(SelectError::InvalidConfig {
                reason: format!("patch for {} at site {} has infinite level", p.event, p.site),
            });
        }
        Ok(())
    }
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self::new()
    }
}
