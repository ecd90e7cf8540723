//! Target levels and tolerances per (tier, site).

use ndarray::Array2;

use crate::error::SelectError;
use crate::tier::AepTier;

/// Target level and ranking tolerance for every tier and site.
///
/// Rows follow `tiers` (strictly ascending return period), columns are sites.
#[derive(Debug, Clone)]
pub struct TargetTable {
    tiers: Vec<AepTier>,
    targets: Array2<f64>,
    tolerances: Array2<f64>,
}

impl TargetTable {
    /// Builds a table.
    ///
    /// # Errors
    ///
    /// - [`SelectError::InvalidTargets`] if `tiers` is empty or not strictly
    ///   ascending, or any value is non-finite
    /// - [`SelectError::ShapeMismatch`] if either array disagrees with `tiers`
    ///   or the two arrays disagree with each other
    pub fn new(
        tiers: Vec<AepTier>,
        targets: Array2<f64>,
        tolerances: Array2<f64>,
    ) -> Result<Self, SelectError> {
        if tiers.is_empty() {
            return Err(SelectError::InvalidTargets {
                reason: "no tiers".to_string(),
            });
        }
        if !tiers.windows(2).all(|w| w[0] < w[1]) {
            return Err(SelectError::InvalidTargets {
                reason: "tiers must be strictly ascending by return period".to_string(),
            });
        }
        for (what, arr) in [("target rows", &targets), ("tolerance rows", &tolerances)] {
            if arr.nrows() != tiers.len() {
                return Err(SelectError::ShapeMismatch {
                    what: what.to_string(),
                    expected: tiers.len(),
                    got: arr.nrows(),
                });
            }
        }
        if tolerances.ncols() != targets.ncols() {
            return Err(SelectError::ShapeMismatch {
                what: "tolerance sites".to_string(),
                expected: targets.ncols(),
                got: tolerances.ncols(),
            });
        }
        for (what, arr) in [("target", &targets), ("tolerance", &tolerances)] {
            if let Some(((t, s), v)) = arr.indexed_iter().find(|(_, v)| !v.is_finite()) {
                return Err(SelectError::InvalidTargets {
                    reason: format!("{what} for tier {} at site {s} is {v}", tiers[t]),
                });
            }
        }
        Ok(Self {
            tiers,
            targets,
            tolerances,
        })
    }

    /// Returns the tiers, most frequent first.
    pub fn tiers(&self) -> &[AepTier] {
        &self.tiers
    }

    /// Returns the number of sites.
    pub fn n_sites(&self) -> usize {
        self.targets.ncols()
    }

    /// Returns the row index of `tier`.
    pub fn tier_index(&self, tier: AepTier) -> Result<usize, SelectError> {
        self.tiers
            .binary_search(&tier)
            .map_err(|_| SelectError::UnknownTier { tier })
    }

    /// Returns the target level of row `t` at `site`.
    pub fn target(&self, t: usize, site: usize) -> f64 {
        self.targets[[t, site]]
    }

    /// Returns the ranking tolerance of row `t` at `site`.
    pub fn tolerance(&self, t: usize, site: usize) -> f64 {
        self.tolerances[[t, site]]
    }

    /// Returns the level candidates are ranked against: target plus tolerance.
    pub fn biased_target(&self, t: usize, site: usize) -> f64 {
        self.target(t, site) + self.tolerance(t, site)
    }
}
