//! Log-depth to normal-quantile interpolation.

use aepsel_events::DurationClass;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::IfdError;

/// Returns the standard normal distribution.
fn standard_normal() -> Result<Normal, IfdError> {
    Normal::new(0.0, 1.0).map_err(|e| IfdError::Distribution {
        message: e.to_string(),
    })
}

/// Piecewise-linear frequency curve in (log10 depth, standard normal quantile)
/// space.
///
/// Knots are strictly increasing in log-depth. Queries outside the knot
/// range are extrapolated along the nearest boundary segment.
#[derive(Debug, Clone)]
pub struct FrequencyCurve {
    /// `(log10(depth), z)` with `z = -Φ⁻¹(aep)`, ascending in log-depth.
    knots: Vec<(f64, f64)>,
    normal: Normal,
}

impl FrequencyCurve {
    /// Builds a curve from `(aep, depth)` knots of one zone and duration.
    ///
    /// Knots whose depth duplicates an earlier depth are dropped.
    ///
    /// # Errors
    ///
    /// [`IfdError::InsufficientTableData`] if fewer than two distinct depths
    /// remain.
    pub fn new(
        zone: &str,
        duration: DurationClass,
        knots: &[(f64, f64)],
    ) -> Result<Self, IfdError> {
        let normal = standard_normal()?;
        let mut pts: Vec<(f64, f64)> = knots
            .iter()
            .filter(|(p, d)| p.is_finite() && *p > 0.0 && *p < 1.0 && d.is_finite() && *d > 0.0)
            .map(|&(p, d)| (d.log10(), -normal.inverse_cdf(p)))
            .collect();
        pts.sort_by(|a, b| a.0.total_cmp(&b.0));

        let before = pts.len();
        pts.dedup_by(|b, a| a.0 == b.0);
        if pts.len() < before {
            tracing::debug!(
                zone,
                hours = duration.hours(),
                dropped = before - pts.len(),
                "duplicate IFD depths dropped"
            );
        }

        if pts.len() < 2 {
            return Err(IfdError::InsufficientTableData {
                zone: zone.to_string(),
                hours: duration.hours(),
                valid: pts.len(),
            });
        }
        Ok(Self { knots: pts, normal })
    }

    /// Returns the number of knots.
    pub fn n_knots(&self) -> usize {
        self.knots.len()
    }

    /// Returns the standard normal quantile at `depth`.
    pub fn quantile(&self, depth: f64) -> Result<f64, IfdError> {
        if !depth.is_finite() || depth <= 0.0 {
            return Err(IfdError::InvalidDepth { depth });
        }
        let x = depth.log10();
        let n = self.knots.len();
        // Segment index: first knot at or right of x, bounded to a real segment.
        let upper = self.knots.partition_point(|k| k.0 < x).clamp(1, n - 1);
        let (x0, z0) = self.knots[upper - 1];
        let (x1, z1) = self.knots[upper];
        Ok(z0 + (z1 - z0) * (x - x0) / (x1 - x0))
    }

    /// Returns the annual exceedance probability of `depth`.
    ///
    /// Computed as `Φ(-z)`, which equals `1 - Φ(z)` without cancellation
    /// for rare depths.
    ///
    /// # Errors
    ///
    /// [`IfdError::InvalidDepth`] if `depth` is not finite and positive.
    pub fn aep(&self, depth: f64) -> Result<f64, IfdError> {
        let z = self.quantile(depth)?;
        Ok(self.normal.cdf(-z))
    }
}
