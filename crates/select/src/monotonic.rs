//! Cross-tier monotonicity check.

use serde::Serialize;

use crate::envelope::EnvelopeTable;
use crate::tier::AepTier;

/// An adjacent tier pair at one site whose level does not increase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonotonicityViolation {
    /// Site index.
    pub site: usize,
    /// The more frequent tier.
    pub lower_tier: AepTier,
    /// The rarer tier.
    pub upper_tier: AepTier,
    /// Level at the more frequent tier.
    pub lower_level: f64,
    /// Level at the rarer tier.
    pub upper_level: f64,
}

/// Reports every site where the envelope level fails to rise strictly from
/// one tier to the next rarer tier present for that site.
///
/// Tiers absent for a site are skipped. The result is advisory.
pub fn validate_monotonic(envelope: &EnvelopeTable) -> Vec<MonotonicityViolation> {
    let mut violations = Vec::new();
    for site in envelope.sites() {
        let series: Vec<_> = envelope.site_series(site).collect();
        for pair in series.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if hi.level <= lo.level {
                violations.push(MonotonicityViolation {
                    site,
                    lower_tier: lo.tier,
                    upper_tier: hi.tier,
                    lower_level: lo.level,
                    upper_level: hi.level,
                });
            }
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::tests::table;

    #[test]
    fn reports_decrease() {
        let t = table(0, &[(2, 1.0), (5, 1.2), (10, 1.15)]);
        let v = validate_monotonic(&t);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].lower_tier.return_period(), 5);
        assert_eq!(v[0].upper_tier.return_period(), 10);
        assert_eq!(v[0].site, 0);
    }

    #[test]
    fn equal_levels_violate() {
        let t = table(0, &[(2, 1.0), (5, 1.0)]);
        assert_eq!(validate_monotonic(&t).len(), 1);
    }

    #[test]
    fn increasing_is_clean() {
        let t = table(4, &[(2, 1.0), (5, 1.2), (100, 3.0)]);
        assert!(validate_monotonic(&t).is_empty());
    }

    #[test]
    fn missing_tier_compares_neighbours() {
        // 1-in-5 failed; 1-in-2 and 1-in-10 are compared directly.
        let t = table(0, &[(2, 1.0), (10, 0.9)]);
        let v = validate_monotonic(&t);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].lower_tier.return_period(), 2);
        assert_eq!(v[0].upper_tier.return_period(), 10);
    }
}
