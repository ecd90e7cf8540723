//! Error types for the aepsel-select crate.

use aepsel_events::EventError;
use aepsel_ifd::IfdError;

use crate::tier::AepTier;

fn empty_reason(site: &Option<usize>) -> String {
    match site {
        Some(s) => format!("no ensemble event has a finite level at site {s}"),
        None => "every candidate was denylisted".to_string(),
    }
}

/// Error type for all fallible operations in the aepsel-select crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SelectError {
    /// Returned when a tier has nothing left to build an envelope from.
    #[error("empty ensemble for tier {tier}: {}", empty_reason(.site))]
    EmptyEnsemble {
        /// Tier being built.
        tier: AepTier,
        /// Site with no usable event, or `None` if the ensemble itself is empty.
        site: Option<usize>,
    },

    /// Returned when a return period cannot define a tier.
    #[error("invalid return period {return_period} (must be >= 2 years)")]
    InvalidTier {
        /// The offending return period.
        return_period: u32,
    },

    /// Returned when a tier is not present in the target table.
    #[error("unknown tier {tier}")]
    UnknownTier {
        /// The requested tier.
        tier: AepTier,
    },

    /// Returned when two inputs disagree on a dimension.
    #[error("shape mismatch for {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        /// Which dimension disagrees.
        what: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when the target table is malformed.
    #[error("invalid target table: {reason}")]
    InvalidTargets {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a manual override cannot be applied.
    #[error("override for tier {tier}, site {site}, rank {rank}: {reason}")]
    InvalidOverride {
        /// Tier named by the override.
        tier: AepTier,
        /// Site named by the override.
        site: usize,
        /// Rank named by the override.
        rank: usize,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when no envelope record exists for a tier and site.
    #[error("no envelope for tier {tier} at site {site}")]
    MissingEnvelope {
        /// Requested tier.
        tier: AepTier,
        /// Requested site.
        site: usize,
    },

    /// Returned for tiers not started before the run was cancelled.
    #[error("tier {tier} cancelled before it started")]
    Cancelled {
        /// Tier that was skipped.
        tier: AepTier,
    },

    /// Returned when violations are configured to be fatal.
    #[error("{count} monotonicity violation(s) across tiers")]
    NonMonotonic {
        /// Number of violating (site, tier pair) entries.
        count: usize,
    },

    /// Returned when serialization to JSON fails.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },

    /// Event codec or tensor error.
    #[error(transparent)]
    Event(#[from] EventError),

    /// Frequency interpolation error.
    #[error(transparent)]
    Ifd(#[from] IfdError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_empty_ensemble_denylisted() {
        let e = SelectError::EmptyEnsemble {
            tier: AepTier::new(100).unwrap(),
            site: None,
        };
        assert_eq!(
            e.to_string(),
            "empty ensemble for tier 1-in-100: every candidate was denylisted"
        );
    }

    #[test]
    fn error_empty_ensemble_site() {
        let e = SelectError::EmptyEnsemble {
            tier: AepTier::new(5).unwrap(),
            site: Some(3),
        };
        assert_eq!(
            e.to_string(),
            "empty ensemble for tier 1-in-5: no ensemble event has a finite level at site 3"
        );
    }

    #[test]
    fn error_invalid_tier() {
        let e = SelectError::InvalidTier { return_period: 1 };
        assert_eq!(e.to_string(), "invalid return period 1 (must be >= 2 years)");
    }

    #[test]
    fn error_shape_mismatch() {
        let e = SelectError::ShapeMismatch {
            what: "sites".to_string(),
            expected: 28,
            got: 27,
        };
        assert_eq!(e.to_string(), "shape mismatch for sites: expected 28, got 27");
    }

    #[test]
    fn error_transparent_event() {
        let e: SelectError = EventError::InvalidEventId { id: 0, max: 11340 }.into();
        assert_eq!(e.to_string(), "invalid event id 0 (valid range is 1..=11340)");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<SelectError>();
    }
}
