//! Design-event selection per AEP tier.
//!
//! For each tier, every site's events are ranked by closeness to a biased
//! target level, the top picks are pooled into an ensemble (minus a
//! denylist), and each site is assigned the ensemble event with the largest
//! exceedance of its target. The result is an [`EnvelopeTable`] with one
//! record per (tier, site), checked for monotonicity across tiers.
//!
//! - [`rank_candidates`] / [`rank_candidates_with_overrides`]: ranked, folded pick rows
//! - [`build_ensemble`]: ensemble membership and per-site maxima
//! - [`validate_monotonic`]: advisory cross-tier check
//! - [`run_selection`]: the whole batch, tier failures isolated

mod cancel;
mod config;
mod ensemble;
mod envelope;
mod error;
mod monotonic;
mod pipeline;
mod rank;
mod report;
mod targets;
mod tier;

pub use cancel::CancelToken;
pub use config::{LevelPatch, SelectConfig, SiteOverride};
pub use ensemble::{EnsembleOutcome, Removal, SiteMaximum, build_ensemble};
pub use envelope::{EnvelopeRecord, EnvelopeTable};
pub use error::SelectError;
pub use monotonic::{MonotonicityViolation, validate_monotonic};
pub use pipeline::run_selection;
pub use rank::{RankedCandidate, SitePick, rank_candidates, rank_candidates_with_overrides};
pub use report::{EnsembleRecord, SelectionReport, TierFailure, to_json};
pub use targets::TargetTable;
pub use tier::{AepTier, STANDARD_RETURN_PERIODS};
