//! Selection run report and its JSON form.

use aepsel_events::{EventCatalog, EventId};
use serde::Serialize;

use crate::ensemble::{EnsembleOutcome, Removal};
use crate::envelope::EnvelopeTable;
use crate::error::SelectError;
use crate::monotonic::MonotonicityViolation;
use crate::tier::AepTier;

/// Membership of one tier's ensemble.
#[derive(Debug, Clone, Serialize)]
pub struct EnsembleRecord {
    pub tier: AepTier,
    /// Distinct events producing a site maximum.
    pub size: usize,
    pub members: Vec<EventId>,
    /// `members` as `DDD_RRRR` labels.
    pub labels: Vec<String>,
    pub removed: Vec<Removal>,
}

impl EnsembleRecord {
    pub(crate) fn new(
        outcome: &EnsembleOutcome,
        catalog: &EventCatalog,
    ) -> Result<Self, SelectError> {
        let members: Vec<EventId> = outcome.members().iter().copied().collect();
        let labels = members
            .iter()
            .map(|&e| catalog.label(e))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            tier: outcome.tier(),
            size: outcome.size(),
            members,
            labels,
            removed: outcome.removed().to_vec(),
        })
    }
}

/// A tier that produced no envelope.
#[derive(Debug, Clone, Serialize)]
pub struct TierFailure {
    pub tier: AepTier,
    pub message: String,
    #[serde(skip)]
    pub error: SelectError,
}

impl TierFailure {
    pub(crate) fn new(tier: AepTier, error: SelectError) -> Self {
        Self {
            tier,
            message: error.to_string(),
            error,
        }
    }
}

/// Everything a selection run produces.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionReport {
    /// Chosen event per (tier, site).
    pub envelope: EnvelopeTable,
    /// Ensemble membership per successful tier, most frequent first.
    pub ensembles: Vec<EnsembleRecord>,
    /// Advisory monotonicity violations.
    pub violations: Vec<MonotonicityViolation>,
    /// Tiers that failed, most frequent first.
    pub failures: Vec<TierFailure>,
    /// Sum of ensemble sizes across tiers.
    pub total_ensemble_size: usize,
}

impl SelectionReport {
    /// Returns the ensemble record of `tier`, if the tier succeeded.
    pub fn ensemble(&self, tier: AepTier) -> Option<&EnsembleRecord> {
        self.ensembles.iter().find(|e| e.tier == tier)
    }

    /// Returns the failure of `tier`, if it failed.
    pub fn failure(&self, tier: AepTier) -> Option<&TierFailure> {
        self.failures.iter().find(|f| f.tier == tier)
    }
}

/// Serialize a report to a JSON string.
pub fn to_json(report: &SelectionReport) -> Result<String, SelectError> {
    serde_json::to_string_pretty(report).map_err(|e| SelectError::Serialization {
        reason: e.to_string(),
    })
}
