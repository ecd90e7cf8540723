//! The envelope table: one chosen event per (tier, site).

use aepsel_events::{EventCatalog, EventId, ResultTensor};
use serde::Serialize;

use crate::ensemble::EnsembleOutcome;
use crate::error::SelectError;
use crate::tier::AepTier;

/// The design event attributed to one tier at one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvelopeRecord {
    /// Design tier.
    pub tier: AepTier,
    /// Site index.
    pub site: usize,
    /// Chosen event.
    pub event: EventId,
    /// Chosen event as `DDD_RRRR`.
    pub label: String,
    /// Event level at the site.
    pub level: f64,
    /// Tier target level at the site.
    pub target: f64,
    /// `level - target`.
    pub deviation: f64,
    /// Rainfall AEP of the chosen event at the site, when rainfall depths
    /// were supplied and the depth was usable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rainfall_aep: Option<f64>,
}

/// Envelope records ordered by tier, then site.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct EnvelopeTable {
    records: Vec<EnvelopeRecord>,
}

impl EnvelopeTable {
    /// Collects the site maxima of every outcome.
    ///
    /// # Errors
    ///
    /// [`SelectError::Event`] if a chosen event is outside `catalog`, or
    /// [`SelectError::ShapeMismatch`] if `rainfall_aep` covers fewer sites
    /// than an outcome.
    pub fn from_outcomes(
        outcomes: &[EnsembleOutcome],
        catalog: &EventCatalog,
        rainfall_aep: Option<&ResultTensor>,
    ) -> Result<Self, SelectError> {
        let mut records = Vec::new();
        for outcome in outcomes {
            if let Some(r) = rainfall_aep.filter(|r| r.n_sites() < outcome.sites().len()) {
                return Err(SelectError::ShapeMismatch {
                    what: "rainfall AEP sites".to_string(),
                    expected: outcome.sites().len(),
                    got: r.n_sites(),
                });
            }
            for m in outcome.sites() {
                let rainfall_aep = match rainfall_aep {
                    Some(r) => Some(r.value(m.event, m.site)?).filter(|p| p.is_finite()),
                    None => None,
                };
                records.push(EnvelopeRecord {
                    tier: outcome.tier(),
                    site: m.site,
                    event: m.event,
                    label: catalog.label(m.event)?,
                    level: m.level,
                    target: m.target,
                    deviation: m.deviation,
                    rainfall_aep,
                });
            }
        }
        records.sort_by_key(|r| (r.tier, r.site));
        Ok(Self { records })
    }

    /// Returns the record for `tier` at `site`.
    pub fn export(&self, tier: AepTier, site: usize) -> Result<&EnvelopeRecord, SelectError> {
        self.records
            .binary_search_by_key(&(tier, site), |r| (r.tier, r.site))
            .map(|i| &self.records[i])
            .map_err(|_| SelectError::MissingEnvelope { tier, site })
    }

    /// Returns all records.
    pub fn records(&self) -> &[EnvelopeRecord] {
        &self.records
    }

    /// Returns the tiers present, most frequent first.
    pub fn tiers(&self) -> Vec<AepTier> {
        let mut tiers: Vec<AepTier> = self.records.iter().map(|r| r.tier).collect();
        tiers.dedup();
        tiers
    }

    /// Returns the sites present, ascending.
    pub fn sites(&self) -> Vec<usize> {
        let mut sites: Vec<usize> = self.records.iter().map(|r| r.site).collect();
        sites.sort_unstable();
        sites.dedup();
        sites
    }

    /// Iterates the records of `site`, most frequent tier first.
    pub fn site_series(&self, site: usize) -> impl Iterator<Item = &EnvelopeRecord> + '_ {
        self.records.iter().filter(move |r| r.site == site)
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
