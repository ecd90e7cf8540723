//! Per-event, per-site peak result tensor.

use ndarray::{Array3, ArrayView1, ArrayViewMut3};

use crate::codec::{EventCatalog, EventId};
use crate::error::EventError;

/// Peak attribute (level or flow) indexed `[duration][realization][site]`.
///
/// Produced by the hydraulic model runs and read-only to the selection core,
/// except for explicit [`patch`](Self::patch) calls made while assembling
/// inputs. Missing results (failed runs) are stored as NaN.
#[derive(Debug, Clone)]
pub struct ResultTensor {
    catalog: EventCatalog,
    values: Array3<f64>,
}

impl ResultTensor {
    /// Wraps an existing array.
    ///
    /// # Errors
    ///
    /// [`EventError::ShapeMismatch`] if the first two axes disagree with the
    /// catalog.
    pub fn new(catalog: EventCatalog, values: Array3<f64>) -> Result<Self, EventError> {
        let (d, r, s) = values.dim();
        let expected = [catalog.durations().len(), catalog.realizations() as usize, s];
        if [d, r, s] != expected {
            return Err(EventError::ShapeMismatch {
                expected,
                got: [d, r, s],
            });
        }
        Ok(Self { catalog, values })
    }

    /// Builds a tensor from row-major data of length `durations * realizations * n_sites`.
    pub fn from_vec(
        catalog: EventCatalog,
        n_sites: usize,
        data: Vec<f64>,
    ) -> Result<Self, EventError> {
        let shape = (
            catalog.durations().len(),
            catalog.realizations() as usize,
            n_sites,
        );
        let got = data.len();
        let values =
            Array3::from_shape_vec(shape, data).map_err(|_| EventError::DataLengthMismatch {
                expected: shape.0.saturating_mul(shape.1).saturating_mul(shape.2),
                got,
            })?;
        Ok(Self { catalog, values })
    }

    /// A tensor of NaN (no results).
    pub fn empty(catalog: EventCatalog, n_sites: usize) -> Self {
        let shape = (
            catalog.durations().len(),
            catalog.realizations() as usize,
            n_sites,
        );
        Self {
            catalog,
            values: Array3::from_elem(shape, f64::NAN),
        }
    }

    /// Returns the event catalog indexing the first two axes.
    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    /// Returns the number of sites.
    pub fn n_sites(&self) -> usize {
        self.values.dim().2
    }

    /// Returns the underlying array.
    pub fn values(&self) -> &Array3<f64> {
        &self.values
    }

    /// Returns the value of `event` at `site` (NaN when missing).
    pub fn value(&self, event: EventId, site: usize) -> Result<f64, EventError> {
        self.check_site(site)?;
        let (d, r) = self.catalog.tensor_index(event)?;
        Ok(self.values[[d, r, site]])
    }

    /// Returns a mutable view of the values. The shape is fixed.
    pub fn values_mut(&mut self) -> ArrayViewMut3<'_, f64> {
        self.values.view_mut()
    }

    /// Returns all site values for `event`.
    pub fn event_values(&self, event: EventId) -> Result<ArrayView1<'_, f64>, EventError> {
        let (d, r) = self.catalog.tensor_index(event)?;
        Ok(self.values.slice(ndarray::s![d, r, ..]))
    }

    /// Iterates `(event, value)` for every finite value at `site`, in
    /// ascending event order.
    pub fn site_values(
        &self,
        site: usize,
    ) -> Result<impl Iterator<Item = (EventId, f64)> + '_, EventError> {
        self.check_site(site)?;
        let (n_dur, n_real, _) = self.values.dim();
        Ok((0..n_dur).flat_map(move |d| {
            (0..n_real).filter_map(move |r| {
                let v = self.values[[d, r, site]];
                v.is_finite().then(|| (self.catalog.id_at(d, r), v))
            })
        }))
    }

    /// Replaces the value of `event` at `site`, returning the previous value.
    pub fn patch(&mut self, event: EventId, site: usize, value: f64) -> Result<f64, EventError> {
        self.check_site(site)?;
        let (d, r) = self.catalog.tensor_index(event)?;
        Ok(std::mem::replace(&mut self.values[[d, r, site]], value))
    }

    fn check_site(&self, site: usize) -> Result<(), EventError> {
        if site >= self.n_sites() {
            return Err(EventError::SiteOutOfRange {
                site,
                n_sites: self.n_sites(),
            });
        }
        Ok(())
    }
}
