//! Rainfall depth to annual exceedance probability.
//!
//! Each rainfall zone has an intensity-frequency-duration (IFD) table of
//! depths by duration and probability. A [`FrequencyCurve`] interpolates one
//! duration column linearly in (log10 depth, standard normal quantile) space
//! and extrapolates along the boundary segments outside the tabulated range.
//!
//! # Quick start
//!
//! ```
//! use aepsel_events::DurationClass;
//! use aepsel_ifd::{IfdRow, IfdTable, IfdTableSpec, ProbabilityForm};
//!
//! let table = IfdTable::new(IfdTableSpec {
//!     zone: "Savages".to_string(),
//!     form: ProbabilityForm::Aep,
//!     durations: vec![DurationClass::new(24)],
//!     rows: vec![
//!         IfdRow { probability: 0.5, depths: vec![50.0] },
//!         IfdRow { probability: 0.1, depths: vec![90.0] },
//!         IfdRow { probability: 0.01, depths: vec![150.0] },
//!     ],
//! }).unwrap();
//!
//! let aep = table.interpolate_aep(DurationClass::new(24), 90.0).unwrap();
//! assert!((aep - 0.1).abs() < 1e-6);
//! ```

mod curve;
mod error;
mod rainfall;
mod table;

pub use curve::FrequencyCurve;
pub use error::IfdError;
pub use rainfall::rainfall_aep;
pub use table::{IfdRow, IfdSet, IfdTable, IfdTableSpec, ProbabilityForm};
