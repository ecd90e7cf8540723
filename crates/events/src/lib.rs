//! Event identifiers and result tensors for Monte-Carlo design-event selection.
//!
//! Every simulated event belongs to a storm duration class and carries a
//! realization number within that class. This crate provides:
//!
//! - [`EventCatalog`]: the event domain and the bijective [`EventId`] codec
//!   (`048_0143` <-> 5183 for the standard 9 x 1260 run)
//! - [`ResultTensor`]: peak results indexed `[duration][realization][site]`
//!
//! # Quick start
//!
//! ```
//! use aepsel_events::{DurationClass, EventCatalog};
//!
//! let catalog = EventCatalog::standard();
//! let id = catalog.encode(DurationClass::new(48), 143).unwrap();
//! assert_eq!(id.get(), 5183);
//! assert_eq!(catalog.label(id).unwrap(), "048_0143");
//! assert_eq!(catalog.decode(id).unwrap(), (DurationClass::new(48), 143));
//! ```

mod codec;
mod duration;
mod error;
mod tensor;

pub use codec::{EventCatalog, EventId, STANDARD_REALIZATIONS};
pub use duration::{DurationClass, STANDARD_DURATIONS};
pub use error::EventError;
pub use tensor::ResultTensor;
