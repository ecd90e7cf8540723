//! Error types for the aepsel-events crate.

/// Error type for all fallible operations in the aepsel-events crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EventError {
    /// Returned when a numeric event id lies outside the codec domain.
    #[error("invalid event id {id} (valid range is 1..={max})")]
    InvalidEventId {
        /// The offending id.
        id: u32,
        /// Largest id the codec can produce.
        max: u32,
    },

    /// Returned when a duration is not part of the catalog.
    #[error("unknown duration class: {hours} h")]
    UnknownDurationClass {
        /// Duration in hours.
        hours: u16,
    },

    /// Returned when a realization number is outside 1..=R.
    #[error("invalid realization {realization} (must be 1..={max})")]
    InvalidRealization {
        /// The offending realization number.
        realization: u32,
        /// Realizations per duration class.
        max: u32,
    },

    /// Returned when an event label does not match `DDD_RRRR`.
    #[error("invalid event label {label:?}: {reason}")]
    InvalidEventLabel {
        /// The label as given.
        label: String,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a catalog cannot be constructed.
    #[error("invalid catalog: {reason}")]
    InvalidCatalog {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when tensor dimensions disagree with the catalog or the data length.
    #[error("tensor shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected `[durations, realizations, sites]`.
        expected: [usize; 3],
        /// Actual shape.
        got: [usize; 3],
    },

    /// Returned when flat tensor data has the wrong number of values.
    #[error("tensor data length mismatch: expected {expected} values, got {got}")]
    DataLengthMismatch {
        /// `durations * realizations * sites`.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// Returned when a site index is outside the tensor.
    #[error("site {site} out of range (tensor has {n_sites} sites)")]
    SiteOutOfRange {
        /// The offending site index.
        site: usize,
        /// Number of sites in the tensor.
        n_sites: usize,
    },
}
