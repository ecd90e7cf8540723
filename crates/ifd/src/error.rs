//! Error types for the aepsel-ifd crate.

use aepsel_events::EventError;
use aepsel_zones::ZoneError;

/// Error type for all fallible operations in the aepsel-ifd crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IfdError {
    /// Returned when the requested duration is not a column of the table.
    #[error("unknown duration class {hours} h in IFD table for zone '{zone}'")]
    UnknownDurationClass {
        /// Zone whose table was queried.
        zone: String,
        /// Requested duration in hours.
        hours: u16,
    },

    /// Returned when fewer than two usable rows remain for a duration.
    #[error(
        "insufficient IFD data for zone '{zone}', {hours} h: {valid} valid row(s), need at least 2"
    )]
    InsufficientTableData {
        /// Zone whose table was queried.
        zone: String,
        /// Requested duration in hours.
        hours: u16,
        /// Number of usable rows found.
        valid: usize,
    },

    /// Returned when a query depth cannot be log-transformed.
    #[error("invalid rainfall depth {depth} (must be finite and > 0)")]
    InvalidDepth {
        /// The offending depth.
        depth: f64,
    },

    /// Returned when a table is malformed.
    #[error("invalid IFD table for zone '{zone}': {reason}")]
    InvalidTable {
        /// Zone named by the table.
        zone: String,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when no table is registered for a zone.
    #[error("no IFD table for rainfall zone '{zone}'")]
    MissingTable {
        /// Zone without a table.
        zone: String,
    },

    /// Returned when the standard normal cannot be constructed.
    ///
    /// The `message` field is a `String` because statrs errors do not
    /// implement `Clone`.
    #[error("normal distribution construction failed: {message}")]
    Distribution {
        /// Description of the failure.
        message: String,
    },

    /// Returned when the depth tensor and the zone map cover different sites.
    #[error("depth tensor has {tensor} site(s) but the zone map covers {zones}")]
    SiteCountMismatch {
        /// Sites in the tensor.
        tensor: usize,
        /// Sites in the zone map.
        zones: usize,
    },

    /// Event codec or tensor error.
    #[error(transparent)]
    Event(#[from] EventError),

    /// Zone lookup error.
    #[error(transparent)]
    Zone(#[from] ZoneError),
}
