//! Zone resolution error types.

/// Errors that can occur while building or querying a zone map.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ZoneError {
    /// One or more grouping-table checks failed.
    #[error("{count} validation error(s): {details}")]
    Validation { count: usize, details: String },

    /// A site index is not covered by the map.
    #[error("unknown site {site} (map covers sites 0..{n_sites})")]
    UnknownSite { site: usize, n_sites: usize },

    /// A zone name is not present in the map.
    #[error("unknown rainfall zone '{name}'")]
    UnknownZone { name: String },
}
