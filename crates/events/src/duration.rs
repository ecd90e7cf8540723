//! Storm duration classes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Storm duration category, in whole hours.
///
/// Displays zero-padded to three digits (`012`, `168`), the form used in
/// event labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationClass(u16);

impl DurationClass {
    /// Creates a duration class of `hours` hours.
    pub const fn new(hours: u16) -> Self {
        Self(hours)
    }

    /// Returns the duration in hours.
    pub const fn hours(self) -> u16 {
        self.0
    }
}

impl From<u16> for DurationClass {
    fn from(hours: u16) -> Self {
        Self(hours)
    }
}

impl fmt::Display for DurationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// Durations simulated for the standard Monte-Carlo run.
pub const STANDARD_DURATIONS: [DurationClass; 9] = [
    DurationClass(12),
    DurationClass(18),
    DurationClass(24),
    DurationClass(36),
    DurationClass(48),
    DurationClass(72),
    DurationClass(96),
    DurationClass(120),
    DurationClass(168),
];
