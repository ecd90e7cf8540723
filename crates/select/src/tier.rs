//! Annual exceedance probability tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SelectError;

/// Return periods of the standard design tiers, most frequent first.
pub const STANDARD_RETURN_PERIODS: [u32; 11] = [
    2, 5, 10, 20, 50, 100, 200, 500, 2000, 10_000, 100_000,
];

/// A design tier identified by its return period `N` (1-in-N AEP).
///
/// Ordering follows the return period, so ascending order walks from the
/// most frequent tier to the rarest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct AepTier(u32);

impl AepTier {
    /// Creates the 1-in-`return_period` tier.
    ///
    /// # Errors
    ///
    /// [`SelectError::InvalidTier`] if `return_period < 2`.
    pub fn new(return_period: u32) -> Result<Self, SelectError> {
        if return_period < 2 {
            return Err(SelectError::InvalidTier { return_period });
        }
        Ok(Self(return_period))
    }

    /// Returns the return period in years.
    pub fn return_period(self) -> u32 {
        self.0
    }

    /// Returns the annual exceedance probability `1 / N`.
    pub fn aep(self) -> f64 {
        1.0 / f64::from(self.0)
    }

    /// Returns the standard tier set.
    pub fn standard() -> Vec<Self> {
        STANDARD_RETURN_PERIODS.iter().map(|&n| Self(n)).collect()
    }
}

impl TryFrom<u32> for AepTier {
    type Error = SelectError;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl From<AepTier> for u32 {
    fn from(t: AepTier) -> Self {
        t.0
    }
}

impl fmt::Display for AepTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1-in-{}", self.0)
    }
}
