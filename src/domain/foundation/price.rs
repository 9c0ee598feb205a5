//! Price value object in minor currency units (paise).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative amount in minor units.
///
/// The catalog stores prices in whole rupees; everything past the catalog
/// boundary works in paise so payment amounts never go through floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Creates a price from minor units.
    pub fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Creates a price from whole major units (rupees).
    pub fn from_major(major: u64) -> Self {
        Self(major.saturating_mul(100))
    }

    /// Returns the amount in minor units.
    pub fn minor_units(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
