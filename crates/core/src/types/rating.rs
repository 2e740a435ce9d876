//! Star-rating type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a rating is outside the 1-5 range.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("rating must be between 1 and 5 (got {0})")]
pub struct RatingError(pub u8);

/// A star rating between 1 and 5 inclusive.
///
/// Used for both post ratings and dish rating submissions. Stored averages
/// are plain `f64` aggregates; this type only guards individual submissions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Smallest allowed rating.
    pub const MIN: u8 = 1;
    /// Largest allowed rating.
    pub const MAX: u8 = 5;

    /// Validate a raw rating value.
    ///
    /// # Errors
    ///
    /// Returns [`RatingError`] if the value is not in `1..=5`.
    pub const fn new(value: u8) -> Result<Self, RatingError> {
        if value >= Self::MIN && value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(RatingError(value))
        }
    }

    /// Get the raw value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// The rating as a float, for aggregate math.
    #[must_use]
    pub const fn as_f64(&self) -> f64 {
        self.0 as f64
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_full_range() {
        for v in 1..=5 {
            assert!(Rating::new(v).is_ok());
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(Rating::new(0), Err(RatingError(0)));
        assert_eq!(Rating::new(6), Err(RatingError(6)));
    }

    #[test]
    fn test_value_accessors() {
        let rating = Rating::new(4).unwrap();
        assert_eq!(rating.value(), 4);
        assert!((rating.as_f64() - 4.0).abs() < f64::EPSILON);
    }
}
