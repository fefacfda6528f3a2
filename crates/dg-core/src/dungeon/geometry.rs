//! Plain value types shared by generation and drawing

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DungenError, Result};

/// Inclusive integer range used for every randomized quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bound {
    pub lower: i32,
    pub upper: i32,
}

impl Bound {
    pub const fn new(lower: i32, upper: i32) -> Self {
        Self { lower, upper }
    }

    /// A bound that always yields `value`
    pub const fn exactly(value: i32) -> Self {
        Self::new(value, value)
    }

    pub fn contains(&self, value: i32) -> bool {
        (self.lower..=self.upper).contains(&value)
    }

    /// Reject bounds whose lower end exceeds the upper end
    pub fn validate(&self, field: &'static str) -> Result<()> {
        if self.lower > self.upper {
            return Err(DungenError::InvalidBound {
                field,
                lower: self.lower,
                upper: self.upper,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.lower, self.upper)
    }
}

/// A real-valued coordinate on a floor
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// L1 distance
    pub fn manhattan(&self, other: &Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// L2 distance
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    /// Drop the fractional part of both coordinates
    pub fn trunc(&self) -> Point {
        Point::new(self.x.trunc(), self.y.trunc())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_validation() {
        assert!(Bound::new(1, 3).validate("rooms").is_ok());
        assert!(Bound::exactly(0).validate("rooms").is_ok());
        let err = Bound::new(4, 2).validate("rooms").unwrap_err();
        assert!(matches!(
            err,
            DungenError::InvalidBound { field: "rooms", lower: 4, upper: 2 }
        ));
    }

    #[test]
    fn test_manhattan() {
        let a = Point::new(12.0, 40.0);
        let b = Point::new(2.0, 45.0);
        assert_eq!(a.manhattan(&b), 15.0);
        assert_eq!(b.manhattan(&a), 15.0);
    }

    #[test]
    fn test_trunc_toward_zero() {
        assert_eq!(Point::new(3.7, -2.5).trunc(), Point::new(3.0, -2.0));
    }
}
