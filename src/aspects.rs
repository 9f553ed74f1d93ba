//! Aspect detection between pairs of ecliptic longitudes.
//!
//! The vocabulary is fixed at five relationships. Each has an exact angle
//! and a tolerance window (orb); detection checks them in priority order and
//! returns the first match, so a pair of longitudes yields at most one
//! aspect.

use serde::Serialize;

use crate::houses::normalize_360;

/// The five recognized angular relationships.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Aspect {
    Conjunction,
    Opposition,
    Trine,
    Square,
    Sextile,
}

/// Aspects in detection priority order.
pub const ALL_ASPECTS: [Aspect; 5] = [
    Aspect::Conjunction,
    Aspect::Opposition,
    Aspect::Trine,
    Aspect::Square,
    Aspect::Sextile,
];

impl Aspect {
    /// Exact angle of the relationship in degrees.
    pub const fn angle(self) -> f64 {
        match self {
            Self::Conjunction => 0.0,
            Self::Opposition => 180.0,
            Self::Trine => 120.0,
            Self::Square => 90.0,
            Self::Sextile => 60.0,
        }
    }

    /// Tolerance window around the exact angle.
    pub const fn orb(self) -> f64 {
        match self {
            Self::Conjunction => 8.0,
            Self::Opposition => 8.0,
            Self::Trine => 8.0,
            Self::Square => 7.0,
            Self::Sextile => 6.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Conjunction => "Conjunction",
            Self::Opposition => "Opposition",
            Self::Trine => "Trine",
            Self::Square => "Square",
            Self::Sextile => "Sextile",
        }
    }
}

/// Smaller of the two angular separations between two longitudes, `<= 180`.
pub fn angular_distance(lon_a: f64, lon_b: f64) -> f64 {
    let diff = normalize_360(lon_a - lon_b);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// First aspect whose window contains the separation of the two longitudes.
pub fn find_aspect(lon_a: f64, lon_b: f64) -> Option<Aspect> {
    let distance = angular_distance(lon_a, lon_b);
    ALL_ASPECTS
        .iter()
        .copied()
        .find(|aspect| (distance - aspect.angle()).abs() <= aspect.orb())
}
