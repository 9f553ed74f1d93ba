//! Zodiac signs, houses and whole-sign house assignment.
//!
//! The whole-sign system equates one zodiac sign with one house, counted
//! from the sign the Ascendant occupies. Every house computation in this
//! crate goes through [`whole_sign_house`].

use serde::{Serialize, Serializer};

// ---------------------------
// ## Zodiac signs
// ---------------------------

/// The 12 zodiac signs, Aries through Pisces.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// All signs in zodiacal order.
pub const ALL_SIGNS: [ZodiacSign; 12] = [
    ZodiacSign::Aries,
    ZodiacSign::Taurus,
    ZodiacSign::Gemini,
    ZodiacSign::Cancer,
    ZodiacSign::Leo,
    ZodiacSign::Virgo,
    ZodiacSign::Libra,
    ZodiacSign::Scorpio,
    ZodiacSign::Sagittarius,
    ZodiacSign::Capricorn,
    ZodiacSign::Aquarius,
    ZodiacSign::Pisces,
];

impl ZodiacSign {
    /// Sign containing the given ecliptic longitude. Each sign spans 30
    /// degrees starting from 0 Aries.
    pub fn from_longitude(longitude: f64) -> Self {
        ALL_SIGNS[sign_index(longitude)]
    }

    /// Sign at a 0-based zodiacal index.
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 12 {
            Some(ALL_SIGNS[index])
        } else {
            None
        }
    }

    /// 0-based zodiacal index (Aries = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }

    /// Parse a sign from its English name.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_SIGNS.iter().copied().find(|s| s.name() == name)
    }
}

// ---------------------------
// ## Houses
// ---------------------------

/// The 12 houses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum House {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
    Eighth,
    Ninth,
    Tenth,
    Eleventh,
    Twelfth,
}

/// All houses in order.
pub const ALL_HOUSES: [House; 12] = [
    House::First,
    House::Second,
    House::Third,
    House::Fourth,
    House::Fifth,
    House::Sixth,
    House::Seventh,
    House::Eighth,
    House::Ninth,
    House::Tenth,
    House::Eleventh,
    House::Twelfth,
];

impl House {
    /// House for a 1-based number.
    pub const fn from_number(number: u8) -> Option<Self> {
        if number >= 1 && number <= 12 {
            Some(ALL_HOUSES[(number - 1) as usize])
        } else {
            None
        }
    }

    /// 1-based house number.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }
}

impl Serialize for House {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

// ---------------------------
// ## Longitude arithmetic
// ---------------------------

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_360(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

/// 0-based zodiacal sign index for an ecliptic longitude.
pub fn sign_index(longitude: f64) -> usize {
    (normalize_360(longitude) / 30.0).floor() as usize % 12
}

/// Degree within the sign, `[0, 30)`.
pub fn degree_in_sign(longitude: f64) -> f64 {
    normalize_360(longitude) % 30.0
}

/// Whole-sign house of a body relative to an ascendant.
///
/// `house = ((signIndex(body) - signIndex(asc) + 12) mod 12) + 1`
pub fn whole_sign_house(asc_longitude: f64, body_longitude: f64) -> House {
    let asc_sign = sign_index(asc_longitude);
    let body_sign = sign_index(body_longitude);
    let number = ((body_sign + 12 - asc_sign) % 12) + 1;
    ALL_HOUSES[number - 1]
}

/// Whole-sign house of one sign relative to a rising sign.
pub fn house_for_sign(sign: ZodiacSign, rising: ZodiacSign) -> House {
    let number = ((sign.index() + 12 - rising.index()) % 12) + 1;
    ALL_HOUSES[number - 1]
}

// ---------------------------
// ## Chart angles
// ---------------------------

/// The four chart angles as ecliptic longitudes in `[0, 360)`.
///
/// Descendant and IC are always derived as the opposite points of the
/// Ascendant and MC. They are never queried independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartAngles {
    pub ascendant: f64,
    pub descendant: f64,
    pub midheaven: f64,
    pub imum_coeli: f64,
}

impl ChartAngles {
    /// Build all four angles from the Ascendant and MC longitudes.
    pub fn from_asc_mc(ascendant: f64, midheaven: f64) -> Self {
        let asc = normalize_360(ascendant);
        let mc = normalize_360(midheaven);
        ChartAngles {
            ascendant: asc,
            descendant: normalize_360(asc + 180.0),
            midheaven: mc,
            imum_coeli: normalize_360(mc + 180.0),
        }
    }

    /// Longitude of a named angle.
    pub fn longitude(&self, angle: crate::AngleKey) -> f64 {
        match angle {
            crate::AngleKey::Ascendant => self.ascendant,
            crate::AngleKey::Descendant => self.descendant,
            crate::AngleKey::Midheaven => self.midheaven,
            crate::AngleKey::ImumCoeli => self.imum_coeli,
        }
    }

    /// Rising sign, the sign the Ascendant occupies.
    pub fn rising_sign(&self) -> ZodiacSign {
        ZodiacSign::from_longitude(self.ascendant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalize_wraps_negative() {
        assert_relative_eq!(normalize_360(-30.0), 330.0);
        assert_relative_eq!(normalize_360(725.0), 5.0);
    }

    #[test]
    fn sign_from_longitude_boundaries() {
        assert_eq!(ZodiacSign::from_longitude(0.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(29.999), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(30.0), ZodiacSign::Taurus);
        assert_eq!(ZodiacSign::from_longitude(359.9), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(360.0), ZodiacSign::Aries);
    }

    #[test]
    fn house_numbers_round_trip() {
        for n in 1..=12u8 {
            assert_eq!(House::from_number(n).unwrap().number(), n);
        }
        assert_eq!(House::from_number(0), None);
        assert_eq!(House::from_number(13), None);
    }

    #[test]
    fn whole_sign_same_sign_is_first_house() {
        // Body in the rising sign lands in house 1 regardless of degree.
        assert_eq!(whole_sign_house(15.0, 2.0), House::First);
        assert_eq!(whole_sign_house(95.0, 119.9), House::First);
    }

    #[test]
    fn whole_sign_formula_exhaustive() {
        // house = ((body_sign - asc_sign + 12) % 12) + 1 over every pairing
        for asc_sign in 0..12usize {
            for body_sign in 0..12usize {
                let asc_lon = asc_sign as f64 * 30.0 + 10.0;
                let body_lon = body_sign as f64 * 30.0 + 20.0;
                let expected = ((body_sign + 12 - asc_sign) % 12) + 1;
                assert_eq!(
                    whole_sign_house(asc_lon, body_lon).number() as usize,
                    expected,
                    "asc sign {asc_sign}, body sign {body_sign}"
                );
            }
        }
    }

    #[test]
    fn angles_derive_opposites() {
        let angles = ChartAngles::from_asc_mc(100.0, 10.0);
        assert_relative_eq!(angles.descendant, 280.0);
        assert_relative_eq!(angles.imum_coeli, 190.0);
    }

    #[test]
    fn angles_opposites_wrap() {
        let angles = ChartAngles::from_asc_mc(350.0, 270.0);
        assert_relative_eq!(angles.descendant, 170.0);
        assert_relative_eq!(angles.imum_coeli, 90.0);
    }

    #[test]
    fn rising_sign_follows_ascendant() {
        let angles = ChartAngles::from_asc_mc(123.0, 33.0);
        assert_eq!(angles.rising_sign(), ZodiacSign::Leo);
    }

    #[test]
    fn sign_name_round_trip() {
        for sign in ALL_SIGNS {
            assert_eq!(ZodiacSign::from_name(sign.name()), Some(sign));
        }
        assert_eq!(ZodiacSign::from_name("Ophiuchus"), None);
    }
}
