//! Transits calculator.
//!
//! Table-driven: the six slow movers have hand-authored current and past
//! placements, so no ephemeris query is involved. The only computed part is
//! the house each placement occupies relative to the supplied rising sign.

use serde::Serialize;

use crate::error::CalculationError;
use crate::houses::{house_for_sign, House, ZodiacSign};

/// Bodies covered by the transit table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum TransitBody {
    Pluto,
    Neptune,
    Saturn,
    Uranus,
    #[serde(rename = "North Node")]
    NorthNode,
    #[serde(rename = "South Node")]
    SouthNode,
}

impl TransitBody {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pluto => "Pluto",
            Self::Neptune => "Neptune",
            Self::Saturn => "Saturn",
            Self::Uranus => "Uranus",
            Self::NorthNode => "North Node",
            Self::SouthNode => "South Node",
        }
    }

    /// Keyword theme of the transiting body.
    pub const fn theme(self) -> &'static str {
        match self {
            Self::Pluto => {
                "transforms, intensifies, destroys & rebuilds, empowers, exposes, regenerates"
            }
            Self::Neptune => {
                "dissolves, spiritualizes, confuses, idealizes, inspires, transcends, mystifies"
            }
            Self::Saturn => {
                "structures, disciplines, restricts, tests, grounds, matures, crystallizes"
            }
            Self::Uranus => "disrupts, liberates, shocks, awakens, innovates, revolutionizes",
            Self::NorthNode => {
                "directs, guides, grows, evolves, pushes toward destiny, expands purpose"
            }
            Self::SouthNode => {
                "releases, depletes, drains, pulls back, exposes past patterns, lets go"
            }
        }
    }
}

/// Keyword themes of the 12 houses, index 0 = house 1.
pub const HOUSE_THEMES: [&str; 12] = [
    "identity, self, appearance, personal approach",
    "money, values, possessions, self-worth",
    "communication, siblings, learning, local environment",
    "home, family, roots, inner foundation",
    "creativity, romance, children, joy",
    "work, health, service, daily routine",
    "partnerships, marriage, contracts, balance",
    "intimacy, shared resources, transformation, taboo",
    "higher learning, travel, philosophy, beliefs",
    "career, public image, status, authority",
    "friendships, community, future goals",
    "spirituality, subconscious, endings, hidden realms",
];

/// One sign period of a transiting body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub sign: ZodiacSign,
    pub start: &'static str,
    pub end: &'static str,
    pub high: &'static str,
    pub low: &'static str,
}

struct TransitRecord {
    body: TransitBody,
    past: Placement,
    current: Placement,
}

const TRANSIT_TABLE: [TransitRecord; 6] = [
    TransitRecord {
        body: TransitBody::Pluto,
        past: Placement {
            sign: ZodiacSign::Capricorn,
            start: "2008",
            end: "2023-2025",
            high: "mastery of structures, long-term legacy, responsible power",
            low: "control, corruption, fear of failure, rigidity",
        },
        current: Placement {
            sign: ZodiacSign::Aquarius,
            start: "2023-2025",
            end: "2043",
            high: "collective innovation, freedom, future systems, social empowerment",
            low: "chaos in tech, detachment, rebellion without cause, alienation",
        },
    },
    TransitRecord {
        body: TransitBody::Neptune,
        past: Placement {
            sign: ZodiacSign::Pisces,
            start: "2011",
            end: "2025/2026",
            high: "compassion, spiritual awakening, creativity, unity consciousness",
            low: "escapism, confusion, victimhood, illusions",
        },
        current: Placement {
            sign: ZodiacSign::Aries,
            start: "2025/2026",
            end: "2039",
            high: "courageous vision, spiritual self-leadership, innovation, risk taking",
            low: "self-delusion, ego-driven martyrdom, blurred identity, blurred boundaries, confused masculinity",
        },
    },
    TransitRecord {
        body: TransitBody::Saturn,
        past: Placement {
            sign: ZodiacSign::Pisces,
            start: "2023",
            end: "2025/2026",
            high: "spiritual discipline, boundaries in compassion, practical creativity",
            low: "avoidance, self-pity, blurred limits, victim mindset",
        },
        current: Placement {
            sign: ZodiacSign::Aries,
            start: "2025/2026",
            end: "2028",
            high: "self-mastery, courage to take responsibility, disciplined leadership, risk taking",
            low: "impatience, aggression, fear of failure, ego rigidity",
        },
    },
    TransitRecord {
        body: TransitBody::Uranus,
        past: Placement {
            sign: ZodiacSign::Taurus,
            start: "2018",
            end: "2025/2026",
            high: "innovative resources, sustainable values, embodied freedom",
            low: "financial chaos, stubborn resistance, insecurity",
        },
        current: Placement {
            sign: ZodiacSign::Gemini,
            start: "2025/2026",
            end: "2033",
            high: "breakthroughs in communication, learning, tech, networks",
            low: "scattered attention, shallow rebellion, information chaos",
        },
    },
    TransitRecord {
        body: TransitBody::NorthNode,
        past: Placement {
            sign: ZodiacSign::Aries,
            start: "2023",
            end: "2025",
            high: "independence, courage, pioneering destiny, risk taking",
            low: "selfishness, recklessness, conflict",
        },
        current: Placement {
            sign: ZodiacSign::Pisces,
            start: "2025",
            end: "2026",
            high: "spiritual growth, compassion, surrender to higher flow",
            low: "escapism, victimhood, lack of boundaries",
        },
    },
    TransitRecord {
        body: TransitBody::SouthNode,
        past: Placement {
            sign: ZodiacSign::Libra,
            start: "2023",
            end: "2025",
            high: "harmony, fairness, relationship wisdom",
            low: "people-pleasing, indecision, dependency",
        },
        current: Placement {
            sign: ZodiacSign::Virgo,
            start: "2025",
            end: "2026",
            high: "discernment, service, practical wisdom",
            low: "over-analysis, perfectionism, burnout",
        },
    },
];

/// Transits calculator input. The rising sign normally comes from the natal
/// chart result; free-text overrides are accepted and validated here.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitsInput {
    pub rising_sign: String,
}

/// One body's transit with current and past house placements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetaryTransit {
    pub planet: TransitBody,
    pub planet_theme: &'static str,
    pub current: Placement,
    pub past: Placement,
    pub house: House,
    pub house_theme: &'static str,
    pub past_house: House,
    pub past_house_theme: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitsResult {
    pub rising_sign: ZodiacSign,
    pub transits: Vec<PlanetaryTransit>,
}

/// Check that the rising sign names a zodiac sign.
pub fn validate_transits_input(input: &TransitsInput) -> Result<(), CalculationError> {
    if input.rising_sign.is_empty() {
        return Err(CalculationError::validation("Rising sign is required"));
    }
    if ZodiacSign::from_name(&input.rising_sign).is_none() {
        return Err(CalculationError::Validation(format!(
            "Invalid rising sign: {}",
            input.rising_sign
        )));
    }
    Ok(())
}

/// Current and past transits for all six table bodies, with houses rotated
/// so the rising sign occupies house 1.
pub fn calculate_transits(input: &TransitsInput) -> Result<TransitsResult, CalculationError> {
    validate_transits_input(input)?;
    let rising = ZodiacSign::from_name(&input.rising_sign).ok_or_else(|| {
        CalculationError::Validation(format!("Invalid rising sign: {}", input.rising_sign))
    })?;

    let transits = TRANSIT_TABLE
        .iter()
        .map(|record| {
            let house = house_for_sign(record.current.sign, rising);
            let past_house = house_for_sign(record.past.sign, rising);
            PlanetaryTransit {
                planet: record.body,
                planet_theme: record.body.theme(),
                current: record.current,
                past: record.past,
                house,
                house_theme: HOUSE_THEMES[(house.number() - 1) as usize],
                past_house,
                past_house_theme: HOUSE_THEMES[(past_house.number() - 1) as usize],
            }
        })
        .collect();

    Ok(TransitsResult {
        rising_sign: rising,
        transits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::houses::ALL_SIGNS;

    fn run(rising: &str) -> TransitsResult {
        calculate_transits(&TransitsInput {
            rising_sign: rising.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn six_bodies_for_every_rising_sign() {
        for sign in ALL_SIGNS {
            let result = run(sign.name());
            assert_eq!(result.transits.len(), 6);
            assert_eq!(result.rising_sign, sign);
        }
    }

    #[test]
    fn pluto_house_for_known_risings() {
        // Pluto currently transits Aquarius.
        let aries = run("Aries");
        assert_eq!(aries.transits[0].planet, TransitBody::Pluto);
        assert_eq!(aries.transits[0].house.number(), 11);

        let sagittarius = run("Sagittarius");
        assert_eq!(sagittarius.transits[0].house.number(), 3);
    }

    #[test]
    fn house_formula_exhaustive() {
        // house = ((sign - rising + 12) % 12) + 1 over all 12 x 6 combinations
        for rising in ALL_SIGNS {
            let result = run(rising.name());
            for transit in &result.transits {
                let expected =
                    ((transit.current.sign.index() + 12 - rising.index()) % 12) + 1;
                assert_eq!(
                    transit.house.number() as usize,
                    expected,
                    "{} rising, {} in {}",
                    rising.name(),
                    transit.planet.name(),
                    transit.current.sign.name()
                );
                let expected_past =
                    ((transit.past.sign.index() + 12 - rising.index()) % 12) + 1;
                assert_eq!(transit.past_house.number() as usize, expected_past);
            }
        }
    }

    #[test]
    fn house_themes_follow_house_numbers() {
        let result = run("Cancer");
        for transit in &result.transits {
            assert_eq!(
                transit.house_theme,
                HOUSE_THEMES[(transit.house.number() - 1) as usize]
            );
        }
    }

    #[test]
    fn empty_rising_sign_is_rejected() {
        let err = calculate_transits(&TransitsInput {
            rising_sign: String::new(),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Rising sign is required");
    }

    #[test]
    fn unknown_rising_sign_is_rejected() {
        let err = calculate_transits(&TransitsInput {
            rising_sign: "Ophiuchus".to_string(),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid rising sign: Ophiuchus");
    }
}
