//! Three Pillars grading engine.
//!
//! Grades a person across Structure (natal), Timing (transits + life cycle)
//! and Environment (relocation + address). Pure function over the calculator
//! results; the only asynchronous piece is the destination planet-house
//! computation feeding Pillar 3, which runs before grading.
//!
//! The classifications here deliberately diverge from textbook assignments:
//! angular houses are {1, 5, 7, 10}, Neptune is malefic in all three
//! pillars, and Sun and Venus grade F from houses 8 and 12 regardless of
//! angularity.

use serde::Serialize;

use crate::calculators::address::AddressNumerologyResult;
use crate::calculators::life_path::LifePathResult;
use crate::calculators::natal_chart::NatalChartResult;
use crate::calculators::transits::{TransitBody, TransitsResult};
use crate::ephemeris::{Ephemeris, HouseSystem};
use crate::error::CalculationError;
use crate::houses::{whole_sign_house, ChartAngles, House};
use crate::numerology::reduce_forced;
use crate::{Body, JulianDay, PointName, ALL_BODIES};

// ---------------------------
// ## Vocabulary
// ---------------------------

/// Grade of a single evaluated signal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Grade {
    F,
    C,
    A,
    Neutral,
}

/// Final grade over the whole diagnostic.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum FinalGrade {
    A,
    B,
    C,
    F,
}

/// Section a grade item belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Section {
    #[serde(rename = "Natal Angular")]
    NatalAngular,
    #[serde(rename = "Transit Angular")]
    TransitAngular,
    #[serde(rename = "Life Cycle")]
    LifeCycle,
    #[serde(rename = "Relocation Angular")]
    RelocationAngular,
    #[serde(rename = "Address")]
    Address,
}

/// One evaluated signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeItem {
    pub source: String,
    pub pillar: u8,
    pub section: Section,
    pub planet: Option<&'static str>,
    pub house: Option<House>,
    pub grade: Grade,
    pub reason: String,
}

/// Summary of one pillar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PillarSummary {
    pub pillar: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub f_count: usize,
    pub a_count: usize,
    pub items: Vec<GradeItem>,
}

/// Full diagnostic: three pillars, totals, final grade and the flat item
/// list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticReport {
    pub pillars: [PillarSummary; 3],
    pub total_f: usize,
    pub total_a: usize,
    pub final_grade: FinalGrade,
    pub items: Vec<GradeItem>,
}

/// A planet's whole-sign house at the current residence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanetHouse {
    pub body: Body,
    pub house: House,
}

/// Calculator outputs feeding the grader. Absent results skip their
/// sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraderInput<'a> {
    pub natal_chart: Option<&'a NatalChartResult>,
    pub transits: Option<&'a TransitsResult>,
    pub life_path: Option<&'a LifePathResult>,
    pub destination_houses: Option<&'a [PlanetHouse]>,
    pub address_numerology: Option<&'a AddressNumerologyResult>,
}

// ---------------------------
// ## Classifications
// ---------------------------

/// Angular houses for grading purposes, not the traditional set.
const ANGULAR_HOUSES: [House; 4] = [House::First, House::Fifth, House::Seventh, House::Tenth];

const PILLAR_1_MALEFICS: [Body; 5] = [
    Body::Pluto,
    Body::Saturn,
    Body::Uranus,
    Body::Mars,
    Body::Neptune,
];
const PILLAR_1_BENEFICS: [Body; 4] = [Body::Sun, Body::Moon, Body::Venus, Body::Jupiter];
// Sun or Venus in the 8th or 12th house grades F regardless of angularity.
const SOFT_SPOT_PLANETS: [Body; 2] = [Body::Sun, Body::Venus];
const SOFT_SPOT_HOUSES: [House; 2] = [House::Eighth, House::Twelfth];

const PILLAR_2_MALEFICS: [TransitBody; 4] = [
    TransitBody::Neptune,
    TransitBody::Pluto,
    TransitBody::Saturn,
    TransitBody::Uranus,
];
// Malefic transits through these non-angular houses also grade F.
const PRESSURE_HOUSES: [House; 4] = [
    House::Second,
    House::Sixth,
    House::Eighth,
    House::Eleventh,
];

const PILLAR_3_MALEFICS: [Body; 5] = [
    Body::Neptune,
    Body::Pluto,
    Body::Saturn,
    Body::Uranus,
    Body::Mars,
];
const PILLAR_3_BENEFICS: [Body; 4] = [Body::Sun, Body::Moon, Body::Venus, Body::Jupiter];

const LIFE_CYCLE_F_YEARS: [u32; 3] = [1, 4, 9];
const LIFE_CYCLE_A_YEARS: [u32; 1] = [5];

const ADDRESS_F_NUMBERS: [u32; 4] = [3, 6, 8, 9];
const ADDRESS_A_NUMBERS: [u32; 3] = [2, 7, 11];

fn is_angular(house: House) -> bool {
    ANGULAR_HOUSES.contains(&house)
}

// ---------------------------
// ## Destination houses
// ---------------------------

/// Planet-to-house mapping at an arbitrary location for the birth instant.
///
/// Planet longitudes depend only on time; the Ascendant shifts with the
/// coordinates, and the whole-sign houses shift with it.
pub async fn destination_planet_houses(
    ephemeris: &dyn Ephemeris,
    jd: JulianDay,
    latitude: f64,
    longitude: f64,
) -> Result<Vec<PlanetHouse>, CalculationError> {
    let longitudes = ephemeris.body_longitudes(jd).await?;
    let raw = ephemeris
        .angles(jd, latitude, longitude, HouseSystem::WholeSign)
        .await?;
    let angles = ChartAngles::from_asc_mc(raw.ascendant, raw.midheaven);

    let mut houses = Vec::with_capacity(ALL_BODIES.len());
    for body in ALL_BODIES {
        let lon = *longitudes.get(&body).ok_or_else(|| {
            CalculationError::EphemerisUnavailable(format!("no longitude for {}", body.name()))
        })?;
        houses.push(PlanetHouse {
            body,
            house: whole_sign_house(angles.ascendant, lon),
        });
    }
    Ok(houses)
}

// ---------------------------
// ## Pillar 1 — Structure
// ---------------------------

fn grade_natal(natal: &NatalChartResult) -> Vec<GradeItem> {
    let mut items = Vec::new();

    for placed in &natal.planets {
        let PointName::Body(body) = placed.point else {
            continue;
        };
        let Some(house) = placed.house else { continue };

        let malefic = PILLAR_1_MALEFICS.contains(&body);
        let benefic = PILLAR_1_BENEFICS.contains(&body);
        if !malefic && !benefic {
            continue;
        }

        let name = body.name();
        let n = house.number();
        let (grade, reason) = if is_angular(house) && malefic {
            (
                Grade::F,
                format!("Malefic {name} in angular house {n}"),
            )
        } else if SOFT_SPOT_PLANETS.contains(&body) && SOFT_SPOT_HOUSES.contains(&house) {
            (
                Grade::F,
                format!("{name} placement in house {n} (8th/12th)"),
            )
        } else if is_angular(house) && benefic {
            (
                Grade::A,
                format!("Benefic {name} in angular house {n}"),
            )
        } else {
            (Grade::Neutral, format!("{name} in house {n} (not angular)"))
        };

        items.push(GradeItem {
            source: format!("Natal {name} in House {n} ({})", placed.sign.name()),
            pillar: 1,
            section: Section::NatalAngular,
            planet: Some(name),
            house: Some(house),
            grade,
            reason,
        });
    }

    items
}

// ---------------------------
// ## Pillar 2 — Timing
// ---------------------------

fn grade_transits(transits: &TransitsResult) -> Vec<GradeItem> {
    let mut items = Vec::new();

    for transit in &transits.transits {
        // Only malefics are graded here; benefic transits are short-lived.
        if !PILLAR_2_MALEFICS.contains(&transit.planet) {
            continue;
        }

        let name = transit.planet.name();
        let house = transit.house;
        let n = house.number();
        let (grade, reason) = if is_angular(house) {
            (
                Grade::F,
                format!("Malefic transit {name} in angular house {n}"),
            )
        } else if PRESSURE_HOUSES.contains(&house) {
            (
                Grade::F,
                format!("Malefic transit {name} in pressure house {n} (2nd/6th/8th/11th)"),
            )
        } else {
            (
                Grade::Neutral,
                format!("Transit {name} in house {n} (not angular or pressure)"),
            )
        };

        items.push(GradeItem {
            source: format!(
                "Transit {name} in House {n} ({})",
                transit.current.sign.name()
            ),
            pillar: 2,
            section: Section::TransitAngular,
            planet: Some(name),
            house: Some(house),
            grade,
            reason,
        });
    }

    items
}

fn grade_life_cycle(life_path: &LifePathResult) -> Vec<GradeItem> {
    // Master numbers are collapsed for timing purposes.
    let year = if life_path.personal_year > 9 {
        reduce_forced(life_path.personal_year)
    } else {
        life_path.personal_year
    };

    let (grade, reason) = if LIFE_CYCLE_F_YEARS.contains(&year) {
        (Grade::F, format!("Personal year {year} is a pressure year"))
    } else if LIFE_CYCLE_A_YEARS.contains(&year) {
        (
            Grade::A,
            format!("Personal year {year} is a supportive year"),
        )
    } else {
        (Grade::Neutral, format!("Personal year {year} is neutral"))
    };

    vec![GradeItem {
        source: format!("Life Cycle Year {year}"),
        pillar: 2,
        section: Section::LifeCycle,
        planet: None,
        house: None,
        grade,
        reason,
    }]
}

// ---------------------------
// ## Pillar 3 — Environment
// ---------------------------

fn grade_relocation(destination_houses: &[PlanetHouse]) -> Vec<GradeItem> {
    let mut items = Vec::new();

    for ph in destination_houses {
        let malefic = PILLAR_3_MALEFICS.contains(&ph.body);
        let benefic = PILLAR_3_BENEFICS.contains(&ph.body);
        if !malefic && !benefic {
            continue;
        }

        let name = ph.body.name();
        let n = ph.house.number();
        let (grade, reason) = if is_angular(ph.house) && malefic {
            (
                Grade::F,
                format!("Malefic {name} in angular house {n} at current location"),
            )
        } else if is_angular(ph.house) && benefic {
            (
                Grade::A,
                format!("Benefic {name} in angular house {n} at current location"),
            )
        } else {
            (
                Grade::Neutral,
                format!("{name} in house {n} at current location (not angular)"),
            )
        };

        items.push(GradeItem {
            source: format!("Env {name} in House {n}"),
            pillar: 3,
            section: Section::RelocationAngular,
            planet: Some(name),
            house: Some(ph.house),
            grade,
            reason,
        });
    }

    items
}

fn grade_address(address: &AddressNumerologyResult) -> Vec<GradeItem> {
    let Some(level) = address.levels.iter().find(|l| l.combined) else {
        return Vec::new();
    };

    // Collapse masters except 11, which stays gradeable as itself.
    let num = if level.number > 9 && level.number != 11 {
        reduce_forced(level.number)
    } else {
        level.number
    };

    let (grade, reason) = if ADDRESS_F_NUMBERS.contains(&num) {
        (
            Grade::F,
            format!("{} number {num} creates pressure", level.level),
        )
    } else if ADDRESS_A_NUMBERS.contains(&num) {
        (
            Grade::A,
            format!("{} number {num} is supportive", level.level),
        )
    } else {
        (
            Grade::Neutral,
            format!("{} number {num} is neutral", level.level),
        )
    };

    vec![GradeItem {
        source: format!("{}: {num}", level.level),
        pillar: 3,
        section: Section::Address,
        planet: None,
        house: None,
        grade,
        reason,
    }]
}

// ---------------------------
// ## Final grade
// ---------------------------

/// Weighted score over the item grades: `F` counts 1, `C` counts 0.5.
pub fn pressure_score(items: &[GradeItem]) -> f64 {
    let f = items.iter().filter(|i| i.grade == Grade::F).count() as f64;
    let c = items.iter().filter(|i| i.grade == Grade::C).count() as f64;
    f + 0.5 * c
}

/// Band the weighted score into the final grade.
pub fn final_grade(score: f64) -> FinalGrade {
    if score > 6.0 {
        FinalGrade::F
    } else if score >= 4.0 {
        FinalGrade::C
    } else if score >= 2.0 {
        FinalGrade::B
    } else {
        FinalGrade::A
    }
}

fn build_pillar(
    pillar: u8,
    name: &'static str,
    description: &'static str,
    items: Vec<GradeItem>,
) -> PillarSummary {
    PillarSummary {
        pillar,
        name,
        description,
        f_count: items.iter().filter(|i| i.grade == Grade::F).count(),
        a_count: items.iter().filter(|i| i.grade == Grade::A).count(),
        items,
    }
}

/// Grade all three pillars and compute the final grade.
///
/// Fails only when every input is absent; individual missing results just
/// leave their sections empty.
pub fn grade_three_pillars(input: &GraderInput<'_>) -> Result<DiagnosticReport, CalculationError> {
    if input.natal_chart.is_none()
        && input.transits.is_none()
        && input.life_path.is_none()
        && input.destination_houses.is_none()
        && input.address_numerology.is_none()
    {
        return Err(CalculationError::Grading(
            "no calculator results to grade".to_string(),
        ));
    }

    let p1_items = input.natal_chart.map(grade_natal).unwrap_or_default();
    let p2a_items = input.transits.map(grade_transits).unwrap_or_default();
    let p2b_items = input.life_path.map(grade_life_cycle).unwrap_or_default();
    let p3a_items = input
        .destination_houses
        .map(grade_relocation)
        .unwrap_or_default();
    let p3b_items = input
        .address_numerology
        .map(grade_address)
        .unwrap_or_default();

    let mut p2_items = p2a_items;
    p2_items.extend(p2b_items);
    let mut p3_items = p3a_items;
    p3_items.extend(p3b_items);

    let pillar1 = build_pillar(1, "Structure", "What you were born with", p1_items);
    let pillar2 = build_pillar(2, "Timing", "What is happening now", p2_items);
    let pillar3 = build_pillar(3, "Environment", "Where you are living", p3_items);

    let mut items = Vec::new();
    items.extend(pillar1.items.iter().cloned());
    items.extend(pillar2.items.iter().cloned());
    items.extend(pillar3.items.iter().cloned());

    let total_f = items.iter().filter(|i| i.grade == Grade::F).count();
    let total_a = items.iter().filter(|i| i.grade == Grade::A).count();
    let grade = final_grade(pressure_score(&items));

    Ok(DiagnosticReport {
        pillars: [pillar1, pillar2, pillar3],
        total_f,
        total_a,
        final_grade: grade,
        items,
    })
}
