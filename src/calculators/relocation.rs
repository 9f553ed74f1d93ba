//! Relocation calculator.
//!
//! Planet longitudes are fixed by the birth instant; only the angles move
//! with geography. Houses are assigned from the destination Ascendant to
//! both the planets and the four angle points, and a planet scores an
//! angular hit for every angle sharing its house. That is a whole-sign
//! match, 30 degrees wide, not a tight orb.

use serde::Serialize;

use crate::ephemeris::{Ephemeris, HouseSystem};
use crate::error::CalculationError;
use crate::houses::{whole_sign_house, ChartAngles, House};
use crate::time::to_julian_day;
use crate::{AngleKey, Body, ALL_ANGLES, ALL_BODIES};

/// Birth details plus destination coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RelocationInput {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub birth_latitude: f64,
    pub birth_longitude: f64,
    pub birth_time_zone: String,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
}

/// Benefic/malefic classification used for relocation reporting.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum Nature {
    #[serde(rename = "benefic")]
    Benefic,
    #[serde(rename = "malefic")]
    Malefic,
    #[serde(rename = "neutral")]
    Neutral,
}

/// Classify a body as benefic, malefic or neutral.
pub fn classify_body(body: Body) -> Nature {
    match body {
        Body::Venus | Body::Jupiter | Body::Sun | Body::Moon => Nature::Benefic,
        Body::Mars | Body::Saturn | Body::Pluto => Nature::Malefic,
        _ => Nature::Neutral,
    }
}

/// Houses reported as business activations: wealth, work, career.
pub const BUSINESS_HOUSES: [House; 3] = [House::Second, House::Sixth, House::Tenth];

/// A planet sharing a whole-sign house with an angle at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngularHit {
    pub body: Body,
    pub angle: AngleKey,
    pub house: House,
    pub nature: Nature,
    pub career: bool,
}

/// A non-neutral planet in a business house at the destination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BusinessHouseActivation {
    pub body: Body,
    pub house: House,
    pub nature: Nature,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelocationResult {
    pub angular_hits: Vec<AngularHit>,
    pub business_house_activations: Vec<BusinessHouseActivation>,
}

/// Range-check birth and destination fields.
pub fn validate_relocation_input(
    input: &RelocationInput,
    reference_year: i32,
) -> Result<(), CalculationError> {
    if input.year < 1900 || input.year > reference_year {
        return Err(CalculationError::validation("Invalid birth year"));
    }
    if input.month < 1 || input.month > 12 {
        return Err(CalculationError::validation("Invalid birth month"));
    }
    if input.day < 1 || input.day > 31 {
        return Err(CalculationError::validation("Invalid birth day"));
    }
    if input.hour > 23 {
        return Err(CalculationError::validation("Invalid birth hour"));
    }
    if input.minute > 59 {
        return Err(CalculationError::validation("Invalid birth minute"));
    }
    if input.birth_latitude < -90.0 || input.birth_latitude > 90.0 {
        return Err(CalculationError::validation("Invalid birth latitude"));
    }
    if input.birth_longitude < -180.0 || input.birth_longitude > 180.0 {
        return Err(CalculationError::validation("Invalid birth longitude"));
    }
    if input.birth_time_zone.is_empty() {
        return Err(CalculationError::validation("Valid timezone required"));
    }
    if input.destination_latitude < -90.0 || input.destination_latitude > 90.0 {
        return Err(CalculationError::validation("Invalid destination latitude"));
    }
    if input.destination_longitude < -180.0 || input.destination_longitude > 180.0 {
        return Err(CalculationError::validation(
            "Invalid destination longitude",
        ));
    }
    Ok(())
}

/// Angular hits and business-house activations at the destination.
pub async fn calculate_relocation(
    ephemeris: &dyn Ephemeris,
    input: &RelocationInput,
) -> Result<RelocationResult, CalculationError> {
    let date = format!("{:04}-{:02}-{:02}", input.year, input.month, input.day);
    let time = format!("{:02}:{:02}", input.hour, input.minute);
    let jd = to_julian_day(&date, &time, &input.birth_time_zone)?;

    let longitudes = ephemeris.body_longitudes(jd).await?;
    let raw = ephemeris
        .angles(
            jd,
            input.destination_latitude,
            input.destination_longitude,
            HouseSystem::Placidus,
        )
        .await?;
    let angles = ChartAngles::from_asc_mc(raw.ascendant, raw.midheaven);
    let asc = angles.ascendant;

    let mut planet_houses = Vec::with_capacity(ALL_BODIES.len());
    for body in ALL_BODIES {
        let lon = *longitudes.get(&body).ok_or_else(|| {
            CalculationError::EphemerisUnavailable(format!("no longitude for {}", body.name()))
        })?;
        planet_houses.push((body, whole_sign_house(asc, lon)));
    }

    // Houses of the four angle points themselves, from the same Ascendant.
    let angle_houses: Vec<(AngleKey, House)> = ALL_ANGLES
        .iter()
        .map(|&angle| (angle, whole_sign_house(asc, angles.longitude(angle))))
        .collect();
    let mc_house = angle_houses
        .iter()
        .find(|(angle, _)| *angle == AngleKey::Midheaven)
        .map(|&(_, house)| house);

    let mut angular_hits = Vec::new();
    for &(body, house) in &planet_houses {
        for &(angle, angle_house) in &angle_houses {
            if angle_house == house {
                angular_hits.push(AngularHit {
                    body,
                    angle,
                    house,
                    nature: classify_body(body),
                    career: mc_house == Some(house),
                });
            }
        }
    }

    let mut business_house_activations: Vec<BusinessHouseActivation> = planet_houses
        .iter()
        .filter(|(_, house)| BUSINESS_HOUSES.contains(house))
        .map(|&(body, house)| BusinessHouseActivation {
            body,
            house,
            nature: classify_body(body),
        })
        .filter(|a| a.nature != Nature::Neutral)
        .collect();
    business_house_activations
        .sort_by(|a, b| (a.house, a.body.name()).cmp(&(b.house, b.body.name())));

    Ok(RelocationResult {
        angular_hits,
        business_house_activations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::FixedEphemeris;

    fn input(dest_longitude: f64) -> RelocationInput {
        RelocationInput {
            year: 1991,
            month: 6,
            day: 18,
            hour: 7,
            minute: 10,
            birth_latitude: 10.522,
            birth_longitude: 76.172,
            birth_time_zone: "UTC".to_string(),
            destination_latitude: 40.0,
            destination_longitude: dest_longitude,
        }
    }

    #[tokio::test]
    async fn each_angle_collects_the_planets_in_its_house() {
        // Default table, asc 15 (Aries), mc 275 (Capricorn). Pallas sits in
        // Aries (ASC house), Ceres in Libra (DSC house), Uranus in Capricorn
        // (MC house), Vesta in Cancer (IC house).
        let eph = FixedEphemeris::new();
        let result = calculate_relocation(&eph, &input(0.0)).await.unwrap();
        let pairs: Vec<(Body, AngleKey)> = result
            .angular_hits
            .iter()
            .map(|h| (h.body, h.angle))
            .collect();
        assert!(pairs.contains(&(Body::Pallas, AngleKey::Ascendant)));
        assert!(pairs.contains(&(Body::Ceres, AngleKey::Descendant)));
        assert!(pairs.contains(&(Body::Uranus, AngleKey::Midheaven)));
        assert!(pairs.contains(&(Body::Vesta, AngleKey::ImumCoeli)));

        // Everything sharing the MC house is a career hit, nothing else.
        for hit in &result.angular_hits {
            assert_eq!(hit.career, hit.house == House::Tenth, "{:?}", hit);
        }
    }

    #[tokio::test]
    async fn known_hits_with_steered_angles() {
        // Asc 80 (Gemini): Sun 86.9 shares house 1 with the Ascendant.
        // MC 350 (Pisces) is house 10; Moon 342.2 sits there.
        let eph = FixedEphemeris::new().with_angles(80.0, 350.0);
        let result = calculate_relocation(&eph, &input(0.0)).await.unwrap();

        let sun_hit = result
            .angular_hits
            .iter()
            .find(|h| h.body == Body::Sun && h.angle == AngleKey::Ascendant)
            .expect("Sun conjunct destination Ascendant house");
        assert_eq!(sun_hit.house, House::First);
        assert!(!sun_hit.career);
        assert_eq!(sun_hit.nature, Nature::Benefic);

        let moon_hit = result
            .angular_hits
            .iter()
            .find(|h| h.body == Body::Moon && h.angle == AngleKey::Midheaven)
            .expect("Moon in destination MC house");
        assert_eq!(moon_hit.house, House::Tenth);
        assert!(moon_hit.career, "hits sharing the MC house are career hits");
    }

    #[tokio::test]
    async fn business_houses_exclude_neutral_bodies() {
        let eph = FixedEphemeris::new().with_angles(80.0, 350.0);
        let result = calculate_relocation(&eph, &input(0.0)).await.unwrap();
        for activation in &result.business_house_activations {
            assert_ne!(activation.nature, Nature::Neutral);
            assert!(BUSINESS_HOUSES.contains(&activation.house));
        }
        // Moon (benefic) occupies Pisces, house 10 from an 80-degree Asc.
        assert!(result
            .business_house_activations
            .iter()
            .any(|a| a.body == Body::Moon && a.house == House::Tenth));
    }

    #[tokio::test]
    async fn activations_sorted_by_house_then_name() {
        let eph = FixedEphemeris::new();
        let result = calculate_relocation(&eph, &input(33.0)).await.unwrap();
        let keys: Vec<(u8, &str)> = result
            .business_house_activations
            .iter()
            .map(|a| (a.house.number(), a.body.name()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[tokio::test]
    async fn destination_changes_the_houses() {
        let eph = FixedEphemeris::new();
        let near = calculate_relocation(&eph, &input(0.0)).await.unwrap();
        let far = calculate_relocation(&eph, &input(120.0)).await.unwrap();
        assert_ne!(near.angular_hits, far.angular_hits);
    }

    #[test]
    fn validation_covers_destination_fields() {
        let reference_year = 2026;
        assert!(validate_relocation_input(&input(0.0), reference_year).is_ok());

        let mut bad = input(0.0);
        bad.destination_latitude = 95.0;
        assert_eq!(
            validate_relocation_input(&bad, reference_year)
                .unwrap_err()
                .to_string(),
            "Invalid destination latitude"
        );

        let mut bad = input(0.0);
        bad.destination_longitude = 200.0;
        assert_eq!(
            validate_relocation_input(&bad, reference_year)
                .unwrap_err()
                .to_string(),
            "Invalid destination longitude"
        );

        let mut bad = input(0.0);
        bad.year = 2100;
        assert!(validate_relocation_input(&bad, reference_year).is_err());
    }
}
