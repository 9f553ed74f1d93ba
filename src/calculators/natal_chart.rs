//! Natal chart calculator.
//!
//! Queries the ephemeris for all port bodies and the chart angles at the
//! birth instant and place, assigns whole-sign houses, and detects aspects.
//! Angle-to-body aspects are restricted to conjunctions; the other
//! relationships are not surfaced for angles.

use serde::Serialize;

use crate::aspects::{find_aspect, Aspect};
use crate::ephemeris::{Ephemeris, HouseSystem};
use crate::error::CalculationError;
use crate::houses::{degree_in_sign, whole_sign_house, ChartAngles, House, ZodiacSign};
use crate::time::to_julian_day;
use crate::{AngleKey, Body, PointName};

/// Birth moment and place, already split into civil components.
#[derive(Debug, Clone, PartialEq)]
pub struct NatalChartInput {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub time_zone: String,
}

/// A body or calculated point placed on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedPoint {
    pub point: PointName,
    pub longitude: f64,
    pub sign: ZodiacSign,
    pub degree_in_sign: f64,
    pub house: Option<House>,
    pub retrograde: Option<bool>,
}

/// An aspect between two bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyAspect {
    pub body_a: Body,
    pub body_b: Body,
    pub aspect: Aspect,
}

/// A conjunction between an angle and a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngleAspect {
    pub angle: AngleKey,
    pub body: Body,
    pub aspect: Aspect,
}

/// Angle conjunctions grouped by angle.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AngleAspects {
    pub asc: Vec<AngleAspect>,
    pub dsc: Vec<AngleAspect>,
    pub mc: Vec<AngleAspect>,
    pub ic: Vec<AngleAspect>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NatalChartResult {
    pub planets: Vec<PlacedPoint>,
    pub aspects: Vec<BodyAspect>,
    pub angle_aspects: AngleAspects,
    pub rising_sign: ZodiacSign,
}

/// Chart point ordering: Ascendant first, bodies, then the derived angles.
const NATAL_BODY_ORDER: [Body; 18] = [
    Body::Sun,
    Body::Moon,
    Body::Mars,
    Body::Mercury,
    Body::Jupiter,
    Body::Venus,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
    Body::MeanNode,
    Body::TrueNode,
    Body::Lilith,
    Body::Chiron,
    Body::Ceres,
    Body::Pallas,
    Body::Juno,
    Body::Vesta,
];

/// Range-check every field of the input.
pub fn validate_natal_chart_input(
    input: &NatalChartInput,
    reference_year: i32,
) -> Result<(), CalculationError> {
    if input.year < 1900 || input.year > reference_year {
        return Err(CalculationError::validation("Invalid year"));
    }
    if input.month < 1 || input.month > 12 {
        return Err(CalculationError::validation("Month must be 1-12"));
    }
    if input.day < 1 || input.day > 31 {
        return Err(CalculationError::validation("Invalid day"));
    }
    if input.hour > 23 {
        return Err(CalculationError::validation("Hour must be 0-23"));
    }
    if input.minute > 59 {
        return Err(CalculationError::validation("Minute must be 0-59"));
    }
    if input.latitude < -90.0 || input.latitude > 90.0 {
        return Err(CalculationError::validation("Latitude must be -90 to 90"));
    }
    if input.longitude < -180.0 || input.longitude > 180.0 {
        return Err(CalculationError::validation("Longitude must be -180 to 180"));
    }
    if input.time_zone.is_empty() {
        return Err(CalculationError::validation("Valid timezone required"));
    }
    Ok(())
}

fn place(point: PointName, longitude: f64, asc: f64) -> PlacedPoint {
    PlacedPoint {
        point,
        longitude,
        sign: ZodiacSign::from_longitude(longitude),
        degree_in_sign: degree_in_sign(longitude),
        house: Some(whole_sign_house(asc, longitude)),
        retrograde: None,
    }
}

/// Compute the natal chart at the birth instant and location.
pub async fn calculate_natal_chart(
    ephemeris: &dyn Ephemeris,
    input: &NatalChartInput,
) -> Result<NatalChartResult, CalculationError> {
    let date = format!("{:04}-{:02}-{:02}", input.year, input.month, input.day);
    let time = format!("{:02}:{:02}", input.hour, input.minute);
    let jd = to_julian_day(&date, &time, &input.time_zone)?;

    let longitudes = ephemeris.body_longitudes(jd).await?;
    let raw = ephemeris
        .angles(jd, input.latitude, input.longitude, HouseSystem::Placidus)
        .await?;
    let angles = ChartAngles::from_asc_mc(raw.ascendant, raw.midheaven);
    let asc = angles.ascendant;

    let mut body_lons = Vec::with_capacity(NATAL_BODY_ORDER.len());
    for body in NATAL_BODY_ORDER {
        let lon = *longitudes.get(&body).ok_or_else(|| {
            CalculationError::EphemerisUnavailable(format!("no longitude for {}", body.name()))
        })?;
        body_lons.push((body, lon));
    }

    // Placed points: Ascendant, the 18 bodies, then the derived angles.
    let mut planets = Vec::with_capacity(body_lons.len() + 4);
    planets.push(place(PointName::Angle(AngleKey::Ascendant), asc, asc));
    for &(body, lon) in &body_lons {
        planets.push(place(PointName::Body(body), lon, asc));
    }
    planets.push(place(
        PointName::Angle(AngleKey::Descendant),
        angles.descendant,
        asc,
    ));
    planets.push(place(
        PointName::Angle(AngleKey::Midheaven),
        angles.midheaven,
        asc,
    ));
    planets.push(place(
        PointName::Angle(AngleKey::ImumCoeli),
        angles.imum_coeli,
        asc,
    ));

    // Planet-to-planet aspects, angles excluded.
    let mut aspects = Vec::new();
    for i in 0..body_lons.len() {
        for j in (i + 1)..body_lons.len() {
            if let Some(aspect) = find_aspect(body_lons[i].1, body_lons[j].1) {
                aspects.push(BodyAspect {
                    body_a: body_lons[i].0,
                    body_b: body_lons[j].0,
                    aspect,
                });
            }
        }
    }

    // Angle-to-body contacts, conjunctions only.
    let mut angle_aspects = AngleAspects::default();
    for angle in crate::ALL_ANGLES {
        let angle_lon = angles.longitude(angle);
        for &(body, lon) in &body_lons {
            if find_aspect(angle_lon, lon) == Some(Aspect::Conjunction) {
                let entry = AngleAspect {
                    angle,
                    body,
                    aspect: Aspect::Conjunction,
                };
                match angle {
                    AngleKey::Ascendant => angle_aspects.asc.push(entry),
                    AngleKey::Descendant => angle_aspects.dsc.push(entry),
                    AngleKey::Midheaven => angle_aspects.mc.push(entry),
                    AngleKey::ImumCoeli => angle_aspects.ic.push(entry),
                }
            }
        }
    }

    Ok(NatalChartResult {
        planets,
        aspects,
        angle_aspects,
        rising_sign: angles.rising_sign(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::FixedEphemeris;
    use approx::assert_relative_eq;

    fn input() -> NatalChartInput {
        NatalChartInput {
            year: 1991,
            month: 6,
            day: 18,
            hour: 7,
            minute: 10,
            latitude: 10.522,
            longitude: 0.0,
            time_zone: "UTC".to_string(),
        }
    }

    #[tokio::test]
    async fn chart_has_22_points_in_order() {
        let eph = FixedEphemeris::new();
        let chart = calculate_natal_chart(&eph, &input()).await.unwrap();
        assert_eq!(chart.planets.len(), 22);
        assert_eq!(
            chart.planets[0].point,
            PointName::Angle(AngleKey::Ascendant)
        );
        assert_eq!(chart.planets[1].point, PointName::Body(Body::Sun));
        assert_eq!(
            chart.planets[21].point,
            PointName::Angle(AngleKey::ImumCoeli)
        );
    }

    #[tokio::test]
    async fn ascendant_is_house_one_and_sets_rising_sign() {
        let eph = FixedEphemeris::new().with_angles(123.0, 33.0);
        let chart = calculate_natal_chart(&eph, &input()).await.unwrap();
        let asc = &chart.planets[0];
        assert_eq!(asc.house, Some(House::First));
        assert_eq!(chart.rising_sign, ZodiacSign::Leo);
        assert_relative_eq!(asc.longitude, 123.0);
    }

    #[tokio::test]
    async fn houses_follow_whole_sign_formula() {
        let eph = FixedEphemeris::new().with_angles(100.0, 10.0);
        let chart = calculate_natal_chart(&eph, &input()).await.unwrap();
        for p in &chart.planets {
            let expected = whole_sign_house(100.0, p.longitude);
            assert_eq!(p.house, Some(expected), "{}", p.point.name());
        }
    }

    #[tokio::test]
    async fn aspects_exclude_angles() {
        let eph = FixedEphemeris::new();
        let chart = calculate_natal_chart(&eph, &input()).await.unwrap();
        assert!(!chart.aspects.is_empty());
        // Mean Node and True Node sit 1.2 degrees apart in the fixed table.
        assert!(chart.aspects.iter().any(|a| {
            a.body_a == Body::MeanNode
                && a.body_b == Body::TrueNode
                && a.aspect == Aspect::Conjunction
        }));
    }

    #[tokio::test]
    async fn angle_aspects_are_conjunctions_only() {
        // Ascendant 52.0 sits on Venus (52.1). Lilith (172.4) trines it, but
        // trines are not surfaced for angles.
        let eph = FixedEphemeris::new().with_angles(52.0, 322.0);
        let chart = calculate_natal_chart(&eph, &input()).await.unwrap();
        assert!(chart
            .angle_aspects
            .asc
            .iter()
            .any(|a| a.body == Body::Venus && a.aspect == Aspect::Conjunction));
        assert!(chart
            .angle_aspects
            .asc
            .iter()
            .all(|a| a.body != Body::Lilith));
        for group in [
            &chart.angle_aspects.asc,
            &chart.angle_aspects.dsc,
            &chart.angle_aspects.mc,
            &chart.angle_aspects.ic,
        ] {
            assert!(group.iter().all(|a| a.aspect == Aspect::Conjunction));
        }
    }

    #[tokio::test]
    async fn missing_body_fails_the_calculator() {
        let eph = FixedEphemeris::new().without_body(Body::Vesta);
        let err = calculate_natal_chart(&eph, &input()).await.unwrap_err();
        assert!(matches!(err, CalculationError::EphemerisUnavailable(_)));
    }

    #[tokio::test]
    async fn bad_zone_is_invalid_civil_time() {
        let eph = FixedEphemeris::new();
        let mut bad = input();
        bad.time_zone = "Nowhere/Nothing".to_string();
        let err = calculate_natal_chart(&eph, &bad).await.unwrap_err();
        assert!(matches!(err, CalculationError::InvalidCivilTime(_)));
    }

    #[test]
    fn validation_covers_every_field() {
        let reference_year = 2026;
        let ok = input();
        assert!(validate_natal_chart_input(&ok, reference_year).is_ok());

        let mut bad = input();
        bad.year = 1850;
        assert_eq!(
            validate_natal_chart_input(&bad, reference_year)
                .unwrap_err()
                .to_string(),
            "Invalid year"
        );

        let mut bad = input();
        bad.month = 13;
        assert_eq!(
            validate_natal_chart_input(&bad, reference_year)
                .unwrap_err()
                .to_string(),
            "Month must be 1-12"
        );

        let mut bad = input();
        bad.day = 0;
        assert!(validate_natal_chart_input(&bad, reference_year).is_err());

        let mut bad = input();
        bad.hour = 24;
        assert!(validate_natal_chart_input(&bad, reference_year).is_err());

        let mut bad = input();
        bad.minute = 60;
        assert!(validate_natal_chart_input(&bad, reference_year).is_err());

        let mut bad = input();
        bad.latitude = 91.0;
        assert!(validate_natal_chart_input(&bad, reference_year).is_err());

        let mut bad = input();
        bad.longitude = -181.0;
        assert!(validate_natal_chart_input(&bad, reference_year).is_err());

        let mut bad = input();
        bad.time_zone = String::new();
        assert!(validate_natal_chart_input(&bad, reference_year).is_err());
    }
}
