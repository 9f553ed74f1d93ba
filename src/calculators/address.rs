//! Address numerology calculator.
//!
//! Builds an ordered list of numerology levels from whichever address
//! fields are present, appends a combined level over the unit, building and
//! stripped street name, and reports the Chinese zodiac compatibility
//! between the home-built year and the birth year.

use serde::Serialize;

use crate::error::CalculationError;
use crate::numerology::{
    compatibility, number_meaning, value_of, ChineseZodiac, Compatibility, NumerologyMeaning,
    ZodiacMeaning,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddressNumerologyInput {
    pub unit_number: String,
    pub street_number: String,
    pub street_name: String,
    pub postal_code: String,
    /// Year the home was built, `YYYY` or empty.
    pub home_year: String,
    /// Birth year, `YYYY`.
    pub birth_year: String,
}

/// One scored address level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumerologyLevel {
    /// Positional label, `L1`, `L2`, ...
    pub level: String,
    /// The raw value that was scored.
    pub value: String,
    /// Field name the value came from.
    pub name: &'static str,
    pub number: u32,
    pub meaning: &'static str,
    pub description: &'static str,
    /// Set on the combined unit+building+street level.
    pub combined: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressNumerologyResult {
    pub levels: Vec<NumerologyLevel>,
    pub home_zodiac: Option<ChineseZodiac>,
    pub birth_zodiac: ChineseZodiac,
    pub home_zodiac_meaning: Option<ZodiacMeaning>,
    pub birth_zodiac_meaning: ZodiacMeaning,
    pub compatibility: Option<Compatibility>,
}

const STREET_SUFFIXES: [&str; 22] = [
    "street", "st", "avenue", "ave", "road", "rd", "boulevard", "blvd", "lane", "ln", "drive",
    "dr", "court", "ct", "place", "pl", "way", "terrace", "ter", "circle", "cir", "crescent",
];

const DIRECTIONALS: [&str; 12] = [
    "north", "south", "east", "west", "n", "s", "e", "w", "ne", "nw", "se", "sw",
];

fn is_affix(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    let trimmed = lower.trim_end_matches('.');
    STREET_SUFFIXES.contains(&trimmed) || DIRECTIONALS.contains(&trimmed)
}

/// Strip suffix and directional words from a street name, keeping at least
/// one word: "Oak Street" becomes "Oak", "N Main Ave" becomes "Main".
pub fn strip_street_affixes(street_name: &str) -> String {
    let mut words: Vec<&str> = street_name.split_whitespace().collect();
    while words.len() > 1 && is_affix(words[words.len() - 1]) {
        words.pop();
    }
    while words.len() > 1 && is_affix(words[0]) {
        words.remove(0);
    }
    words.join(" ")
}

/// Check the year fields.
pub fn validate_address_numerology_input(
    input: &AddressNumerologyInput,
    reference_year: i32,
) -> Result<(), CalculationError> {
    if input.birth_year.is_empty() {
        return Err(CalculationError::validation("Birth year is required"));
    }
    match input.birth_year.parse::<i32>() {
        Ok(year) if (1900..=reference_year).contains(&year) => {}
        _ => return Err(CalculationError::validation("Invalid birth year")),
    }
    if !input.home_year.is_empty() {
        match input.home_year.parse::<i32>() {
            Ok(year) if (1500..=reference_year + 100).contains(&year) => {}
            _ => return Err(CalculationError::validation("Invalid home year")),
        }
    }
    Ok(())
}

fn meaning_or_unknown(n: u32) -> NumerologyMeaning {
    number_meaning(n).unwrap_or(NumerologyMeaning {
        meaning: "Unknown",
        description: "Numerology meaning not found",
    })
}

fn build_level(index: usize, value: String, name: &'static str, combined: bool) -> NumerologyLevel {
    let number = value_of(&[&value]);
    let meaning = meaning_or_unknown(number);
    NumerologyLevel {
        level: format!("L{}", index + 1),
        value,
        name,
        number,
        meaning: meaning.meaning,
        description: meaning.description,
        combined,
    }
}

/// Score the address levels and look up the zodiac compatibility.
pub fn calculate_address_numerology(
    input: &AddressNumerologyInput,
    reference_year: i32,
) -> Result<AddressNumerologyResult, CalculationError> {
    validate_address_numerology_input(input, reference_year)?;

    let birth_year: i32 = input
        .birth_year
        .parse()
        .map_err(|_| CalculationError::validation("Invalid birth year"))?;
    let home_year: Option<i32> = if input.home_year.is_empty() {
        None
    } else {
        Some(
            input
                .home_year
                .parse()
                .map_err(|_| CalculationError::validation("Invalid home year"))?,
        )
    };

    let mut raw: Vec<(String, &'static str, bool)> = Vec::new();
    if !input.unit_number.is_empty() {
        raw.push((input.unit_number.clone(), "Unit Number", false));
    }
    if !input.street_number.is_empty() {
        raw.push((
            input.street_number.clone(),
            "Building/House Number",
            false,
        ));
    }
    if !input.street_name.is_empty() {
        raw.push((input.street_name.clone(), "Street Name", false));
    }
    if !input.postal_code.is_empty() {
        raw.push((input.postal_code.clone(), "Postal Code", false));
    }

    // Combined level over unit, building and the stripped street name.
    let mut combined_parts: Vec<String> = Vec::new();
    if !input.unit_number.is_empty() {
        combined_parts.push(input.unit_number.clone());
    }
    if !input.street_number.is_empty() {
        combined_parts.push(input.street_number.clone());
    }
    if !input.street_name.is_empty() {
        combined_parts.push(strip_street_affixes(&input.street_name));
    }
    if combined_parts.len() >= 2 {
        raw.push((combined_parts.join(" + "), "Level", true));
    }

    let levels = raw
        .into_iter()
        .enumerate()
        .map(|(i, (value, name, combined))| build_level(i, value, name, combined))
        .collect();

    let home_zodiac = home_year.map(ChineseZodiac::for_year);
    let birth_zodiac = ChineseZodiac::for_year(birth_year);

    Ok(AddressNumerologyResult {
        levels,
        home_zodiac,
        birth_zodiac,
        home_zodiac_meaning: home_zodiac.map(|z| z.meaning()),
        birth_zodiac_meaning: birth_zodiac.meaning(),
        compatibility: home_zodiac.map(|home| compatibility(home, birth_zodiac)),
    })
}
