//! Life path calculator.
//!
//! Pure numerology over the birth date: life path number, day path number,
//! personal year number and the Chinese zodiac animal, with meaning text
//! attached. The personal year joins the reference year with the birth
//! month and day as separate space-delimited tokens; joining them without
//! spaces is a different computation and is deliberately not used.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CalculationError;
use crate::numerology::{number_meaning, value_of, ChineseZodiac, NumerologyMeaning};

#[derive(Debug, Clone, PartialEq)]
pub struct LifePathInput {
    /// Birth date, `YYYY-MM-DD`.
    pub birth_date: String,
    /// Year the personal year number is computed for, normally the current
    /// UTC year. An explicit input so the calculator stays pure.
    pub reference_year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LifePathMeanings {
    pub life_path_meaning: &'static str,
    pub life_path_description: &'static str,
    pub personal_year_meaning: &'static str,
    pub personal_year_description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifePathResult {
    pub life_path_number: u32,
    pub day_path_number: u32,
    pub personal_year: u32,
    pub chinese_zodiac: ChineseZodiac,
    pub meanings: LifePathMeanings,
}

fn meaning_or_unknown(n: u32) -> NumerologyMeaning {
    number_meaning(n).unwrap_or(NumerologyMeaning {
        meaning: "Unknown",
        description: "Numerology meaning not found",
    })
}

fn date_parts(birth_date: &str) -> Option<(i32, &str, &str)> {
    let mut parts = birth_date.split('-');
    let year_str = parts.next()?;
    let month_str = parts.next()?;
    let day_str = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    if year_str.len() != 4 || month_str.len() != 2 || day_str.len() != 2 {
        return None;
    }
    if ![year_str, month_str, day_str]
        .iter()
        .all(|s| s.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }
    let year = year_str.parse().ok()?;
    Some((year, month_str, day_str))
}

/// Check the birth date is well formed, a real calendar date, and not in
/// the future.
pub fn validate_life_path_input(input: &LifePathInput) -> Result<(), CalculationError> {
    if input.birth_date.is_empty() {
        return Err(CalculationError::validation("Birth date is required"));
    }
    let Some((year, month_str, day_str)) = date_parts(&input.birth_date) else {
        return Err(CalculationError::validation(
            "Invalid date format. Expected YYYY-MM-DD",
        ));
    };
    let month: u32 = month_str.parse().unwrap_or(0);
    let day: u32 = day_str.parse().unwrap_or(0);
    if NaiveDate::from_ymd_opt(year, month, day).is_none() {
        return Err(CalculationError::validation("Invalid birth date"));
    }
    if year > input.reference_year {
        return Err(CalculationError::validation(
            "Birth date cannot be in the future",
        ));
    }
    Ok(())
}

/// Life path, day path, personal year and zodiac for a birth date.
pub fn calculate_life_path(input: &LifePathInput) -> Result<LifePathResult, CalculationError> {
    validate_life_path_input(input)?;
    let (year, month_str, day_str) = date_parts(&input.birth_date).ok_or_else(|| {
        CalculationError::validation("Invalid date format. Expected YYYY-MM-DD")
    })?;

    let digits = input.birth_date.replace('-', "");
    let life_path_number = value_of(&[&digits]);
    let day_path_number = value_of(&[day_str]);

    // Reference year replaces the birth year; tokens stay space-joined.
    let personal_year_text = format!("{} {} {}", input.reference_year, month_str, day_str);
    let personal_year = value_of(&[&personal_year_text]);

    let life_meaning = meaning_or_unknown(life_path_number);
    let year_meaning = meaning_or_unknown(personal_year);

    Ok(LifePathResult {
        life_path_number,
        day_path_number,
        personal_year,
        chinese_zodiac: ChineseZodiac::for_year(year),
        meanings: LifePathMeanings {
            life_path_meaning: life_meaning.meaning,
            life_path_description: life_meaning.description,
            personal_year_meaning: year_meaning.meaning,
            personal_year_description: year_meaning.description,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(date: &str) -> LifePathInput {
        LifePathInput {
            birth_date: date.to_string(),
            reference_year: 2026,
        }
    }

    #[test]
    fn master_life_path_example() {
        // 2+0+0+2+0+8+2+8 = 22, preserved as a master number.
        let result = calculate_life_path(&input("2002-08-28")).unwrap();
        assert_eq!(result.life_path_number, 22);
        assert_eq!(result.day_path_number, 1); // 2+8 = 10 -> 1
        assert_eq!(result.chinese_zodiac, ChineseZodiac::Horse);
        assert_eq!(result.meanings.life_path_meaning, "The Master Builder");
    }

    #[test]
    fn personal_year_uses_spaced_tokens() {
        // 2026 -> 1, 01 -> 1, 09 -> 9: sum 11 survives as a master, which
        // the flat digit string 20260109 (-> 2) never reaches.
        let result = calculate_life_path(&input("1990-01-09")).unwrap();
        assert_eq!(result.personal_year, 11);
        assert_eq!(result.meanings.personal_year_meaning, "The Visionary");
    }

    #[test]
    fn zodiac_cycle_examples() {
        assert_eq!(
            calculate_life_path(&input("1996-03-03")).unwrap().chinese_zodiac,
            ChineseZodiac::Rat
        );
        assert_eq!(
            calculate_life_path(&input("2000-07-15")).unwrap().chinese_zodiac,
            ChineseZodiac::Dragon
        );
    }

    #[test]
    fn empty_date_is_rejected() {
        let err = calculate_life_path(&input("")).unwrap_err();
        assert_eq!(err.to_string(), "Birth date is required");
    }

    #[test]
    fn malformed_dates_are_rejected() {
        for bad in ["28-08-2002", "2002/08/28", "20020828", "2002-8-28"] {
            let err = calculate_life_path(&input(bad)).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Invalid date format. Expected YYYY-MM-DD",
                "{bad}"
            );
        }
    }

    #[test]
    fn impossible_dates_are_rejected() {
        for bad in ["2002-13-28", "2001-02-29", "1990-00-10"] {
            let err = calculate_life_path(&input(bad)).unwrap_err();
            assert_eq!(err.to_string(), "Invalid birth date", "{bad}");
        }
    }

    #[test]
    fn future_date_is_rejected() {
        let err = calculate_life_path(&input("2040-01-01")).unwrap_err();
        assert_eq!(err.to_string(), "Birth date cannot be in the future");
    }

    #[test]
    fn result_values_stay_in_vocabulary() {
        let allowed = [1, 2, 3, 4, 5, 6, 7, 8, 9, 11, 22, 33];
        for date in ["1955-11-11", "1970-12-31", "1984-02-29", "2001-09-09"] {
            let result = calculate_life_path(&input(date)).unwrap();
            assert!(allowed.contains(&result.life_path_number));
            assert!(allowed.contains(&result.day_path_number));
            assert!(allowed.contains(&result.personal_year));
        }
    }
}
