//! Calculator orchestration.
//!
//! The natal chart runs first so its rising sign can feed the transits
//! calculator; the remaining four calculators then run concurrently under a
//! single timer. Validation happens up front and any failure aborts the
//! whole batch before anything executes. Grading runs last, best effort: a
//! grading failure is logged and the report ships without a diagnostic.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Utc};
use serde::Serialize;
use tokio::time::timeout;

use crate::calculators::{
    calculate_address_numerology, calculate_life_path, calculate_natal_chart,
    calculate_relocation, calculate_transits, validate_address_numerology_input,
    validate_life_path_input, validate_natal_chart_input, validate_relocation_input,
    AddressNumerologyInput, AddressNumerologyResult, LifePathInput, LifePathResult,
    NatalChartInput, NatalChartResult, RelocationInput, RelocationResult, TransitsInput,
    TransitsResult,
};
use crate::diagnostic::{destination_planet_houses, grade_three_pillars, DiagnosticReport, GraderInput};
use crate::ephemeris::Ephemeris;
use crate::error::{CalculationError, CalculatorError};
use crate::time::to_julian_day;

/// Default ceiling for the natal phase and for the parallel phase.
pub const ORCHESTRATOR_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------
// ## External input contract
// ---------------------------

/// A place with its IANA zone, as delivered by the form layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityInput {
    pub latitude: f64,
    pub longitude: f64,
    pub time_zone: String,
}

/// Raw form fields, the outside world's side of the contract.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormInput {
    pub name: String,
    /// `YYYY-MM-DD`
    pub date_of_birth: String,
    /// `HH:MM`, 24-hour
    pub time_of_birth: String,
    pub birth_location: Option<CityInput>,
    pub current_location: Option<CityInput>,
    /// Free-text rising sign override; the natal chart result wins when the
    /// batch runs.
    pub rising_sign: String,
    pub unit_number: String,
    pub street_number: String,
    pub street_name: String,
    pub postal_code: String,
    /// `YYYY` or empty.
    pub home_built_year: String,
}

// ---------------------------
// ## Report structure
// ---------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserInfo {
    pub name: String,
    pub date_of_birth: String,
    pub time_of_birth: String,
    pub rising_sign: String,
}

/// The five calculator outputs, each absent on failure.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CalculatorResults {
    pub transits: Option<TransitsResult>,
    pub natal_chart: Option<NatalChartResult>,
    pub life_path: Option<LifePathResult>,
    pub relocation: Option<RelocationResult>,
    pub address_numerology: Option<AddressNumerologyResult>,
}

/// Everything one request produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedReport {
    pub success: bool,
    pub timestamp: String,
    pub user_info: UserInfo,
    pub calculators: CalculatorResults,
    pub errors: Option<Vec<CalculatorError>>,
    pub diagnostic: Option<DiagnosticReport>,
}

/// One line per failed calculator, `name: message`.
pub fn error_summary(report: &ConsolidatedReport) -> String {
    if report.success {
        return String::new();
    }
    match &report.errors {
        Some(errors) if !errors.is_empty() => errors
            .iter()
            .map(|e| format!("{}: {}", e.calculator_name, e.error_message))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => "Unknown error occurred".to_string(),
    }
}

// ---------------------------
// ## Input mapping
// ---------------------------

fn split_numbers(text: &str, sep: char) -> Vec<u32> {
    text.split(sep)
        .map(|part| part.parse().unwrap_or(0))
        .collect()
}

fn date_fields(date: &str) -> (i32, u32, u32) {
    let parts = split_numbers(date, '-');
    (
        parts.first().copied().unwrap_or(0) as i32,
        parts.get(1).copied().unwrap_or(0),
        parts.get(2).copied().unwrap_or(0),
    )
}

fn time_fields(time: &str) -> (u32, u32) {
    let parts = split_numbers(time, ':');
    (
        parts.first().copied().unwrap_or(0),
        parts.get(1).copied().unwrap_or(0),
    )
}

fn map_to_natal_chart_input(form: &FormInput) -> Result<NatalChartInput, CalculationError> {
    let birth = form.birth_location.as_ref().ok_or_else(|| {
        CalculationError::validation("Birth location is required for natal chart")
    })?;
    let (year, month, day) = date_fields(&form.date_of_birth);
    let (hour, minute) = time_fields(&form.time_of_birth);
    Ok(NatalChartInput {
        year,
        month,
        day,
        hour,
        minute,
        latitude: birth.latitude,
        longitude: birth.longitude,
        time_zone: birth.time_zone.clone(),
    })
}

fn map_to_life_path_input(form: &FormInput, reference_year: i32) -> LifePathInput {
    LifePathInput {
        birth_date: form.date_of_birth.clone(),
        reference_year,
    }
}

fn map_to_relocation_input(form: &FormInput) -> Result<RelocationInput, CalculationError> {
    let (birth, current) = match (&form.birth_location, &form.current_location) {
        (Some(birth), Some(current)) => (birth, current),
        _ => {
            return Err(CalculationError::validation(
                "Both birth and current locations are required for relocation",
            ))
        }
    };
    let (year, month, day) = date_fields(&form.date_of_birth);
    let (hour, minute) = time_fields(&form.time_of_birth);
    Ok(RelocationInput {
        year,
        month,
        day,
        hour,
        minute,
        birth_latitude: birth.latitude,
        birth_longitude: birth.longitude,
        birth_time_zone: birth.time_zone.clone(),
        destination_latitude: current.latitude,
        destination_longitude: current.longitude,
    })
}

fn map_to_address_numerology_input(form: &FormInput) -> AddressNumerologyInput {
    let birth_year = form
        .date_of_birth
        .split('-')
        .next()
        .unwrap_or("")
        .to_string();
    AddressNumerologyInput {
        unit_number: form.unit_number.clone(),
        street_number: form.street_number.clone(),
        street_name: form.street_name.clone(),
        postal_code: form.postal_code.clone(),
        home_year: form.home_built_year.clone(),
        birth_year,
    }
}

// ---------------------------
// ## Orchestrator
// ---------------------------

/// Pipeline phase, logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Validating,
    NatalChartPending,
    ParallelPending,
    Consolidating,
    Succeeded,
    Failed,
}

/// Runs the five calculators against an injected ephemeris engine.
pub struct Orchestrator {
    ephemeris: Arc<dyn Ephemeris>,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(ephemeris: Arc<dyn Ephemeris>) -> Self {
        Orchestrator {
            ephemeris,
            timeout: ORCHESTRATOR_TIMEOUT,
        }
    }

    /// Override the phase timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn advance(&self, phase: &mut Phase, next: Phase) {
        log::debug!("orchestrator: {phase:?} -> {next:?}");
        *phase = next;
    }

    /// Run the full batch for one form submission.
    pub async fn run(&self, form: &FormInput) -> ConsolidatedReport {
        let mut phase = Phase::Idle;
        self.advance(&mut phase, Phase::Validating);

        let reference_year = Utc::now().year();

        // Map the form onto the typed calculator inputs. Missing locations
        // abort before validation like any other malformed request.
        let natal_input = match map_to_natal_chart_input(form) {
            Ok(input) => input,
            Err(err) => {
                self.advance(&mut phase, Phase::Failed);
                return self.error_report(form, "orchestrator", &err);
            }
        };
        let relocation_input = match map_to_relocation_input(form) {
            Ok(input) => input,
            Err(err) => {
                self.advance(&mut phase, Phase::Failed);
                return self.error_report(form, "orchestrator", &err);
            }
        };
        let life_path_input = map_to_life_path_input(form, reference_year);
        let address_input = map_to_address_numerology_input(form);

        // Upfront validation of everything except transits, whose rising
        // sign does not exist until the natal chart has run.
        let validations: [(&str, Result<(), CalculationError>); 4] = [
            (
                "natalChart",
                validate_natal_chart_input(&natal_input, reference_year),
            ),
            ("lifePath", validate_life_path_input(&life_path_input)),
            (
                "relocation",
                validate_relocation_input(&relocation_input, reference_year),
            ),
            (
                "addressNumerology",
                validate_address_numerology_input(&address_input, reference_year),
            ),
        ];
        let validation_errors: Vec<CalculatorError> = validations
            .iter()
            .filter_map(|(name, result)| {
                result
                    .as_ref()
                    .err()
                    .map(|err| CalculatorError::new(*name, err))
            })
            .collect();
        if !validation_errors.is_empty() {
            self.advance(&mut phase, Phase::Failed);
            return self.build_report(form, CalculatorResults::default(), Some(validation_errors));
        }

        // Natal chart runs alone; its rising sign feeds the transits.
        self.advance(&mut phase, Phase::NatalChartPending);
        let natal_result = match timeout(
            self.timeout,
            calculate_natal_chart(&*self.ephemeris, &natal_input),
        )
        .await
        {
            Err(_) => {
                self.advance(&mut phase, Phase::Failed);
                return self.error_report(form, "orchestrator", &CalculationError::Timeout);
            }
            Ok(Err(err)) => {
                self.advance(&mut phase, Phase::Failed);
                return self.error_report(form, "orchestrator", &err);
            }
            Ok(Ok(result)) => result,
        };

        let transits_input = TransitsInput {
            rising_sign: natal_result.rising_sign.name().to_string(),
        };

        // The remaining four run concurrently under one fresh timer. Any
        // error or a timeout fails the whole batch; nothing partial is kept.
        self.advance(&mut phase, Phase::ParallelPending);
        let parallel = timeout(self.timeout, async {
            tokio::try_join!(
                async { calculate_transits(&transits_input) },
                async { calculate_life_path(&life_path_input) },
                calculate_relocation(&*self.ephemeris, &relocation_input),
                async { calculate_address_numerology(&address_input, reference_year) },
            )
        })
        .await;
        let (transits, life_path, relocation, address) = match parallel {
            Err(_) => {
                self.advance(&mut phase, Phase::Failed);
                return self.error_report(form, "orchestrator", &CalculationError::Timeout);
            }
            Ok(Err(err)) => {
                self.advance(&mut phase, Phase::Failed);
                return self.error_report(form, "orchestrator", &err);
            }
            Ok(Ok(results)) => results,
        };

        self.advance(&mut phase, Phase::Consolidating);
        let mut report = self.build_report(
            form,
            CalculatorResults {
                transits: Some(transits),
                natal_chart: Some(natal_result),
                life_path: Some(life_path),
                relocation: Some(relocation),
                address_numerology: Some(address),
            },
            None,
        );

        match self.run_diagnostic(form, &report).await {
            Ok(diagnostic) => report.diagnostic = Some(diagnostic),
            Err(err) => log::warn!("diagnostic grading failed: {err}"),
        }

        self.advance(&mut phase, Phase::Succeeded);
        report
    }

    /// Destination houses plus the pure grading pass.
    async fn run_diagnostic(
        &self,
        form: &FormInput,
        report: &ConsolidatedReport,
    ) -> Result<DiagnosticReport, CalculationError> {
        let destination_houses = match (&form.birth_location, &form.current_location) {
            (Some(birth), Some(current))
                if !form.date_of_birth.is_empty() && !form.time_of_birth.is_empty() =>
            {
                let houses = async {
                    let jd = to_julian_day(
                        &form.date_of_birth,
                        &form.time_of_birth,
                        &birth.time_zone,
                    )?;
                    destination_planet_houses(
                        &*self.ephemeris,
                        jd,
                        current.latitude,
                        current.longitude,
                    )
                    .await
                }
                .await;
                match houses {
                    Ok(houses) => Some(houses),
                    Err(err) => {
                        log::warn!("destination house computation failed: {err}");
                        None
                    }
                }
            }
            _ => None,
        };

        grade_three_pillars(&GraderInput {
            natal_chart: report.calculators.natal_chart.as_ref(),
            transits: report.calculators.transits.as_ref(),
            life_path: report.calculators.life_path.as_ref(),
            destination_houses: destination_houses.as_deref(),
            address_numerology: report.calculators.address_numerology.as_ref(),
        })
    }

    fn build_report(
        &self,
        form: &FormInput,
        calculators: CalculatorResults,
        errors: Option<Vec<CalculatorError>>,
    ) -> ConsolidatedReport {
        let success = errors.as_ref().map_or(true, Vec::is_empty);
        ConsolidatedReport {
            success,
            timestamp: Utc::now().to_rfc3339(),
            user_info: UserInfo {
                name: form.name.clone(),
                date_of_birth: form.date_of_birth.clone(),
                time_of_birth: form.time_of_birth.clone(),
                rising_sign: form.rising_sign.clone(),
            },
            calculators,
            errors: errors.filter(|e| !e.is_empty()),
            diagnostic: None,
        }
    }

    fn error_report(
        &self,
        form: &FormInput,
        calculator_name: &str,
        error: &CalculationError,
    ) -> ConsolidatedReport {
        self.build_report(
            form,
            CalculatorResults::default(),
            Some(vec![CalculatorError::new(calculator_name, error)]),
        )
    }
}
