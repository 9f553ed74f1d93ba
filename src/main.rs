use std::sync::Arc;

use zenith_core::ephemeris::{FixedEphemeris, LazyEphemeris};
use zenith_core::orchestrator::{error_summary, CityInput, FormInput, Orchestrator};

#[tokio::main]
async fn main() {
    // Example run against the fixed table backend.
    let form = FormInput {
        name: "Asha".to_string(),
        date_of_birth: "2002-08-28".to_string(),
        time_of_birth: "07:10".to_string(),
        birth_location: Some(CityInput {
            latitude: 10.522,
            longitude: 76.172,
            time_zone: "Asia/Kolkata".to_string(),
        }),
        current_location: Some(CityInput {
            latitude: 43.65,
            longitude: -79.38,
            time_zone: "America/Toronto".to_string(),
        }),
        rising_sign: String::new(),
        unit_number: "123".to_string(),
        street_number: "45".to_string(),
        street_name: "Oak Street".to_string(),
        postal_code: "10001".to_string(),
        home_built_year: "2000".to_string(),
    };

    let ephemeris = Arc::new(LazyEphemeris::new(FixedEphemeris::new()));
    let orchestrator = Orchestrator::new(ephemeris);
    let report = orchestrator.run(&form).await;

    if report.success {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    } else {
        eprintln!("{}", error_summary(&report));
    }
}
