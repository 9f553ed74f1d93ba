//! The five calculators.
//!
//! Each one is a pure function over a typed input, returning a typed result
//! or a validation error. The two that need planetary positions take the
//! ephemeris port as an argument; the other three are fully synchronous.

pub mod address;
pub mod life_path;
pub mod natal_chart;
pub mod relocation;
pub mod transits;

pub use address::{
    calculate_address_numerology, validate_address_numerology_input, AddressNumerologyInput,
    AddressNumerologyResult, NumerologyLevel,
};
pub use life_path::{
    calculate_life_path, validate_life_path_input, LifePathInput, LifePathMeanings, LifePathResult,
};
pub use natal_chart::{
    calculate_natal_chart, validate_natal_chart_input, AngleAspect, AngleAspects, BodyAspect,
    NatalChartInput, NatalChartResult, PlacedPoint,
};
pub use relocation::{
    calculate_relocation, classify_body, validate_relocation_input, AngularHit,
    BusinessHouseActivation, Nature, RelocationInput, RelocationResult,
};
pub use transits::{
    calculate_transits, validate_transits_input, Placement, PlanetaryTransit, TransitBody,
    TransitsInput, TransitsResult,
};
