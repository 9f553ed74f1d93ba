//! Ephemeris capability boundary.
//!
//! The astronomical model lives in an external engine. This crate only
//! defines the contract: given a time index it returns ecliptic longitudes
//! for a fixed set of bodies, and given a time index plus coordinates it
//! returns the Ascendant and MC. Implementations are injected into every
//! calculator that needs them; there is no ambient global engine.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::error::CalculationError;
use crate::houses::normalize_360;
use crate::{Body, JulianDay, ALL_BODIES};

/// House system passed through to the engine's angle computation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HouseSystem {
    Placidus,
    WholeSign,
}

impl HouseSystem {
    /// Single-letter engine code.
    pub const fn code(self) -> char {
        match self {
            Self::Placidus => 'P',
            Self::WholeSign => 'W',
        }
    }
}

/// Raw angle query result. Descendant and IC are derived by the caller,
/// never returned by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawAngles {
    pub ascendant: f64,
    pub midheaven: f64,
}

/// Contract for the external ephemeris engine.
#[async_trait]
pub trait Ephemeris: Send + Sync {
    /// Load engine data. Must be safe to call more than once.
    async fn init(&self) -> Result<(), CalculationError>;

    /// Geocentric ecliptic longitudes for all bodies in [`ALL_BODIES`].
    /// A missing body is an [`CalculationError::EphemerisUnavailable`].
    async fn body_longitudes(
        &self,
        jd: JulianDay,
    ) -> Result<BTreeMap<Body, f64>, CalculationError>;

    /// Ascendant and MC for an instant and location.
    async fn angles(
        &self,
        jd: JulianDay,
        latitude: f64,
        longitude: f64,
        house_system: HouseSystem,
    ) -> Result<RawAngles, CalculationError>;
}

// ---------------------------
// ## Lazy initialization
// ---------------------------

/// Wrapper that initializes the underlying engine once, lazily, on first
/// query. Concurrent callers all await the same initialization instead of
/// re-triggering it.
pub struct LazyEphemeris<E> {
    engine: E,
    ready: OnceCell<()>,
}

impl<E: Ephemeris> LazyEphemeris<E> {
    pub fn new(engine: E) -> Self {
        LazyEphemeris {
            engine,
            ready: OnceCell::new(),
        }
    }

    pub fn inner(&self) -> &E {
        &self.engine
    }

    async fn ensure_ready(&self) -> Result<(), CalculationError> {
        self.ready
            .get_or_try_init(|| self.engine.init())
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl<E: Ephemeris> Ephemeris for LazyEphemeris<E> {
    async fn init(&self) -> Result<(), CalculationError> {
        self.ensure_ready().await
    }

    async fn body_longitudes(
        &self,
        jd: JulianDay,
    ) -> Result<BTreeMap<Body, f64>, CalculationError> {
        self.ensure_ready().await?;
        self.engine.body_longitudes(jd).await
    }

    async fn angles(
        &self,
        jd: JulianDay,
        latitude: f64,
        longitude: f64,
        house_system: HouseSystem,
    ) -> Result<RawAngles, CalculationError> {
        self.ensure_ready().await?;
        self.engine
            .angles(jd, latitude, longitude, house_system)
            .await
    }
}

// ---------------------------
// ## Fixed table backend
// ---------------------------

/// Deterministic table-backed engine for tests and offline demos.
///
/// Longitudes come straight from the table. Angles are a simple function of
/// the geographic longitude so different locations produce different
/// ascendants, which is all the relocation pipeline needs.
pub struct FixedEphemeris {
    longitudes: BTreeMap<Body, f64>,
    base_ascendant: f64,
    base_midheaven: f64,
    delay: Option<Duration>,
    init_calls: AtomicUsize,
}

impl FixedEphemeris {
    pub fn new() -> Self {
        let mut longitudes = BTreeMap::new();
        // A plausible spread across the zodiac, one entry per port body.
        let table = [
            (Body::Sun, 86.9),
            (Body::Moon, 342.2),
            (Body::Mercury, 64.3),
            (Body::Venus, 52.1),
            (Body::Mars, 335.0),
            (Body::Jupiter, 130.4),
            (Body::Saturn, 309.6),
            (Body::Uranus, 281.1),
            (Body::Neptune, 284.9),
            (Body::Pluto, 228.0),
            (Body::MeanNode, 294.7),
            (Body::TrueNode, 293.5),
            (Body::Lilith, 172.4),
            (Body::Chiron, 121.8),
            (Body::Ceres, 201.3),
            (Body::Pallas, 18.6),
            (Body::Juno, 250.2),
            (Body::Vesta, 97.5),
        ];
        for (body, lon) in table {
            longitudes.insert(body, lon);
        }
        FixedEphemeris {
            longitudes,
            base_ascendant: 15.0,
            base_midheaven: 275.0,
            delay: None,
            init_calls: AtomicUsize::new(0),
        }
    }

    /// Override one body's longitude.
    pub fn with_longitude(mut self, body: Body, longitude: f64) -> Self {
        self.longitudes.insert(body, normalize_360(longitude));
        self
    }

    /// Remove a body from the table to simulate an engine gap.
    pub fn without_body(mut self, body: Body) -> Self {
        self.longitudes.remove(&body);
        self
    }

    /// Set the base Ascendant and MC used before the location offset.
    pub fn with_angles(mut self, ascendant: f64, midheaven: f64) -> Self {
        self.base_ascendant = normalize_360(ascendant);
        self.base_midheaven = normalize_360(midheaven);
        self
    }

    /// Delay every query, for exercising the orchestrator timeout.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of completed `init` calls on the engine.
    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for FixedEphemeris {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Ephemeris for FixedEphemeris {
    async fn init(&self) -> Result<(), CalculationError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn body_longitudes(
        &self,
        _jd: JulianDay,
    ) -> Result<BTreeMap<Body, f64>, CalculationError> {
        self.pause().await;
        for body in ALL_BODIES {
            if !self.longitudes.contains_key(&body) {
                return Err(CalculationError::EphemerisUnavailable(format!(
                    "no longitude for {}",
                    body.name()
                )));
            }
        }
        Ok(self.longitudes.clone())
    }

    async fn angles(
        &self,
        _jd: JulianDay,
        _latitude: f64,
        longitude: f64,
        _house_system: HouseSystem,
    ) -> Result<RawAngles, CalculationError> {
        self.pause().await;
        Ok(RawAngles {
            ascendant: normalize_360(self.base_ascendant + longitude),
            midheaven: normalize_360(self.base_midheaven + longitude),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn fixed_engine_returns_all_bodies() {
        let eph = FixedEphemeris::new();
        let lons = eph.body_longitudes(2_451_545.0).await.unwrap();
        assert_eq!(lons.len(), ALL_BODIES.len());
        for lon in lons.values() {
            assert!((0.0..360.0).contains(lon));
        }
    }

    #[tokio::test]
    async fn missing_body_is_an_error() {
        let eph = FixedEphemeris::new().without_body(Body::Chiron);
        let err = eph.body_longitudes(2_451_545.0).await.unwrap_err();
        assert!(matches!(err, CalculationError::EphemerisUnavailable(_)));
    }

    #[tokio::test]
    async fn angles_shift_with_location() {
        let eph = FixedEphemeris::new().with_angles(10.0, 280.0);
        let a = eph
            .angles(0.0, 40.0, 0.0, HouseSystem::Placidus)
            .await
            .unwrap();
        let b = eph
            .angles(0.0, 40.0, 90.0, HouseSystem::Placidus)
            .await
            .unwrap();
        assert!((a.ascendant - 10.0).abs() < 1e-9);
        assert!((b.ascendant - 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn lazy_wrapper_initializes_once() {
        let lazy = Arc::new(LazyEphemeris::new(FixedEphemeris::new()));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let lazy = Arc::clone(&lazy);
            handles.push(tokio::spawn(async move {
                lazy.body_longitudes(2_451_545.0).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(lazy.inner().init_calls(), 1);
    }

    #[tokio::test]
    async fn lazy_wrapper_init_is_idempotent() {
        let lazy = LazyEphemeris::new(FixedEphemeris::new());
        lazy.init().await.unwrap();
        lazy.init().await.unwrap();
        lazy.angles(0.0, 0.0, 0.0, HouseSystem::WholeSign)
            .await
            .unwrap();
        assert_eq!(lazy.inner().init_calls(), 1);
    }
}
