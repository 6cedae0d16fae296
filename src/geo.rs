//! Great-circle math and the straight-line travel estimator.
//!
//! [`HaversineEstimator`] is the fallback when a road-network estimator is
//! unavailable. It ignores roads but never fails.

use crate::error::CollaboratorError;
use crate::traits::{TravelEstimate, TravelEstimator};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 30.0;

/// Calculate haversine distance between two points in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Linear interpolation between two coordinates.
///
/// `fraction` is clamped to `0.0..=1.0`. Accurate enough for the city-scale
/// distances an itinerary spans.
pub fn interpolate(from: (f64, f64), to: (f64, f64), fraction: f64) -> (f64, f64) {
    let t = fraction.clamp(0.0, 1.0);
    (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
}

pub fn midpoint(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    interpolate(a, b, 0.5)
}

/// Convert distance in km to travel minutes at the given speed.
pub fn km_to_minutes(km: f64, speed_kmh: f64) -> f64 {
    if speed_kmh <= 0.0 {
        return 0.0;
    }
    km / speed_kmh * 60.0
}

/// Haversine-based travel estimator.
///
/// Multiplies straight-line distance by `road_factor` to approximate the
/// street network, then converts with an assumed speed.
#[derive(Debug, Clone)]
pub struct HaversineEstimator {
    /// Assumed average speed in km/h.
    pub speed_kmh: f64,
    /// Ratio of road distance to straight-line distance.
    pub road_factor: f64,
}

impl Default for HaversineEstimator {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            road_factor: 1.0,
        }
    }
}

impl HaversineEstimator {
    pub fn new(speed_kmh: f64, road_factor: f64) -> Self {
        Self {
            speed_kmh,
            road_factor,
        }
    }

    /// Slow, detour-padded estimate used when the real estimator fails.
    pub fn conservative() -> Self {
        Self::new(20.0, 1.3)
    }

    pub fn estimate_between(&self, from: (f64, f64), to: (f64, f64)) -> TravelEstimate {
        let distance_km = haversine_km(from, to) * self.road_factor;
        TravelEstimate {
            distance_km,
            duration_minutes: km_to_minutes(distance_km, self.speed_kmh),
            traffic_rate: 1.0,
        }
    }
}

impl TravelEstimator for HaversineEstimator {
    fn estimate(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        _at: i32,
    ) -> Result<TravelEstimate, CollaboratorError> {
        Ok(self.estimate_between(from, to))
    }
}
