//! Collaborator interfaces consumed by the planner.
//!
//! The engine never implements place search itself; provider fan-out,
//! deduplication and fallback generation live behind [`PlaceSearch`].
//! Travel estimation has two implementations in this crate: the OSRM
//! adapter and the straight-line fallback in [`crate::geo`].

use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;

/// A concrete real-world place returned by a search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePlace {
    pub id: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    /// Provider rating, usually 0.0..=5.0.
    pub rating: f64,
    /// `None` when the provider does not know opening status.
    pub is_open: Option<bool>,
}

impl CandidatePlace {
    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// Result of a single travel estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelEstimate {
    pub distance_km: f64,
    pub duration_minutes: f64,
    /// Congestion multiplier; 1.0 means free flow.
    pub traffic_rate: f64,
}

/// Searches candidate places for a term around a coordinate.
///
/// Implementations must be `Send + Sync`: the planner queries several gaps
/// concurrently, each from its own worker thread.
pub trait PlaceSearch: Send + Sync {
    fn search(
        &self,
        term: &str,
        near: (f64, f64),
        radius_meters: f64,
    ) -> Result<Vec<CandidatePlace>, CollaboratorError>;
}

/// Estimates travel between two coordinates departing at `at`
/// (seconds from midnight).
pub trait TravelEstimator {
    fn estimate(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        at: i32,
    ) -> Result<TravelEstimate, CollaboratorError>;
}
