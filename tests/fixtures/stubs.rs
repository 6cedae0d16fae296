//! Request builders and deterministic stub collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use itinerary_planner::error::CollaboratorError;
use itinerary_planner::geo::haversine_km;
use itinerary_planner::model::{
    FixedItemRequest, FlexibleItemRequest, ItemKind, OptimizationRequest, OptimizationResult,
};
use itinerary_planner::traits::{CandidatePlace, PlaceSearch, TravelEstimate, TravelEstimator};

use super::las_vegas_places::Place;

pub fn hours(h: i32) -> i32 {
    h * 3600
}

pub fn minutes(m: i32) -> i32 {
    m * 60
}

// ============================================================================
// Request builders
// ============================================================================

pub fn fixed(id: &str, at: &Place, start: i32, end: i32) -> FixedItemRequest {
    FixedItemRequest {
        id: id.to_string(),
        name: id.to_string(),
        item_type: "appointment".to_string(),
        duration_minutes: (end - start) / 60,
        priority: 1,
        location_label: Some(at.name.to_string()),
        lat: at.lat,
        lng: at.lng,
        start_time: start,
        end_time: end,
    }
}

/// Builder for flexible requests with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestFlexible {
    id: String,
    category: String,
    duration_min: i32,
    priority: u8,
}

impl TestFlexible {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            category: "restaurant".to_string(),
            duration_min: 60,
            priority: 1,
        }
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn duration(mut self, minutes: i32) -> Self {
        self.duration_min = minutes;
        self
    }

    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn build(self) -> FlexibleItemRequest {
        FlexibleItemRequest {
            name: self.id.clone(),
            id: self.id,
            item_type: self.category,
            duration_minutes: self.duration_min,
            priority: self.priority,
        }
    }
}

pub fn request(fixed_items: Vec<FixedItemRequest>, flexible: Vec<TestFlexible>) -> OptimizationRequest {
    OptimizationRequest {
        fixed_items,
        flexible_items: flexible.into_iter().map(TestFlexible::build).collect(),
        now: None,
    }
}

// ============================================================================
// Stub collaborators
// ============================================================================

/// In-memory search provider: exact category match within the radius.
#[derive(Debug, Default)]
pub struct CatalogSearch {
    entries: Vec<(String, CandidatePlace)>,
    calls: AtomicUsize,
}

impl CatalogSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: &str, places: &[Place]) -> Self {
        for place in places {
            self.entries.push((category.to_string(), place.candidate()));
        }
        self
    }

    pub fn with_candidate(mut self, category: &str, candidate: CandidatePlace) -> Self {
        self.entries.push((category.to_string(), candidate));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PlaceSearch for CatalogSearch {
    fn search(
        &self,
        term: &str,
        near: (f64, f64),
        radius_meters: f64,
    ) -> Result<Vec<CandidatePlace>, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .entries
            .iter()
            .filter(|(category, place)| {
                category.eq_ignore_ascii_case(term)
                    && haversine_km(near, place.coords()) * 1000.0 <= radius_meters
            })
            .map(|(_, place)| place.clone())
            .collect())
    }
}

/// Always fails, like a provider outage.
pub struct FailingSearch;

impl PlaceSearch for FailingSearch {
    fn search(
        &self,
        _term: &str,
        _near: (f64, f64),
        _radius_meters: f64,
    ) -> Result<Vec<CandidatePlace>, CollaboratorError> {
        Err(CollaboratorError::Unavailable("provider down".to_string()))
    }
}

/// Answers correctly, but only after `delay`.
pub struct SlowSearch {
    pub inner: CatalogSearch,
    pub delay: Duration,
}

impl PlaceSearch for SlowSearch {
    fn search(
        &self,
        term: &str,
        near: (f64, f64),
        radius_meters: f64,
    ) -> Result<Vec<CandidatePlace>, CollaboratorError> {
        std::thread::sleep(self.delay);
        self.inner.search(term, near, radius_meters)
    }
}

/// Straight-line distance at 30 km/h with a fixed congestion rate.
pub struct StraightLineTravel;

impl TravelEstimator for StraightLineTravel {
    fn estimate(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        _at: i32,
    ) -> Result<TravelEstimate, CollaboratorError> {
        let distance_km = haversine_km(from, to);
        Ok(TravelEstimate {
            distance_km,
            duration_minutes: distance_km * 2.0,
            traffic_rate: 1.2,
        })
    }
}

pub struct FailingTravel;

impl TravelEstimator for FailingTravel {
    fn estimate(
        &self,
        _from: (f64, f64),
        _to: (f64, f64),
        _at: i32,
    ) -> Result<TravelEstimate, CollaboratorError> {
        Err(CollaboratorError::Unavailable("routing down".to_string()))
    }
}

// ============================================================================
// Assertions
// ============================================================================

/// No overlap between consecutive items; every fixed window unchanged.
pub fn assert_plan_invariants(result: &OptimizationResult, request: &OptimizationRequest) {
    for pair in result.ordered_items.windows(2) {
        assert!(
            pair[0].end_time <= pair[1].start_time,
            "'{}' ({}-{}) overlaps '{}' ({}-{})",
            pair[0].id,
            pair[0].start_time,
            pair[0].end_time,
            pair[1].id,
            pair[1].start_time,
            pair[1].end_time
        );
    }

    for input in &request.fixed_items {
        let item = result
            .ordered_items
            .iter()
            .find(|item| item.id == input.id)
            .unwrap_or_else(|| panic!("fixed item '{}' missing", input.id));
        assert_eq!(item.kind, ItemKind::Fixed);
        assert_eq!(item.start_time, input.start_time, "'{}' start moved", input.id);
        assert_eq!(item.end_time, input.end_time, "'{}' end moved", input.id);
    }
}
