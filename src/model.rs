//! Itinerary data model.
//!
//! Times are seconds from midnight of the planned day; coordinates are
//! `(lat, lng)`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::ItemAnalysis;
use crate::traits::CandidatePlace;

/// Whether an item has an immovable window or is placed by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemKind {
    Fixed,
    Flexible,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
    /// Provider id of the bound place, when the location came from search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

impl Location {
    pub fn new(label: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            label: label.into(),
            place_id: None,
        }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// A scheduled entry of the working list. Always bound to a place and time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryItem {
    pub id: String,
    pub name: String,
    /// Name of the chosen place for flexible items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub kind: ItemKind,
    pub location: Location,
    pub start_time: i32,
    pub end_time: i32,
    /// 1..=5, 1 is placed first.
    pub priority: u8,
    pub estimated_duration_minutes: i32,
    pub category: String,
}

impl ItineraryItem {
    pub fn is_fixed(&self) -> bool {
        self.kind == ItemKind::Fixed
    }

    pub fn duration_secs(&self) -> i32 {
        self.end_time.saturating_sub(self.start_time)
    }

    pub fn coords(&self) -> (f64, f64) {
        self.location.coords()
    }
}

impl From<FixedItemRequest> for ItineraryItem {
    fn from(req: FixedItemRequest) -> Self {
        let duration = if req.duration_minutes > 0 {
            req.duration_minutes
        } else {
            req.end_time.saturating_sub(req.start_time) / 60
        };
        let label = req.location_label.unwrap_or_else(|| req.name.clone());

        Self {
            id: req.id,
            name: req.name,
            display_name: None,
            kind: ItemKind::Fixed,
            location: Location::new(label, req.lat, req.lng),
            start_time: req.start_time,
            end_time: req.end_time,
            priority: req.priority,
            estimated_duration_minutes: duration,
            category: req.item_type,
        }
    }
}

/// A flexible item that has not been bound to a place or time yet.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexibleRequest {
    pub id: String,
    pub name: String,
    pub category: String,
    pub duration_minutes: i32,
    pub priority: u8,
}

impl FlexibleRequest {
    /// Term handed to place search: the category, or the name when empty.
    pub fn search_term(&self) -> &str {
        if self.category.trim().is_empty() {
            &self.name
        } else {
            &self.category
        }
    }

    pub fn duration_secs(&self) -> i32 {
        self.duration_minutes.saturating_mul(60)
    }

    /// Bind the request to a place and window, producing a working-list item.
    pub fn bind(self, place: &CandidatePlace, start_time: i32, end_time: i32) -> ItineraryItem {
        ItineraryItem {
            id: self.id,
            name: self.name,
            display_name: Some(place.name.clone()),
            kind: ItemKind::Flexible,
            location: Location {
                lat: place.lat,
                lng: place.lng,
                label: place.address.clone(),
                place_id: Some(place.id.clone()),
            },
            start_time,
            end_time,
            priority: self.priority,
            estimated_duration_minutes: self.duration_minutes,
            category: self.category,
        }
    }
}

impl From<FlexibleItemRequest> for FlexibleRequest {
    fn from(req: FlexibleItemRequest) -> Self {
        Self {
            id: req.id,
            name: req.name,
            category: req.item_type,
            duration_minutes: req.duration_minutes,
            priority: req.priority,
        }
    }
}

/// A free interval of the working list. Recomputed after every placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Gap {
    pub start_time: i32,
    pub end_time: i32,
    pub previous: Option<ItineraryItem>,
    pub next: Option<ItineraryItem>,
}

impl Gap {
    pub fn duration_secs(&self) -> i32 {
        self.end_time.saturating_sub(self.start_time)
    }

    /// Both anchors present and both fixed.
    pub fn is_between_fixed(&self) -> bool {
        matches!(
            (&self.previous, &self.next),
            (Some(prev), Some(next)) if prev.is_fixed() && next.is_fixed()
        )
    }
}

/// A scored (gap, place, window) proposal for one flexible item.
#[derive(Debug, Clone)]
pub struct CandidateOption {
    pub place: CandidatePlace,
    pub start_time: i32,
    pub end_time: i32,
    pub gap: Gap,
    /// Position of the gap in the tier it was searched in.
    pub gap_index: usize,
    pub between_fixed: bool,
    pub score: f64,
}

// ============================================================================
// Request / response shapes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedItemRequest {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub duration_minutes: i32,
    pub priority: u8,
    #[serde(default)]
    pub location_label: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub start_time: i32,
    pub end_time: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexibleItemRequest {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub item_type: String,
    pub duration_minutes: i32,
    pub priority: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRequest {
    pub fixed_items: Vec<FixedItemRequest>,
    #[serde(default)]
    pub flexible_items: Vec<FlexibleItemRequest>,
    /// Planning start (seconds from midnight). Defaults to the configured day start.
    #[serde(default)]
    pub now: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSegment {
    pub from: String,
    pub to: String,
    pub distance_km: f64,
    pub estimated_time_minutes: f64,
    pub traffic_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_distance_km: f64,
    pub total_time_minutes: f64,
    pub success_rate: f64,
    pub optimization_reasons: Vec<String>,
}

/// Why a flexible item was left out of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnplacedReason {
    /// No gap produced a positively scored candidate.
    NoCandidates,
    /// Candidates existed but none could be committed without overlap.
    NoRoom,
    /// The request deadline passed before the item was planned.
    DeadlineExceeded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnplacedItem {
    pub item_id: String,
    pub reason: UnplacedReason,
}

/// A non-selected option the caller may use to override a placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeOption {
    pub place: CandidatePlace,
    pub start_time: i32,
    pub end_time: i32,
    pub score: f64,
}

impl From<&CandidateOption> for AlternativeOption {
    fn from(option: &CandidateOption) -> Self {
        Self {
            place: option.place.clone(),
            start_time: option.start_time,
            end_time: option.end_time,
            score: option.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    /// Final working list, sorted by start time.
    pub ordered_items: Vec<ItineraryItem>,
    pub route_segments: Vec<RouteSegment>,
    pub metrics: Metrics,
    pub unplaced_item_ids: Vec<String>,
    pub unplaced: Vec<UnplacedItem>,
    /// Keyed by item name.
    pub item_analysis: BTreeMap<String, ItemAnalysis>,
    /// Keyed by item id.
    pub alternatives: BTreeMap<String, Vec<AlternativeOption>>,
}
