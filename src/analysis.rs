//! Per-item analysis attached to the result.

use serde::{Deserialize, Serialize};

use crate::traits::CandidatePlace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CrowdLevel {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAnalysis {
    /// Chosen place; `None` for fixed items.
    pub place: Option<CandidatePlace>,
    pub crowd_level: CrowdLevel,
    /// Composite candidate score of the chosen place.
    pub score: Option<f64>,
}

const FOOD: &[&str] = &["restaurant", "lunch", "dinner", "food", "meal", "brunch", "buffet"];
const GROCERY: &[&str] = &["grocery", "supermarket", "market", "store", "shop"];
const SIGHTS: &[&str] = &["museum", "gallery", "attraction", "park", "zoo", "landmark"];
const CAFE: &[&str] = &["cafe", "café", "coffee", "bakery"];

const HOUR: i32 = 3600;

// (from, to, level) in seconds from midnight.
const CAFE_PEAKS: &[(i32, i32, CrowdLevel)] = &[(8 * HOUR, 10 * HOUR, CrowdLevel::High)];
const FOOD_PEAKS: &[(i32, i32, CrowdLevel)] = &[
    (11 * HOUR + HOUR / 2, 13 * HOUR + HOUR / 2, CrowdLevel::High),
    (18 * HOUR, 20 * HOUR + HOUR / 2, CrowdLevel::High),
];
const GROCERY_PEAKS: &[(i32, i32, CrowdLevel)] = &[(17 * HOUR, 19 * HOUR, CrowdLevel::High)];
const SIGHT_PEAKS: &[(i32, i32, CrowdLevel)] = &[(11 * HOUR, 15 * HOUR, CrowdLevel::Moderate)];

fn peaks(category: &str) -> &'static [(i32, i32, CrowdLevel)] {
    let c = category.to_lowercase();
    let any_of = |words: &[&str]| words.iter().any(|w| c.contains(w));

    // Cafés first so "coffee shop" is not read as a shop.
    if any_of(CAFE) {
        CAFE_PEAKS
    } else if any_of(FOOD) {
        FOOD_PEAKS
    } else if any_of(GROCERY) {
        GROCERY_PEAKS
    } else if any_of(SIGHTS) {
        SIGHT_PEAKS
    } else {
        &[]
    }
}

/// Heuristic crowd estimate for a visit of `category` starting at `start`.
pub fn estimate_crowd_level(category: &str, start: i32) -> CrowdLevel {
    peaks(category)
        .iter()
        .filter(|(from, to, _)| start >= *from && start < *to)
        .map(|(_, _, level)| *level)
        .max()
        .unwrap_or(CrowdLevel::Low)
}
