//! Candidate scoring.
//!
//! The between-fixed preference lives here and only here: a flat bonus plus
//! a multiplier over the whole composite. Slot selection in the planner has
//! no between-fixed term.

use crate::config::ScoringWeights;
use crate::geo::{haversine_km, km_to_minutes};
use crate::model::{Gap, ItineraryItem};
use crate::traits::CandidatePlace;

/// Scores a (place, window, gap) triple. Pure and `Sync`.
#[derive(Debug, Clone)]
pub struct CandidateScorer {
    weights: ScoringWeights,
}

impl CandidateScorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Composite, non-negative score of placing `place` at `[start, end)` in `gap`.
    pub fn score(&self, place: &CandidatePlace, start: i32, end: i32, gap: &Gap) -> f64 {
        let w = &self.weights;
        let coords = place.coords();

        let mut score = w.rating_weight * place.rating.max(0.0);
        if let Some(prev) = &gap.previous {
            score += w.proximity_weight * self.inverse_distance(coords, prev.coords());
        }
        if let Some(next) = &gap.next {
            score += w.proximity_weight * self.inverse_distance(coords, next.coords());
        }
        score += w.time_efficiency_weight
            * self.time_efficiency(coords, start, end, gap.previous.as_ref(), gap.next.as_ref());

        if gap.is_between_fixed() {
            score += w.between_fixed_bonus;
            score *= w.between_fixed_multiplier;
        }

        score.max(0.0)
    }

    /// `min(K / (d + C), cap)` with `d` in kilometers.
    pub fn inverse_distance(&self, a: (f64, f64), b: (f64, f64)) -> f64 {
        let w = &self.weights;
        (w.inverse_distance_k / (haversine_km(a, b) + w.inverse_distance_offset_km))
            .min(w.inverse_distance_cap)
    }

    /// 1.0 when the wait on each side matches the travel time, falling
    /// towards 0 as the mismatch grows.
    pub fn time_efficiency(
        &self,
        coords: (f64, f64),
        start: i32,
        end: i32,
        previous: Option<&ItineraryItem>,
        next: Option<&ItineraryItem>,
    ) -> f64 {
        let speed = self.weights.travel_speed_kmh;
        let mut deviation_minutes = 0.0;

        if let Some(prev) = previous {
            let wait = (start - prev.end_time) as f64 / 60.0;
            let travel = km_to_minutes(haversine_km(prev.coords(), coords), speed);
            deviation_minutes += (wait - travel).abs();
        }
        if let Some(next) = next {
            let wait = (next.start_time - end) as f64 / 60.0;
            let travel = km_to_minutes(haversine_km(coords, next.coords()), speed);
            deviation_minutes += (wait - travel).abs();
        }

        1.0 / (1.0 + deviation_minutes / self.weights.idle_scale_minutes)
    }
}
