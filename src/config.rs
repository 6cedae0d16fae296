//! Planner configuration.
//!
//! Loaded from TOML; every section is optional and falls back to defaults.
//!
//! ```
//! use itinerary_planner::config::{PlannerConfig, StrategyKind};
//!
//! let config = PlannerConfig::from_toml_str(r#"
//!     [schedule]
//!     day_end = "21:00:00"
//!     buffer_minutes = 10
//!
//!     [strategy]
//!     kind = "combination"
//! "#).unwrap();
//!
//! assert_eq!(config.schedule.day_end_secs(), 21 * 3600);
//! assert_eq!(config.strategy.kind, StrategyKind::Combination);
//! ```

use std::path::Path;
use std::time::Duration;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::osrm::OsrmConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub schedule: ScheduleConfig,
    pub scoring: ScoringWeights,
    pub search: SearchConfig,
    pub strategy: StrategyConfig,
    /// Road-network travel estimator; straight-line estimates are used when absent.
    pub osrm: Option<OsrmConfig>,
}

impl PlannerConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let schedule = &self.schedule;
        if schedule.day_end <= schedule.day_start {
            return Err(ConfigError::Invalid(format!(
                "day_end {} must be after day_start {}",
                schedule.day_end, schedule.day_start
            )));
        }
        if schedule.min_slot_minutes <= 0 || schedule.min_viable_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "min_slot_minutes and min_viable_minutes must be positive".to_string(),
            ));
        }
        if schedule.buffer_minutes < 0 {
            return Err(ConfigError::Invalid("buffer_minutes must not be negative".to_string()));
        }
        let longest = [
            schedule.min_slot_minutes,
            schedule.min_viable_minutes,
            schedule.buffer_minutes,
        ]
        .into_iter()
        .max()
        .unwrap_or_default();
        if longest > 24 * 60 {
            return Err(ConfigError::Invalid(
                "schedule minutes must not exceed a day".to_string(),
            ));
        }

        let s = &self.scoring;
        let weights = [
            ("rating_weight", s.rating_weight),
            ("proximity_weight", s.proximity_weight),
            ("time_efficiency_weight", s.time_efficiency_weight),
            ("between_fixed_bonus", s.between_fixed_bonus),
            ("between_fixed_multiplier", s.between_fixed_multiplier),
            ("time_fit_weight", self.strategy.time_fit_weight),
            ("detour_weight", self.strategy.detour_weight),
            ("detour_penalty", self.strategy.detour_penalty),
            ("tie_tolerance", self.strategy.tie_tolerance),
        ];
        if let Some((name, value)) = weights.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(ConfigError::Invalid(format!("{name} must be non-negative, got {value}")));
        }
        if s.inverse_distance_offset_km <= 0.0 || s.travel_speed_kmh <= 0.0 || s.idle_scale_minutes <= 0.0 {
            return Err(ConfigError::Invalid(
                "inverse_distance_offset_km, travel_speed_kmh and idle_scale_minutes must be positive"
                    .to_string(),
            ));
        }
        if self.strategy.per_gap == 0 || self.strategy.max_combinations == 0 {
            return Err(ConfigError::Invalid(
                "per_gap and max_combinations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Day bounds and slot sizes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Default "now" when the request does not carry one.
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    /// Gaps shorter than this are discarded.
    pub min_slot_minutes: i32,
    /// Floor a flexible item may be compressed to under tight packing.
    pub min_viable_minutes: i32,
    /// Travel buffer kept on both sides inside between-fixed gaps.
    pub buffer_minutes: i32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            day_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            day_end: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            min_slot_minutes: 30,
            min_viable_minutes: 30,
            buffer_minutes: 15,
        }
    }
}

impl ScheduleConfig {
    pub fn day_start_secs(&self) -> i32 {
        self.day_start.num_seconds_from_midnight() as i32
    }

    pub fn day_end_secs(&self) -> i32 {
        self.day_end.num_seconds_from_midnight() as i32
    }

    pub fn min_slot_secs(&self) -> i32 {
        self.min_slot_minutes.saturating_mul(60)
    }

    pub fn min_viable_secs(&self) -> i32 {
        self.min_viable_minutes.saturating_mul(60)
    }

    pub fn buffer_secs(&self) -> i32 {
        self.buffer_minutes.saturating_mul(60)
    }
}

/// Candidate scoring weights and constants.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub rating_weight: f64,
    pub proximity_weight: f64,
    pub time_efficiency_weight: f64,
    /// Flat bonus added when both anchors are fixed.
    pub between_fixed_bonus: f64,
    /// Applied to the whole composite score of between-fixed placements.
    pub between_fixed_multiplier: f64,
    pub inverse_distance_k: f64,
    pub inverse_distance_offset_km: f64,
    pub inverse_distance_cap: f64,
    /// Speed used for the scorer's own travel-time estimate.
    pub travel_speed_kmh: f64,
    /// Minutes of idle deviation at which time efficiency halves.
    pub idle_scale_minutes: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            rating_weight: 1.0,
            proximity_weight: 2.0,
            time_efficiency_weight: 1.5,
            between_fixed_bonus: 2.0,
            between_fixed_multiplier: 5.0,
            inverse_distance_k: 1.0,
            inverse_distance_offset_km: 0.1,
            inverse_distance_cap: 5.0,
            travel_speed_kmh: 30.0,
            idle_scale_minutes: 30.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub radius_meters: f64,
    /// Search calls slower than this count as "no candidates".
    pub timeout_ms: u64,
    /// Overall planning deadline; items not reached in time stay unplaced.
    pub request_timeout_ms: Option<u64>,
    pub alternatives_per_item: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_meters: 2000.0,
            timeout_ms: 5000,
            request_timeout_ms: None,
            alternatives_per_item: 3,
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

/// Which insertion strategy a deployment runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Greedy,
    Combination,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub kind: StrategyKind,
    /// Relative score distance within which between-fixed options tie.
    pub tie_tolerance: f64,
    pub time_fit_weight: f64,
    pub detour_weight: f64,
    /// Combination strategy: options kept per gap.
    pub per_gap: usize,
    /// Combination strategy: total simulated commits.
    pub max_combinations: usize,
    /// Combination strategy: score lost per added route kilometer.
    pub detour_penalty: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            kind: StrategyKind::Greedy,
            tie_tolerance: 0.05,
            time_fit_weight: 0.6,
            detour_weight: 0.4,
            per_gap: 3,
            max_combinations: 12,
            detour_penalty: 0.5,
        }
    }
}
