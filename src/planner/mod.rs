//! Insertion of a flexible item into the working list.
//!
//! The planner proposes a concrete window per (gap, place), lets an
//! [`InsertionStrategy`] pick among the ranked options, commits the choice
//! and repairs any overlap by moving only the new item.

mod combination;
mod greedy;

pub use combination::CombinationInsertion;
pub use greedy::GreedyInsertion;

use std::fmt;

use tracing::debug;

use crate::config::{PlannerConfig, StrategyConfig, StrategyKind};
use crate::geo::haversine_km;
use crate::model::{CandidateOption, FlexibleRequest, Gap, ItineraryItem, UnplacedReason};

/// Hard limits every flexible placement must stay within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    /// "now": nothing starts earlier.
    pub floor: i32,
    /// End of day: nothing ends later.
    pub ceiling: i32,
}

/// How the committed window differs from the proposed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    None,
    Shifted,
    Compressed,
}

/// The free interval around the new item cannot hold even the minimum
/// viable duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoRoom;

#[derive(Debug, Clone)]
pub struct Placement {
    /// Position of the new item in the working list.
    pub index: usize,
    pub adjustment: Adjustment,
    pub option: CandidateOption,
}

#[derive(Debug, Clone)]
pub enum PlacementOutcome {
    Placed(Placement),
    Unplaced(UnplacedReason),
}

/// What a strategy may look at when choosing.
#[derive(Debug, Clone, Copy)]
pub struct PlacementContext<'a> {
    pub working: &'a [ItineraryItem],
    pub request: &'a FlexibleRequest,
    pub bounds: DayBounds,
    pub min_viable: i32,
}

/// Picks which of the ranked options to commit next.
pub trait InsertionStrategy: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// `options` are sorted best score first. Returns an index into it, or
    /// `None` when nothing is acceptable.
    fn choose(&self, ctx: &PlacementContext<'_>, options: &[CandidateOption]) -> Option<usize>;
}

pub fn strategy_for(config: &StrategyConfig) -> Box<dyn InsertionStrategy> {
    match config.kind {
        StrategyKind::Greedy => Box::new(GreedyInsertion::from_config(config)),
        StrategyKind::Combination => Box::new(CombinationInsertion::from_config(config)),
    }
}

#[derive(Debug)]
pub struct InsertionPlanner {
    bounds: DayBounds,
    buffer: i32,
    min_viable: i32,
    strategy: Box<dyn InsertionStrategy>,
}

impl InsertionPlanner {
    pub fn new(config: &PlannerConfig, bounds: DayBounds) -> Self {
        Self::with_strategy(config, bounds, strategy_for(&config.strategy))
    }

    pub fn with_strategy(
        config: &PlannerConfig,
        bounds: DayBounds,
        strategy: Box<dyn InsertionStrategy>,
    ) -> Self {
        Self {
            bounds,
            buffer: config.schedule.buffer_secs(),
            min_viable: config.schedule.min_viable_secs(),
            strategy,
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Window for an item of `duration` seconds inside `gap`.
    ///
    /// Between fixed anchors a travel buffer is kept on both sides; when the
    /// gap is too short for that the item is centred, and when it is shorter
    /// than the item the item shrinks to the minimum viable duration.
    /// Elsewhere the item starts at the gap start.
    pub fn propose_window(&self, gap: &Gap, duration: i32) -> (i32, i32) {
        if !gap.is_between_fixed() {
            return (gap.start_time, gap.start_time + duration);
        }

        let len = gap.duration_secs();
        if len >= duration.saturating_add(self.buffer.saturating_mul(2)) {
            let start = gap.start_time + self.buffer;
            return (start, start + duration);
        }

        let fitted = if len >= duration {
            duration
        } else {
            self.min_viable.min(len)
        };
        let start = gap.start_time + (len - fitted) / 2;
        (start, start + fitted)
    }

    /// Commits the strategy's choice, falling back through the remaining
    /// options when a commit cannot be repaired.
    pub fn place(
        &self,
        request: &FlexibleRequest,
        mut options: Vec<CandidateOption>,
        working: &mut Vec<ItineraryItem>,
    ) -> PlacementOutcome {
        if options.is_empty() {
            return PlacementOutcome::Unplaced(UnplacedReason::NoCandidates);
        }

        loop {
            let ctx = PlacementContext {
                working: working.as_slice(),
                request,
                bounds: self.bounds,
                min_viable: self.min_viable,
            };
            let Some(chosen) = self.strategy.choose(&ctx, &options) else {
                break;
            };

            let option = options.remove(chosen);
            match commit(request, &option, working, self.bounds, self.min_viable) {
                Ok((index, adjustment)) => {
                    return PlacementOutcome::Placed(Placement {
                        index,
                        adjustment,
                        option,
                    });
                }
                Err(NoRoom) => {
                    debug!(
                        event = "commit_rejected",
                        item = %request.id,
                        place = %option.place.id,
                        start = option.start_time,
                    );
                    if options.is_empty() {
                        break;
                    }
                }
            }
        }

        PlacementOutcome::Unplaced(UnplacedReason::NoRoom)
    }
}

/// Binds `request` to `option`, inserts it chronologically and repairs
/// overlap. On failure the working list is left unchanged.
pub fn commit(
    request: &FlexibleRequest,
    option: &CandidateOption,
    working: &mut Vec<ItineraryItem>,
    bounds: DayBounds,
    min_viable: i32,
) -> Result<(usize, Adjustment), NoRoom> {
    let item = request
        .clone()
        .bind(&option.place, option.start_time, option.end_time);
    let index = working.partition_point(|existing| existing.start_time <= item.start_time);
    working.insert(index, item);

    match resolve_overlap(working, index, bounds, min_viable) {
        Ok(adjustment) => Ok((index, adjustment)),
        Err(err) => {
            working.remove(index);
            Err(err)
        }
    }
}

/// Moves `items[index]` into the free interval between its neighbours
/// (and the day bounds). Neighbours are never touched; a fixed item is
/// never moved.
pub fn resolve_overlap(
    items: &mut [ItineraryItem],
    index: usize,
    bounds: DayBounds,
    min_viable: i32,
) -> Result<Adjustment, NoRoom> {
    let lower = match index.checked_sub(1) {
        Some(prev) => items[prev].end_time.max(bounds.floor),
        None => bounds.floor,
    };
    let upper = match items.get(index + 1) {
        Some(next) => next.start_time.min(bounds.ceiling),
        None => bounds.ceiling,
    };

    let item = &mut items[index];
    if item.start_time >= lower && item.end_time <= upper {
        return Ok(Adjustment::None);
    }
    if item.is_fixed() {
        return Err(NoRoom);
    }

    let room = upper - lower;
    let duration = item.duration_secs();
    if room >= duration {
        item.start_time = item.start_time.clamp(lower, upper - duration);
        item.end_time = item.start_time + duration;
        Ok(Adjustment::Shifted)
    } else if room >= min_viable {
        item.start_time = lower + (room - min_viable) / 2;
        item.end_time = item.start_time + min_viable;
        Ok(Adjustment::Compressed)
    } else {
        Err(NoRoom)
    }
}

/// Secondary score of an insertion point: how well the gap length fits the
/// required duration, and how little the place detours from the direct
/// anchor-to-anchor path.
pub fn slot_score(option: &CandidateOption, required: i32, config: &StrategyConfig) -> f64 {
    let available = option.gap.duration_secs().max(0) as f64;
    let required = required.max(0) as f64;
    let longest = available.max(required);
    let time_fit = if longest > 0.0 {
        available.min(required) / longest
    } else {
        0.0
    };

    config.time_fit_weight * time_fit + config.detour_weight * detour_score(option)
}

/// `direct / via`, capped at 1.0; 1.0 without both anchors.
pub fn detour_score(option: &CandidateOption) -> f64 {
    let (Some(prev), Some(next)) = (&option.gap.previous, &option.gap.next) else {
        return 1.0;
    };
    let place = option.place.coords();
    let direct = haversine_km(prev.coords(), next.coords());
    let via = haversine_km(prev.coords(), place) + haversine_km(place, next.coords());
    if via <= f64::EPSILON {
        return 1.0;
    }
    (direct / via).min(1.0)
}

/// Straight-line length of visiting the items in order.
pub fn route_length_km(items: &[ItineraryItem]) -> f64 {
    items
        .windows(2)
        .map(|pair| haversine_km(pair[0].coords(), pair[1].coords()))
        .sum()
}
