//! Itinerary optimization orchestrator.
//!
//! Drives one request through Validating → Planning → Aggregating → Done.
//! Flexible items are planned strictly one after another in priority
//! order; each sees the gaps left by the items placed before it.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use chrono::NaiveTime;
use tracing::{debug, error, info, warn};

use crate::analysis::{estimate_crowd_level, ItemAnalysis};
use crate::config::{PlannerConfig, SearchConfig};
use crate::error::{CollaboratorError, PlanError};
use crate::gaps::{partition_between_fixed, GapFinder};
use crate::geo::{haversine_km, midpoint, HaversineEstimator};
use crate::model::{
    AlternativeOption, CandidateOption, FlexibleRequest, Gap, ItineraryItem, Metrics,
    OptimizationRequest, OptimizationResult, RouteSegment, UnplacedItem, UnplacedReason,
};
use crate::planner::{Adjustment, DayBounds, InsertionPlanner, PlacementOutcome};
use crate::scoring::CandidateScorer;
use crate::traits::{CandidatePlace, PlaceSearch, TravelEstimator};

/// Lifecycle of a single optimization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validating,
    Planning,
    Aggregating,
    Done,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Validating => "validating",
            Phase::Planning => "planning",
            Phase::Aggregating => "aggregating",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Plans a day: merges the request's flexible items into its fixed ones.
///
/// Only invalid input and broken internal invariants are errors. Items
/// that cannot be placed, and collaborator failures, are reported in the
/// result.
///
/// `search` is shared with worker threads so a slow provider can be
/// abandoned after `search.timeout_ms`.
pub fn optimize<S, T>(
    request: &OptimizationRequest,
    search: &Arc<S>,
    travel: &T,
    config: &PlannerConfig,
) -> Result<OptimizationResult, PlanError>
where
    S: PlaceSearch + 'static,
    T: TravelEstimator + ?Sized,
{
    let started = Instant::now();

    info!(
        event = "phase_start",
        phase = %Phase::Validating,
        fixed = request.fixed_items.len(),
        flexible = request.flexible_items.len(),
    );
    let Validated {
        working,
        pending,
        now,
    } = validate(request, config).inspect_err(|err| {
        warn!(event = "phase_end", phase = %Phase::Failed, error = %err);
    })?;

    let original_fixed = working.clone();
    let bounds = DayBounds {
        floor: now,
        ceiling: config.schedule.day_end_secs(),
    };
    let mut run = Run {
        config,
        bounds,
        gap_finder: GapFinder::from_schedule(&config.schedule, now),
        scorer: CandidateScorer::new(config.scoring.clone()),
        planner: InsertionPlanner::new(config, bounds),
        working,
        reasons: Vec::new(),
        unplaced: Vec::new(),
        analysis: BTreeMap::new(),
        alternatives: BTreeMap::new(),
    };

    info!(
        event = "phase_start",
        phase = %Phase::Planning,
        strategy = run.planner.strategy_name(),
        now = %clock(now),
    );
    let requested = pending.len();
    let deadline = config.search.request_timeout();
    for item in &pending {
        if deadline.is_some_and(|limit| started.elapsed() >= limit) {
            run.mark_unplaced(item, UnplacedReason::DeadlineExceeded);
            continue;
        }
        run.plan_item(item, search);
    }
    let placed = requested - run.unplaced.len();
    info!(
        event = "phase_end",
        phase = %Phase::Planning,
        placed = placed,
        unplaced = run.unplaced.len(),
        duration_ms = started.elapsed().as_millis() as u64,
    );

    info!(event = "phase_start", phase = %Phase::Aggregating);
    if let Err(message) = verify_invariants(&run.working, &original_fixed, bounds) {
        error!(event = "phase_end", phase = %Phase::Failed, error = %message);
        return Err(PlanError::OptimizationFailure {
            phase: Phase::Aggregating,
            message,
        });
    }
    let result = run.finish(travel, requested);

    info!(
        event = "phase_end",
        phase = %Phase::Done,
        success_rate = result.metrics.success_rate,
        total_distance_km = result.metrics.total_distance_km,
        duration_ms = started.elapsed().as_millis() as u64,
    );
    Ok(result)
}

const DAY_SECS: i32 = 24 * 3600;

struct Validated {
    /// Fixed items sorted by start time.
    working: Vec<ItineraryItem>,
    /// Flexible requests in planning (priority) order.
    pending: Vec<FlexibleRequest>,
    now: i32,
}

fn validate(request: &OptimizationRequest, config: &PlannerConfig) -> Result<Validated, PlanError> {
    if request.fixed_items.is_empty() {
        return Err(PlanError::InvalidInput(
            "at least one fixed item is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let ids = request
        .fixed_items
        .iter()
        .map(|item| (&item.id, item.priority))
        .chain(request.flexible_items.iter().map(|item| (&item.id, item.priority)));
    for (id, priority) in ids {
        if id.trim().is_empty() {
            return Err(PlanError::InvalidInput("item ids must not be empty".to_string()));
        }
        if !seen.insert(id.as_str()) {
            return Err(PlanError::InvalidInput(format!("duplicate item id '{id}'")));
        }
        if !(1..=5).contains(&priority) {
            return Err(PlanError::InvalidInput(format!(
                "item '{id}' has priority {priority}, expected 1..=5"
            )));
        }
    }

    for item in &request.fixed_items {
        if item.end_time < item.start_time {
            return Err(PlanError::InvalidInput(format!(
                "fixed item '{}' ends before it starts",
                item.id
            )));
        }
        if !(0..=DAY_SECS).contains(&item.start_time) || !(0..=DAY_SECS).contains(&item.end_time) {
            return Err(PlanError::InvalidInput(format!(
                "fixed item '{}' lies outside the day",
                item.id
            )));
        }
    }
    for item in &request.flexible_items {
        if item.duration_minutes <= 0 || item.duration_minutes > DAY_SECS / 60 {
            return Err(PlanError::InvalidInput(format!(
                "flexible item '{}' needs a duration between 1 and {} minutes",
                item.id,
                DAY_SECS / 60
            )));
        }
    }
    if let Some(now) = request.now.filter(|now| !(0..=DAY_SECS).contains(now)) {
        return Err(PlanError::InvalidInput(format!("now {now} lies outside the day")));
    }

    let mut working: Vec<ItineraryItem> = request
        .fixed_items
        .iter()
        .cloned()
        .map(ItineraryItem::from)
        .collect();
    working.sort_by_key(|item| (item.start_time, item.end_time));
    if let Some(pair) = working.windows(2).find(|pair| pair[0].end_time > pair[1].start_time) {
        return Err(PlanError::InvalidInput(format!(
            "fixed items '{}' and '{}' overlap",
            pair[0].id, pair[1].id
        )));
    }

    let mut pending: Vec<FlexibleRequest> = request
        .flexible_items
        .iter()
        .cloned()
        .map(FlexibleRequest::from)
        .collect();
    // Stable: equal priorities keep request order.
    pending.sort_by_key(|item| item.priority);

    Ok(Validated {
        working,
        pending,
        now: request.now.unwrap_or_else(|| config.schedule.day_start_secs()),
    })
}

/// Mutable state of one request.
struct Run<'a> {
    config: &'a PlannerConfig,
    bounds: DayBounds,
    gap_finder: GapFinder,
    scorer: CandidateScorer,
    planner: InsertionPlanner,
    working: Vec<ItineraryItem>,
    reasons: Vec<String>,
    unplaced: Vec<UnplacedItem>,
    analysis: BTreeMap<String, ItemAnalysis>,
    alternatives: BTreeMap<String, Vec<AlternativeOption>>,
}

impl Run<'_> {
    fn plan_item<S: PlaceSearch + 'static>(&mut self, request: &FlexibleRequest, search: &Arc<S>) {
        let duration = request.duration_secs();
        let mut gaps = self.gap_finder.find(&self.working);
        // Shrinking is for tight days only: if any gap holds the full
        // duration, shorter gaps are not offered.
        if gaps.iter().any(|gap| gap.duration_secs() >= duration) {
            gaps.retain(|gap| gap.duration_secs() >= duration);
        }
        let (between, other) = partition_between_fixed(gaps);
        let mut saw_candidates = false;

        for gaps in [between, other] {
            if gaps.is_empty() {
                continue;
            }
            let options = self.evaluate(request, &gaps, search);
            if options.is_empty() {
                continue;
            }
            saw_candidates = true;

            match self.planner.place(request, options.clone(), &mut self.working) {
                PlacementOutcome::Placed(placement) => {
                    let item = &self.working[placement.index];
                    info!(
                        event = "item_placed",
                        item = %item.id,
                        place = %placement.option.place.name,
                        start = %clock(item.start_time),
                        end = %clock(item.end_time),
                        score = placement.option.score,
                        between_fixed = placement.option.between_fixed,
                    );

                    let mut reason = format!(
                        "Placed '{}' at {} {}-{} {}",
                        item.name,
                        placement.option.place.name,
                        clock(item.start_time),
                        clock(item.end_time),
                        if placement.option.between_fixed {
                            "between fixed commitments"
                        } else {
                            "outside fixed commitments"
                        },
                    );
                    if placement.adjustment == Adjustment::Shifted {
                        reason.push_str(", shifted to avoid overlap");
                    }
                    // Either the proposed window or overlap repair may have shrunk it.
                    if item.duration_secs() < duration {
                        reason.push_str(&format!(
                            ", compressed to {} min",
                            item.duration_secs() / 60
                        ));
                    }
                    self.reasons.push(reason);

                    self.analysis.insert(
                        item.name.clone(),
                        ItemAnalysis {
                            place: Some(placement.option.place.clone()),
                            crowd_level: estimate_crowd_level(&item.category, item.start_time),
                            score: Some(placement.option.score),
                        },
                    );
                    self.alternatives.insert(
                        item.id.clone(),
                        alternatives(
                            &options,
                            &placement.option.place.id,
                            self.config.search.alternatives_per_item,
                        ),
                    );
                    return;
                }
                PlacementOutcome::Unplaced(reason) => {
                    debug!(event = "tier_exhausted", item = %request.id, reason = ?reason);
                }
            }
        }

        let reason = if saw_candidates {
            UnplacedReason::NoRoom
        } else {
            UnplacedReason::NoCandidates
        };
        self.mark_unplaced(request, reason);
    }

    /// Searches all gaps of one tier concurrently and returns the scored
    /// options, best first.
    fn evaluate<S: PlaceSearch + 'static>(
        &mut self,
        request: &FlexibleRequest,
        gaps: &[Gap],
        search: &Arc<S>,
    ) -> Vec<CandidateOption> {
        let term = request.search_term();
        let searches = search_gaps(search, term, gaps, &self.config.search);

        let used: HashSet<&str> = self
            .working
            .iter()
            .filter_map(|item| item.location.place_id.as_deref())
            .collect();
        let duration = request.duration_secs();
        let mut options = Vec::new();
        let mut failures = Vec::new();

        for (gap_index, (gap, result)) in gaps.iter().zip(searches).enumerate() {
            let places = match result {
                Ok(places) => places,
                Err(err) => {
                    warn!(
                        event = "search_failed",
                        item = %request.id,
                        gap_start = %clock(gap.start_time),
                        gap_end = %clock(gap.end_time),
                        error = %err,
                    );
                    failures.push(format!(
                        "Search for '{}' in {}-{} failed ({}); treated as no candidates",
                        request.name,
                        clock(gap.start_time),
                        clock(gap.end_time),
                        err
                    ));
                    continue;
                }
            };
            debug!(
                event = "gap_candidates",
                item = %request.id,
                gap_start = %clock(gap.start_time),
                count = places.len(),
            );

            let mut seen_in_gap = HashSet::new();
            let (start, end) = self.planner.propose_window(gap, duration);
            for place in places {
                if place.is_open == Some(false)
                    || used.contains(place.id.as_str())
                    || !seen_in_gap.insert(place.id.clone())
                {
                    continue;
                }
                let score = self.scorer.score(&place, start, end, gap);
                if score <= 0.0 {
                    continue;
                }
                options.push(CandidateOption {
                    place,
                    start_time: start,
                    end_time: end,
                    gap: gap.clone(),
                    gap_index,
                    between_fixed: gap.is_between_fixed(),
                    score,
                });
            }
        }
        self.reasons.extend(failures);

        options.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.gap_index.cmp(&b.gap_index))
                .then_with(|| a.place.id.cmp(&b.place.id))
        });
        options
    }

    fn mark_unplaced(&mut self, request: &FlexibleRequest, reason: UnplacedReason) {
        info!(event = "item_unplaced", item = %request.id, reason = ?reason);
        let why = match reason {
            UnplacedReason::NoCandidates => "no candidate place fits any free gap",
            UnplacedReason::NoRoom => "candidates found but no gap had room left",
            UnplacedReason::DeadlineExceeded => "planning deadline exceeded",
        };
        self.reasons
            .push(format!("Could not place '{}': {}", request.name, why));
        self.unplaced.push(UnplacedItem {
            item_id: request.id.clone(),
            reason,
        });
    }

    fn finish<T: TravelEstimator + ?Sized>(mut self, travel: &T, requested: usize) -> OptimizationResult {
        self.working.sort_by_key(|item| (item.start_time, item.end_time));

        let fallback = HaversineEstimator::conservative();
        let mut segments = Vec::with_capacity(self.working.len().saturating_sub(1));
        for pair in self.working.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let estimate = travel
                .estimate(from.coords(), to.coords(), from.end_time)
                .unwrap_or_else(|err| {
                    warn!(
                        event = "travel_estimate_failed",
                        from = %from.id,
                        to = %to.id,
                        error = %err,
                    );
                    self.reasons.push(format!(
                        "Travel estimate {} -> {} unavailable ({}); used straight-line estimate",
                        from.name, to.name, err
                    ));
                    fallback.estimate_between(from.coords(), to.coords())
                });
            segments.push(RouteSegment {
                from: from.name.clone(),
                to: to.name.clone(),
                distance_km: estimate.distance_km,
                estimated_time_minutes: estimate.duration_minutes,
                traffic_rate: estimate.traffic_rate,
            });
        }

        for item in &self.working {
            self.analysis
                .entry(item.name.clone())
                .or_insert_with(|| ItemAnalysis {
                    place: None,
                    crowd_level: estimate_crowd_level(&item.category, item.start_time),
                    score: None,
                });
        }

        let placed = requested - self.unplaced.len();
        let success_rate = if requested == 0 {
            1.0
        } else {
            placed as f64 / requested as f64
        };

        OptimizationResult {
            metrics: Metrics {
                total_distance_km: segments.iter().map(|s| s.distance_km).sum(),
                total_time_minutes: segments.iter().map(|s| s.estimated_time_minutes).sum(),
                success_rate,
                optimization_reasons: self.reasons,
            },
            route_segments: segments,
            ordered_items: self.working,
            unplaced_item_ids: self.unplaced.iter().map(|u| u.item_id.clone()).collect(),
            unplaced: self.unplaced,
            item_analysis: self.analysis,
            alternatives: self.alternatives,
        }
    }
}

/// One search per gap, each on its own worker; results keep gap order.
///
/// All searches share one deadline of `search.timeout_ms`. A worker that
/// has not answered by then is abandoned and its gap counts as timed out.
fn search_gaps<S: PlaceSearch + 'static>(
    search: &Arc<S>,
    term: &str,
    gaps: &[Gap],
    config: &SearchConfig,
) -> Vec<Result<Vec<CandidatePlace>, CollaboratorError>> {
    let timeout = config.timeout();
    let pending: Vec<Option<Result<mpsc::Receiver<SearchResult>, CollaboratorError>>> = gaps
        .iter()
        .map(|gap| {
            let (near, radius) = search_area(gap, config.radius_meters)?;
            Some(spawn_search(Arc::clone(search), term.to_string(), near, radius))
        })
        .collect();

    let deadline = Instant::now() + timeout;
    pending
        .into_iter()
        .map(|worker| match worker {
            None => Ok(Vec::new()),
            Some(Err(err)) => Err(err),
            Some(Ok(rx)) => match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok(result) => result,
                Err(RecvTimeoutError::Timeout) => Err(CollaboratorError::Timeout(timeout)),
                Err(RecvTimeoutError::Disconnected) => Err(CollaboratorError::Unavailable(
                    "search worker stopped without answering".to_string(),
                )),
            },
        })
        .collect()
}

type SearchResult = Result<Vec<CandidatePlace>, CollaboratorError>;

fn spawn_search<S: PlaceSearch + 'static>(
    search: Arc<S>,
    term: String,
    near: (f64, f64),
    radius: f64,
) -> Result<mpsc::Receiver<SearchResult>, CollaboratorError> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("place-search".to_string())
        .spawn(move || {
            // Fails only when the caller stopped waiting.
            let _ = tx.send(search.search(&term, near, radius));
        })
        .map_err(|err| CollaboratorError::Unavailable(format!("cannot start search worker: {err}")))?;
    Ok(rx)
}

/// Centre and radius (meters) to search for a gap.
fn search_area(gap: &Gap, base_radius: f64) -> Option<((f64, f64), f64)> {
    match (&gap.previous, &gap.next) {
        (Some(prev), Some(next)) => {
            let half_span_m = haversine_km(prev.coords(), next.coords()) * 500.0;
            Some((midpoint(prev.coords(), next.coords()), base_radius.max(half_span_m)))
        }
        (Some(anchor), None) | (None, Some(anchor)) => Some((anchor.coords(), base_radius)),
        (None, None) => None,
    }
}

fn alternatives(options: &[CandidateOption], chosen: &str, limit: usize) -> Vec<AlternativeOption> {
    let mut seen = HashSet::new();
    seen.insert(chosen);
    options
        .iter()
        .filter(|option| seen.insert(option.place.id.as_str()))
        .take(limit)
        .map(AlternativeOption::from)
        .collect()
}

fn verify_invariants(
    working: &[ItineraryItem],
    original_fixed: &[ItineraryItem],
    bounds: DayBounds,
) -> Result<(), String> {
    for pair in working.windows(2) {
        if pair[0].end_time > pair[1].start_time {
            return Err(format!("items '{}' and '{}' overlap", pair[0].id, pair[1].id));
        }
    }
    for fixed in original_fixed {
        let found = working.iter().find(|item| item.id == fixed.id);
        match found {
            Some(item) if item.start_time == fixed.start_time && item.end_time == fixed.end_time => {}
            Some(_) => return Err(format!("fixed item '{}' was moved", fixed.id)),
            None => return Err(format!("fixed item '{}' was dropped", fixed.id)),
        }
    }
    for item in working.iter().filter(|item| !item.is_fixed()) {
        if item.start_time < bounds.floor
            || item.end_time > bounds.ceiling
            || item.end_time <= item.start_time
        {
            return Err(format!("flexible item '{}' is outside the day", item.id));
        }
    }
    Ok(())
}

/// "HH:MM" for seconds from midnight.
fn clock(secs: i32) -> String {
    u32::try_from(secs)
        .ok()
        .and_then(|s| NaiveTime::from_num_seconds_from_midnight_opt(s, 0))
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| format!("{secs}s"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FixedItemRequest, FlexibleItemRequest, ItemKind, Location};

    fn fixed_req(id: &str, start: i32, end: i32) -> FixedItemRequest {
        FixedItemRequest {
            id: id.to_string(),
            name: id.to_string(),
            item_type: "meeting".to_string(),
            duration_minutes: 0,
            priority: 1,
            location_label: None,
            lat: 36.1126,
            lng: -115.1767,
            start_time: start,
            end_time: end,
        }
    }

    fn flexible_req(id: &str, priority: u8) -> FlexibleItemRequest {
        FlexibleItemRequest {
            id: id.to_string(),
            name: id.to_string(),
            item_type: "cafe".to_string(),
            duration_minutes: 30,
            priority,
        }
    }

    #[test]
    fn test_validate_sorts_and_orders_by_priority() {
        let request = OptimizationRequest {
            fixed_items: vec![fixed_req("late", 50_000, 54_000), fixed_req("early", 32_400, 36_000)],
            flexible_items: vec![flexible_req("second", 3), flexible_req("first", 1), flexible_req("tie", 3)],
            now: None,
        };
        let validated = validate(&request, &PlannerConfig::default()).unwrap();
        assert_eq!(validated.working[0].id, "early");
        let order: Vec<&str> = validated.pending.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "tie"]);
        assert_eq!(validated.now, 8 * 3600);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let config = PlannerConfig::default();
        let cases = vec![
            OptimizationRequest::default(),
            OptimizationRequest {
                fixed_items: vec![fixed_req("a", 100, 50)],
                ..Default::default()
            },
            OptimizationRequest {
                fixed_items: vec![fixed_req("a", 0, 3600), fixed_req("a", 7200, 9000)],
                ..Default::default()
            },
            OptimizationRequest {
                fixed_items: vec![fixed_req("a", 0, 3600), fixed_req("b", 1800, 9000)],
                ..Default::default()
            },
            OptimizationRequest {
                fixed_items: vec![fixed_req("a", 0, 3600)],
                flexible_items: vec![flexible_req("f", 9)],
                now: None,
            },
            OptimizationRequest {
                fixed_items: vec![fixed_req("a", 0, 3600)],
                flexible_items: vec![FlexibleItemRequest {
                    duration_minutes: 0,
                    ..flexible_req("f", 1)
                }],
                now: None,
            },
            OptimizationRequest {
                fixed_items: vec![fixed_req("a", 0, 3600)],
                flexible_items: vec![FlexibleItemRequest {
                    duration_minutes: i32::MAX / 2,
                    ..flexible_req("f", 1)
                }],
                now: None,
            },
            OptimizationRequest {
                fixed_items: vec![fixed_req("a", 82_800, 90_000)],
                ..Default::default()
            },
            OptimizationRequest {
                fixed_items: vec![fixed_req("a", -3600, 3600)],
                ..Default::default()
            },
            OptimizationRequest {
                fixed_items: vec![fixed_req("a", 0, 3600)],
                now: Some(-1),
                ..Default::default()
            },
        ];
        for request in cases {
            assert!(matches!(
                validate(&request, &config),
                Err(PlanError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_verify_detects_moved_fixed_item() {
        let original = vec![ItineraryItem::from(fixed_req("a", 32_400, 36_000))];
        let mut moved = original.clone();
        moved[0].start_time += 60;
        let bounds = DayBounds { floor: 0, ceiling: 86_400 };
        assert!(verify_invariants(&original, &original, bounds).is_ok());
        assert!(verify_invariants(&moved, &original, bounds)
            .unwrap_err()
            .contains("moved"));
    }

    #[test]
    fn test_verify_detects_overlap() {
        let a = ItineraryItem::from(fixed_req("a", 32_400, 36_000));
        let mut b = a.clone();
        b.id = "b".to_string();
        b.kind = ItemKind::Flexible;
        b.location = Location::new("b", 36.0, -115.0);
        b.start_time = 35_000;
        b.end_time = 37_000;
        let bounds = DayBounds { floor: 0, ceiling: 86_400 };
        assert!(verify_invariants(&[a.clone(), b], &[a], bounds)
            .unwrap_err()
            .contains("overlap"));
    }

    #[test]
    fn test_search_area_spans_both_anchors() {
        let prev = ItineraryItem::from(fixed_req("a", 0, 1));
        let mut next = prev.clone();
        next.location = Location::new("far", 36.2126, -115.1767);
        let gap = Gap {
            start_time: 1,
            end_time: 2,
            previous: Some(prev),
            next: Some(next),
        };
        let (centre, radius) = search_area(&gap, 2000.0).unwrap();
        assert!((centre.0 - 36.1626).abs() < 1e-9);
        // ~11 km apart, so the radius grows past the 2 km default.
        assert!(radius > 5000.0);
    }

    struct Panicking;

    impl PlaceSearch for Panicking {
        fn search(
            &self,
            _term: &str,
            _near: (f64, f64),
            _radius_meters: f64,
        ) -> Result<Vec<CandidatePlace>, CollaboratorError> {
            panic!("provider bug");
        }
    }

    #[test]
    fn test_search_worker_panic_is_unavailable() {
        let anchor = ItineraryItem::from(fixed_req("a", 32_400, 36_000));
        let gaps = vec![
            Gap {
                start_time: 36_000,
                end_time: 40_000,
                previous: Some(anchor),
                next: None,
            },
            Gap {
                start_time: 0,
                end_time: 1800,
                previous: None,
                next: None,
            },
        ];
        let results = search_gaps(&Arc::new(Panicking), "cafe", &gaps, &SearchConfig::default());
        assert!(matches!(results[0], Err(CollaboratorError::Unavailable(_))));
        // No anchor, nothing to search around.
        assert!(matches!(&results[1], Ok(places) if places.is_empty()));
    }

    #[test]
    fn test_clock_format() {
        assert_eq!(clock(10 * 3600 + 15 * 60), "10:15");
        assert_eq!(clock(-5), "-5s");
    }

    #[test]
    fn test_alternatives_skip_chosen_and_duplicates() {
        let place = |id: &str| CandidatePlace {
            id: id.to_string(),
            name: id.to_string(),
            address: String::new(),
            lat: 0.0,
            lng: 0.0,
            rating: 1.0,
            is_open: None,
        };
        let gap = Gap {
            start_time: 0,
            end_time: 3600,
            previous: None,
            next: None,
        };
        let option = |id: &str, score: f64| CandidateOption {
            place: place(id),
            start_time: 0,
            end_time: 1800,
            gap: gap.clone(),
            gap_index: 0,
            between_fixed: false,
            score,
        };
        let options = vec![option("chosen", 9.0), option("b", 8.0), option("b", 7.0), option("c", 6.0), option("d", 5.0)];
        let alts = alternatives(&options, "chosen", 2);
        let ids: Vec<&str> = alts.iter().map(|a| a.place.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }
}
