//! Free-time discovery over the working list.

use crate::config::ScheduleConfig;
use crate::model::{Gap, ItineraryItem};

/// Computes the gaps of a working list inside `[now, day_end]`.
///
/// Pure: the same list always yields the same gaps.
#[derive(Debug, Clone, Copy)]
pub struct GapFinder {
    now: i32,
    day_end: i32,
    min_slot: i32,
}

impl GapFinder {
    pub fn new(now: i32, day_end: i32, min_slot: i32) -> Self {
        Self {
            now,
            day_end,
            min_slot,
        }
    }

    pub fn from_schedule(schedule: &ScheduleConfig, now: i32) -> Self {
        Self::new(now, schedule.day_end_secs(), schedule.min_slot_secs())
    }

    /// Gaps sorted largest first (earlier start breaks ties).
    pub fn find(&self, items: &[ItineraryItem]) -> Vec<Gap> {
        let mut sorted: Vec<&ItineraryItem> = items.iter().collect();
        sorted.sort_by_key(|item| (item.start_time, item.end_time));

        let mut gaps = Vec::new();
        let mut previous: Option<&ItineraryItem> = None;
        let mut cursor = self.now;

        for item in sorted {
            self.push_gap(&mut gaps, cursor, item.start_time, previous, Some(item));
            // An item nested inside a longer one must not reopen time.
            if previous.is_none_or(|prev| item.end_time >= prev.end_time) {
                previous = Some(item);
            }
            cursor = cursor.max(item.end_time);
        }
        self.push_gap(&mut gaps, cursor, self.day_end, previous, None);

        gaps.sort_by(|a, b| {
            b.duration_secs()
                .cmp(&a.duration_secs())
                .then(a.start_time.cmp(&b.start_time))
        });
        gaps
    }

    fn push_gap(
        &self,
        gaps: &mut Vec<Gap>,
        start: i32,
        end: i32,
        previous: Option<&ItineraryItem>,
        next: Option<&ItineraryItem>,
    ) {
        let start = start.max(self.now);
        let end = end.min(self.day_end);
        if end - start < self.min_slot {
            return;
        }
        gaps.push(Gap {
            start_time: start,
            end_time: end,
            previous: previous.cloned(),
            next: next.cloned(),
        });
    }
}

/// Splits gaps into (between-fixed, other), preserving order.
pub fn partition_between_fixed(gaps: Vec<Gap>) -> (Vec<Gap>, Vec<Gap>) {
    gaps.into_iter().partition(Gap::is_between_fixed)
}
