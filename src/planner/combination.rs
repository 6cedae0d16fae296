//! Capped-combination strategy.
//!
//! Broader than greedy: simulates committing each of a capped set of
//! options and charges every option for the route length it adds to the
//! whole day.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::config::StrategyConfig;
use crate::model::CandidateOption;

use super::{commit, route_length_km, InsertionStrategy, PlacementContext};

#[derive(Debug, Clone)]
pub struct CombinationInsertion {
    per_gap: usize,
    max_combinations: usize,
    detour_penalty: f64,
}

impl CombinationInsertion {
    pub fn from_config(config: &StrategyConfig) -> Self {
        Self {
            per_gap: config.per_gap,
            max_combinations: config.max_combinations,
            detour_penalty: config.detour_penalty,
        }
    }

    /// Indices of the top `per_gap` options of every gap, at most
    /// `max_combinations` in total, in ranking order.
    fn shortlist(&self, options: &[CandidateOption]) -> Vec<usize> {
        let mut taken: HashMap<usize, usize> = HashMap::new();
        let mut shortlist = Vec::new();
        for (i, option) in options.iter().enumerate() {
            if shortlist.len() >= self.max_combinations {
                break;
            }
            let count = taken.entry(option.gap_index).or_default();
            if *count < self.per_gap {
                *count += 1;
                shortlist.push(i);
            }
        }
        shortlist
    }
}

impl InsertionStrategy for CombinationInsertion {
    fn name(&self) -> &'static str {
        "combination"
    }

    fn choose(&self, ctx: &PlacementContext<'_>, options: &[CandidateOption]) -> Option<usize> {
        let base_km = route_length_km(ctx.working);

        // Trials are independent; rank them in shortlist order afterwards.
        let ranked: Vec<(usize, f64)> = self
            .shortlist(options)
            .into_par_iter()
            .filter_map(|i| {
                let mut trial = ctx.working.to_vec();
                commit(ctx.request, &options[i], &mut trial, ctx.bounds, ctx.min_viable).ok()?;
                let added_km = (route_length_km(&trial) - base_km).max(0.0);
                Some((i, options[i].score - self.detour_penalty * added_km))
            })
            .collect();

        ranked
            .into_iter()
            .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(i, _)| i)
    }
}
