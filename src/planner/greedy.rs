//! Single-pass greedy strategy.

use crate::config::StrategyConfig;
use crate::model::CandidateOption;

use super::{slot_score, InsertionStrategy, PlacementContext};

/// Takes the best-scored option, except when several between-fixed gaps
/// tie closely: then the insertion point with the best time fit and the
/// smallest detour wins.
#[derive(Debug, Clone)]
pub struct GreedyInsertion {
    config: StrategyConfig,
}

impl GreedyInsertion {
    pub fn from_config(config: &StrategyConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl InsertionStrategy for GreedyInsertion {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn choose(&self, ctx: &PlacementContext<'_>, options: &[CandidateOption]) -> Option<usize> {
        let best = options.first()?;
        if !best.between_fixed {
            return Some(0);
        }

        let threshold = best.score * (1.0 - self.config.tie_tolerance);
        let tied: Vec<usize> = options
            .iter()
            .enumerate()
            .filter(|(_, option)| option.between_fixed && option.score >= threshold)
            .map(|(i, _)| i)
            .collect();

        if tied.iter().all(|&i| options[i].gap_index == best.gap_index) {
            return Some(0);
        }

        let required = ctx.request.duration_secs();
        tied.into_iter()
            .map(|i| (i, slot_score(&options[i], required, &self.config)))
            // Earlier (better ranked) index wins exact ties.
            .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(i, _)| i)
    }
}
