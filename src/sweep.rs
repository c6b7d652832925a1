use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::estimator::Confidence;
use crate::ev;
use crate::record::{HistoryFilter, ProspectiveTournament, TournamentRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeReport {
    pub multiplier: f64,
    pub buy_in: f64,
    pub ev: f64,
    pub roi_percent: f64,
    pub itm_probability: f64,
    pub sample_size: usize,
    pub confidence: Option<Confidence>,
}

/// Evaluates the prospect at each buy-in multiple in parallel, each stake
/// matched against history within its own half-to-double buy-in window.
/// Reports come back sorted by multiplier.
pub fn sweep_stakes(
    history: &[TournamentRecord],
    base: &ProspectiveTournament,
    multipliers: &[f64],
    config: &ModelConfig,
) -> Result<Vec<StakeReport>, ModelError> {
    let mut reports = multipliers
        .par_iter()
        .map(|&multiplier| {
            let prospect = ProspectiveTournament {
                buy_in: base.buy_in * multiplier,
                ..*base
            };
            let filter = HistoryFilter::around_buy_in(prospect.buy_in);
            let evaluation = ev::evaluate(history, &prospect, &filter, None, config)?;
            let meta = evaluation.meta.as_ref();
            Ok(StakeReport {
                multiplier,
                buy_in: prospect.buy_in,
                ev: evaluation.ev,
                roi_percent: evaluation.roi_percent,
                itm_probability: evaluation.itm_probability,
                sample_size: meta.map_or(0, |m| m.sample_size),
                confidence: meta.map(|m| m.confidence),
            })
        })
        .collect::<Result<Vec<_>, ModelError>>()?;

    reports.sort_by(|a, b| a.multiplier.total_cmp(&b.multiplier));
    Ok(reports)
}

pub fn best_stake(reports: &[StakeReport]) -> Option<&StakeReport> {
    reports.iter().max_by(|a, b| a.ev.total_cmp(&b.ev))
}
