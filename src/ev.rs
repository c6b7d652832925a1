use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::estimator::{self, EstimateMeta};
use crate::payout::{self, PayoutCurve};
use crate::record::{HistoryFilter, ProspectiveTournament, TournamentRecord};

/// `Σ p_i * s_i - cost`, with the payout table implicitly zero-padded to
/// the length of the probability vector.
pub fn ev_from_distribution(
    probabilities: &[f64],
    payouts: &[f64],
    cost: f64,
) -> Result<f64, ModelError> {
    if probabilities.len() < payouts.len() {
        return Err(ModelError::DistributionLength {
            expected: payouts.len(),
            got: probabilities.len(),
        });
    }
    let gross: f64 = payouts
        .iter()
        .zip(probabilities)
        .map(|(prize, p)| prize * p)
        .sum();
    Ok(gross - cost)
}

/// The pair `(EV, metadata)`: metadata is `Some` when the distribution
/// was estimated from history, `None` when the caller supplied one.
pub fn expected_value(
    history: &[TournamentRecord],
    prospect: &ProspectiveTournament,
    filter: &HistoryFilter,
    supplied: Option<&[f64]>,
    config: &ModelConfig,
) -> Result<(f64, Option<EstimateMeta>), ModelError> {
    let evaluation = evaluate(history, prospect, filter, supplied, config)?;
    Ok((evaluation.ev, evaluation.meta))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProspectRow {
    pub position: u32,
    pub prize: f64,
    pub probability: f64,
    pub roi_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub ev: f64,
    pub expected_prize: f64,
    /// Buy-in plus rebuys; the EV cost term.
    pub cost: f64,
    /// Cost plus add-on; the ROI reporting basis.
    pub total_investment: f64,
    pub roi_percent: f64,
    pub itm_probability: f64,
    pub curve: PayoutCurve,
    pub prospect_rows: Vec<ProspectRow>,
    pub meta: Option<EstimateMeta>,
}

/// Full read on a prospective tournament: payout curve, distribution
/// (estimated unless `supplied`), EV and the derived ROI/ITM figures.
pub fn evaluate(
    history: &[TournamentRecord],
    prospect: &ProspectiveTournament,
    filter: &HistoryFilter,
    supplied: Option<&[f64]>,
    config: &ModelConfig,
) -> Result<Evaluation, ModelError> {
    prospect.validate()?;
    let curve = payout::payout_curve(
        prospect.field_size,
        prospect.buy_in,
        prospect.rake_fraction,
        prospect.paid_fraction,
        &config.curve,
    )?;

    let (probabilities, meta) = match supplied {
        Some(given) => {
            if given.len() != prospect.field_size as usize {
                return Err(ModelError::DistributionLength {
                    expected: prospect.field_size as usize,
                    got: given.len(),
                });
            }
            (given.to_vec(), None)
        }
        None => {
            let estimate = estimator::estimate_distribution(
                history,
                prospect.field_size,
                filter,
                &config.estimator,
            )?;
            (estimate.probabilities, Some(estimate.meta))
        }
    };

    let cost = prospect.cost();
    let total_investment = prospect.total_investment();
    let ev = ev_from_distribution(&probabilities, &curve.payouts, cost)?;
    let expected_prize = ev + cost;

    let itm_probability = probabilities.iter().take(curve.num_paid).sum::<f64>() * 100.0;
    let prospect_rows: Vec<ProspectRow> = curve
        .payouts
        .iter()
        .zip(&probabilities)
        .enumerate()
        .map(|(idx, (&prize, &probability))| ProspectRow {
            position: idx as u32 + 1,
            prize,
            probability,
            roi_percent: roi_percent(prize - total_investment, total_investment),
        })
        .collect();

    Ok(Evaluation {
        ev,
        expected_prize,
        cost,
        total_investment,
        roi_percent: roi_percent(ev, total_investment),
        itm_probability,
        curve,
        prospect_rows,
        meta,
    })
}

fn roi_percent(amount: f64, investment: f64) -> f64 {
    if investment <= 0.0 {
        return 0.0;
    }
    amount / investment * 100.0
}
