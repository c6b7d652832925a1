use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::record::{HistoryFilter, TournamentRecord};

const KDE_MIN_SAMPLES: usize = 10;
const HISTOGRAM_MIN_SAMPLES: usize = 5;
const HIGH_CONFIDENCE_MIN: usize = 20;
const MAX_HISTOGRAM_BINS: usize = 10;
const SINGLE_SAMPLE_SIGMA: f64 = 0.2;
const SIGMA_FLOOR: f64 = 0.05;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EstimatorConfig {
    pub kde_min_samples: usize,
    pub histogram_min_samples: usize,
    pub high_confidence_min: usize,
    pub max_histogram_bins: usize,
    pub single_sample_sigma: f64,
    /// Floor on the KDE bandwidth so a tight cluster keeps finite width.
    pub sigma_floor: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            kde_min_samples: KDE_MIN_SAMPLES,
            histogram_min_samples: HISTOGRAM_MIN_SAMPLES,
            high_confidence_min: HIGH_CONFIDENCE_MIN,
            max_histogram_bins: MAX_HISTOGRAM_BINS,
            single_sample_sigma: SINGLE_SAMPLE_SIGMA,
            sigma_floor: SIGMA_FLOOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Kde,
    Histogram,
    HistogramFallback,
    GaussianWeighted,
    UniformFallback,
    NoMatchingData,
    InvalidData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateMeta {
    pub method: Method,
    pub confidence: Confidence,
    pub sample_size: usize,
    pub avg_percentile: Option<f64>,
    pub best_percentile: Option<f64>,
    pub worst_percentile: Option<f64>,
    /// `round(avg_percentile * field_size)`, clamped into the field.
    pub expected_finish: Option<u32>,
    pub filters_applied: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Estimate {
    /// Index i = probability of finishing in position i+1; always
    /// `field_size` entries summing to 1.
    pub probabilities: Vec<f64>,
    pub meta: EstimateMeta,
}

/// Probability vector over finishing positions: KDE, histogram, or
/// Gaussian weights by valid sample count, uniform fallback otherwise.
/// Data problems never fail the call; only a zero field size does.
pub fn estimate_distribution(
    history: &[TournamentRecord],
    field_size: u32,
    filter: &HistoryFilter,
    config: &EstimatorConfig,
) -> Result<Estimate, ModelError> {
    if field_size == 0 {
        return Err(ModelError::InvalidParameter {
            what: "field_size",
            value: 0.0,
        });
    }
    let filters_applied = filter.describe();

    if history.is_empty() {
        log::debug!("empty history, uniform over {field_size} positions");
        return Ok(uniform_estimate(
            field_size,
            Method::UniformFallback,
            &[],
            config,
            filters_applied,
        ));
    }

    let kept = filter.apply(history);
    if kept.is_empty() {
        log::warn!(
            "filters removed all {} records, uniform over {field_size} positions",
            history.len()
        );
        return Ok(uniform_estimate(
            field_size,
            Method::NoMatchingData,
            &[],
            config,
            filters_applied,
        ));
    }

    let percentiles: Vec<f64> = kept
        .iter()
        .filter_map(|record| record.finish_percentile())
        .collect();
    if percentiles.is_empty() {
        log::warn!(
            "no valid finishes among {} matching records, uniform over {field_size} positions",
            kept.len()
        );
        return Ok(uniform_estimate(
            field_size,
            Method::InvalidData,
            &[],
            config,
            filters_applied,
        ));
    }

    let n = percentiles.len();
    let (weights, method) = if n >= config.kde_min_samples {
        match kde_weights(&percentiles, field_size, config) {
            Some(w) => (Some(w), Method::Kde),
            None => {
                log::warn!("kde mass degenerate over {n} samples, using histogram");
                (
                    histogram_weights(&percentiles, field_size, config),
                    Method::HistogramFallback,
                )
            }
        }
    } else if n >= config.histogram_min_samples {
        (
            histogram_weights(&percentiles, field_size, config),
            Method::Histogram,
        )
    } else {
        (
            gaussian_weights(&percentiles, field_size, config),
            Method::GaussianWeighted,
        )
    };
    log::debug!("estimated {field_size}-position distribution via {method:?} from {n} samples");

    match weights {
        Some(probabilities) => Ok(Estimate {
            probabilities,
            meta: build_meta(method, n, &percentiles, field_size, config, filters_applied),
        }),
        None => {
            log::warn!("{method:?} produced no usable mass, uniform over {field_size} positions");
            Ok(uniform_estimate(
                field_size,
                Method::UniformFallback,
                &percentiles,
                config,
                filters_applied,
            ))
        }
    }
}

/// `(percentile, probability)` pairs on the candidate grid.
pub fn distribution_series(estimate: &Estimate) -> Vec<(f64, f64)> {
    let field_size = estimate.probabilities.len() as u32;
    candidate_grid(field_size)
        .zip(estimate.probabilities.iter().copied())
        .collect()
}

pub fn uniform_vector(field_size: u32) -> Vec<f64> {
    vec![1.0 / field_size as f64; field_size as usize]
}

pub fn expected_finish_position(avg_percentile: f64, field_size: u32) -> u32 {
    let raw = (avg_percentile * field_size as f64).round() as u32;
    raw.clamp(1, field_size)
}

fn uniform_estimate(
    field_size: u32,
    method: Method,
    percentiles: &[f64],
    config: &EstimatorConfig,
    filters_applied: Vec<String>,
) -> Estimate {
    Estimate {
        probabilities: uniform_vector(field_size),
        meta: build_meta(
            method,
            percentiles.len(),
            percentiles,
            field_size,
            config,
            filters_applied,
        ),
    }
}

fn build_meta(
    method: Method,
    sample_size: usize,
    percentiles: &[f64],
    field_size: u32,
    config: &EstimatorConfig,
    filters_applied: Vec<String>,
) -> EstimateMeta {
    let stats = percentile_stats(percentiles);
    EstimateMeta {
        method,
        confidence: confidence_for(method, sample_size, config),
        sample_size,
        avg_percentile: stats.map(|(avg, _, _)| avg),
        best_percentile: stats.map(|(_, best, _)| best),
        worst_percentile: stats.map(|(_, _, worst)| worst),
        expected_finish: stats.map(|(avg, _, _)| expected_finish_position(avg, field_size)),
        filters_applied,
    }
}

fn confidence_for(method: Method, sample_size: usize, config: &EstimatorConfig) -> Confidence {
    match method {
        Method::Kde => {
            if sample_size >= config.high_confidence_min {
                Confidence::High
            } else {
                Confidence::Medium
            }
        }
        Method::Histogram | Method::HistogramFallback => Confidence::Medium,
        _ => Confidence::Low,
    }
}

fn candidate_grid(field_size: u32) -> impl Iterator<Item = f64> {
    (1..=field_size).map(move |position| position as f64 / field_size as f64)
}

fn kde_weights(
    percentiles: &[f64],
    field_size: u32,
    config: &EstimatorConfig,
) -> Option<Vec<f64>> {
    let n = percentiles.len() as f64;
    // Scott's rule bandwidth.
    let sigma = sample_std(percentiles).max(config.sigma_floor);
    let bandwidth = sigma * n.powf(-0.2);

    let weights: Vec<f64> = candidate_grid(field_size)
        .map(|pct| {
            percentiles
                .iter()
                .map(|&sample| {
                    let z = (pct - sample) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
        })
        .collect();
    normalized(weights)
}

fn histogram_weights(
    percentiles: &[f64],
    field_size: u32,
    config: &EstimatorConfig,
) -> Option<Vec<f64>> {
    let num_bins = histogram_bins(percentiles.len(), field_size, config);
    let mut counts = vec![0usize; num_bins];
    for &pct in percentiles {
        counts[bin_index(pct, num_bins)] += 1;
    }

    let weights: Vec<f64> = candidate_grid(field_size)
        .map(|pct| counts[bin_index(pct, num_bins)] as f64)
        .collect();
    normalized(weights)
}

fn gaussian_weights(
    percentiles: &[f64],
    field_size: u32,
    config: &EstimatorConfig,
) -> Option<Vec<f64>> {
    let avg = mean(percentiles);
    let sigma = if percentiles.len() == 1 {
        config.single_sample_sigma
    } else {
        sample_std(percentiles)
    };
    // Zero variance has no Gaussian shape.
    if !(sigma > 0.0) {
        return None;
    }
    let denom = 2.0 * sigma * sigma;

    let weights: Vec<f64> = candidate_grid(field_size)
        .map(|pct| {
            let d = pct - avg;
            (-(d * d) / denom).exp()
        })
        .collect();
    normalized(weights)
}

fn histogram_bins(sample_size: usize, field_size: u32, config: &EstimatorConfig) -> usize {
    (field_size as usize / 10)
        .min(config.max_histogram_bins)
        .min(sample_size)
        .max(1)
}

fn bin_index(percentile: f64, num_bins: usize) -> usize {
    // A percentile of exactly 1.0 lands in the last bin, not past it.
    ((percentile * num_bins as f64).floor() as usize).min(num_bins - 1)
}

fn normalized(mut weights: Vec<f64>) -> Option<Vec<f64>> {
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }
    for w in &mut weights {
        *w /= total;
    }
    Some(weights)
}

fn percentile_stats(percentiles: &[f64]) -> Option<(f64, f64, f64)> {
    if percentiles.is_empty() {
        return None;
    }
    let avg = mean(percentiles);
    let best = percentiles.iter().copied().fold(f64::INFINITY, f64::min);
    let worst = percentiles.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((avg, best, worst))
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    // Identical samples are zero spread, not rounding residue.
    if values.windows(2).all(|pair| pair[0] == pair[1]) {
        return 0.0;
    }
    let avg = mean(values);
    let var = values
        .iter()
        .map(|v| (v - avg) * (v - avg))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_index_clamps_percentile_one_into_last_bin() {
        assert_eq!(bin_index(1.0, 5), 4);
        assert_eq!(bin_index(0.999, 5), 4);
        assert_eq!(bin_index(0.0, 5), 0);
        assert_eq!(bin_index(0.2, 5), 1);
    }

    #[test]
    fn histogram_bin_count_takes_the_smallest_limit() {
        let config = EstimatorConfig::default();
        assert_eq!(histogram_bins(6, 100, &config), 6);
        assert_eq!(histogram_bins(50, 200, &config), 10);
        assert_eq!(histogram_bins(5, 30, &config), 3);
        // Fields under ten positions still get one bin.
        assert_eq!(histogram_bins(5, 7, &config), 1);
    }

    #[test]
    fn normalizing_zero_or_non_finite_mass_fails() {
        assert!(normalized(vec![0.0, 0.0]).is_none());
        assert!(normalized(vec![f64::NAN, 1.0]).is_none());
        let probs = normalized(vec![1.0, 3.0]).unwrap();
        assert!((probs[0] - 0.25).abs() < 1e-12);
        assert!((probs[1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn sample_std_is_zero_without_spread() {
        assert_eq!(sample_std(&[0.4]), 0.0);
        assert_eq!(sample_std(&[0.2, 0.2, 0.2]), 0.0);
        let spread = sample_std(&[0.1, 0.2, 0.3]);
        assert!((spread - 0.1).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_gaussian_has_no_mass() {
        let config = EstimatorConfig::default();
        assert!(gaussian_weights(&[0.2, 0.2, 0.2], 100, &config).is_none());
        // A lone sample still spreads via the single-sample sigma.
        assert!(gaussian_weights(&[0.2], 100, &config).is_some());
    }

    #[test]
    fn expected_finish_stays_inside_the_field() {
        assert_eq!(expected_finish_position(0.004, 100), 1);
        assert_eq!(expected_finish_position(0.5, 100), 50);
        assert_eq!(expected_finish_position(1.0, 100), 100);
        assert_eq!(expected_finish_position(0.103, 100), 10);
    }

    #[test]
    fn grid_covers_every_position_once() {
        let grid: Vec<f64> = candidate_grid(4).collect();
        assert_eq!(grid.len(), 4);
        assert!((grid[0] - 0.25).abs() < 1e-12);
        assert!((grid[3] - 1.0).abs() < 1e-12);
    }
}
