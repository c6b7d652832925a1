use mtt_coach::error::ModelError;
use mtt_coach::estimator::{
    Confidence, EstimatorConfig, Method, distribution_series, estimate_distribution,
};
use mtt_coach::record::{Format, HistoryFilter, TournamentRecord};

fn finish(position: u32, entries: u32) -> TournamentRecord {
    TournamentRecord {
        venue: "Test Room".to_string(),
        format: Format::Online,
        played_at: "2026-04-01".to_string(),
        buy_in: 100.0,
        rebuys: 0,
        add_on_cost: 0.0,
        total_entries: entries,
        position_finished: position,
        prize_won: 0.0,
        duration_hours: 3.0,
        notes: String::new(),
    }
}

fn sum(probabilities: &[f64]) -> f64 {
    probabilities.iter().sum()
}

fn argmax(probabilities: &[f64]) -> usize {
    probabilities
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, _)| idx)
        .unwrap()
}

#[test]
fn empty_history_is_uniform() {
    let estimate =
        estimate_distribution(&[], 100, &HistoryFilter::default(), &EstimatorConfig::default())
            .unwrap();

    assert_eq!(estimate.probabilities.len(), 100);
    for p in &estimate.probabilities {
        assert_eq!(*p, 1.0 / 100.0);
    }
    assert_eq!(estimate.meta.method, Method::UniformFallback);
    assert_eq!(estimate.meta.confidence, Confidence::Low);
    assert_eq!(estimate.meta.sample_size, 0);
    assert!(estimate.meta.avg_percentile.is_none());
    assert!(estimate.meta.expected_finish.is_none());
}

#[test]
fn filtered_out_history_reports_no_matching_data() {
    let history = vec![finish(10, 100), finish(20, 100)];
    let filter = HistoryFilter {
        format: Some(Format::Live),
        ..HistoryFilter::default()
    };
    let estimate =
        estimate_distribution(&history, 50, &filter, &EstimatorConfig::default()).unwrap();

    assert_eq!(estimate.meta.method, Method::NoMatchingData);
    assert_eq!(estimate.meta.confidence, Confidence::Low);
    assert_eq!(estimate.meta.sample_size, 0);
    assert!((sum(&estimate.probabilities) - 1.0).abs() < 1e-9);
    assert!(estimate
        .meta
        .filters_applied
        .iter()
        .any(|f| f.contains("format Live")));
}

#[test]
fn corrupt_records_report_invalid_data() {
    let history = vec![finish(10, 0), finish(0, 100), finish(101, 100)];
    let estimate = estimate_distribution(
        &history,
        100,
        &HistoryFilter::default(),
        &EstimatorConfig::default(),
    )
    .unwrap();

    assert_eq!(estimate.meta.method, Method::InvalidData);
    assert_eq!(estimate.meta.sample_size, 0);
    for p in &estimate.probabilities {
        assert_eq!(*p, 1.0 / 100.0);
    }
}

#[test]
fn three_finishes_give_gaussian_weights() {
    let history = vec![finish(10, 100), finish(12, 100), finish(9, 100)];
    let estimate = estimate_distribution(
        &history,
        100,
        &HistoryFilter::default(),
        &EstimatorConfig::default(),
    )
    .unwrap();

    assert_eq!(estimate.meta.method, Method::GaussianWeighted);
    assert_eq!(estimate.meta.confidence, Confidence::Low);
    assert_eq!(estimate.meta.sample_size, 3);
    assert_eq!(estimate.meta.expected_finish, Some(10));
    assert!((estimate.meta.best_percentile.unwrap() - 0.09).abs() < 1e-9);
    assert!((estimate.meta.worst_percentile.unwrap() - 0.12).abs() < 1e-9);
    assert!((sum(&estimate.probabilities) - 1.0).abs() < 1e-9);
    // The mode sits on the position closest to the average percentile,
    // sharp at the raw sample spread, with a vanishing tail.
    assert_eq!(argmax(&estimate.probabilities), 9);
    assert!(estimate.probabilities[9] > 0.2);
    assert!(estimate.probabilities[29] < 1e-30);
}

#[test]
fn zero_variance_small_sample_falls_back_to_uniform() {
    // Three identical finishes give the Gaussian no width at all; the
    // estimate degrades to uniform instead of spiking on one position.
    let history: Vec<TournamentRecord> = (0..3).map(|_| finish(20, 100)).collect();
    let estimate = estimate_distribution(
        &history,
        100,
        &HistoryFilter::default(),
        &EstimatorConfig::default(),
    )
    .unwrap();

    assert_eq!(estimate.meta.method, Method::UniformFallback);
    assert_eq!(estimate.meta.confidence, Confidence::Low);
    assert_eq!(estimate.meta.sample_size, 3);
    for p in &estimate.probabilities {
        assert_eq!(*p, 1.0 / 100.0);
    }
    assert_eq!(estimate.meta.expected_finish, Some(20));
}

#[test]
fn method_tracks_sample_size() {
    let cases = [
        (1, Method::GaussianWeighted, Confidence::Low),
        (4, Method::GaussianWeighted, Confidence::Low),
        (5, Method::Histogram, Confidence::Medium),
        (9, Method::Histogram, Confidence::Medium),
        (10, Method::Kde, Confidence::Medium),
        (19, Method::Kde, Confidence::Medium),
        (20, Method::Kde, Confidence::High),
    ];
    for (count, method, confidence) in cases {
        let history: Vec<TournamentRecord> =
            (1..=count).map(|i| finish(i * 2, 100)).collect();
        let estimate = estimate_distribution(
            &history,
            100,
            &HistoryFilter::default(),
            &EstimatorConfig::default(),
        )
        .unwrap();
        assert_eq!(estimate.meta.method, method, "sample size {count}");
        assert_eq!(estimate.meta.confidence, confidence, "sample size {count}");
        assert_eq!(estimate.meta.sample_size, count as usize);
        assert!((sum(&estimate.probabilities) - 1.0).abs() < 1e-9);
    }
}

#[test]
fn percentile_one_lands_in_last_bin() {
    // Five dead-last finishes: percentile exactly 1.0 must stay inside
    // the top histogram bin instead of indexing past it.
    let history: Vec<TournamentRecord> = (0..5).map(|_| finish(50, 50)).collect();
    let estimate = estimate_distribution(
        &history,
        100,
        &HistoryFilter::default(),
        &EstimatorConfig::default(),
    )
    .unwrap();

    assert_eq!(estimate.meta.method, Method::Histogram);
    for p in &estimate.probabilities[..79] {
        assert_eq!(*p, 0.0);
    }
    for p in &estimate.probabilities[79..] {
        assert!((p - 1.0 / 21.0).abs() < 1e-9);
    }
}

#[test]
fn estimates_are_idempotent() {
    let history: Vec<TournamentRecord> = (1..=12).map(|i| finish(i * 5, 100)).collect();
    let filter = HistoryFilter::default();
    let config = EstimatorConfig::default();

    let first = estimate_distribution(&history, 100, &filter, &config).unwrap();
    let second = estimate_distribution(&history, 100, &filter, &config).unwrap();
    assert_eq!(first.probabilities, second.probabilities);
    assert_eq!(first.meta.method, second.meta.method);
    assert_eq!(first.meta.expected_finish, second.meta.expected_finish);
}

#[test]
fn stronger_history_expects_an_earlier_finish() {
    let strong: Vec<TournamentRecord> =
        [5, 10, 15, 20].iter().map(|&p| finish(p, 100)).collect();
    let weak: Vec<TournamentRecord> =
        [45, 50, 55, 60].iter().map(|&p| finish(p, 100)).collect();

    let filter = HistoryFilter::default();
    let config = EstimatorConfig::default();
    let strong_finish = estimate_distribution(&strong, 100, &filter, &config)
        .unwrap()
        .meta
        .expected_finish
        .unwrap();
    let weak_finish = estimate_distribution(&weak, 100, &filter, &config)
        .unwrap()
        .meta
        .expected_finish
        .unwrap();
    assert!(strong_finish <= weak_finish);
}

#[test]
fn recent_cut_applies_before_estimation() {
    // History is most-recent-first: five good finishes, then ten bad ones.
    let mut history: Vec<TournamentRecord> = (0..5).map(|_| finish(10, 100)).collect();
    history.extend((0..10).map(|_| finish(90, 100)));

    let filter = HistoryFilter {
        most_recent: Some(5),
        ..HistoryFilter::default()
    };
    let estimate =
        estimate_distribution(&history, 100, &filter, &EstimatorConfig::default()).unwrap();

    assert_eq!(estimate.meta.sample_size, 5);
    assert_eq!(estimate.meta.method, Method::Histogram);
    assert_eq!(estimate.meta.expected_finish, Some(10));
}

#[test]
fn tight_cluster_keeps_kde_finite() {
    let history: Vec<TournamentRecord> = (0..12).map(|_| finish(25, 100)).collect();
    let estimate = estimate_distribution(
        &history,
        100,
        &HistoryFilter::default(),
        &EstimatorConfig::default(),
    )
    .unwrap();

    assert_eq!(estimate.meta.method, Method::Kde);
    assert_eq!(estimate.meta.confidence, Confidence::Medium);
    assert!((sum(&estimate.probabilities) - 1.0).abs() < 1e-9);
    assert_eq!(argmax(&estimate.probabilities), 24);
}

#[test]
fn degenerate_kde_mass_falls_back_to_histogram() {
    // A one-seat field with all samples far from the single grid point:
    // every kernel underflows to zero and the histogram takes over.
    let history: Vec<TournamentRecord> = (0..100).map(|_| finish(1, 200)).collect();
    let estimate = estimate_distribution(
        &history,
        1,
        &HistoryFilter::default(),
        &EstimatorConfig::default(),
    )
    .unwrap();

    assert_eq!(estimate.meta.method, Method::HistogramFallback);
    assert_eq!(estimate.meta.confidence, Confidence::Medium);
    assert_eq!(estimate.probabilities, vec![1.0]);
}

#[test]
fn small_fields_get_full_length_vectors() {
    let history: Vec<TournamentRecord> = (1..=6).map(|i| finish(i * 10, 100)).collect();
    let estimate = estimate_distribution(
        &history,
        7,
        &HistoryFilter::default(),
        &EstimatorConfig::default(),
    )
    .unwrap();

    assert_eq!(estimate.probabilities.len(), 7);
    assert_eq!(estimate.meta.method, Method::Histogram);
    // A field under ten positions collapses to one bin, so the histogram
    // is uniform.
    for p in &estimate.probabilities {
        assert!((p - 1.0 / 7.0).abs() < 1e-9);
    }
}

#[test]
fn zero_field_size_is_an_error() {
    let result = estimate_distribution(
        &[],
        0,
        &HistoryFilter::default(),
        &EstimatorConfig::default(),
    );
    assert!(matches!(
        result,
        Err(ModelError::InvalidParameter { what: "field_size", .. })
    ));
}

#[test]
fn series_pairs_grid_with_probabilities() {
    let history = vec![finish(10, 100), finish(12, 100), finish(9, 100)];
    let estimate = estimate_distribution(
        &history,
        100,
        &HistoryFilter::default(),
        &EstimatorConfig::default(),
    )
    .unwrap();
    let series = distribution_series(&estimate);

    assert_eq!(series.len(), 100);
    assert!((series[0].0 - 0.01).abs() < 1e-12);
    assert!((series[99].0 - 1.0).abs() < 1e-12);
    for ((_, y), p) in series.iter().zip(&estimate.probabilities) {
        assert_eq!(y, p);
    }
}
