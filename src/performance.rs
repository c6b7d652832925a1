use serde::{Deserialize, Serialize};

use crate::record::{Format, TournamentRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_tournaments: usize,
    pub total_profit: f64,
    pub total_investment: f64,
    /// Percent; zero when nothing was invested.
    pub overall_roi: f64,
    pub itm_count: usize,
    /// Percent of tournaments cashed; zero over an empty history.
    pub itm_rate: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FormatBreakdown {
    pub live: PerformanceSummary,
    pub online: PerformanceSummary,
}

pub fn overall_performance(records: &[TournamentRecord]) -> PerformanceSummary {
    summarize(records.iter())
}

pub fn performance_by_format(records: &[TournamentRecord]) -> FormatBreakdown {
    FormatBreakdown {
        live: summarize(records.iter().filter(|r| r.format == Format::Live)),
        online: summarize(records.iter().filter(|r| r.format == Format::Online)),
    }
}

fn summarize<'a>(records: impl Iterator<Item = &'a TournamentRecord>) -> PerformanceSummary {
    let mut summary = PerformanceSummary::default();
    for record in records {
        summary.total_tournaments += 1;
        summary.total_investment += record.total_investment();
        summary.total_profit += record.profit();
        if record.in_the_money() {
            summary.itm_count += 1;
        }
    }
    if summary.total_investment > 0.0 {
        summary.overall_roi = summary.total_profit / summary.total_investment * 100.0;
    }
    if summary.total_tournaments > 0 {
        summary.itm_rate = summary.itm_count as f64 / summary.total_tournaments as f64 * 100.0;
    }
    summary
}

/// One export row per record, shaped for direct serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRow {
    pub venue: String,
    pub format: Format,
    pub played_at: String,
    pub buy_in: f64,
    pub rebuys: u32,
    pub add_on_cost: f64,
    pub total_investment: f64,
    pub total_entries: u32,
    pub position_finished: u32,
    pub prize_won: f64,
    pub profit: f64,
    pub roi_percent: f64,
    pub duration_hours: f64,
    pub notes: String,
}

pub fn record_rows(records: &[TournamentRecord]) -> Vec<RecordRow> {
    records
        .iter()
        .map(|record| RecordRow {
            venue: record.venue.clone(),
            format: record.format,
            played_at: record.played_at.clone(),
            buy_in: record.buy_in,
            rebuys: record.rebuys,
            add_on_cost: record.add_on_cost,
            total_investment: record.total_investment(),
            total_entries: record.total_entries,
            position_finished: record.position_finished,
            prize_won: record.prize_won,
            profit: record.profit(),
            roi_percent: record.roi_percent(),
            duration_hours: record.duration_hours,
            notes: record.notes.clone(),
        })
        .collect()
}
