use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

const DEFAULT_BUY_IN: f64 = 100.0;
const DEFAULT_FIELD_SIZE: u32 = 100;
const DEFAULT_RAKE_FRACTION: f64 = 0.10;
const DEFAULT_PAID_FRACTION: f64 = 0.15;

const BUYIN_WINDOW_LOW: f64 = 0.5;
const BUYIN_WINDOW_HIGH: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    Live,
    Online,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Live => "Live",
            Format::Online => "Online",
        }
    }

    pub fn parse(raw: &str) -> Option<Format> {
        match raw.trim().to_lowercase().as_str() {
            "live" => Some(Format::Live),
            "online" => Some(Format::Online),
            _ => None,
        }
    }
}

/// One completed tournament in the player's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentRecord {
    #[serde(default)]
    pub venue: String,
    pub format: Format,
    /// ISO `YYYY-MM-DD`; unparseable dates sort as oldest.
    #[serde(default)]
    pub played_at: String,
    pub buy_in: f64,
    #[serde(default)]
    pub rebuys: u32,
    #[serde(default)]
    pub add_on_cost: f64,
    pub total_entries: u32,
    pub position_finished: u32,
    #[serde(default)]
    pub prize_won: f64,
    #[serde(default)]
    pub duration_hours: f64,
    #[serde(default)]
    pub notes: String,
}

impl TournamentRecord {
    pub fn total_investment(&self) -> f64 {
        self.buy_in * (1.0 + self.rebuys as f64) + self.add_on_cost
    }

    pub fn profit(&self) -> f64 {
        self.prize_won - self.total_investment()
    }

    pub fn roi_percent(&self) -> f64 {
        let investment = self.total_investment();
        if investment <= 0.0 {
            return 0.0;
        }
        self.profit() / investment * 100.0
    }

    /// `position / entries` in (0, 1]; `None` for impossible records.
    pub fn finish_percentile(&self) -> Option<f64> {
        if self.total_entries == 0
            || self.position_finished == 0
            || self.position_finished > self.total_entries
        {
            return None;
        }
        Some(self.position_finished as f64 / self.total_entries as f64)
    }

    pub fn in_the_money(&self) -> bool {
        self.prize_won > 0.0
    }

    pub fn played_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.played_at.trim(), "%Y-%m-%d").ok()
    }
}

/// The tournament being considered, as opposed to one already played.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProspectiveTournament {
    pub buy_in: f64,
    pub field_size: u32,
    pub rake_fraction: f64,
    pub paid_fraction: f64,
    pub rebuys: u32,
    pub add_on_cost: f64,
}

impl Default for ProspectiveTournament {
    fn default() -> Self {
        Self {
            buy_in: DEFAULT_BUY_IN,
            field_size: DEFAULT_FIELD_SIZE,
            rake_fraction: DEFAULT_RAKE_FRACTION,
            paid_fraction: DEFAULT_PAID_FRACTION,
            rebuys: 0,
            add_on_cost: 0.0,
        }
    }
}

impl ProspectiveTournament {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.field_size == 0 {
            return Err(ModelError::InvalidParameter {
                what: "field_size",
                value: 0.0,
            });
        }
        if !self.buy_in.is_finite() || self.buy_in < 0.0 {
            return Err(ModelError::InvalidParameter {
                what: "buy_in",
                value: self.buy_in,
            });
        }
        if !(0.0..1.0).contains(&self.rake_fraction) {
            return Err(ModelError::InvalidParameter {
                what: "rake_fraction",
                value: self.rake_fraction,
            });
        }
        if !(self.paid_fraction > 0.0 && self.paid_fraction <= 1.0) {
            return Err(ModelError::InvalidParameter {
                what: "paid_fraction",
                value: self.paid_fraction,
            });
        }
        if !self.add_on_cost.is_finite() || self.add_on_cost < 0.0 {
            return Err(ModelError::InvalidParameter {
                what: "add_on_cost",
                value: self.add_on_cost,
            });
        }
        Ok(())
    }

    /// Cost term of the EV formula: buy-in plus rebuys, no add-on.
    pub fn cost(&self) -> f64 {
        self.buy_in * (1.0 + self.rebuys as f64)
    }

    /// Reporting basis for ROI: cost plus add-on.
    pub fn total_investment(&self) -> f64 {
        self.cost() + self.add_on_cost
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryFilter {
    pub format: Option<Format>,
    pub buyin_range: Option<(f64, f64)>,
    pub venue: Option<String>,
    /// Newest-N cut, applied first on the most-recent-first ordering.
    pub most_recent: Option<usize>,
}

impl HistoryFilter {
    /// The analysis default: stakes within half to double the buy-in.
    pub fn around_buy_in(buy_in: f64) -> Self {
        Self {
            buyin_range: Some((buy_in * BUYIN_WINDOW_LOW, buy_in * BUYIN_WINDOW_HIGH)),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &TournamentRecord) -> bool {
        if let Some(format) = self.format
            && record.format != format
        {
            return false;
        }
        if let Some((low, high)) = self.buyin_range
            && !(record.buy_in >= low && record.buy_in <= high)
        {
            return false;
        }
        if let Some(venue) = &self.venue
            && record.venue != *venue
        {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, records: &'a [TournamentRecord]) -> Vec<&'a TournamentRecord> {
        let window = match self.most_recent {
            Some(n) => most_recent(records, n),
            None => records,
        };
        window.iter().filter(|record| self.matches(record)).collect()
    }

    pub fn describe(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(n) = self.most_recent {
            out.push(format!("most_recent {n}"));
        }
        if let Some(format) = self.format {
            out.push(format!("format {}", format.as_str()));
        }
        if let Some((low, high)) = self.buyin_range {
            out.push(format!("buy_in {low:.2}..={high:.2}"));
        }
        if let Some(venue) = &self.venue {
            out.push(format!("venue {venue}"));
        }
        out
    }
}

pub fn sort_most_recent_first(records: &mut [TournamentRecord]) {
    records.sort_by(|a, b| b.played_date().cmp(&a.played_date()));
}

pub fn most_recent(records: &[TournamentRecord], n: usize) -> &[TournamentRecord] {
    &records[..n.min(records.len())]
}
