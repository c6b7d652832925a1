//! Tournament poker coaching core: payout curves, personalized finishing
//! distributions, expected value, and performance aggregates.

pub mod config;
pub mod error;
pub mod estimator;
pub mod ev;
pub mod fake_history;
pub mod payout;
pub mod performance;
pub mod record;
pub mod sweep;
