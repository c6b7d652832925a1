use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::estimator::EstimatorConfig;
use crate::payout::CurveConfig;
use crate::record::ProspectiveTournament;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    pub curve: CurveConfig,
    pub estimator: EstimatorConfig,
}

static DEFAULT_PROSPECT: Lazy<ProspectiveTournament> = Lazy::new(prospect_from_env);

/// Stakes the demo binaries start from when no flags are given,
/// overridable through `COACH_DEFAULT_*` environment variables. The model
/// functions themselves never read this; their tunables always arrive as
/// parameters.
pub fn default_prospect() -> ProspectiveTournament {
    *DEFAULT_PROSPECT
}

fn prospect_from_env() -> ProspectiveTournament {
    let base = ProspectiveTournament::default();
    ProspectiveTournament {
        buy_in: env_f64("COACH_DEFAULT_BUY_IN").unwrap_or(base.buy_in),
        field_size: env_u32("COACH_DEFAULT_FIELD_SIZE").unwrap_or(base.field_size),
        rake_fraction: env_f64("COACH_DEFAULT_RAKE").unwrap_or(base.rake_fraction),
        paid_fraction: env_f64("COACH_DEFAULT_PAID").unwrap_or(base.paid_fraction),
        ..base
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
}

fn env_u32(key: &str) -> Option<u32> {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
}
