use serde::{Deserialize, Serialize};

use crate::error::ModelError;

const DEFAULT_CURVE_EXPONENT: f64 = 1.3;
const DEFAULT_ROUNDING_UNIT: f64 = 5.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Power-law exponent; higher concentrates the pool at 1st place.
    pub exponent: f64,
    /// Payouts round to the nearest multiple of this currency unit.
    pub rounding_unit: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            exponent: DEFAULT_CURVE_EXPONENT,
            rounding_unit: DEFAULT_ROUNDING_UNIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutCurve {
    pub prize_pool: f64,
    pub num_paid: usize,
    /// Index 0 is 1st place.
    pub payouts: Vec<f64>,
}

impl PayoutCurve {
    /// Prize for a 1-based finishing position, zero beyond the paid seats.
    pub fn payout_for(&self, position: u32) -> f64 {
        if position == 0 {
            return 0.0;
        }
        self.payouts.get(position as usize - 1).copied().unwrap_or(0.0)
    }
}

/// Distributes the prize pool across paid seats with power-law weights
/// `1/(i+1)^k`, rounds each payout to the configured unit, then adds the
/// rounding residual entirely to 1st place so the table sums exactly to
/// the pool. First place is whatever remains once the lower payouts are
/// fixed to clean numbers.
pub fn payout_curve(
    field_size: u32,
    buy_in: f64,
    rake_fraction: f64,
    paid_fraction: f64,
    config: &CurveConfig,
) -> Result<PayoutCurve, ModelError> {
    if field_size == 0 {
        return Err(ModelError::InvalidParameter {
            what: "field_size",
            value: 0.0,
        });
    }
    if !buy_in.is_finite() || buy_in < 0.0 {
        return Err(ModelError::InvalidParameter {
            what: "buy_in",
            value: buy_in,
        });
    }
    if !(0.0..1.0).contains(&rake_fraction) {
        return Err(ModelError::InvalidParameter {
            what: "rake_fraction",
            value: rake_fraction,
        });
    }
    if !(paid_fraction > 0.0 && paid_fraction <= 1.0) {
        return Err(ModelError::InvalidParameter {
            what: "paid_fraction",
            value: paid_fraction,
        });
    }
    if !(config.exponent.is_finite() && config.exponent > 0.0) {
        return Err(ModelError::InvalidParameter {
            what: "exponent",
            value: config.exponent,
        });
    }
    if !(config.rounding_unit.is_finite() && config.rounding_unit > 0.0) {
        return Err(ModelError::InvalidParameter {
            what: "rounding_unit",
            value: config.rounding_unit,
        });
    }

    let prize_pool = field_size as f64 * buy_in * (1.0 - rake_fraction);
    let num_paid = ((field_size as f64 * paid_fraction).floor() as usize)
        .max(1)
        .min(field_size as usize);

    let weights: Vec<f64> = (0..num_paid)
        .map(|i| 1.0 / ((i + 1) as f64).powf(config.exponent))
        .collect();
    let weight_total: f64 = weights.iter().sum();

    let unit = config.rounding_unit;
    let mut payouts: Vec<f64> = weights
        .iter()
        .map(|w| {
            let raw = w / weight_total * prize_pool;
            (raw / unit).round() * unit
        })
        .collect();

    let residual = prize_pool - payouts.iter().sum::<f64>();
    payouts[0] += residual;

    Ok(PayoutCurve {
        prize_pool,
        num_paid,
        payouts,
    })
}
