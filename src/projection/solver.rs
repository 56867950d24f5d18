//! Inverse projections: what it takes to hit a target
//!
//! Used by the simulator to suggest a monthly contribution, and to report the
//! return a plan implicitly relies on.

use super::engine::{horizon_months, projected_future_value};
use crate::error::{ProjectionError, Result};
use crate::goal::{check_non_negative, check_positive};

/// Monthly contribution that makes the projected value equal `target_amount`.
///
/// Returns 0 when the current amount alone already reaches the target.
/// `rate` is the monthly decimal rate.
pub fn required_monthly_contribution(
    current_amount: f64,
    target_amount: f64,
    rate: f64,
    months: u32,
) -> Result<f64> {
    check_non_negative("current amount", current_amount)?;
    check_positive("target amount", target_amount)?;

    let n = horizon_months(months)?;
    let lump_sum = projected_future_value(current_amount, 0.0, rate, n);
    if lump_sum >= target_amount {
        return Ok(0.0);
    }
    if months == 0 {
        return Err(ProjectionError::InvalidHorizon(
            "target not reached and no months remain".to_string(),
        ));
    }

    let shortfall = target_amount - lump_sum;
    if rate == 0.0 {
        return Ok(shortfall / months as f64);
    }
    let growth = (1.0 + rate).powi(n);
    Ok(shortfall * rate / (growth - 1.0))
}

/// Annual return (percent) needed to reach `target_amount`, searched in `[0, max_annual_pct]`.
///
/// Returns `None` when even the maximum return falls short.
pub fn required_annual_return(
    current_amount: f64,
    monthly_contribution: f64,
    target_amount: f64,
    months: u32,
    max_annual_pct: f64,
) -> Result<Option<f64>> {
    check_non_negative("current amount", current_amount)?;
    check_non_negative("monthly contribution", monthly_contribution)?;
    check_positive("target amount", target_amount)?;

    let n = horizon_months(months)?;
    let value_at =
        |monthly: f64| projected_future_value(current_amount, monthly_contribution, monthly, n);

    if value_at(0.0) >= target_amount {
        return Ok(Some(0.0));
    }

    let mut low = 0.0_f64;
    let mut high = max_annual_pct / 100.0 / 12.0;
    if months == 0 || value_at(high) < target_amount {
        return Ok(None);
    }

    // Future value is increasing in the rate, so plain bisection converges
    let tolerance = 1e-12;
    let max_iterations = 200;

    for _ in 0..max_iterations {
        let mid = (low + high) / 2.0;
        if value_at(mid) < target_amount {
            low = mid;
        } else {
            high = mid;
        }
        if high - low < tolerance {
            break;
        }
    }

    Ok(Some(high * 12.0 * 100.0))
}
