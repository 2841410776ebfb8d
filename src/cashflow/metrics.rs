//! Key metrics derived from a cash flow statement
//!
//! NPV, internal rate of return and break-even period, reported alongside
//! the period tables of a projection.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::numeric::ensure_same_length;

use super::engine::{apply_discount_rate, default_periods};
use super::statement::CashFlowStatement;

/// Headline metrics for a projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    /// Net present value at the statement's discount rate
    pub npv: f64,
    /// Per-period internal rate of return, if one exists
    pub irr: Option<f64>,
    /// Fractional number of periods until cumulative flow recovers
    pub break_even: Option<f64>,
}

impl KeyMetrics {
    pub fn from_statement(statement: &CashFlowStatement) -> Self {
        Self {
            npv: statement.net_present_value(),
            irr: internal_rate_of_return(&statement.net_cash_flow, Some(statement.periods.as_slice())),
            break_even: break_even_period(
                &statement.net_cash_flow,
                Some(statement.periods.as_slice()),
            ),
        }
    }
}

/// Sum of the discounted series; 0.0 for an empty series
pub fn net_present_value(cash_flows: &[f64], rate: f64, periods: Option<&[u32]>) -> Result<f64> {
    let discounted = apply_discount_rate(cash_flows, rate, periods)?;
    Ok(discounted.iter().fold(0.0, |total, cf| total + cf))
}

/// Per-period rate at which the NPV of the flows is zero.
///
/// Uses Newton-Raphson and falls back to bisection over [-0.99, 10] when the
/// derivative vanishes, iteration does not converge, or Newton settles on a
/// bound without zeroing the NPV. Returns `None` for an empty series, a series
/// without a sign change, mismatched periods, or a root outside the bracket.
pub fn internal_rate_of_return(cash_flows: &[f64], periods: Option<&[u32]>) -> Option<f64> {
    if cash_flows.is_empty() {
        return None;
    }
    let periods = match periods {
        Some(periods) => periods.to_vec(),
        None => default_periods(cash_flows.len()),
    };
    ensure_same_length("cash_flows/periods", cash_flows.len(), periods.len()).ok()?;

    if cashflows_all_zero(cash_flows) {
        return Some(0.0);
    }

    let has_positive = cash_flows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cash_flows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return None;
    }

    let npv_tolerance = 1e-8 * cash_flows.iter().map(|cf| cf.abs()).sum::<f64>();
    let mut rate = 0.05;
    let tolerance = 1e-10;
    let max_iterations = 1000;

    for _ in 0..max_iterations {
        let (npv, dnpv) = npv_and_derivative(cash_flows, &periods, rate);

        if dnpv.abs() < 1e-20 {
            return irr_bisection(cash_flows, &periods);
        }

        let new_rate = (rate - npv / dnpv).clamp(-0.99, 10.0);

        if (new_rate - rate).abs() < tolerance {
            // A guess pinned at the clamp stops moving without being a root
            if npv_at_rate(cash_flows, &periods, new_rate).abs() <= npv_tolerance {
                return Some(new_rate);
            }
            return irr_bisection(cash_flows, &periods);
        }

        rate = new_rate;
    }

    irr_bisection(cash_flows, &periods)
}

fn cashflows_all_zero(cash_flows: &[f64]) -> bool {
    cash_flows.iter().all(|&cf| cf.abs() < 1e-10)
}

fn npv_and_derivative(cash_flows: &[f64], periods: &[u32], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (&cf, &period) in cash_flows.iter().zip(periods) {
        let t = period as f64;
        npv += cf / (1.0 + rate).powf(t);
        dnpv -= t * cf / (1.0 + rate).powf(t + 1.0);
    }

    (npv, dnpv)
}

fn npv_at_rate(cash_flows: &[f64], periods: &[u32], rate: f64) -> f64 {
    cash_flows
        .iter()
        .zip(periods)
        .map(|(&cf, &period)| cf / (1.0 + rate).powf(period as f64))
        .sum()
}

fn irr_bisection(cash_flows: &[f64], periods: &[u32]) -> Option<f64> {
    let mut low = -0.99_f64;
    let mut high = 10.0_f64;
    let tolerance = 1e-10;

    let mut npv_low = npv_at_rate(cash_flows, periods, low);
    let npv_high = npv_at_rate(cash_flows, periods, high);
    if npv_low * npv_high > 0.0 {
        return None;
    }

    for _ in 0..1000 {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cash_flows, periods, mid);

        if npv_mid.abs() < tolerance || (high - low) / 2.0 < tolerance {
            return Some(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

/// Convert a per-period rate to an effective annual rate
pub fn annualize(periodic_rate: f64, periods_per_year: u32) -> f64 {
    (1.0 + periodic_rate).powi(periods_per_year as i32) - 1.0
}

/// Period at which cumulative net flow climbs out of its last deficit,
/// interpolating linearly between the deficit period and the next one.
///
/// Measured in the same period units used for discounting (1..=N when
/// `periods` is `None`). `Some(0.0)` if the cumulative flow never goes
/// negative, `None` if it ends negative or the periods are mismatched.
pub fn break_even_period(net_flows: &[f64], periods: Option<&[u32]>) -> Option<f64> {
    let periods = match periods {
        Some(periods) => periods.to_vec(),
        None => default_periods(net_flows.len()),
    };
    ensure_same_length("cash_flows/periods", net_flows.len(), periods.len()).ok()?;

    let mut cumulative = 0.0;
    let mut last_deficit: Option<(usize, f64)> = None;
    for (i, flow) in net_flows.iter().enumerate() {
        cumulative += flow;
        if cumulative < 0.0 {
            last_deficit = Some((i, cumulative));
        }
    }

    match last_deficit {
        None => Some(0.0),
        Some((i, _)) if i + 1 == net_flows.len() => None,
        Some((i, deficit)) => {
            let start = periods[i] as f64;
            let span = periods[i + 1] as f64 - start;
            Some(start + span * (-deficit / net_flows[i + 1]))
        }
    }
}
