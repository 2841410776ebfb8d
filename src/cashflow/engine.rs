//! Period-by-period cash flow arithmetic

use crate::error::Result;
use crate::numeric::{ensure_same_length, running_total};

use super::statement::CashFlowStatement;

/// Net flow per period (inflow minus outflow)
pub fn compute_net_cash_flow(inflows: &[f64], outflows: &[f64]) -> Result<Vec<f64>> {
    ensure_same_length("inflows/outflows", inflows.len(), outflows.len())?;
    Ok(inflows
        .iter()
        .zip(outflows)
        .map(|(inflow, outflow)| inflow - outflow)
        .collect())
}

/// Cumulative flow up to and including each period
pub fn compute_cumulative_flow(net_flows: &[f64]) -> Vec<f64> {
    running_total(net_flows)
}

/// Sequential 1-based period indices for a series of `len` flows
pub fn default_periods(len: usize) -> Vec<u32> {
    (1..=len as u32).collect()
}

/// Present value of each flow: `cash_flows[i] / (1 + discount_rate)^periods[i]`.
///
/// Without explicit periods the flows are taken to fall in periods 1..=N.
/// A rate of exactly -1 divides by zero and yields infinities or NaN.
pub fn apply_discount_rate(
    cash_flows: &[f64],
    discount_rate: f64,
    periods: Option<&[u32]>,
) -> Result<Vec<f64>> {
    let defaulted;
    let periods = match periods {
        Some(periods) => periods,
        None => {
            defaulted = default_periods(cash_flows.len());
            &defaulted[..]
        }
    };
    ensure_same_length("cash_flows/periods", cash_flows.len(), periods.len())?;

    let growth = 1.0 + discount_rate;
    Ok(cash_flows
        .iter()
        .zip(periods)
        .map(|(cf, &period)| cf / growth.powf(period as f64))
        .collect())
}

/// Running total of already-discounted flows
pub fn compute_cumulative_discounted_cash_flow(discounted: &[f64]) -> Vec<f64> {
    running_total(discounted)
}

/// Build the full statement: net, cumulative(net), discount(net),
/// cumulative(discounted).
///
/// Discounting is applied to the net series, never to inflows and outflows
/// separately.
pub fn generate_cash_flow_statement(
    inflows: &[f64],
    outflows: &[f64],
    discount_rate: f64,
    periods: Option<&[u32]>,
) -> Result<CashFlowStatement> {
    let net_cash_flow = compute_net_cash_flow(inflows, outflows)?;
    let cumulative_cash_flow = compute_cumulative_flow(&net_cash_flow);
    let discounted_cash_flow = apply_discount_rate(&net_cash_flow, discount_rate, periods)?;
    let cumulative_discounted_cash_flow =
        compute_cumulative_discounted_cash_flow(&discounted_cash_flow);

    let periods = match periods {
        Some(periods) => periods.to_vec(),
        None => default_periods(net_cash_flow.len()),
    };

    log::debug!(
        "Cash flow statement over {} periods at rate {}",
        net_cash_flow.len(),
        discount_rate
    );

    Ok(CashFlowStatement {
        periods,
        net_cash_flow,
        cumulative_cash_flow,
        discounted_cash_flow,
        cumulative_discounted_cash_flow,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FinanceError;
    use approx::assert_relative_eq;

    #[test]
    fn test_net_cash_flow() {
        let net = compute_net_cash_flow(&[100.0, 200.0, 150.0], &[50.0, 80.0, 150.0]).unwrap();
        assert_eq!(net, vec![50.0, 120.0, 0.0]);
    }

    #[test]
    fn test_net_cash_flow_length_mismatch() {
        let err = compute_net_cash_flow(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(err, FinanceError::LengthMismatch { what: "inflows/outflows", .. }));
    }

    #[test]
    fn test_cumulative_flow() {
        assert_eq!(compute_cumulative_flow(&[50.0, 120.0, 0.0]), vec![50.0, 170.0, 170.0]);
        assert!(compute_cumulative_flow(&[]).is_empty());
    }

    #[test]
    fn test_discount_default_periods() {
        let discounted = apply_discount_rate(&[100.0, 100.0, 100.0], 0.1, None).unwrap();
        assert_relative_eq!(discounted[0], 90.909_090_9, epsilon = 1e-6);
        assert_relative_eq!(discounted[1], 82.644_628_1, epsilon = 1e-6);
        assert_relative_eq!(discounted[2], 75.131_480_1, epsilon = 1e-6);
        assert!(discounted.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_discount_explicit_periods() {
        let discounted = apply_discount_rate(&[121.0, 100.0], 0.1, Some(&[2, 0])).unwrap();
        assert_relative_eq!(discounted[0], 100.0, epsilon = 1e-9);
        assert_eq!(discounted[1], 100.0);
    }

    #[test]
    fn test_discount_period_mismatch() {
        let err = apply_discount_rate(&[1.0, 2.0, 3.0], 0.1, Some(&[1, 2])).unwrap_err();
        assert!(matches!(
            err,
            FinanceError::LengthMismatch { what: "cash_flows/periods", expected: 3, actual: 2 }
        ));
    }

    #[test]
    fn test_discount_rate_of_minus_one_is_not_clamped() {
        let discounted = apply_discount_rate(&[100.0, -5.0, 0.0], -1.0, None).unwrap();
        assert_eq!(discounted[0], f64::INFINITY);
        assert_eq!(discounted[1], f64::NEG_INFINITY);
        assert!(discounted[2].is_nan());
    }

    #[test]
    fn test_discount_rate_below_minus_one_passes_through() {
        // 1 + rate = -1: odd periods flip sign, even periods do not
        let discounted = apply_discount_rate(&[100.0, 100.0, 100.0], -2.0, None).unwrap();
        assert_eq!(discounted, vec![-100.0, 100.0, -100.0]);

        // 1 + rate = -0.5
        let discounted = apply_discount_rate(&[10.0, 10.0], -1.5, None).unwrap();
        assert_relative_eq!(discounted[0], -20.0, epsilon = 1e-12);
        assert_relative_eq!(discounted[1], 40.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_rate_leaves_flows_unchanged() {
        let flows = [10.0, -20.0, 30.0];
        assert_eq!(apply_discount_rate(&flows, 0.0, None).unwrap(), flows.to_vec());
    }

    #[test]
    fn test_statement_composition() {
        let statement =
            generate_cash_flow_statement(&[1000.0, 1000.0], &[400.0, 500.0], 0.05, None).unwrap();

        assert_eq!(statement.periods, vec![1, 2]);
        assert_eq!(statement.net_cash_flow, vec![600.0, 500.0]);
        assert_eq!(statement.cumulative_cash_flow, vec![600.0, 1100.0]);
        assert_relative_eq!(statement.discounted_cash_flow[0], 600.0 / 1.05, epsilon = 1e-9);
        assert_relative_eq!(statement.discounted_cash_flow[1], 500.0 / 1.1025, epsilon = 1e-9);
        assert_relative_eq!(statement.cumulative_discounted_cash_flow[0], 571.43, epsilon = 0.01);
        assert_relative_eq!(statement.cumulative_discounted_cash_flow[1], 1024.94, epsilon = 0.01);
    }

    #[test]
    fn test_statement_discounts_net_not_gross() {
        let statement =
            generate_cash_flow_statement(&[300.0, 0.0], &[100.0, 50.0], 0.1, None).unwrap();
        let expected_last = 200.0 / 1.1 - 50.0 / 1.21;
        assert_relative_eq!(
            statement.cumulative_discounted_cash_flow[1],
            expected_last,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_statement_propagates_mismatch() {
        assert!(matches!(
            generate_cash_flow_statement(&[1.0], &[1.0, 2.0], 0.05, None),
            Err(FinanceError::LengthMismatch { what: "inflows/outflows", .. })
        ));
        assert!(matches!(
            generate_cash_flow_statement(&[1.0, 2.0], &[1.0, 2.0], 0.05, Some(&[1])),
            Err(FinanceError::LengthMismatch { what: "cash_flows/periods", .. })
        ));
    }

    #[test]
    fn test_statement_empty() {
        let statement = generate_cash_flow_statement(&[], &[], 0.05, None).unwrap();
        assert!(statement.net_cash_flow.is_empty());
        assert!(statement.cumulative_discounted_cash_flow.is_empty());
        assert!(statement.periods.is_empty());
    }
}
