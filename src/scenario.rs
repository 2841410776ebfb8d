//! Scenario runner for discount-rate sensitivity
//!
//! Holds one cash flow series and evaluates it under many discount rates.
//! Statements share no state, so rates are evaluated in parallel.

use rayon::prelude::*;
use serde::Serialize;

use crate::cashflow::{generate_cash_flow_statement, CashFlowStatement, KeyMetrics};
use crate::error::Result;
use crate::loader::CashFlowSeries;
use crate::numeric::ensure_same_length;

/// Statement and headline metrics for one discount rate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    pub discount_rate: f64,
    pub statement: CashFlowStatement,
    pub metrics: KeyMetrics,
}

/// Pre-validated cash flow series for batch evaluation
///
/// # Example
/// ```
/// use project_finance::ScenarioRunner;
///
/// let runner = ScenarioRunner::new(vec![0.0, 700.0], vec![1000.0, 100.0], None)?;
/// let results = runner.run_rates(&[0.03, 0.05, 0.08])?;
/// assert_eq!(results.len(), 3);
/// # Ok::<(), project_finance::FinanceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    series: CashFlowSeries,
}

impl ScenarioRunner {
    /// Create a runner, rejecting mismatched series up front
    pub fn new(inflows: Vec<f64>, outflows: Vec<f64>, periods: Option<Vec<u32>>) -> Result<Self> {
        Self::from_series(CashFlowSeries {
            periods,
            inflows,
            outflows,
        })
    }

    pub fn from_series(series: CashFlowSeries) -> Result<Self> {
        ensure_same_length("inflows/outflows", series.inflows.len(), series.outflows.len())?;
        if let Some(ref periods) = series.periods {
            ensure_same_length("cash_flows/periods", series.inflows.len(), periods.len())?;
        }
        Ok(Self { series })
    }

    /// Run a single rate
    pub fn run(&self, discount_rate: f64) -> Result<ScenarioResult> {
        let statement = generate_cash_flow_statement(
            &self.series.inflows,
            &self.series.outflows,
            discount_rate,
            self.series.periods.as_deref(),
        )?;
        let metrics = KeyMetrics::from_statement(&statement);
        Ok(ScenarioResult {
            discount_rate,
            statement,
            metrics,
        })
    }

    /// Run every rate; results come back in the order the rates were given
    pub fn run_rates(&self, rates: &[f64]) -> Result<Vec<ScenarioResult>> {
        log::info!(
            "Running {} discount-rate scenarios over {} periods",
            rates.len(),
            self.series.len()
        );
        rates.par_iter().map(|&rate| self.run(rate)).collect()
    }

    pub fn series(&self) -> &CashFlowSeries {
        &self.series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FinanceError;

    fn runner() -> ScenarioRunner {
        ScenarioRunner::new(
            vec![0.0, 700.0, 700.0, 700.0],
            vec![1500.0, 100.0, 100.0, 100.0],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_mismatched_series() {
        assert!(matches!(
            ScenarioRunner::new(vec![1.0, 2.0], vec![1.0], None),
            Err(FinanceError::LengthMismatch { what: "inflows/outflows", .. })
        ));
        assert!(matches!(
            ScenarioRunner::new(vec![1.0, 2.0], vec![1.0, 2.0], Some(vec![1])),
            Err(FinanceError::LengthMismatch { what: "cash_flows/periods", .. })
        ));
    }

    #[test]
    fn test_results_keep_rate_order() {
        let rates = [0.08, 0.01, 0.05];
        let results = runner().run_rates(&rates).unwrap();
        let returned: Vec<f64> = results.iter().map(|r| r.discount_rate).collect();
        assert_eq!(returned, rates.to_vec());
    }

    #[test]
    fn test_higher_rate_lowers_npv() {
        let results = runner().run_rates(&[0.01, 0.05, 0.10]).unwrap();
        assert!(results[0].metrics.npv > results[1].metrics.npv);
        assert!(results[1].metrics.npv > results[2].metrics.npv);

        // Undiscounted series is identical across scenarios
        assert_eq!(
            results[0].statement.cumulative_cash_flow,
            results[2].statement.cumulative_cash_flow
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let runner = runner();
        let rates: Vec<f64> = (0..32).map(|i| i as f64 * 0.005).collect();
        let parallel = runner.run_rates(&rates).unwrap();
        for (rate, result) in rates.iter().zip(&parallel) {
            assert_eq!(result, &runner.run(*rate).unwrap());
        }
    }
}
