//! Cash flow statement output structures

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Inbound cash flow request as supplied by the surrounding service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowRequest {
    pub inflows: Vec<f64>,
    pub outflows: Vec<f64>,

    /// Per-period fractional rate; required, never defaulted
    pub discount_rate: f64,

    /// 1-based period indices; defaults to 1..=N
    #[serde(default)]
    pub periods: Option<Vec<u32>>,
}

impl CashFlowRequest {
    /// Run the request through the engine
    pub fn evaluate(&self) -> Result<CashFlowStatement> {
        super::generate_cash_flow_statement(
            &self.inflows,
            &self.outflows,
            self.discount_rate,
            self.periods.as_deref(),
        )
    }
}

/// Derived cash flow statement for one request.
///
/// All series have the same length and are indexed like the inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    /// Period index each entry was discounted over
    pub periods: Vec<u32>,
    pub net_cash_flow: Vec<f64>,
    pub cumulative_cash_flow: Vec<f64>,
    pub discounted_cash_flow: Vec<f64>,
    pub cumulative_discounted_cash_flow: Vec<f64>,
}

/// One period of a statement, laid out as a table row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub period: u32,
    pub net_cash_flow: f64,
    pub cumulative_cash_flow: f64,
    pub discounted_cash_flow: f64,
    pub cumulative_discounted_cash_flow: f64,
}

impl CashFlowStatement {
    /// Number of periods covered
    pub fn len(&self) -> usize {
        self.net_cash_flow.len()
    }

    pub fn is_empty(&self) -> bool {
        self.net_cash_flow.is_empty()
    }

    /// Per-period rows in period order.
    ///
    /// Stops at the shortest series if a hand-built statement is ragged.
    pub fn rows(&self) -> impl Iterator<Item = StatementRow> + '_ {
        self.periods
            .iter()
            .zip(&self.net_cash_flow)
            .zip(&self.cumulative_cash_flow)
            .zip(&self.discounted_cash_flow)
            .zip(&self.cumulative_discounted_cash_flow)
            .map(|((((&period, &net), &cumulative), &discounted), &cumulative_discounted)| {
                StatementRow {
                    period,
                    net_cash_flow: net,
                    cumulative_cash_flow: cumulative,
                    discounted_cash_flow: discounted,
                    cumulative_discounted_cash_flow: cumulative_discounted,
                }
            })
    }

    /// Undiscounted total over all periods
    pub fn total_net_cash_flow(&self) -> f64 {
        self.cumulative_cash_flow.last().copied().unwrap_or(0.0)
    }

    /// Present value of the whole net series
    pub fn net_present_value(&self) -> f64 {
        self.cumulative_discounted_cash_flow.last().copied().unwrap_or(0.0)
    }
}
