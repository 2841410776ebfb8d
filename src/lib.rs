//! Project Finance - deterministic engines behind project financial projections
//!
//! This library provides:
//! - Cash flow statements (net, cumulative, discounted, cumulative discounted)
//! - Key metrics (NPV, IRR, break-even period)
//! - Cost estimation summaries (line subtotals, tax, grand total, category breakdown)
//! - CSV/JSON loaders and a discount-rate scenario runner

pub mod error;
pub mod numeric;
pub mod cashflow;
pub mod estimation;
pub mod loader;
pub mod scenario;

// Re-export commonly used types
pub use error::{FinanceError, Result};
pub use cashflow::{generate_cash_flow_statement, CashFlowRequest, CashFlowStatement, KeyMetrics};
pub use estimation::{
    generate_estimation_summary, CostLineItem, EstimationRequest, EstimationSummary, LineItemInput,
};
pub use loader::CashFlowSeries;
pub use scenario::{ScenarioResult, ScenarioRunner};
