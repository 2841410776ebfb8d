//! Cash flow engine: net, cumulative and discounted flows over period series

mod engine;
mod statement;
pub mod metrics;

pub use engine::{
    apply_discount_rate, compute_cumulative_discounted_cash_flow, compute_cumulative_flow,
    compute_net_cash_flow, default_periods, generate_cash_flow_statement,
};
pub use statement::{CashFlowRequest, CashFlowStatement, StatementRow};
pub use metrics::KeyMetrics;
