//! Cost estimation engine: line item rollups, tax and grand total

mod line_item;
mod engine;
mod breakdown;

pub use line_item::{CostLineItem, LineItemInput, RESERVED_ATTRIBUTES};
pub use engine::{
    calculate_grand_total, calculate_line_item, calculate_subtotal, calculate_tax,
    generate_estimation_summary, EstimationRequest, EstimationSummary,
};
pub use breakdown::{breakdown_by_category, CategoryTotal, UNCATEGORIZED};
