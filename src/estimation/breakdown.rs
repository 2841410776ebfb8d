//! Cost breakdown by category (Fixed, Variable, Additional, ...)

use serde::{Deserialize, Serialize};

use super::engine::{calculate_subtotal, EstimationSummary};

/// Label used for items without a category
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub item_count: usize,
    pub subtotal: f64,
}

/// Group line subtotals by category, in the order categories first appear
pub fn breakdown_by_category(summary: &EstimationSummary) -> Vec<CategoryTotal> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: Vec<Vec<f64>> = Vec::new();

    for item in &summary.line_items {
        let category = item.category.as_deref().unwrap_or(UNCATEGORIZED);
        let slot = match order.iter().position(|c| *c == category) {
            Some(slot) => slot,
            None => {
                order.push(category);
                totals.push(Vec::new());
                order.len() - 1
            }
        };
        totals[slot].push(item.line_subtotal);
    }

    order
        .into_iter()
        .zip(totals)
        .map(|(category, line_totals)| CategoryTotal {
            category: category.to_string(),
            item_count: line_totals.len(),
            subtotal: calculate_subtotal(&line_totals),
        })
        .collect()
}
