//! Line item rollup arithmetic

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::line_item::{CostLineItem, LineItemInput};

/// Inbound estimation request as supplied by the surrounding service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimationRequest {
    pub line_items: Vec<LineItemInput>,

    #[serde(default)]
    pub tax_rate: f64,
}

impl EstimationRequest {
    pub fn evaluate(&self) -> Result<EstimationSummary> {
        generate_estimation_summary(&self.line_items, self.tax_rate)
    }
}

/// Enriched line items with their aggregate totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationSummary {
    /// Items in input order
    pub line_items: Vec<CostLineItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub grand_total: f64,
}

/// Quantity times unit price. Negative quantities (credits, returns) pass through.
pub fn calculate_line_item(quantity: f64, unit_price: f64) -> f64 {
    quantity * unit_price
}

/// Sum of line totals; 0.0 when empty
pub fn calculate_subtotal(line_totals: &[f64]) -> f64 {
    line_totals.iter().fold(0.0, |total, line| total + line)
}

pub fn calculate_tax(subtotal: f64, tax_rate: f64) -> f64 {
    subtotal * tax_rate
}

pub fn calculate_grand_total(subtotal: f64, tax: f64) -> f64 {
    subtotal + tax
}

/// Validate, enrich and total a list of line items.
///
/// Fails on the first item whose quantity or unit price is not numeric; no
/// partial summary is produced. Pass a `tax_rate` of 0.0 for untaxed totals.
pub fn generate_estimation_summary(
    line_items: &[LineItemInput],
    tax_rate: f64,
) -> Result<EstimationSummary> {
    let mut computed = Vec::with_capacity(line_items.len());
    let mut line_totals = Vec::with_capacity(line_items.len());

    for (index, item) in line_items.iter().enumerate() {
        let (quantity, unit_price) = item.coerce(index)?;
        let line_subtotal = calculate_line_item(quantity, unit_price);

        computed.push(CostLineItem {
            description: item.description.clone().unwrap_or_default(),
            quantity,
            unit_price,
            line_subtotal,
            category: item.category.clone(),
            attributes: item.passthrough_attributes(),
        });
        line_totals.push(line_subtotal);
    }

    let subtotal = calculate_subtotal(&line_totals);
    let tax = calculate_tax(subtotal, tax_rate);
    let grand_total = calculate_grand_total(subtotal, tax);

    log::debug!(
        "Estimation summary over {} items: subtotal {:.2}, tax {:.2}",
        computed.len(),
        subtotal,
        tax
    );

    Ok(EstimationSummary {
        line_items: computed,
        subtotal,
        tax,
        grand_total,
    })
}
