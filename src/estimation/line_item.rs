//! Cost line item structures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::numeric::{coerce, NumericInput};

/// A line item as it arrives from outside the engine.
///
/// `quantity` and `unit_price` may be missing (treated as 0) or given as
/// text; they are only validated when the summary is generated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItemInput {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub quantity: Option<NumericInput>,

    #[serde(default)]
    pub unit_price: Option<NumericInput>,

    /// Cost type, e.g. "Fixed", "Variable", "Additional"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Any other attributes, carried through untouched
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl LineItemInput {
    pub fn new(
        description: impl Into<String>,
        quantity: impl Into<NumericInput>,
        unit_price: impl Into<NumericInput>,
    ) -> Self {
        Self {
            description: Some(description.into()),
            quantity: Some(quantity.into()),
            unit_price: Some(unit_price.into()),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Passthrough attributes minus any that would shadow a named or computed field
    pub(crate) fn passthrough_attributes(&self) -> BTreeMap<String, serde_json::Value> {
        self.attributes
            .iter()
            .filter(|(key, _)| !RESERVED_ATTRIBUTES.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Coerce the numeric fields; `index` is the item's position in its list
    pub(crate) fn coerce(&self, index: usize) -> Result<(f64, f64)> {
        let quantity = coerce(index, "quantity", self.quantity.as_ref())?;
        let unit_price = coerce(index, "unit_price", self.unit_price.as_ref())?;
        Ok((quantity, unit_price))
    }
}

/// Attribute names owned by the engine; passthrough copies are dropped
pub const RESERVED_ATTRIBUTES: [&str; 5] =
    ["description", "quantity", "unit_price", "line_subtotal", "category"];

/// A validated line item with its computed subtotal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub line_subtotal: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_loose_item() {
        let item: LineItemInput = serde_json::from_str(
            r#"{"description": "Crane hire", "quantity": "3", "unit_price": 450.5, "vendor": "Acme"}"#,
        )
        .unwrap();

        assert_eq!(item.description.as_deref(), Some("Crane hire"));
        assert_eq!(item.quantity, Some(NumericInput::Text("3".to_string())));
        assert_eq!(item.unit_price, Some(NumericInput::Number(450.5)));
        assert_eq!(item.attributes["vendor"], serde_json::json!("Acme"));
        assert_eq!(item.coerce(0).unwrap(), (3.0, 450.5));
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let item: LineItemInput = serde_json::from_str("{}").unwrap();
        assert!(item.description.is_none());
        assert_eq!(item.coerce(0).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn test_passthrough_drops_reserved_keys() {
        let mut item: LineItemInput =
            serde_json::from_str(r#"{"quantity": 2, "unit_price": 50, "line_subtotal": 999, "sku": "A1"}"#)
                .unwrap();
        item.attributes
            .insert("quantity".to_string(), serde_json::json!(7));

        let kept = item.passthrough_attributes();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept["sku"], serde_json::json!("A1"));
    }

    #[test]
    fn test_non_scalar_values_are_invalid_numeric_input() {
        let item: LineItemInput =
            serde_json::from_str(r#"{"quantity": true, "unit_price": 5}"#).unwrap();
        let err = item.coerce(0).unwrap_err();
        assert_eq!(err.to_string(), "line item 0: quantity is not numeric: \"true\"");

        let item: LineItemInput =
            serde_json::from_str(r#"{"quantity": 1, "unit_price": [5]}"#).unwrap();
        assert!(matches!(
            item.coerce(3),
            Err(crate::error::FinanceError::InvalidNumericInput { item: 3, field: "unit_price", .. })
        ));
    }

    #[test]
    fn test_coerce_reports_field() {
        let item = LineItemInput::new("Widgets", 2.0, "abc");
        let err = item.coerce(7).unwrap_err();
        assert_eq!(err.to_string(), "line item 7: unit_price is not numeric: \"abc\"");
    }
}
