//! Load cash flow series and line items from CSV or JSON files

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::Reader;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::cashflow::CashFlowRequest;
use crate::error::Result;
use crate::estimation::LineItemInput;
use crate::numeric::{ensure_same_length, NumericInput};

/// Parallel period series read from a `period,inflow,outflow` table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CashFlowSeries {
    /// Explicit period indices, or `None` when the column is blank throughout
    pub periods: Option<Vec<u32>>,
    pub inflows: Vec<f64>,
    pub outflows: Vec<f64>,
}

impl CashFlowSeries {
    pub fn len(&self) -> usize {
        self.inflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inflows.is_empty()
    }

    /// Attach a discount rate to form a full engine request
    pub fn into_request(self, discount_rate: f64) -> CashFlowRequest {
        CashFlowRequest {
            inflows: self.inflows,
            outflows: self.outflows,
            discount_rate,
            periods: self.periods,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CashFlowCsvRow {
    #[serde(default)]
    period: Option<u32>,
    inflow: f64,
    outflow: f64,
}

/// Raw line item row; numeric cells stay as text until the engine coerces them
#[derive(Debug, Deserialize)]
struct LineItemCsvRow {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    quantity: Option<String>,
    #[serde(default)]
    unit_price: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

impl LineItemCsvRow {
    fn into_input(self) -> LineItemInput {
        LineItemInput {
            description: self.description,
            quantity: self.quantity.map(NumericInput::Text),
            unit_price: self.unit_price.map(NumericInput::Text),
            category: self.category.filter(|c| !c.is_empty()),
            ..LineItemInput::default()
        }
    }
}

/// Load a cash flow series from a CSV file
pub fn load_cash_flows<P: AsRef<Path>>(path: P) -> Result<CashFlowSeries> {
    let file = File::open(path.as_ref())?;
    let series = load_cash_flows_from_reader(file)?;
    log::info!(
        "Loaded {} periods from {}",
        series.len(),
        path.as_ref().display()
    );
    Ok(series)
}

/// Load a cash flow series from any reader (string buffer, stdin, ...)
pub fn load_cash_flows_from_reader<R: Read>(reader: R) -> Result<CashFlowSeries> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut series = CashFlowSeries::default();
    let mut periods = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CashFlowCsvRow = result?;
        periods.extend(row.period);
        series.inflows.push(row.inflow);
        series.outflows.push(row.outflow);
    }

    if !periods.is_empty() {
        ensure_same_length("cash_flows/periods", series.len(), periods.len())?;
        series.periods = Some(periods);
    }

    Ok(series)
}

/// Load line items from a CSV file
pub fn load_line_items<P: AsRef<Path>>(path: P) -> Result<Vec<LineItemInput>> {
    let file = File::open(path.as_ref())?;
    let items = load_line_items_from_reader(file)?;
    log::info!(
        "Loaded {} line items from {}",
        items.len(),
        path.as_ref().display()
    );
    Ok(items)
}

/// Load line items from any reader
pub fn load_line_items_from_reader<R: Read>(reader: R) -> Result<Vec<LineItemInput>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut items = Vec::new();

    for result in csv_reader.deserialize() {
        let row: LineItemCsvRow = result?;
        items.push(row.into_input());
    }

    Ok(items)
}

/// Load a JSON request body (`CashFlowRequest`, `EstimationRequest`, ...)
pub fn load_json_request<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let file = File::open(path.as_ref())?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
