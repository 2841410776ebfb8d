//! Project Finance CLI
//!
//! Runs the cash flow and cost estimation engines over CSV or JSON inputs.
//! Rates fall back to the DISCOUNT_RATE / TAX_RATE environment variables.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use project_finance::cashflow::KeyMetrics;
use project_finance::estimation::breakdown_by_category;
use project_finance::loader::{load_cash_flows, load_json_request, load_line_items};
use project_finance::{CashFlowRequest, EstimationRequest, ScenarioRunner};

#[derive(Parser)]
#[command(name = "project-finance", version, about = "Cash flow and cost estimation engines")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a cash flow statement from `period,inflow,outflow` rows or a JSON request
    CashFlow {
        #[arg(short, long)]
        input: PathBuf,

        /// Per-period discount rate; required for CSV input, overrides a JSON request's rate
        #[arg(short, long, env = "DISCOUNT_RATE")]
        discount_rate: Option<f64>,

        /// Print JSON instead of a CSV table
        #[arg(long)]
        json: bool,
    },

    /// Summarise `description,quantity,unit_price[,category]` rows or a JSON request
    Estimate {
        #[arg(short, long)]
        input: PathBuf,

        /// Tax rate applied to the subtotal (overrides the JSON request's rate)
        #[arg(short, long, env = "TAX_RATE")]
        tax_rate: Option<f64>,

        #[arg(long)]
        json: bool,
    },

    /// Evaluate one cash flow CSV under several discount rates
    Scenarios {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, value_delimiter = ',', required = true)]
        rates: Vec<f64>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct CashFlowOutput<'a> {
    statement: &'a project_finance::CashFlowStatement,
    key_metrics: KeyMetrics,
}

#[derive(Serialize)]
struct ScenarioCsvRow {
    discount_rate: f64,
    npv: f64,
    irr: Option<f64>,
    break_even: Option<f64>,
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// CSV tables carry no rate of their own, so one must come from the CLI or env
fn require_discount_rate(discount_rate: Option<f64>) -> Result<f64> {
    discount_rate.context(
        "a discount rate is required for CSV input: pass --discount-rate or set DISCOUNT_RATE",
    )
}

fn run_cash_flow(input: &Path, discount_rate: Option<f64>, json: bool) -> Result<()> {
    let request: CashFlowRequest = if is_json(input) {
        let mut request: CashFlowRequest = load_json_request(input)
            .with_context(|| format!("reading cash flow request {}", input.display()))?;
        if let Some(rate) = discount_rate {
            request.discount_rate = rate;
        }
        request
    } else {
        let rate = require_discount_rate(discount_rate)?;
        load_cash_flows(input)
            .with_context(|| format!("reading cash flows {}", input.display()))?
            .into_request(rate)
    };

    let statement = request.evaluate()?;
    let key_metrics = KeyMetrics::from_statement(&statement);

    if json {
        let output = CashFlowOutput {
            statement: &statement,
            key_metrics,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let mut writer = csv::Writer::from_writer(io::stdout());
    for row in statement.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;

    eprintln!("NPV: {:.2}", key_metrics.npv);
    match key_metrics.irr {
        Some(irr) => eprintln!("IRR: {:.4}% per period", irr * 100.0),
        None => eprintln!("IRR: n/a"),
    }
    match key_metrics.break_even {
        Some(periods) => eprintln!("Break-even: {:.2} periods", periods),
        None => eprintln!("Break-even: not reached"),
    }
    Ok(())
}

fn run_estimate(input: &Path, tax_rate: Option<f64>, json: bool) -> Result<()> {
    let mut request: EstimationRequest = if is_json(input) {
        load_json_request(input)
            .with_context(|| format!("reading estimation request {}", input.display()))?
    } else {
        EstimationRequest {
            line_items: load_line_items(input)
                .with_context(|| format!("reading line items {}", input.display()))?,
            tax_rate: 0.0,
        }
    };
    if let Some(rate) = tax_rate {
        request.tax_rate = rate;
    }

    let summary = request.evaluate()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["description", "category", "quantity", "unit_price", "line_subtotal"])?;
    for item in &summary.line_items {
        writer.write_record([
            item.description.clone(),
            item.category.clone().unwrap_or_default(),
            item.quantity.to_string(),
            item.unit_price.to_string(),
            format!("{:.2}", item.line_subtotal),
        ])?;
    }
    writer.flush()?;

    for category in breakdown_by_category(&summary) {
        eprintln!(
            "{:<16} {:>4} items {:>14.2}",
            category.category, category.item_count, category.subtotal
        );
    }
    eprintln!("Subtotal:    {:>14.2}", summary.subtotal);
    eprintln!("Tax:         {:>14.2}", summary.tax);
    eprintln!("Grand total: {:>14.2}", summary.grand_total);
    Ok(())
}

fn run_scenarios(input: &Path, rates: &[f64], json: bool) -> Result<()> {
    let series = load_cash_flows(input)
        .with_context(|| format!("reading cash flows {}", input.display()))?;
    let runner = ScenarioRunner::from_series(series)?;
    let results = runner.run_rates(rates)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let mut writer = csv::Writer::from_writer(io::stdout());
    for result in &results {
        writer.serialize(ScenarioCsvRow {
            discount_rate: result.discount_rate,
            npv: result.metrics.npv,
            irr: result.metrics.irr,
            break_even: result.metrics.break_even,
        })?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::CashFlow {
            input,
            discount_rate,
            json,
        } => run_cash_flow(&input, discount_rate, json),
        Command::Estimate {
            input,
            tax_rate,
            json,
        } => run_estimate(&input, tax_rate, json),
        Command::Scenarios { input, rates, json } => run_scenarios(&input, &rates, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_input_needs_a_discount_rate() {
        assert!(require_discount_rate(None).is_err());
        assert_eq!(require_discount_rate(Some(0.05)).unwrap(), 0.05);
        assert_eq!(require_discount_rate(Some(0.0)).unwrap(), 0.0);
    }

    #[test]
    fn test_cash_flow_command_parses_rate() {
        let cli = Cli::try_parse_from([
            "project-finance",
            "cash-flow",
            "--input",
            "flows.csv",
            "--discount-rate",
            "0.07",
        ])
        .unwrap();
        match cli.command {
            Command::CashFlow { discount_rate, .. } => assert_eq!(discount_rate, Some(0.07)),
            _ => panic!("expected cash-flow subcommand"),
        }
    }
}
