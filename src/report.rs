//! Presentation of projection results
//!
//! Builds the filtered three-column results view, the "final 2035 values"
//! tables under each chart, the parameter summary and the CSV download.
//! Nothing here feeds back into the projection: all rounding happens on
//! the way out.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::error::Result;
use crate::grant::{GrantParameters, FIRST_VESTING_YEAR};
use crate::projection::{ProjectionResult, ProjectionSummary, YearRow};
use crate::scenario::{percent_label, ChartSeries, ComparisonCharts, ScenarioRunner};

/// File name offered for the results download
pub const RESULTS_CSV_FILENAME: &str = "option_redemption_results.csv";

pub const SHARE_PRICE_COLUMN: &str = "Share Repurchase Price (£)";
pub const REDEMPTION_PROCEEDS_COLUMN: &str = "Proceeds from Share Redemption (£)";
pub const TOTAL_GRANT_VALUE_COLUMN: &str = "Total Grant Value (£)";

/// One formatted row of the results view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub year: String,
    pub share_repurchase_price: String,
    pub proceeds_from_share_redemption: String,
    pub total_grant_value: String,
}

impl DisplayRow {
    pub fn from_year_row(row: &YearRow) -> Self {
        Self {
            year: row.year.to_string(),
            share_repurchase_price: format_price(row.share_price),
            proceeds_from_share_redemption: format_whole_pounds(row.cumulative_redemption_value),
            total_grant_value: format_whole_pounds(row.total_grant_value),
        }
    }
}

/// One row of a "final 2035 values" table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalValueRow {
    /// e.g. "5%"
    pub rate: String,
    pub total_grant_value: String,
}

/// Everything shown for one set of inputs: the results view, the full
/// table and both comparison charts
#[derive(Debug, Clone, Serialize)]
pub struct CalculatorReport {
    pub parameters: Vec<String>,
    pub grant: GrantParameters,
    pub table: Vec<DisplayRow>,
    pub rows: Vec<YearRow>,
    pub summary: ProjectionSummary,
    pub charts: ComparisonCharts,
    pub redemption_final_values: Vec<FinalValueRow>,
    pub growth_final_values: Vec<FinalValueRow>,
    pub csv_filename: &'static str,
}

impl CalculatorReport {
    /// Project the grant and run both preset sweeps
    pub fn build(params: &GrantParameters) -> Self {
        let runner = ScenarioRunner::new(params.clone());
        let result = runner.run_selected();
        let charts = runner.comparison_charts();

        Self {
            parameters: parameter_lines(params),
            grant: params.clone(),
            table: display_table(&result),
            summary: result.summary(),
            redemption_final_values: final_values(&charts.redemption.series),
            growth_final_values: final_values(&charts.growth.series),
            rows: result.rows,
            charts,
            csv_filename: RESULTS_CSV_FILENAME,
        }
    }
}

/// Formatted results from the first vesting year onward
pub fn display_table(result: &ProjectionResult) -> Vec<DisplayRow> {
    result
        .rows_from(FIRST_VESTING_YEAR)
        .iter()
        .map(DisplayRow::from_year_row)
        .collect()
}

/// Final-year value of each chart series, formatted
pub fn final_values(series: &[ChartSeries]) -> Vec<FinalValueRow> {
    series
        .iter()
        .map(|s| FinalValueRow {
            rate: format!("{}%", percent_label(s.rate)),
            total_grant_value: format_whole_pounds(s.final_total_grant_value),
        })
        .collect()
}

/// Human-readable lines describing the chosen parameters
pub fn parameter_lines(params: &GrantParameters) -> Vec<String> {
    vec![
        format!("Redemption Rate: {:.0}%", params.redemption_rate * 100.0),
        format!("PBT Growth Rate: {:.0}%", params.growth_rate * 100.0),
        format!("Strike Price: {}", format_price(params.strike_price)),
        format!(
            "Total Grant Shares: {}",
            group_thousands(params.total_grant_shares as i64)
        ),
    ]
}

/// `£` amount with two decimals, e.g. `£6.90`
pub fn format_price(value: f64) -> String {
    format!("£{:.2}", value)
}

/// `£` amount truncated toward zero with thousands separators, e.g. `£175,697`
pub fn format_whole_pounds(value: f64) -> String {
    format!("£{}", group_thousands(value.trunc() as i64))
}

/// Insert `,` between groups of three digits
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

/// Write the results view as CSV with unrounded values.
///
/// The year column is the index column and has an empty header cell.
pub fn write_results_csv<W: Write>(result: &ProjectionResult, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record([
        "",
        SHARE_PRICE_COLUMN,
        REDEMPTION_PROCEEDS_COLUMN,
        TOTAL_GRANT_VALUE_COLUMN,
    ])?;

    for row in result.rows_from(FIRST_VESTING_YEAR) {
        csv_writer.write_record([
            row.year.to_string(),
            row.share_price.to_string(),
            row.cumulative_redemption_value.to_string(),
            row.total_grant_value.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Results view as a CSV string
pub fn results_csv(result: &ProjectionResult) -> Result<String> {
    let mut buffer = Vec::new();
    write_results_csv(result, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write the results view to a CSV file
pub fn export_results_csv<P: AsRef<Path>>(result: &ProjectionResult, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_results_csv(result, file)?;
    info!("results written to {}", path.display());
    Ok(())
}
