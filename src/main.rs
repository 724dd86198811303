//! Option Redemption Calculator CLI
//!
//! Projects a grant from the command line, prints the results table and
//! both comparison charts, and writes the results CSV.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use option_redemption::{
    grant::{
        load_vesting_schedule, DEFAULT_GROWTH_PCT, DEFAULT_REDEMPTION_PCT, DEFAULT_STRIKE_PRICE,
        DEFAULT_TOTAL_GRANT_SHARES,
    },
    report::{
        export_results_csv, format_whole_pounds, CalculatorReport, FinalValueRow, RESULTS_CSV_FILENAME,
        REDEMPTION_PROCEEDS_COLUMN, SHARE_PRICE_COLUMN, TOTAL_GRANT_VALUE_COLUMN,
    },
    scenario::ComparisonChart,
    GrantParameters, ProjectionResult, VestingSchedule,
};

#[derive(Debug, Parser)]
#[command(name = "option_redemption", version, about = "Option Redemption Calculator")]
struct Cli {
    /// Percentage of vested unsold shares to redeem each year (0-10)
    #[arg(long, env = "REDEMPTION_PCT", default_value_t = DEFAULT_REDEMPTION_PCT)]
    redemption_pct: u32,

    /// Annual growth rate of share price in percent (0-20)
    #[arg(long, env = "GROWTH_PCT", default_value_t = DEFAULT_GROWTH_PCT)]
    growth_pct: u32,

    /// Strike price of the options (£)
    #[arg(long, env = "STRIKE_PRICE", default_value_t = DEFAULT_STRIKE_PRICE)]
    strike_price: f64,

    /// Total number of shares in the grant
    #[arg(long, env = "TOTAL_GRANT_SHARES", default_value_t = DEFAULT_TOTAL_GRANT_SHARES)]
    total_grant_shares: u64,

    /// CSV file (Year,VestedShares) replacing the default vesting schedule
    #[arg(long, env = "VESTING_FILE")]
    vesting_file: Option<PathBuf>,

    /// Override one year of the vesting schedule, e.g. --vest 2027=8500
    #[arg(long = "vest", value_name = "YEAR=SHARES")]
    vest: Vec<String>,

    /// Where to write the results CSV
    #[arg(long, default_value = RESULTS_CSV_FILENAME)]
    output: PathBuf,

    /// Print the full report as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Skip the comparison charts
    #[arg(long)]
    no_charts: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("An error occurred in the calculation: {:#}", err);
        eprintln!("Please check your inputs and try again.");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let custom_vesting = cli.vesting_file.is_some() || !cli.vest.is_empty();

    let schedule = match &cli.vesting_file {
        Some(path) => load_vesting_schedule(path)
            .with_context(|| format!("failed to load vesting schedule from {}", path.display()))?,
        None => VestingSchedule::default_schedule(),
    };
    let schedule = schedule
        .with_overrides(&cli.vest)
        .context("invalid vesting override")?;

    let params = GrantParameters::from_percentages(
        cli.redemption_pct,
        cli.growth_pct,
        cli.strike_price,
        cli.total_grant_shares,
        schedule,
    );
    params.validate().context("invalid grant parameters")?;
    if custom_vesting {
        params.validate_custom_vesting().context("invalid vesting schedule")?;
    }

    let report = CalculatorReport::build(&params);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, custom_vesting, !cli.no_charts);
    }

    let result = ProjectionResult { rows: report.rows };
    export_results_csv(&result, &cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    if !cli.json {
        println!("\nResults written to: {}", cli.output.display());
    }

    Ok(())
}

fn print_report(report: &CalculatorReport, custom_vesting: bool, show_charts: bool) {
    println!("Option Redemption Calculator");
    println!("============================\n");

    println!("Parameters:");
    for line in &report.parameters {
        println!("  {}", line);
    }

    println!(
        "\n{} vesting schedule:",
        if custom_vesting { "Custom" } else { "Default" }
    );
    println!("  {:>6} {:>14}", "Year", "Vested Shares");
    for (year, shares) in report.grant.vesting_schedule.iter() {
        println!("  {:>6} {:>14}", year, shares);
    }

    println!("\nIllustrative Grant Value Based on Customized Inputs:");
    println!(
        "{:>6} {:>28} {:>36} {:>24}",
        "Year", SHARE_PRICE_COLUMN, REDEMPTION_PROCEEDS_COLUMN, TOTAL_GRANT_VALUE_COLUMN
    );
    println!("{}", "-".repeat(97));
    for row in &report.table {
        println!(
            "{:>6} {:>28} {:>36} {:>24}",
            row.year, row.share_repurchase_price, row.proceeds_from_share_redemption, row.total_grant_value
        );
    }

    if !show_charts {
        return;
    }

    print_chart(&report.charts.redemption);
    print_final_values(&report.redemption_final_values, "Redemption Rate");

    print_chart(&report.charts.growth);
    print_final_values(&report.growth_final_values, "Growth Rate");
}

fn print_chart(chart: &ComparisonChart) {
    println!("\n{}", chart.title);
    println!("({})", chart.subtitle);

    print!("{:>6}", "Year");
    for series in &chart.series {
        print!(" {:>16}", series.label);
    }
    println!();

    let years = chart.series.first().map(|s| s.points.len()).unwrap_or(0);
    for i in 0..years {
        print!("{:>6}", chart.series[0].points[i].year);
        for series in &chart.series {
            print!(" {:>16}", format_whole_pounds(series.points[i].total_grant_value));
        }
        println!();
    }
}

fn print_final_values(rows: &[FinalValueRow], rate_heading: &str) {
    println!("\nFinal 2035 Values:");
    println!("  {:>16} {:>24}", rate_heading, TOTAL_GRANT_VALUE_COLUMN);
    for row in rows {
        println!("  {:>16} {:>24}", row.rate, row.total_grant_value);
    }
}
