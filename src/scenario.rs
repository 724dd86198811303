//! Scenario runner for rate sweeps
//!
//! Holds one grant (strike, shares, vesting) and re-projects it under
//! different redemption and growth rates, e.g. for the comparison charts.

use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use crate::grant::{GrantParameters, FIRST_VESTING_YEAR};
use crate::projection::{project, ProjectionResult};

/// Redemption rates compared in the first chart
pub const REDEMPTION_SWEEP_RATES: [f64; 3] = [0.0, 0.05, 0.10];

/// Growth rate held fixed while redemption rates are compared
pub const REDEMPTION_SWEEP_GROWTH: f64 = 0.20;

/// Growth rates compared in the second chart
pub const GROWTH_SWEEP_RATES: [f64; 2] = [0.15, 0.20];

/// Redemption rate held fixed while growth rates are compared
pub const GROWTH_SWEEP_REDEMPTION: f64 = 0.0;

/// Which rate a sweep varies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepKind {
    Redemption,
    Growth,
}

impl SweepKind {
    fn label_suffix(self) -> &'static str {
        match self {
            SweepKind::Redemption => "Redemption",
            SweepKind::Growth => "Growth",
        }
    }
}

/// One point on a comparison chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub year: u32,
    pub total_grant_value: f64,
}

/// One line on a comparison chart: total grant value by year for one rate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    /// e.g. "5% Redemption" or "20% Growth"
    pub label: String,
    /// The swept rate as a fraction
    pub rate: f64,
    pub redemption_rate: f64,
    pub growth_rate: f64,
    pub points: Vec<ChartPoint>,
    pub final_total_grant_value: f64,
}

/// A titled set of series sharing one fixed rate
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonChart {
    pub title: String,
    pub subtitle: String,
    pub kind: SweepKind,
    pub series: Vec<ChartSeries>,
}

/// Both comparison charts shown under the results table
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonCharts {
    pub redemption: ComparisonChart,
    pub growth: ComparisonChart,
}

/// Whole-percent label for a rate, e.g. 0.05 -> 5
pub fn percent_label(rate: f64) -> i64 {
    (rate * 100.0).round() as i64
}

/// Pre-loaded grant for repeated projections
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base: GrantParameters,
}

impl ScenarioRunner {
    pub fn new(base: GrantParameters) -> Self {
        Self { base }
    }

    /// Project the grant at its own rates
    pub fn run_selected(&self) -> ProjectionResult {
        project(&self.base)
    }

    /// Project the grant at the given rates
    pub fn run(&self, redemption_rate: f64, growth_rate: f64) -> ProjectionResult {
        debug!(
            "projecting grant at {:.2}% redemption, {:.2}% growth",
            redemption_rate * 100.0,
            growth_rate * 100.0
        );
        project(&self.base.with_rates(redemption_rate, growth_rate))
    }

    /// One series per redemption rate at a fixed growth rate
    pub fn sweep_redemption(&self, rates: &[f64], growth_rate: f64) -> Vec<ChartSeries> {
        self.sweep(SweepKind::Redemption, rates, growth_rate)
    }

    /// One series per growth rate at a fixed redemption rate
    pub fn sweep_growth(&self, rates: &[f64], redemption_rate: f64) -> Vec<ChartSeries> {
        self.sweep(SweepKind::Growth, rates, redemption_rate)
    }

    /// The two preset comparison charts
    pub fn comparison_charts(&self) -> ComparisonCharts {
        ComparisonCharts {
            redemption: ComparisonChart {
                title: "Grant Value at Various Redemption Rates".to_string(),
                subtitle: format!(
                    "PBT Growth Rate fixed at {}%",
                    percent_label(REDEMPTION_SWEEP_GROWTH)
                ),
                kind: SweepKind::Redemption,
                series: self.sweep_redemption(&REDEMPTION_SWEEP_RATES, REDEMPTION_SWEEP_GROWTH),
            },
            growth: ComparisonChart {
                title: "Grant Value at Various PBT Growth Rates".to_string(),
                subtitle: format!(
                    "Redemption Rate fixed at {}%",
                    percent_label(GROWTH_SWEEP_REDEMPTION)
                ),
                kind: SweepKind::Growth,
                series: self.sweep_growth(&GROWTH_SWEEP_RATES, GROWTH_SWEEP_REDEMPTION),
            },
        }
    }

    /// Get reference to the base grant
    pub fn grant(&self) -> &GrantParameters {
        &self.base
    }

    fn sweep(&self, kind: SweepKind, rates: &[f64], fixed_rate: f64) -> Vec<ChartSeries> {
        rates
            .par_iter()
            .map(|&rate| {
                let (redemption_rate, growth_rate) = match kind {
                    SweepKind::Redemption => (rate, fixed_rate),
                    SweepKind::Growth => (fixed_rate, rate),
                };
                let result = self.run(redemption_rate, growth_rate);

                let points: Vec<ChartPoint> = result
                    .total_grant_values_from(FIRST_VESTING_YEAR)
                    .into_iter()
                    .map(|(year, total_grant_value)| ChartPoint { year, total_grant_value })
                    .collect();

                ChartSeries {
                    label: format!("{}% {}", percent_label(rate), kind.label_suffix()),
                    rate,
                    redemption_rate,
                    growth_rate,
                    final_total_grant_value: points.last().map(|p| p.total_grant_value).unwrap_or(0.0),
                    points,
                }
            })
            .collect()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(GrantParameters::default())
    }
}
