//! Output structures for grant projections

use serde::{Deserialize, Serialize};

/// A single row of projection output for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    pub year: u32,
    pub share_price: f64,

    // Share counts (fractional once redemption starts)
    pub vested_shares: f64,
    pub vested_unsold_shares: f64,
    pub redeemed_shares: f64,
    pub cumulative_redeemed: f64,
    pub unsold_shares: f64,

    // Values (price above strike times shares)
    pub redemption_value: f64,
    pub cumulative_redemption_value: f64,
    pub value_of_unsold_shares: f64,
    pub total_grant_value: f64,
}

impl YearRow {
    /// Baseline row: price at strike, the whole grant unsold, no value yet
    pub fn seed(year: u32, strike_price: f64, total_grant_shares: f64) -> Self {
        Self {
            year,
            share_price: strike_price,
            vested_shares: 0.0,
            vested_unsold_shares: 0.0,
            redeemed_shares: 0.0,
            cumulative_redeemed: 0.0,
            unsold_shares: total_grant_shares,
            redemption_value: 0.0,
            cumulative_redemption_value: 0.0,
            value_of_unsold_shares: 0.0,
            total_grant_value: 0.0,
        }
    }
}

/// Complete projection result, one row per year in ascending order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub rows: Vec<YearRow>,
}

impl ProjectionResult {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Add a year row
    pub fn add_row(&mut self, row: YearRow) {
        self.rows.push(row);
    }

    /// Row for a given year
    pub fn row(&self, year: u32) -> Option<&YearRow> {
        self.rows.iter().find(|r| r.year == year)
    }

    /// Rows for `year` and every later year
    pub fn rows_from(&self, year: u32) -> &[YearRow] {
        let start = self
            .rows
            .iter()
            .position(|r| r.year >= year)
            .unwrap_or(self.rows.len());
        &self.rows[start..]
    }

    /// Last projected year
    pub fn final_row(&self) -> Option<&YearRow> {
        self.rows.last()
    }

    /// `(year, total_grant_value)` pairs from `year` onward
    pub fn total_grant_values_from(&self, year: u32) -> Vec<(u32, f64)> {
        self.rows_from(year)
            .iter()
            .map(|r| (r.year, r.total_grant_value))
            .collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_redeemed_shares: f64 = self.rows.iter().map(|r| r.redeemed_shares).sum();
        let total_redemption_value: f64 = self.rows.iter().map(|r| r.redemption_value).sum();

        let last = self.final_row();

        ProjectionSummary {
            total_years: self.rows.len() as u32,
            final_year: last.map(|r| r.year).unwrap_or(0),
            final_share_price: last.map(|r| r.share_price).unwrap_or(0.0),
            total_redeemed_shares,
            total_redemption_value,
            final_unsold_shares: last.map(|r| r.unsold_shares).unwrap_or(0.0),
            final_value_of_unsold_shares: last.map(|r| r.value_of_unsold_shares).unwrap_or(0.0),
            final_total_grant_value: last.map(|r| r.total_grant_value).unwrap_or(0.0),
        }
    }
}

impl Default for ProjectionResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_years: u32,
    pub final_year: u32,
    pub final_share_price: f64,
    pub total_redeemed_shares: f64,
    pub total_redemption_value: f64,
    pub final_unsold_shares: f64,
    pub final_value_of_unsold_shares: f64,
    pub final_total_grant_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_years(years: &[u32]) -> ProjectionResult {
        let mut result = ProjectionResult::new();
        for (i, &year) in years.iter().enumerate() {
            let mut row = YearRow::seed(year, 5.0, 100.0);
            row.redeemed_shares = i as f64;
            row.redemption_value = 2.0 * i as f64;
            row.total_grant_value = 10.0 * i as f64;
            result.add_row(row);
        }
        result
    }

    #[test]
    fn test_rows_from() {
        let result = result_with_years(&[2024, 2025, 2026]);

        assert_eq!(result.rows_from(2025).len(), 2);
        assert_eq!(result.rows_from(2025)[0].year, 2025);
        assert_eq!(result.rows_from(2024).len(), 3);
        assert!(result.rows_from(2040).is_empty());
        assert_eq!(result.row(2026).map(|r| r.year), Some(2026));
        assert!(result.row(2030).is_none());
    }

    #[test]
    fn test_summary() {
        let result = result_with_years(&[2024, 2025, 2026]);
        let summary = result.summary();

        assert_eq!(summary.total_years, 3);
        assert_eq!(summary.final_year, 2026);
        assert_eq!(summary.total_redeemed_shares, 3.0);
        assert_eq!(summary.total_redemption_value, 6.0);
        assert_eq!(summary.final_total_grant_value, 20.0);
        assert_eq!(
            result.total_grant_values_from(2025),
            vec![(2025, 10.0), (2026, 20.0)]
        );
    }

    #[test]
    fn test_empty_summary() {
        let summary = ProjectionResult::new().summary();
        assert_eq!(summary.total_years, 0);
        assert_eq!(summary.final_total_grant_value, 0.0);
    }
}
