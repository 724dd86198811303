//! Balances carried from one projected year to the next

use crate::grant::GrantParameters;
use super::cashflows::YearRow;

/// Carried balances at the end of a projected year
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Calendar year these balances belong to
    pub year: u32,

    /// Share price at year end
    pub share_price: f64,

    /// Vested shares not yet redeemed; next year's redemption base
    pub vested_unsold_shares: f64,

    /// Shares redeemed to date
    pub cumulative_redeemed: f64,

    /// Grant shares not yet redeemed
    pub unsold_shares: f64,

    /// Redemption proceeds to date
    pub cumulative_redemption_value: f64,
}

impl ProjectionState {
    /// Baseline balances: share price at strike, nothing vested or redeemed
    pub fn seed(base_year: u32, params: &GrantParameters) -> Self {
        Self {
            year: base_year,
            share_price: params.strike_price,
            vested_unsold_shares: 0.0,
            cumulative_redeemed: 0.0,
            unsold_shares: params.total_grant_shares as f64,
            cumulative_redemption_value: 0.0,
        }
    }

    /// Roll the balances forward to the state recorded in `row`
    pub fn record(&mut self, row: &YearRow) {
        self.year = row.year;
        self.share_price = row.share_price;
        self.vested_unsold_shares = row.vested_unsold_shares;
        self.cumulative_redeemed = row.cumulative_redeemed;
        self.unsold_shares = row.unsold_shares;
        self.cumulative_redemption_value = row.cumulative_redemption_value;
    }

    /// Share price one year on
    pub fn grown_share_price(&self, growth_rate: f64) -> f64 {
        self.share_price * (1.0 + growth_rate)
    }
}
