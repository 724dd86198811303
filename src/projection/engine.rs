//! Core projection engine for yearly grant value projections

use crate::grant::{GrantParameters, FIRST_VESTING_YEAR, LAST_VESTING_YEAR};
use super::cashflows::{ProjectionResult, YearRow};
use super::state::ProjectionState;

/// Baseline year: price at strike, nothing vested
pub const BASE_YEAR: u32 = 2024;

/// Number of rows in every projection (2024 through 2035)
pub const PROJECTION_YEARS: usize = (LAST_VESTING_YEAR - BASE_YEAR + 1) as usize;

/// Project a grant year by year from 2024 through 2035.
///
/// Pure and total: the same parameters always give the same table, and
/// no rounding is applied anywhere in the recurrence. Inputs are not
/// range-checked here (see [`GrantParameters::validate`]).
pub fn project(params: &GrantParameters) -> ProjectionResult {
    let mut result = ProjectionResult {
        rows: Vec::with_capacity(PROJECTION_YEARS),
    };

    let mut state = ProjectionState::seed(BASE_YEAR, params);
    result.add_row(YearRow::seed(
        BASE_YEAR,
        params.strike_price,
        params.total_grant_shares as f64,
    ));

    for year in FIRST_VESTING_YEAR..=LAST_VESTING_YEAR {
        let row = calculate_year(params, &state, year);
        state.record(&row);
        result.add_row(row);
    }

    result
}

/// Calculate one year from the previous year's balances
fn calculate_year(params: &GrantParameters, prev: &ProjectionState, year: u32) -> YearRow {
    debug_assert_eq!(prev.year + 1, year, "years must be projected in order");

    let total_grant_shares = params.total_grant_shares as f64;

    let share_price = prev.grown_share_price(params.growth_rate);
    let vested_shares = params.vesting_schedule.vested_shares(year) as f64;

    // First vesting year: nothing was vested last year, so nothing is redeemed
    // and the whole grant stays unsold.
    let (redeemed_shares, cumulative_redeemed, unsold_shares, vested_unsold_shares) =
        if year == FIRST_VESTING_YEAR {
            (0.0, 0.0, prev.unsold_shares, vested_shares)
        } else {
            // Not capped by the shares actually remaining
            let redeemed = prev.vested_unsold_shares * params.redemption_rate;
            let cumulative = prev.cumulative_redeemed + redeemed;
            (
                redeemed,
                cumulative,
                total_grant_shares - cumulative,
                (vested_shares - cumulative).max(0.0),
            )
        };

    let price_diff = (share_price - params.strike_price).max(0.0);

    let redemption_value = price_diff * redeemed_shares;
    let cumulative_redemption_value = prev.cumulative_redemption_value + redemption_value;
    let value_of_unsold_shares = price_diff * unsold_shares;

    YearRow {
        year,
        share_price,
        vested_shares,
        vested_unsold_shares,
        redeemed_shares,
        cumulative_redeemed,
        unsold_shares,
        redemption_value,
        cumulative_redemption_value,
        value_of_unsold_shares,
        total_grant_value: cumulative_redemption_value + value_of_unsold_shares,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grant::VestingSchedule;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::collections::BTreeMap;

    fn default_grant(redemption_rate: f64, growth_rate: f64) -> GrantParameters {
        GrantParameters::default().with_rates(redemption_rate, growth_rate)
    }

    fn schedule(shares: &[u64; 11]) -> VestingSchedule {
        let entries: BTreeMap<u32, u64> = (FIRST_VESTING_YEAR..=LAST_VESTING_YEAR)
            .zip(shares.iter().copied())
            .collect();
        VestingSchedule::new(entries).unwrap()
    }

    #[test]
    fn test_years_cover_2024_to_2035() {
        let result = project(&default_grant(0.05, 0.15));

        assert_eq!(result.rows.len(), 12);
        let years: Vec<u32> = result.rows.iter().map(|r| r.year).collect();
        assert_eq!(years, (2024..=2035).collect::<Vec<_>>());
    }

    #[test]
    fn test_state_tracks_projected_year() {
        let params = default_grant(0.05, 0.15);
        let mut state = ProjectionState::seed(BASE_YEAR, &params);

        for year in FIRST_VESTING_YEAR..=LAST_VESTING_YEAR {
            let row = calculate_year(&params, &state, year);
            state.record(&row);
            assert_eq!(state.year, year);
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "years must be projected in order")]
    fn test_skipped_year_is_rejected() {
        let params = default_grant(0.05, 0.15);
        let state = ProjectionState::seed(BASE_YEAR, &params);
        calculate_year(&params, &state, 2026);
    }

    #[test]
    fn test_seed_year() {
        let result = project(&default_grant(0.05, 0.15));
        let seed = &result.rows[0];

        assert_eq!(seed.year, 2024);
        assert_eq!(seed.share_price, 6.0);
        assert_eq!(seed.vested_shares, 0.0);
        assert_eq!(seed.unsold_shares, 10_000.0);
        assert_eq!(seed.total_grant_value, 0.0);
    }

    #[test]
    fn test_default_scenario() {
        // Strike 6.00, 10,000 shares, 15% growth, 5% redemption
        let result = project(&default_grant(0.05, 0.15));

        let y2025 = result.row(2025).unwrap();
        assert_relative_eq!(y2025.share_price, 6.90, epsilon = 1e-12);
        assert_eq!(y2025.vested_unsold_shares, 6_000.0);
        assert_eq!(y2025.redeemed_shares, 0.0);
        assert_eq!(y2025.unsold_shares, 10_000.0);
        assert_relative_eq!(y2025.value_of_unsold_shares, 9_000.0, epsilon = 1e-8);

        let y2026 = result.row(2026).unwrap();
        assert_relative_eq!(y2026.redeemed_shares, 300.0);
        assert_relative_eq!(y2026.cumulative_redeemed, 300.0);
        assert_relative_eq!(y2026.unsold_shares, 9_700.0);
        assert_relative_eq!(y2026.vested_unsold_shares, 6_700.0);
        assert_relative_eq!(y2026.redemption_value, 580.5, epsilon = 1e-8);

        let y2027 = result.row(2027).unwrap();
        assert_relative_eq!(y2027.redeemed_shares, 335.0);
        assert_relative_eq!(y2027.cumulative_redeemed, 635.0);

        let y2035 = result.row(2035).unwrap();
        assert_relative_eq!(y2035.share_price, 27.914348376384552, max_relative = 1e-12);
        assert_relative_eq!(y2035.cumulative_redemption_value, 37_209.17876223399, max_relative = 1e-10);
        assert_relative_eq!(y2035.total_grant_value, 175_697.35614654204, max_relative = 1e-10);
    }

    #[test]
    fn test_total_value_identity_and_monotonic_redemption() {
        for &(redemption, growth) in &[(0.0, 0.0), (0.05, 0.15), (0.10, 0.20), (1.0, 0.07)] {
            let result = project(&default_grant(redemption, growth));

            for row in &result.rows {
                assert_abs_diff_eq!(
                    row.total_grant_value,
                    row.cumulative_redemption_value + row.value_of_unsold_shares,
                    epsilon = 1e-9
                );
                assert!(row.vested_unsold_shares >= 0.0);
                assert!(row.redemption_value >= 0.0);
                assert!(row.value_of_unsold_shares >= 0.0);
            }

            for pair in result.rows.windows(2) {
                assert!(pair[1].cumulative_redeemed >= pair[0].cumulative_redeemed);
            }

            for row in result.rows_from(2026) {
                assert_abs_diff_eq!(
                    row.unsold_shares,
                    10_000.0 - row.cumulative_redeemed,
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn test_zero_redemption_keeps_whole_grant() {
        let result = project(&default_grant(0.0, 0.20));

        for row in &result.rows {
            assert_eq!(row.redeemed_shares, 0.0);
            assert_eq!(row.cumulative_redeemed, 0.0);
            assert_eq!(row.unsold_shares, 10_000.0);
            assert_eq!(row.cumulative_redemption_value, 0.0);
        }
        assert_relative_eq!(
            result.row(2035).unwrap().total_grant_value,
            385_805.0224127998,
            max_relative = 1e-10
        );
    }

    #[test]
    fn test_zero_growth_has_no_value() {
        let result = project(&default_grant(0.10, 0.0));

        for row in &result.rows {
            assert_eq!(row.share_price, 6.0);
            assert_eq!(row.redemption_value, 0.0);
            assert_eq!(row.cumulative_redemption_value, 0.0);
            assert_eq!(row.value_of_unsold_shares, 0.0);
            assert_eq!(row.total_grant_value, 0.0);
        }
        // Shares are still redeemed, just for nothing
        assert_relative_eq!(result.row(2026).unwrap().redeemed_shares, 600.0);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let params = default_grant(0.07, 0.13);
        assert_eq!(project(&params), project(&params));
    }

    #[test]
    fn test_full_redemption_clears_balance_each_year() {
        let result = project(&default_grant(1.0, 0.10));

        let y2026 = result.row(2026).unwrap();
        assert_relative_eq!(y2026.redeemed_shares, 6_000.0);
        assert_relative_eq!(y2026.cumulative_redeemed, 6_000.0);
        assert_relative_eq!(y2026.vested_unsold_shares, 1_000.0);
        assert_relative_eq!(y2026.unsold_shares, 4_000.0);

        let y2027 = result.row(2027).unwrap();
        assert_relative_eq!(y2027.redeemed_shares, 1_000.0);
        assert_relative_eq!(y2027.cumulative_redeemed, 7_000.0);
        assert_relative_eq!(y2027.total_grant_value, 15_504.0, max_relative = 1e-12);
    }

    #[test]
    fn test_vested_unsold_floored_at_zero() {
        // Vested count drops below what has already been redeemed
        let params = GrantParameters {
            vesting_schedule: schedule(&[6_000, 5_000, 5_000, 5_000, 5_000, 5_000, 5_000, 5_000, 5_000, 5_000, 5_000]),
            ..default_grant(1.0, 0.10)
        };
        let result = project(&params);

        let y2026 = result.row(2026).unwrap();
        assert_relative_eq!(y2026.cumulative_redeemed, 6_000.0);
        assert_eq!(y2026.vested_unsold_shares, 0.0);

        for row in result.rows_from(2027) {
            assert_eq!(row.redeemed_shares, 0.0);
            assert_eq!(row.vested_unsold_shares, 0.0);
            assert_relative_eq!(row.cumulative_redeemed, 6_000.0);
        }
    }

    #[test]
    fn test_redemption_is_not_capped_by_grant_size() {
        // Vesting above the grant size is let through unchanged
        let params = GrantParameters {
            vesting_schedule: schedule(&[20_000; 11]),
            ..default_grant(1.0, 0.10)
        };
        let result = project(&params);

        let y2026 = result.row(2026).unwrap();
        assert_relative_eq!(y2026.redeemed_shares, 20_000.0);
        assert_relative_eq!(y2026.unsold_shares, -10_000.0);
        assert_eq!(y2026.vested_unsold_shares, 0.0);
    }
}
