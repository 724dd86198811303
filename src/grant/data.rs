//! Grant parameter structures and the vesting schedule

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GrantError, Result};

/// First year in which shares can vest
pub const FIRST_VESTING_YEAR: u32 = 2025;

/// Last projected year
pub const LAST_VESTING_YEAR: u32 = 2035;

const VESTING_YEARS: usize = (LAST_VESTING_YEAR - FIRST_VESTING_YEAR + 1) as usize;

/// Highest redemption rate the input form accepts (10%)
pub const MAX_REDEMPTION_RATE: f64 = 0.10;

/// Highest growth rate the input form accepts (20%)
pub const MAX_GROWTH_RATE: f64 = 0.20;

pub const DEFAULT_REDEMPTION_PCT: u32 = 5;
pub const DEFAULT_GROWTH_PCT: u32 = 15;
pub const DEFAULT_STRIKE_PRICE: f64 = 6.00;
pub const DEFAULT_TOTAL_GRANT_SHARES: u64 = 10_000;

/// Cumulative vested shares for 2025 through 2035 under the default schedule
const DEFAULT_VESTED_SHARES: [u64; VESTING_YEARS] = [
    6_000, 7_000, 8_000, 9_000, 10_000, 10_000, 10_000, 10_000, 10_000, 10_000, 10_000,
];

/// Cumulative vested share counts for every year from 2025 to 2035.
///
/// A schedule can only be built with all eleven years present, so the
/// projection never has to deal with a missing year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<u32, u64>", into = "BTreeMap<u32, u64>")]
pub struct VestingSchedule {
    vested: [u64; VESTING_YEARS],
}

impl VestingSchedule {
    /// Build a schedule from a year -> cumulative vested shares mapping
    pub fn new(entries: BTreeMap<u32, u64>) -> Result<Self> {
        if let Some(&year) = entries
            .keys()
            .find(|year| !(FIRST_VESTING_YEAR..=LAST_VESTING_YEAR).contains(*year))
        {
            return Err(GrantError::UnexpectedVestingYear(year));
        }

        let mut vested = [0; VESTING_YEARS];
        for year in FIRST_VESTING_YEAR..=LAST_VESTING_YEAR {
            vested[Self::index(year)] = *entries
                .get(&year)
                .ok_or(GrantError::MissingVestingYear(year))?;
        }

        Ok(Self { vested })
    }

    /// The default schedule: 6,000 shares in 2025 rising by 1,000 a year to
    /// 10,000 in 2029, flat thereafter
    pub fn default_schedule() -> Self {
        Self {
            vested: DEFAULT_VESTED_SHARES,
        }
    }

    /// Cumulative vested shares in `year`.
    ///
    /// `year` must lie in 2025..=2035.
    pub fn vested_shares(&self, year: u32) -> u64 {
        self.vested[Self::index(year)]
    }

    /// Replace the vested count for one year
    pub fn set(&mut self, year: u32, shares: u64) -> Result<()> {
        if !(FIRST_VESTING_YEAR..=LAST_VESTING_YEAR).contains(&year) {
            return Err(GrantError::UnexpectedVestingYear(year));
        }
        self.vested[Self::index(year)] = shares;
        Ok(())
    }

    /// Apply `YEAR=SHARES` overrides on top of this schedule
    pub fn with_overrides<S: AsRef<str>>(mut self, overrides: &[S]) -> Result<Self> {
        for entry in overrides {
            let (year, shares) = parse_vesting_entry(entry.as_ref())?;
            self.set(year, shares)?;
        }
        Ok(self)
    }

    /// Iterate `(year, vested_shares)` in ascending year order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        (FIRST_VESTING_YEAR..=LAST_VESTING_YEAR).zip(self.vested.iter().copied())
    }

    fn index(year: u32) -> usize {
        (year - FIRST_VESTING_YEAR) as usize
    }
}

impl Default for VestingSchedule {
    fn default() -> Self {
        Self::default_schedule()
    }
}

impl TryFrom<BTreeMap<u32, u64>> for VestingSchedule {
    type Error = GrantError;

    fn try_from(entries: BTreeMap<u32, u64>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<VestingSchedule> for BTreeMap<u32, u64> {
    fn from(schedule: VestingSchedule) -> Self {
        schedule.iter().collect()
    }
}

/// Parse a single `YEAR=SHARES` entry, e.g. `2027=8500`
pub fn parse_vesting_entry(entry: &str) -> Result<(u32, u64)> {
    let invalid = || GrantError::InvalidVestingEntry(entry.to_string());

    let (year, shares) = entry.split_once('=').ok_or_else(invalid)?;
    let year = year.trim().parse::<u32>().map_err(|_| invalid())?;
    let shares = shares.trim().parse::<u64>().map_err(|_| invalid())?;

    Ok((year, shares))
}

/// Inputs to a single projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrantParameters {
    /// Fraction of the prior year's vested unsold shares redeemed each year
    pub redemption_rate: f64,

    /// Annual share price growth
    pub growth_rate: f64,

    /// Exercise price, fixed for the life of the grant
    pub strike_price: f64,

    /// Total shares in the grant
    pub total_grant_shares: u64,

    pub vesting_schedule: VestingSchedule,
}

impl GrantParameters {
    /// Build parameters from whole-percent rates, as entered on the form
    pub fn from_percentages(
        redemption_pct: u32,
        growth_pct: u32,
        strike_price: f64,
        total_grant_shares: u64,
        vesting_schedule: VestingSchedule,
    ) -> Self {
        Self {
            redemption_rate: redemption_pct as f64 / 100.0,
            growth_rate: growth_pct as f64 / 100.0,
            strike_price,
            total_grant_shares,
            vesting_schedule,
        }
    }

    /// Same grant with different redemption and growth rates
    pub fn with_rates(&self, redemption_rate: f64, growth_rate: f64) -> Self {
        Self {
            redemption_rate,
            growth_rate,
            ..self.clone()
        }
    }

    /// Check the inputs against the ranges the input form allows.
    ///
    /// The projection does not call this; it accepts any well-typed input.
    /// The vesting schedule is not checked here, since the default schedule
    /// applies unchanged at any grant size (see [`Self::validate_custom_vesting`]).
    pub fn validate(&self) -> Result<()> {
        check_rate("redemption rate", self.redemption_rate, MAX_REDEMPTION_RATE)?;
        check_rate("growth rate", self.growth_rate, MAX_GROWTH_RATE)?;

        if !(self.strike_price > 0.0) {
            return Err(GrantError::NonPositiveStrike(self.strike_price));
        }

        if self.total_grant_shares == 0 {
            return Err(GrantError::ZeroGrantShares);
        }

        Ok(())
    }

    /// Check a user-supplied vesting schedule: no year may vest more
    /// shares than the grant holds.
    pub fn validate_custom_vesting(&self) -> Result<()> {
        for (year, vested) in self.vesting_schedule.iter() {
            if vested > self.total_grant_shares {
                return Err(GrantError::VestedExceedsGrant {
                    year,
                    vested,
                    total: self.total_grant_shares,
                });
            }
        }

        Ok(())
    }
}

impl Default for GrantParameters {
    fn default() -> Self {
        Self::from_percentages(
            DEFAULT_REDEMPTION_PCT,
            DEFAULT_GROWTH_PCT,
            DEFAULT_STRIKE_PRICE,
            DEFAULT_TOTAL_GRANT_SHARES,
            VestingSchedule::default_schedule(),
        )
    }
}

fn check_rate(name: &'static str, rate: f64, max: f64) -> Result<()> {
    if (0.0..=max).contains(&rate) {
        Ok(())
    } else {
        Err(GrantError::RateOutOfRange {
            name,
            pct: rate * 100.0,
            max_pct: max * 100.0,
        })
    }
}
