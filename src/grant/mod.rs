//! Grant inputs: parameters, vesting schedules and schedule loading

mod data;
pub mod loader;

pub use data::{
    parse_vesting_entry, GrantParameters, VestingSchedule, DEFAULT_GROWTH_PCT,
    DEFAULT_REDEMPTION_PCT, DEFAULT_STRIKE_PRICE, DEFAULT_TOTAL_GRANT_SHARES,
    FIRST_VESTING_YEAR, LAST_VESTING_YEAR, MAX_GROWTH_RATE, MAX_REDEMPTION_RATE,
};
pub use loader::{load_vesting_schedule, load_vesting_schedule_from_reader, write_vesting_schedule};
