//! Option Redemption Calculator - yearly value projection for option grants
//!
//! This library provides:
//! - Grant inputs: rates, strike, grant size and vesting schedules
//! - A pure year-by-year projection from 2024 through 2035
//! - Preset rate sweeps for comparing redemption and growth scenarios
//! - Formatted results tables and CSV export

pub mod error;
pub mod grant;
pub mod projection;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use error::{GrantError, Result};
pub use grant::{GrantParameters, VestingSchedule};
pub use projection::{project, ProjectionResult, YearRow};
pub use scenario::ScenarioRunner;
