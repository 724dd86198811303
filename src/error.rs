//! Error types for grant input handling and report export

use thiserror::Error;

/// Errors raised while collecting, validating or exporting grant data.
///
/// The projection itself never fails; every variant here belongs to the
/// input side (parameters, vesting schedules) or to CSV/file output.
#[derive(Debug, Error)]
pub enum GrantError {
    #[error("{name} must be between 0% and {max_pct:.0}%, got {pct:.1}%")]
    RateOutOfRange {
        name: &'static str,
        pct: f64,
        max_pct: f64,
    },

    #[error("strike price must be greater than zero, got {0}")]
    NonPositiveStrike(f64),

    #[error("total grant shares must be at least 1")]
    ZeroGrantShares,

    #[error("vesting schedule is missing year {0}")]
    MissingVestingYear(u32),

    #[error("vesting year {0} is outside the projection range 2025-2035")]
    UnexpectedVestingYear(u32),

    #[error("vested shares for {year} ({vested}) exceed total grant shares ({total})")]
    VestedExceedsGrant { year: u32, vested: u64, total: u64 },

    #[error("invalid vesting entry '{0}', expected YEAR=SHARES")]
    InvalidVestingEntry(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GrantError>;
