//! Load custom vesting schedules from CSV
//!
//! Expected columns: `Year,VestedShares`, one row per year 2025-2035.

use std::collections::BTreeMap;
use std::path::Path;

use csv::Reader;
use log::debug;

use super::VestingSchedule;
use crate::error::{GrantError, Result};

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Year")]
    year: u32,
    #[serde(rename = "VestedShares")]
    vested_shares: u64,
}

/// Load a vesting schedule from a CSV file
pub fn load_vesting_schedule<P: AsRef<Path>>(path: P) -> Result<VestingSchedule> {
    let path = path.as_ref();
    debug!("loading vesting schedule from {}", path.display());

    let reader = Reader::from_path(path)?;
    read_schedule(reader)
}

/// Load a vesting schedule from any reader (e.g., string buffer, request body)
pub fn load_vesting_schedule_from_reader<R: std::io::Read>(reader: R) -> Result<VestingSchedule> {
    read_schedule(Reader::from_reader(reader))
}

fn read_schedule<R: std::io::Read>(mut reader: Reader<R>) -> Result<VestingSchedule> {
    let mut entries = BTreeMap::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        if entries.insert(row.year, row.vested_shares).is_some() {
            return Err(GrantError::InvalidVestingEntry(format!(
                "{}={} (duplicate year)",
                row.year, row.vested_shares
            )));
        }
    }

    VestingSchedule::new(entries)
}

/// Write a schedule in the same CSV layout the loader reads
pub fn write_vesting_schedule<W: std::io::Write>(schedule: &VestingSchedule, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Year", "VestedShares"])?;
    for (year, shares) in schedule.iter() {
        csv_writer.write_record([year.to_string(), shares.to_string()])?;
    }
    csv_writer.flush()?;
    Ok(())
}
