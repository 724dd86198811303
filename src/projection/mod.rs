//! Projection engine for yearly grant value tables

mod state;
mod engine;
mod cashflows;

pub use state::ProjectionState;
pub use engine::{project, BASE_YEAR, PROJECTION_YEARS};
pub use cashflows::{ProjectionResult, ProjectionSummary, YearRow};
