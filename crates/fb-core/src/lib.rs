//! Core logic for billable session reports.
//!
//! This crate contains:
//! - Timestamp normalization: `HH:MM:SS` to epoch seconds on one reference date
//! - Log line grammar: validating and parsing `HH:MM:SS <customer> Start|End`
//! - Reconciliation: LIFO pairing of session boundaries per customer
//! - The run driver that ties them together over a log file

pub mod boundary;
pub mod line;
mod reconcile;
pub mod run;
pub mod timestamp;

pub use boundary::{Boundary, UnknownBoundary};
pub use line::{LineError, SessionEvent, is_valid_line, parse_line};
pub use reconcile::{CustomerAccount, CustomerSummary, RunState};
pub use run::{RunError, RunOutput, RunStats, reconcile_file, reconcile_reader};
pub use timestamp::{Normalizer, Timestamp, TimestampError};
