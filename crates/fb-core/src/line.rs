//! Log line grammar: `HH:MM:SS <customer> Start|End`.
//!
//! [`is_valid_line`] is the gatekeeper. Anything it rejects is noise and is
//! dropped without affecting a run. [`parse_line`] expects a line that has
//! already passed validation.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::boundary::{Boundary, UnknownBoundary};
use crate::timestamp::{Normalizer, Timestamp, TimestampError};

/// Pre-compiled grammar for a whole log line.
static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[01][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9]\s+\w+\s+(?:Start|End)$").unwrap()
});

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
    #[error(transparent)]
    Boundary(#[from] UnknownBoundary),
}

/// One parsed session boundary event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    pub timestamp: Timestamp,
    pub customer: String,
    pub boundary: Boundary,
}

/// Returns true if the line matches the log grammar.
///
/// Trailing whitespace (including the line terminator) is ignored; leading
/// whitespace is not.
pub fn is_valid_line(line: &str) -> bool {
    LINE_RE.is_match(line.trim_end())
}

/// Extracts the timestamp, customer and boundary from a validated line.
pub fn parse_line(line: &str, normalizer: &Normalizer) -> Result<SessionEvent, LineError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [time, customer, boundary] = fields[..] else {
        return Err(LineError::FieldCount(fields.len()));
    };

    Ok(SessionEvent {
        timestamp: normalizer.normalize(time)?,
        customer: customer.to_string(),
        boundary: boundary.parse()?,
    })
}
