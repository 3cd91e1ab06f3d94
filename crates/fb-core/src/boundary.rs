//! Session boundary markers as they appear in the log.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Which edge of a session a log line marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    Start,
    End,
}

impl Boundary {
    /// The literal keyword used in log lines.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::End => "End",
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Boundary {
    type Err = UnknownBoundary;

    /// Keywords are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Start" => Ok(Self::Start),
            "End" => Ok(Self::End),
            _ => Err(UnknownBoundary(s.to_string())),
        }
    }
}

/// Error type for unrecognised boundary keywords.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown session boundary: {0}")]
pub struct UnknownBoundary(String);
