//! Run driver: reads a session log and reconciles it end to end.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::line::{is_valid_line, parse_line};
use crate::reconcile::RunState;
use crate::timestamp::{Normalizer, Timestamp};

/// Buffer size for `BufReader` (64KB for large logs).
const BUFFER_SIZE: usize = 64 * 1024;

/// Failures that abort a run. Malformed lines are never errors.
#[derive(Debug, Error)]
pub enum RunError {
    /// The log path does not exist.
    #[error("log file not found: {}", path.display())]
    NotFound { path: PathBuf },
    /// Any other failure opening or reading the log.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RunError {
    /// Classifies a failure to open `path`.
    fn from_open(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Counters describing one pass over a log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub lines_read: usize,
    pub lines_skipped: usize,
    /// Sessions still open at end of input and closed by the driver.
    pub sessions_force_closed: usize,
    /// Timestamp of the last valid line.
    pub last_timestamp: Option<Timestamp>,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub state: RunState,
    pub stats: RunStats,
}

/// Reconciles the log at `path`.
///
/// The file is closed before this returns, on success or failure.
pub fn reconcile_file(path: &Path, normalizer: &Normalizer) -> Result<RunOutput, RunError> {
    let file = File::open(path).map_err(|e| RunError::from_open(path, e))?;
    let reader = BufReader::with_capacity(BUFFER_SIZE, file);
    reconcile_opened(path, reader, normalizer)
}

/// Reconciles an already opened log. Every read failure is an I/O error.
fn reconcile_opened<R: BufRead>(
    path: &Path,
    reader: R,
    normalizer: &Normalizer,
) -> Result<RunOutput, RunError> {
    let output = reconcile_reader(reader, normalizer).map_err(|source| RunError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        lines_read = output.stats.lines_read,
        lines_skipped = output.stats.lines_skipped,
        customers = output.state.accounts().count(),
        "reconciled session log"
    );
    Ok(output)
}

/// Reconciles session events from any line source.
pub fn reconcile_reader<R: BufRead>(reader: R, normalizer: &Normalizer) -> io::Result<RunOutput> {
    let mut state = RunState::new();
    let mut stats = RunStats::default();

    for line in reader.lines() {
        let line = line?;
        stats.lines_read += 1;

        if !is_valid_line(&line) {
            tracing::trace!(line = %line, "skipping malformed line");
            stats.lines_skipped += 1;
            continue;
        }

        let event = match parse_line(&line, normalizer) {
            Ok(event) => event,
            Err(e) => {
                tracing::trace!(line = %line, error = %e, "skipping unparseable line");
                stats.lines_skipped += 1;
                continue;
            }
        };

        state.apply(&event);
        stats.last_timestamp = Some(event.timestamp);
    }

    if let Some(last) = stats.last_timestamp {
        stats.sessions_force_closed = state.close_open_sessions(last);
        if stats.sessions_force_closed > 0 {
            tracing::debug!(
                count = stats.sessions_force_closed,
                at = last,
                "closed sessions left open at end of log"
            );
        }
    }

    Ok(RunOutput { state, stats })
}
