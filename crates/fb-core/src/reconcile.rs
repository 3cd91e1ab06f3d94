//! Session reconciliation.
//!
//! Pairs `End` markers with `Start` markers per customer and accumulates
//! billable time.
//!
//! # Pairing Rules
//!
//! 1. Each customer keeps a stack of open session starts. An `End` closes
//!    the most recently opened session (LIFO), so nested sessions close
//!    inside-out.
//! 2. An `End` with no open session is an orphan. Its session is assumed to
//!    have been running since the first event of the run, so a start at the
//!    run's earliest timestamp is synthesized and closed immediately.
//! 3. Sessions still open when the log ends are force-closed at the last
//!    valid timestamp by [`RunState::close_open_sessions`].
//!
//! Events are applied exactly in the order given. Nothing is sorted or
//! deduplicated.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::boundary::Boundary;
use crate::line::SessionEvent;
use crate::timestamp::Timestamp;

/// Billing state for one customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerAccount {
    name: String,
    session_count: u64,
    session_seconds: u64,
    /// Start timestamps of sessions awaiting an `End`, most recent last.
    open_sessions: Vec<Timestamp>,
}

impl CustomerAccount {
    /// Creates an account with one open session.
    pub fn new(name: impl Into<String>, start: Timestamp) -> Self {
        Self {
            name: name.into(),
            session_count: 0,
            session_seconds: 0,
            open_sessions: vec![start],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Completed sessions, including synthesized ones.
    pub const fn session_count(&self) -> u64 {
        self.session_count
    }

    /// Total billable seconds over completed sessions.
    pub const fn session_seconds(&self) -> u64 {
        self.session_seconds
    }

    pub fn open_sessions(&self) -> &[Timestamp] {
        &self.open_sessions
    }

    pub fn has_open_sessions(&self) -> bool {
        !self.open_sessions.is_empty()
    }

    /// Opens a new session.
    pub fn start_session(&mut self, start: Timestamp) {
        self.open_sessions.push(start);
    }

    /// Closes the most recently opened session at `end`.
    ///
    /// Returns false if no session was open, leaving the account untouched.
    pub fn end_session(&mut self, end: Timestamp) -> bool {
        let Some(start) = self.open_sessions.pop() else {
            return false;
        };

        self.session_count = self.session_count.saturating_add(1);
        let elapsed = u64::try_from(end - start).unwrap_or_else(|_| {
            tracing::warn!(
                customer = %self.name,
                start,
                end,
                "session ends before it starts, billing zero seconds"
            );
            0
        });
        self.session_seconds = self.session_seconds.saturating_add(elapsed);
        true
    }

    pub fn summary(&self) -> CustomerSummary {
        CustomerSummary {
            name: self.name.clone(),
            sessions: self.session_count,
            seconds: self.session_seconds,
        }
    }
}

/// Report row for one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerSummary {
    pub name: String,
    pub sessions: u64,
    pub seconds: u64,
}

/// All reconciliation state for a single run.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    /// Accounts in first-seen order.
    accounts: Vec<CustomerAccount>,
    /// Customer name to position in `accounts`.
    index: HashMap<String, usize>,
    /// Positions of accounts with open sessions.
    active: BTreeSet<usize>,
    /// Timestamp of the first event recorded.
    earliest: Option<Timestamp>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the first event of the run, if any.
    pub const fn earliest(&self) -> Option<Timestamp> {
        self.earliest
    }

    /// Accounts in the order their customers were first seen.
    pub fn accounts(&self) -> impl Iterator<Item = &CustomerAccount> {
        self.accounts.iter()
    }

    pub fn account(&self, name: &str) -> Option<&CustomerAccount> {
        self.index.get(name).map(|&i| &self.accounts[i])
    }

    /// Names of customers that still have open sessions.
    pub fn active_customers(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(|&i| self.accounts[i].name())
    }

    pub fn summaries(&self) -> Vec<CustomerSummary> {
        self.accounts.iter().map(CustomerAccount::summary).collect()
    }

    /// Applies one parsed log event.
    pub fn apply(&mut self, event: &SessionEvent) {
        self.record_event(&event.customer, event.timestamp, event.boundary);
    }

    /// Records a single session boundary for `name`.
    pub fn record_event(&mut self, name: &str, timestamp: Timestamp, boundary: Boundary) {
        let earliest = *self.earliest.get_or_insert(timestamp);

        let Some(&i) = self.index.get(name) else {
            let start = match boundary {
                Boundary::Start => timestamp,
                Boundary::End => {
                    tracing::debug!(customer = name, "end without start for new customer");
                    earliest
                }
            };
            let i = self.insert(CustomerAccount::new(name, start));
            if boundary == Boundary::End {
                self.close(i, timestamp);
            }
            return;
        };

        match boundary {
            Boundary::Start => {
                self.accounts[i].start_session(timestamp);
                self.active.insert(i);
            }
            Boundary::End => {
                if !self.accounts[i].has_open_sessions() {
                    tracing::debug!(customer = name, "end without open session");
                    self.accounts[i].start_session(earliest);
                }
                self.close(i, timestamp);
            }
        }
    }

    /// Force-closes every open session at `at`.
    ///
    /// Returns the number of sessions closed.
    pub fn close_open_sessions(&mut self, at: Timestamp) -> usize {
        let mut closed = 0;
        for i in std::mem::take(&mut self.active) {
            let account = &mut self.accounts[i];
            while account.end_session(at) {
                closed += 1;
            }
            tracing::debug!(customer = %account.name, "force-closed open sessions");
        }
        closed
    }

    fn insert(&mut self, account: CustomerAccount) -> usize {
        let i = self.accounts.len();
        self.index.insert(account.name.clone(), i);
        self.accounts.push(account);
        self.active.insert(i);
        i
    }

    fn close(&mut self, i: usize, at: Timestamp) {
        self.accounts[i].end_session(at);
        if !self.accounts[i].has_open_sessions() {
            self.active.remove(&i);
        }
    }
}
