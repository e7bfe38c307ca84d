//! Per-phase run state.

use crate::sync::{FaultKind, SyncError};
use crate::warehouse::LogEntry;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// Mutable state of one phase attempt, handed to the phase body.
#[derive(Debug)]
pub struct PhaseContext {
    name: String,
    state: PhaseState,
    started_at: Option<DateTime<Utc>>,
    record_count: i64,
}

impl PhaseContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: PhaseState::Pending,
            started_at: None,
            record_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> PhaseState {
        self.state
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn record_count(&self) -> i64 {
        self.record_count
    }

    pub fn start(&mut self) {
        self.state = PhaseState::Running;
        self.started_at = Some(Utc::now());
    }

    pub fn add_records(&mut self, count: usize) {
        self.record_count += count as i64;
    }

    /// Close the phase with the body's result.
    pub fn finish(self, result: Result<(), SyncError>) -> (PhaseOutcome, LogEntry) {
        let end_time = Utc::now();
        let start_time = self.started_at.unwrap_or(end_time);

        let (status, error_message) = match result {
            Ok(()) => (PhaseStatus::Succeeded, None),
            Err(err) => {
                let message = err.to_string();
                (
                    PhaseStatus::Failed {
                        kind: err.kind(),
                        message: message.clone(),
                    },
                    Some(message),
                )
            }
        };

        let entry = LogEntry {
            script_name: self.name.clone(),
            success: status.is_success(),
            record_count: self.record_count,
            start_time,
            end_time,
            error_message,
        };
        let outcome = PhaseOutcome {
            name: self.name,
            record_count: self.record_count,
            status,
        };
        (outcome, entry)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PhaseStatus {
    Succeeded,
    Failed { kind: FaultKind, message: String },
}

impl PhaseStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, PhaseStatus::Succeeded)
    }
}

/// Terminal result of one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseOutcome {
    pub name: String,
    pub record_count: i64,
    pub status: PhaseStatus,
}

impl PhaseOutcome {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn state(&self) -> PhaseState {
        if self.is_success() {
            PhaseState::Succeeded
        } else {
            PhaseState::Failed
        }
    }
}
