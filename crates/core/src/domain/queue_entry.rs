// Queue Entry Domain Model

use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// Queue entry ID (UUID v4)
pub type EntryId = String;

/// Waiting-position (1-based rank, 0 = not queued)
pub type Position = i64;

/// Sentinel position carried by every entry that is not waiting
pub const NOT_QUEUED: Position = 0;

/// Walk-in visit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueueStatus {
    #[serde(rename = "Waiting")]
    Waiting,
    #[serde(rename = "In Consultation")]
    InConsultation,
    #[serde(rename = "Completed")]
    Completed,
}

impl QueueStatus {
    pub const ALL: [QueueStatus; 3] = [
        QueueStatus::Waiting,
        QueueStatus::InConsultation,
        QueueStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Waiting => "Waiting",
            QueueStatus::InConsultation => "In Consultation",
            QueueStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueStatus {
    type Err = DomainError;

    /// Case-insensitive; spaces, `_` and `-` are ignored ("IN_CONSULTATION" parses)
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "waiting" => Ok(QueueStatus::Waiting),
            "inconsultation" => Ok(QueueStatus::InConsultation),
            "completed" => Ok(QueueStatus::Completed),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

/// (old status, new status) pair, classified by its effect on the ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Same status, nothing to do
    Unchanged,
    /// Waiting -> In Consultation: leaves the queue, gap must be closed
    CallIn,
    /// In Consultation -> Completed
    Complete,
    /// Anything else
    Other { from: QueueStatus, to: QueueStatus },
}

impl Transition {
    pub fn between(from: QueueStatus, to: QueueStatus) -> Self {
        use QueueStatus::*;
        match (from, to) {
            (a, b) if a == b => Transition::Unchanged,
            (Waiting, InConsultation) => Transition::CallIn,
            (InConsultation, Completed) => Transition::Complete,
            (from, to) => Transition::Other { from, to },
        }
    }

    /// True if applying the status change without touching positions keeps
    /// the waiting sequence contiguous.
    pub fn keeps_ordering(&self) -> bool {
        match self {
            Transition::Unchanged | Transition::CallIn | Transition::Complete => true,
            Transition::Other { from, to } => {
                *from != QueueStatus::Waiting && *to != QueueStatus::Waiting
            }
        }
    }
}

/// Queue Entry Entity (one walk-in visit)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: EntryId,
    pub patient_name: String,
    pub doctor_name: String,
    pub position: Position,
    pub status: QueueStatus,
    pub created_at: i64, // epoch ms
}

impl QueueEntry {
    /// Create a new waiting entry
    ///
    /// # Arguments
    ///
    /// * `id` - Unique entry ID (injected, not generated)
    /// * `created_at` - Arrival timestamp in epoch ms (injected, not system time)
    /// * `patient_name` - Free-text patient label
    /// * `doctor_name` - Free-text doctor label
    /// * `position` - Waiting-position assigned by the engine
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        patient_name: impl Into<String>,
        doctor_name: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            patient_name: patient_name.into(),
            doctor_name: doctor_name.into(),
            position,
            status: QueueStatus::Waiting,
            created_at,
        }
    }

    /// Create a test entry with deterministic ID and timestamp (test-1, test-2, ...).
    ///
    /// **Note**: production code must inject ID and time via providers.
    pub fn new_test(patient_name: impl Into<String>, position: Position) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(1);

        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        Self::new(
            format!("test-{}", counter),
            (counter * 1000) as i64,
            patient_name,
            "Dr. Test",
            position,
        )
    }

    pub fn is_waiting(&self) -> bool {
        self.status == QueueStatus::Waiting
    }

    /// Take the entry out of the queue with the given (non-waiting) status
    pub fn leave_queue(&mut self, status: QueueStatus) {
        debug_assert_ne!(status, QueueStatus::Waiting);
        self.status = status;
        self.position = NOT_QUEUED;
    }
}

/// Check the queue invariant over a full snapshot:
/// waiting positions are exactly {1..N}, every other entry sits at 0.
pub fn verify_ordering(entries: &[QueueEntry]) -> Result<()> {
    let mut seen = HashSet::new();
    let mut waiting = 0;

    for entry in entries {
        if entry.is_waiting() {
            waiting += 1;
            if !seen.insert(entry.position) {
                return Err(DomainError::OrderingViolated(format!(
                    "duplicate waiting position {}",
                    entry.position
                )));
            }
        } else if entry.position != NOT_QUEUED {
            return Err(DomainError::OrderingViolated(format!(
                "entry {} is {} but holds position {}",
                entry.id, entry.status, entry.position
            )));
        }
    }

    for expected in 1..=waiting {
        if !seen.contains(&expected) {
            return Err(DomainError::OrderingViolated(format!(
                "gap at waiting position {} ({} waiting)",
                expected, waiting
            )));
        }
    }

    Ok(())
}
