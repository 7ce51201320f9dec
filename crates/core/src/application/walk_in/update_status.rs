// Update-status Use Case

use super::policy::{QueuePolicy, TransitionPolicy};
use super::reorder::{close_gap, promote_front};
use crate::domain::{DomainError, EntryId, QueueStatus, Transition};
use crate::error::{AppError, Result};
use crate::port::QueueRepositoryTransaction;
use serde::Serialize;

/// What a status update did to the queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpdateOutcome {
    /// Entry left the queue and everyone behind moved up
    Reordered,
    /// Status changed, no positions touched
    StatusUpdated,
    /// Consultation completed and the front of the queue was called in
    Promoted { next: EntryId },
}

impl UpdateOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            UpdateOutcome::Reordered => "Status updated and queue reordered",
            UpdateOutcome::StatusUpdated => "Status updated",
            UpdateOutcome::Promoted { .. } => "Status updated and next patient called in",
        }
    }
}

pub async fn execute(
    tx: &mut dyn QueueRepositoryTransaction,
    policy: &QueuePolicy,
    id: &EntryId,
    new_status: QueueStatus,
) -> Result<UpdateOutcome> {
    let mut entry = tx
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Queue entry {} not found", id)))?;

    let transition = Transition::between(entry.status, new_status);

    match transition {
        Transition::Unchanged => Ok(UpdateOutcome::StatusUpdated),

        Transition::CallIn => {
            let vacated = entry.position;
            entry.leave_queue(QueueStatus::InConsultation);
            tx.update(&entry).await?;
            close_gap(tx, vacated).await?;
            Ok(UpdateOutcome::Reordered)
        }

        Transition::Complete => {
            entry.status = QueueStatus::Completed;
            tx.update(&entry).await?;

            if policy.auto_promote_on_completion {
                if let Some(next) = promote_front(tx).await? {
                    return Ok(UpdateOutcome::Promoted { next });
                }
            }
            Ok(UpdateOutcome::StatusUpdated)
        }

        Transition::Other { from, to } => {
            if policy.transitions == TransitionPolicy::Strict && !transition.keeps_ordering() {
                return Err(DomainError::InvalidTransition {
                    from: from.to_string(),
                    to: to.to_string(),
                }
                .into());
            }
            entry.status = to;
            tx.update(&entry).await?;
            Ok(UpdateOutcome::StatusUpdated)
        }
    }
}
