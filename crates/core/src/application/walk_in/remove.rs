// Remove-from-queue Use Case

use super::reorder::close_gap;
use crate::domain::{EntryId, QueueEntry};
use crate::error::{AppError, Result};
use crate::port::QueueRepositoryTransaction;

/// Delete the entry and close the gap it leaves among waiting entries.
///
/// A non-waiting entry sits at position 0, so removing it shifts nothing.
pub async fn execute(tx: &mut dyn QueueRepositoryTransaction, id: &EntryId) -> Result<QueueEntry> {
    let removed = tx
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Queue entry {} not found", id)))?;

    if !tx.delete(id).await? {
        return Err(AppError::NotFound(format!("Queue entry {} not found", id)));
    }

    if removed.is_waiting() {
        close_gap(tx, removed.position).await?;
    }

    Ok(removed)
}
