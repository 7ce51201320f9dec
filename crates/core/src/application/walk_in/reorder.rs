// Gap closure and renumbering (shared by update_status / remove / repair)

use crate::domain::{EntryId, Position, QueueStatus, NOT_QUEUED};
use crate::error::Result;
use crate::port::{EntryFilter, QueueRepositoryTransaction};
use tracing::debug;

/// Shift every waiting entry behind `vacated` forward by one.
///
/// Only positions strictly greater than `vacated` move. Returns the number
/// of entries shifted.
pub(crate) async fn close_gap(
    tx: &mut dyn QueueRepositoryTransaction,
    vacated: Position,
) -> Result<usize> {
    if vacated <= NOT_QUEUED {
        return Ok(0);
    }

    let behind = tx
        .find_where(&EntryFilter::waiting().behind(vacated))
        .await?;
    let shifted = behind.len();

    // ascending order: each slot is free by the time it is taken
    for mut entry in behind {
        entry.position -= 1;
        tx.update(&entry).await?;
    }

    debug!(vacated, shifted, "Closed queue gap");
    Ok(shifted)
}

/// Call in the patient at waiting-position 1, if any
pub(crate) async fn promote_front(
    tx: &mut dyn QueueRepositoryTransaction,
) -> Result<Option<EntryId>> {
    let front = tx.find_where(&EntryFilter::waiting()).await?.into_iter().next();

    let Some(mut next) = front else {
        return Ok(None);
    };

    let vacated = next.position;
    next.leave_queue(QueueStatus::InConsultation);
    tx.update(&next).await?;
    close_gap(tx, vacated).await?;

    Ok(Some(next.id))
}

/// Reassign waiting positions 1..N (current order, then arrival order) and
/// reset every other entry to 0. Returns the number of entries rewritten.
pub(crate) async fn renumber(tx: &mut dyn QueueRepositoryTransaction) -> Result<u64> {
    let entries = tx.find_all().await?;
    let mut next_position: Position = 1;
    let mut rewritten = 0;

    for mut entry in entries {
        let expected = if entry.is_waiting() {
            let p = next_position;
            next_position += 1;
            p
        } else {
            NOT_QUEUED
        };

        if entry.position != expected {
            entry.position = expected;
            tx.update(&entry).await?;
            rewritten += 1;
        }
    }

    Ok(rewritten)
}
