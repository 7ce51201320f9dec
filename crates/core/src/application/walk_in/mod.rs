// Walk-in Queue Service - ordering engine for the front-desk queue

pub mod add;
pub mod constants;
pub mod policy;
mod reorder;
pub mod remove;
pub mod update_status;

#[cfg(test)]
mod walk_in_test;

pub use add::AddRequest;
pub use policy::{QueuePolicy, TransitionPolicy};
pub use update_status::UpdateOutcome;

use crate::domain::{verify_ordering, EntryId, QueueEntry, QueueStatus};
use crate::error::Result;
use crate::port::{
    IdProvider, QueueRepository, QueueRepositoryTransaction, TimeProvider,
    TransactionalQueueRepository,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Dashboard summary counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub waiting: i64,
    pub in_consultation: i64,
    pub completed: i64,
}

/// Walk-in queue engine.
///
/// Every mutation holds `write_lock` and runs in one store transaction, so
/// the waiting positions are `{1..N}` after each call returns, even with
/// concurrent callers. Reads go straight to the store and see committed
/// state only.
pub struct WalkInQueueService {
    queue_repo: Arc<dyn QueueRepository>,
    tx_repo: Arc<dyn TransactionalQueueRepository>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    policy: QueuePolicy,
    write_lock: Mutex<()>,
}

impl WalkInQueueService {
    pub fn new(
        queue_repo: Arc<dyn QueueRepository>,
        tx_repo: Arc<dyn TransactionalQueueRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        policy: QueuePolicy,
    ) -> Self {
        Self {
            queue_repo,
            tx_repo,
            id_provider,
            time_provider,
            policy,
            write_lock: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> &QueuePolicy {
        &self.policy
    }

    /// Add a patient at the back of the queue
    pub async fn add(&self, req: AddRequest) -> Result<QueueEntry> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.tx_repo.begin_transaction().await?;

        let result = add::execute(
            tx.as_mut(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            req,
        )
        .await;
        let entry = finish(tx, result).await?;

        info!(
            entry_id = %entry.id,
            position = entry.position,
            doctor = %entry.doctor_name,
            "Patient added to queue"
        );
        Ok(entry)
    }

    /// All entries by ascending position (non-waiting entries first, arrival order)
    pub async fn list_ordered(&self) -> Result<Vec<QueueEntry>> {
        self.queue_repo.find_all().await
    }

    pub async fn update_status(
        &self,
        id: &EntryId,
        new_status: QueueStatus,
    ) -> Result<UpdateOutcome> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.tx_repo.begin_transaction().await?;

        let result = update_status::execute(tx.as_mut(), &self.policy, id, new_status).await;
        let outcome = finish(tx, result).await?;

        info!(
            entry_id = %id,
            status = %new_status,
            outcome = outcome.message(),
            "Queue status updated"
        );
        Ok(outcome)
    }

    /// Remove an entry; returns the entry as it was before deletion
    pub async fn remove(&self, id: &EntryId) -> Result<QueueEntry> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.tx_repo.begin_transaction().await?;

        let result = remove::execute(tx.as_mut(), id).await;
        let removed = finish(tx, result).await?;

        info!(
            entry_id = %removed.id,
            position = removed.position,
            status = %removed.status,
            "Patient removed from queue"
        );
        Ok(removed)
    }

    /// Delete every entry; returns how many were removed
    pub async fn clear_all(&self) -> Result<u64> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.tx_repo.begin_transaction().await?;

        let result = tx.delete_all().await;
        let removed = finish(tx, result).await?;

        info!(removed, "Queue cleared");
        Ok(removed)
    }

    pub async fn stats(&self) -> Result<QueueStats> {
        Ok(QueueStats {
            waiting: self.queue_repo.count_by_status(QueueStatus::Waiting).await?,
            in_consultation: self
                .queue_repo
                .count_by_status(QueueStatus::InConsultation)
                .await?,
            completed: self.queue_repo.count_by_status(QueueStatus::Completed).await?,
        })
    }

    /// Verify the committed queue against the ordering invariant
    pub async fn check_integrity(&self) -> Result<()> {
        let entries = self.list_ordered().await?;
        verify_ordering(&entries)?;
        Ok(())
    }

    /// Rebuild contiguous positions (startup repair after lenient updates or
    /// out-of-band writes). Returns the number of entries rewritten.
    pub async fn repair(&self) -> Result<u64> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.tx_repo.begin_transaction().await?;

        let result = reorder::renumber(tx.as_mut()).await;
        let rewritten = finish(tx, result).await?;

        if rewritten > 0 {
            warn!(rewritten, "Queue positions repaired");
        }
        Ok(rewritten)
    }
}

/// Commit on success, roll back on failure (the original error wins)
async fn finish<T>(tx: Box<dyn QueueRepositoryTransaction>, result: Result<T>) -> Result<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}
