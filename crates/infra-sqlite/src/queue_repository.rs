// SQLite QueueRepository Implementation

use crate::error::map_sqlx_error;
use crate::SqliteQueueTransaction;
use async_trait::async_trait;
use frontdesk_core::domain::{EntryId, QueueEntry, QueueStatus};
use frontdesk_core::error::{AppError, Result};
use frontdesk_core::port::{
    EntryFilter, QueueRepository, QueueRepositoryTransaction, TransactionalQueueRepository,
};
use sqlx::{SqliteExecutor, SqlitePool};

pub(crate) const SELECT_ENTRIES: &str =
    "SELECT id, patient_name, doctor_name, position, status, created_at FROM queue_entries";

/// rowid breaks position ties in insertion order
pub(crate) const ORDER_BY_POSITION: &str = " ORDER BY position ASC, rowid ASC";

pub struct SqliteQueueRepository {
    pool: SqlitePool,
}

impl SqliteQueueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueRepository for SqliteQueueRepository {
    async fn find_by_id(&self, id: &EntryId) -> Result<Option<QueueEntry>> {
        fetch_by_id(&self.pool, id).await
    }

    async fn find_all(&self) -> Result<Vec<QueueEntry>> {
        fetch_where(&self.pool, &EntryFilter::default()).await
    }

    async fn count_by_status(&self, status: QueueStatus) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM queue_entries WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }
}

#[async_trait]
impl TransactionalQueueRepository for SqliteQueueRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn QueueRepositoryTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteQueueTransaction::new(tx)))
    }
}

// Query helpers shared by the pool-level repository and the transaction

pub(crate) async fn fetch_by_id<'e, E>(executor: E, id: &str) -> Result<Option<QueueEntry>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{} WHERE id = ?", SELECT_ENTRIES);
    let row = sqlx::query_as::<_, QueueEntryRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(map_sqlx_error)?;

    row.map(QueueEntryRow::into_entry).transpose()
}

pub(crate) async fn fetch_where<'e, E>(executor: E, filter: &EntryFilter) -> Result<Vec<QueueEntry>>
where
    E: SqliteExecutor<'e>,
{
    let mut sql = format!("{} WHERE 1 = 1", SELECT_ENTRIES);
    if filter.status.is_some() {
        sql.push_str(" AND status = ?");
    }
    if filter.position_above.is_some() {
        sql.push_str(" AND position > ?");
    }
    sql.push_str(ORDER_BY_POSITION);

    let mut query = sqlx::query_as::<_, QueueEntryRow>(&sql);
    if let Some(status) = filter.status {
        query = query.bind(status.as_str());
    }
    if let Some(position) = filter.position_above {
        query = query.bind(position);
    }

    let rows = query.fetch_all(executor).await.map_err(map_sqlx_error)?;
    rows.into_iter().map(QueueEntryRow::into_entry).collect()
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct QueueEntryRow {
    id: String,
    patient_name: String,
    doctor_name: String,
    position: i64,
    status: String,
    created_at: i64,
}

impl QueueEntryRow {
    fn into_entry(self) -> Result<QueueEntry> {
        let status: QueueStatus = self.status.parse().map_err(|_| {
            AppError::Database(format!(
                "Unknown status '{}' stored for queue entry {}",
                self.status, self.id
            ))
        })?;

        Ok(QueueEntry {
            id: self.id,
            patient_name: self.patient_name,
            doctor_name: self.doctor_name,
            position: self.position,
            status,
            created_at: self.created_at,
        })
    }
}
