// SQLite Transaction Implementation

use crate::error::map_sqlx_error;
use crate::queue_repository::{fetch_by_id, fetch_where};
use async_trait::async_trait;
use frontdesk_core::domain::{EntryId, Position, QueueEntry, QueueStatus};
use frontdesk_core::error::Result;
use frontdesk_core::port::{EntryFilter, QueueRepositoryTransaction, Transaction};
use sqlx::{Sqlite, Transaction as SqlxTransaction};

/// One queue mutation's worth of statements; sqlx rolls back on drop
pub struct SqliteQueueTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteQueueTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteQueueTransaction<'_> {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)
    }
}

#[async_trait]
impl QueueRepositoryTransaction for SqliteQueueTransaction<'_> {
    async fn insert(&mut self, entry: &QueueEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO queue_entries (
                id, patient_name, doctor_name, position, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.patient_name)
        .bind(&entry.doctor_name)
        .bind(entry.position)
        .bind(entry.status.as_str())
        .bind(entry.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&mut self, id: &EntryId) -> Result<Option<QueueEntry>> {
        fetch_by_id(&mut *self.tx, id).await
    }

    async fn find_all(&mut self) -> Result<Vec<QueueEntry>> {
        fetch_where(&mut *self.tx, &EntryFilter::default()).await
    }

    async fn find_where(&mut self, filter: &EntryFilter) -> Result<Vec<QueueEntry>> {
        fetch_where(&mut *self.tx, filter).await
    }

    async fn update(&mut self, entry: &QueueEntry) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE queue_entries
            SET patient_name = ?, doctor_name = ?, position = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&entry.patient_name)
        .bind(&entry.doctor_name)
        .bind(entry.position)
        .bind(entry.status.as_str())
        .bind(&entry.id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete(&mut self, id: &EntryId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM queue_entries WHERE id = ?")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&mut self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM queue_entries")
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn max_position(&mut self, status: Option<QueueStatus>) -> Result<Position> {
        let max: i64 = match status {
            Some(status) => {
                sqlx::query_scalar::<_, i64>(
                    "SELECT COALESCE(MAX(position), 0) FROM queue_entries WHERE status = ?",
                )
                .bind(status.as_str())
                .fetch_one(&mut *self.tx)
                .await
            }
            None => {
                sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(position), 0) FROM queue_entries")
                    .fetch_one(&mut *self.tx)
                    .await
            }
        }
        .map_err(map_sqlx_error)?;

        Ok(max)
    }
}
