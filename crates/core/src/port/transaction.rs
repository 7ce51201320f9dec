// Transaction port for atomic queue reorders

use crate::domain::{EntryId, Position, QueueEntry, QueueStatus};
use crate::error::Result;
use crate::port::queue_repository::EntryFilter;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations.
///
/// Dropping a transaction without committing rolls it back.
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional QueueRepository operations
#[async_trait]
pub trait TransactionalQueueRepository: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn QueueRepositoryTransaction>>;
}

/// Record-store operations within a transaction
#[async_trait]
pub trait QueueRepositoryTransaction: Transaction {
    /// Insert a new entry
    async fn insert(&mut self, entry: &QueueEntry) -> Result<()>;

    /// Find entry by ID
    async fn find_by_id(&mut self, id: &EntryId) -> Result<Option<QueueEntry>>;

    /// All entries, ascending position, ties in insertion order
    async fn find_all(&mut self) -> Result<Vec<QueueEntry>>;

    /// Entries matching `filter`, ascending position
    async fn find_where(&mut self, filter: &EntryFilter) -> Result<Vec<QueueEntry>>;

    /// Overwrite the entry with the same ID
    async fn update(&mut self, entry: &QueueEntry) -> Result<()>;

    /// Delete by ID, returns false if nothing matched
    async fn delete(&mut self, id: &EntryId) -> Result<bool>;

    /// Delete every entry, returns the number removed
    async fn delete_all(&mut self) -> Result<u64>;

    /// MAX(position), optionally restricted to one status; 0 when empty
    async fn max_position(&mut self, status: Option<QueueStatus>) -> Result<Position>;
}
