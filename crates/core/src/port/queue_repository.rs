// Queue Repository Port (Interface)

use crate::domain::{EntryId, Position, QueueEntry, QueueStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Predicate for `find_where`; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub status: Option<QueueStatus>,
    /// Strictly greater than
    pub position_above: Option<Position>,
}

impl EntryFilter {
    pub fn waiting() -> Self {
        Self {
            status: Some(QueueStatus::Waiting),
            position_above: None,
        }
    }

    pub fn behind(mut self, position: Position) -> Self {
        self.position_above = Some(position);
        self
    }

    pub fn matches(&self, entry: &QueueEntry) -> bool {
        self.status.map_or(true, |s| entry.status == s)
            && self.position_above.map_or(true, |p| entry.position > p)
    }
}

/// Read-side repository interface for queue entries.
///
/// All writes go through `TransactionalQueueRepository` so multi-record
/// reorders commit atomically.
#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Find entry by ID
    async fn find_by_id(&self, id: &EntryId) -> Result<Option<QueueEntry>>;

    /// All entries, ascending position, ties in insertion order
    async fn find_all(&self) -> Result<Vec<QueueEntry>>;

    /// Count entries by status
    async fn count_by_status(&self, status: QueueStatus) -> Result<i64>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use crate::port::transaction::{
        QueueRepositoryTransaction, Transaction, TransactionalQueueRepository,
    };
    use std::sync::{Arc, Mutex};

    /// In-memory store. Entries are kept in insertion order; each transaction
    /// works on a private copy that replaces the shared state on commit.
    #[derive(Clone, Default)]
    pub struct InMemoryQueueRepository {
        entries: Arc<Mutex<Vec<QueueEntry>>>,
        fail_after_writes: Arc<Mutex<Option<usize>>>,
        commits: Arc<Mutex<usize>>,
    }

    impl InMemoryQueueRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_entries(entries: Vec<QueueEntry>) -> Self {
            let repo = Self::default();
            *repo.entries.lock().unwrap() = entries;
            repo
        }

        /// Make the next transaction fail on its (n+1)-th write
        pub fn fail_after_writes(&self, writes: usize) {
            *self.fail_after_writes.lock().unwrap() = Some(writes);
        }

        pub fn snapshot(&self) -> Vec<QueueEntry> {
            self.entries.lock().unwrap().clone()
        }

        pub fn commit_count(&self) -> usize {
            *self.commits.lock().unwrap()
        }
    }

    fn ordered(mut entries: Vec<QueueEntry>) -> Vec<QueueEntry> {
        // stable sort keeps insertion order among equal positions
        entries.sort_by_key(|e| e.position);
        entries
    }

    #[async_trait]
    impl QueueRepository for InMemoryQueueRepository {
        async fn find_by_id(&self, id: &EntryId) -> Result<Option<QueueEntry>> {
            Ok(self.entries.lock().unwrap().iter().find(|e| &e.id == id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<QueueEntry>> {
            Ok(ordered(self.snapshot()))
        }

        async fn count_by_status(&self, status: QueueStatus) -> Result<i64> {
            let count = self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.status == status)
                .count();
            Ok(count as i64)
        }
    }

    #[async_trait]
    impl TransactionalQueueRepository for InMemoryQueueRepository {
        async fn begin_transaction(&self) -> Result<Box<dyn QueueRepositoryTransaction>> {
            Ok(Box::new(InMemoryTransaction {
                working: self.snapshot(),
                writes_left: self.fail_after_writes.lock().unwrap().take(),
                store: self.clone(),
            }))
        }
    }

    pub struct InMemoryTransaction {
        working: Vec<QueueEntry>,
        writes_left: Option<usize>,
        store: InMemoryQueueRepository,
    }

    impl InMemoryTransaction {
        fn record_write(&mut self) -> Result<()> {
            match self.writes_left.as_mut() {
                Some(0) => Err(AppError::Database("injected write failure".to_string())),
                Some(n) => {
                    *n -= 1;
                    Ok(())
                }
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl Transaction for InMemoryTransaction {
        async fn commit(self: Box<Self>) -> Result<()> {
            let InMemoryTransaction { working, store, .. } = *self;
            *store.entries.lock().unwrap() = working;
            *store.commits.lock().unwrap() += 1;
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl QueueRepositoryTransaction for InMemoryTransaction {
        async fn insert(&mut self, entry: &QueueEntry) -> Result<()> {
            self.record_write()?;
            if self.working.iter().any(|e| e.id == entry.id) {
                return Err(AppError::Database(format!(
                    "Unique constraint violation: {}",
                    entry.id
                )));
            }
            self.working.push(entry.clone());
            Ok(())
        }

        async fn find_by_id(&mut self, id: &EntryId) -> Result<Option<QueueEntry>> {
            Ok(self.working.iter().find(|e| &e.id == id).cloned())
        }

        async fn find_all(&mut self) -> Result<Vec<QueueEntry>> {
            Ok(ordered(self.working.clone()))
        }

        async fn find_where(&mut self, filter: &EntryFilter) -> Result<Vec<QueueEntry>> {
            let matching = self
                .working
                .iter()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect();
            Ok(ordered(matching))
        }

        async fn update(&mut self, entry: &QueueEntry) -> Result<()> {
            self.record_write()?;
            if let Some(slot) = self.working.iter_mut().find(|e| e.id == entry.id) {
                *slot = entry.clone();
            }
            Ok(())
        }

        async fn delete(&mut self, id: &EntryId) -> Result<bool> {
            self.record_write()?;
            let before = self.working.len();
            self.working.retain(|e| &e.id != id);
            Ok(self.working.len() < before)
        }

        async fn delete_all(&mut self) -> Result<u64> {
            self.record_write()?;
            let removed = self.working.len() as u64;
            self.working.clear();
            Ok(removed)
        }

        async fn max_position(&mut self, status: Option<QueueStatus>) -> Result<Position> {
            Ok(self
                .working
                .iter()
                .filter(|e| status.map_or(true, |s| e.status == s))
                .map(|e| e.position)
                .max()
                .unwrap_or(0))
        }
    }
}
