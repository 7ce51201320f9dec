// Domain Layer - Walk-in queue entities and ordering rules

pub mod error;
pub mod queue_entry;

// Re-exports
pub use error::DomainError;
pub use queue_entry::{
    verify_ordering, EntryId, Position, QueueEntry, QueueStatus, Transition, NOT_QUEUED,
};
