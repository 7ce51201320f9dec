// Application Layer - Use Cases and Business Logic

pub mod walk_in;

// Re-exports
pub use walk_in::{
    AddRequest, QueuePolicy, QueueStats, TransitionPolicy, UpdateOutcome, WalkInQueueService,
};
