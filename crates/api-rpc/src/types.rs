//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use frontdesk_core::domain::QueueEntry;
use serde::{Deserialize, Serialize};

/// queue.add.v1 - Register a walk-in patient
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub patient_name: String,
    pub doctor_name: String,
}

/// One queue row as seen by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntryDto {
    pub id: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub position: i64,
    pub status: String,
    pub created_at: i64,
}

impl From<QueueEntry> for QueueEntryDto {
    fn from(entry: QueueEntry) -> Self {
        Self {
            status: entry.status.to_string(),
            id: entry.id,
            patient_name: entry.patient_name,
            doctor_name: entry.doctor_name,
            position: entry.position,
            created_at: entry.created_at,
        }
    }
}

/// queue.list.v1 - All entries by ascending position
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub entries: Vec<QueueEntryDto>,
}

/// queue.update_status.v1 - Change an entry's status
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateStatusResponse {
    pub message: String,
}

/// queue.remove.v1 - Delete one entry
#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveResponse {
    pub id: String,
    pub removed: bool,
}

/// queue.clear.v1 - Delete every entry
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub removed: u64,
}

/// queue.stats.v1 - Dashboard counts
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub waiting: i64,
    pub in_consultation: i64,
    pub completed: i64,
    pub uptime_seconds: u64,
}
