//! Shared wiring for SQLite-backed tests

#![allow(dead_code)]

use frontdesk_core::application::{AddRequest, QueuePolicy, WalkInQueueService};
use frontdesk_core::domain::{QueueEntry, QueueStatus};
use frontdesk_core::port::id_provider::UuidProvider;
use frontdesk_core::port::time_provider::SystemTimeProvider;
use frontdesk_infra_sqlite::{create_pool, run_migrations, SqliteQueueRepository};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;

pub async fn memory_pool() -> SqlitePool {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub async fn file_pool(path: &PathBuf) -> SqlitePool {
    let pool = create_pool(path.to_str().unwrap()).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

pub fn temp_db_path() -> PathBuf {
    std::env::temp_dir().join(format!("frontdesk_test_{}.db", uuid::Uuid::new_v4()))
}

pub fn remove_db_files(path: &PathBuf) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(PathBuf::from(file));
    }
}

pub fn service(pool: SqlitePool, policy: QueuePolicy) -> WalkInQueueService {
    let repo = Arc::new(SqliteQueueRepository::new(pool));
    WalkInQueueService::new(
        repo.clone(),
        repo,
        Arc::new(UuidProvider),
        Arc::new(SystemTimeProvider),
        policy,
    )
}

pub async fn add(service: &WalkInQueueService, patient: &str) -> QueueEntry {
    service
        .add(AddRequest::new(patient, "Dr. Rao"))
        .await
        .unwrap()
}

/// (patient, position) for waiting entries in queue order
pub async fn waiting(service: &WalkInQueueService) -> Vec<(String, i64)> {
    service
        .list_ordered()
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.status == QueueStatus::Waiting)
        .map(|e| (e.patient_name, e.position))
        .collect()
}

pub fn pairs(expected: &[(&str, i64)]) -> Vec<(String, i64)> {
    expected.iter().map(|(n, p)| (n.to_string(), *p)).collect()
}
