//! Unit tests for the walk-in queue engine (in-memory store)

use super::*;
use crate::domain::{DomainError, Position, NOT_QUEUED};
use crate::error::AppError;
use crate::port::id_provider::SequentialIdProvider;
use crate::port::queue_repository::mocks::InMemoryQueueRepository;
use crate::port::time_provider::ManualTimeProvider;
use tokio::task::JoinSet;
use tokio_test::{assert_err, assert_ok};

fn service(repo: &InMemoryQueueRepository, policy: QueuePolicy) -> WalkInQueueService {
    let repo = Arc::new(repo.clone());
    WalkInQueueService::new(
        repo.clone(),
        repo,
        Arc::new(SequentialIdProvider::default()),
        Arc::new(ManualTimeProvider::new(1_000)),
        policy,
    )
}

fn default_service() -> (InMemoryQueueRepository, WalkInQueueService) {
    let repo = InMemoryQueueRepository::new();
    let svc = service(&repo, QueuePolicy::default());
    (repo, svc)
}

async fn add(svc: &WalkInQueueService, patient: &str) -> QueueEntry {
    svc.add(AddRequest::new(patient, "Dr. Mehta")).await.unwrap()
}

/// (patient, position) of waiting entries, front first
async fn waiting(svc: &WalkInQueueService) -> Vec<(String, Position)> {
    svc.list_ordered()
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.is_waiting())
        .map(|e| (e.patient_name, e.position))
        .collect()
}

fn pairs(expected: &[(&str, Position)]) -> Vec<(String, Position)> {
    expected.iter().map(|(n, p)| (n.to_string(), *p)).collect()
}

#[tokio::test]
async fn test_add_to_empty_queue_gets_position_one() {
    let (_, svc) = default_service();
    let entry = add(&svc, "Asha").await;

    assert_eq!(entry.position, 1);
    assert_eq!(entry.status, QueueStatus::Waiting);
    assert_eq!(entry.id, "entry-1");
    assert_eq!(entry.created_at, 1_000);
}

#[tokio::test]
async fn test_add_appends_after_max_waiting_position() {
    let (_, svc) = default_service();
    add(&svc, "a").await;
    let b = add(&svc, "b").await;
    svc.update_status(&b.id, QueueStatus::InConsultation)
        .await
        .unwrap();

    let c = add(&svc, "c").await;
    assert_eq!(c.position, 2);
    assert_eq!(waiting(&svc).await, pairs(&[("a", 1), ("c", 2)]));
}

#[tokio::test]
async fn test_add_rejects_blank_names() {
    let (repo, svc) = default_service();
    let err = svc.add(AddRequest::new("", "Dr. Mehta")).await.unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(repo.snapshot().is_empty());
}

#[tokio::test]
async fn test_add_trims_names() {
    let (_, svc) = default_service();
    let entry = svc
        .add(AddRequest::new("  Asha  ", " Dr. Mehta "))
        .await
        .unwrap();
    assert_eq!(entry.patient_name, "Asha");
    assert_eq!(entry.doctor_name, "Dr. Mehta");
}

#[tokio::test]
async fn test_call_in_closes_gap() {
    let (_, svc) = default_service();
    add(&svc, "a").await;
    let b = add(&svc, "b").await;
    add(&svc, "c").await;
    add(&svc, "d").await;

    let outcome = svc
        .update_status(&b.id, QueueStatus::InConsultation)
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::Reordered);
    assert_eq!(waiting(&svc).await, pairs(&[("a", 1), ("c", 2), ("d", 3)]));

    let promoted = svc
        .list_ordered()
        .await
        .unwrap()
        .into_iter()
        .find(|e| e.id == b.id)
        .unwrap();
    assert_eq!(promoted.status, QueueStatus::InConsultation);
    assert_eq!(promoted.position, NOT_QUEUED);
}

#[tokio::test]
async fn test_call_in_last_entry_shifts_nobody() {
    let (_, svc) = default_service();
    add(&svc, "a").await;
    add(&svc, "b").await;
    let c = add(&svc, "c").await;

    svc.update_status(&c.id, QueueStatus::InConsultation)
        .await
        .unwrap();
    assert_eq!(waiting(&svc).await, pairs(&[("a", 1), ("b", 2)]));
}

#[tokio::test]
async fn test_remove_front_closes_gap() {
    let (_, svc) = default_service();
    let a = add(&svc, "a").await;
    add(&svc, "b").await;
    add(&svc, "c").await;

    let removed = svc.remove(&a.id).await.unwrap();

    assert_eq!(removed.position, 1);
    assert_eq!(waiting(&svc).await, pairs(&[("b", 1), ("c", 2)]));
}

#[tokio::test]
async fn test_remove_middle_only_shifts_entries_behind() {
    let (_, svc) = default_service();
    add(&svc, "a").await;
    let b = add(&svc, "b").await;
    add(&svc, "c").await;

    svc.remove(&b.id).await.unwrap();
    assert_eq!(waiting(&svc).await, pairs(&[("a", 1), ("c", 2)]));
}

#[tokio::test]
async fn test_remove_non_waiting_entry_leaves_positions_alone() {
    let (_, svc) = default_service();
    let a = add(&svc, "a").await;
    add(&svc, "b").await;
    add(&svc, "c").await;
    svc.update_status(&a.id, QueueStatus::InConsultation)
        .await
        .unwrap();
    svc.update_status(&a.id, QueueStatus::Completed)
        .await
        .unwrap();

    svc.remove(&a.id).await.unwrap();
    assert_eq!(waiting(&svc).await, pairs(&[("b", 1), ("c", 2)]));
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let (_, svc) = default_service();
    let missing = "entry-404".to_string();

    let err = svc
        .update_status(&missing, QueueStatus::InConsultation)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = svc.remove(&missing).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_listing_is_idempotent() {
    let (_, svc) = default_service();
    for name in ["a", "b", "c"] {
        add(&svc, name).await;
    }
    let first = add(&svc, "d").await;
    svc.update_status(&first.id, QueueStatus::InConsultation)
        .await
        .unwrap();

    let once = svc.list_ordered().await.unwrap();
    let twice = svc.list_ordered().await.unwrap();
    assert_eq!(once, twice);
    // not-queued entries sort first
    assert_eq!(once[0].id, first.id);
}

#[tokio::test]
async fn test_clear_resets_queue() {
    let (_, svc) = default_service();
    add(&svc, "a").await;
    add(&svc, "b").await;

    assert_eq!(svc.clear_all().await.unwrap(), 2);
    assert!(svc.list_ordered().await.unwrap().is_empty());
    assert_eq!(add(&svc, "c").await.position, 1);
}

#[tokio::test]
async fn test_same_status_is_noop() {
    let (repo, svc) = default_service();
    let a = add(&svc, "a").await;
    let before = repo.snapshot();

    let outcome = svc
        .update_status(&a.id, QueueStatus::Waiting)
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::StatusUpdated);
    assert_eq!(repo.snapshot(), before);
}

#[tokio::test]
async fn test_strict_policy_rejects_skipping_consultation() {
    let (repo, svc) = default_service();
    let a = add(&svc, "a").await;
    add(&svc, "b").await;
    let before = repo.snapshot();

    let err = svc
        .update_status(&a.id, QueueStatus::Completed)
        .await
        .unwrap_err();

    match err {
        AppError::Domain(DomainError::InvalidTransition { from, to }) => {
            assert_eq!(from, "Waiting");
            assert_eq!(to, "Completed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(repo.snapshot(), before);
}

#[tokio::test]
async fn test_strict_policy_rejects_requeue() {
    let (_, svc) = default_service();
    let a = add(&svc, "a").await;
    svc.update_status(&a.id, QueueStatus::InConsultation)
        .await
        .unwrap();

    assert_err!(svc.update_status(&a.id, QueueStatus::Waiting).await);
}

#[tokio::test]
async fn test_strict_policy_allows_reopening_consultation() {
    let (_, svc) = default_service();
    let a = add(&svc, "a").await;
    svc.update_status(&a.id, QueueStatus::InConsultation)
        .await
        .unwrap();
    svc.update_status(&a.id, QueueStatus::Completed)
        .await
        .unwrap();

    let outcome = svc
        .update_status(&a.id, QueueStatus::InConsultation)
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::StatusUpdated);
    svc.check_integrity().await.unwrap();
}

#[tokio::test]
async fn test_lenient_policy_applies_status_verbatim() {
    let repo = InMemoryQueueRepository::new();
    let svc = service(
        &repo,
        QueuePolicy {
            transitions: TransitionPolicy::Lenient,
            ..Default::default()
        },
    );
    add(&svc, "a").await;
    let b = add(&svc, "b").await;

    let outcome = svc
        .update_status(&b.id, QueueStatus::Completed)
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::StatusUpdated);

    let stored = repo.snapshot().into_iter().find(|e| e.id == b.id).unwrap();
    assert_eq!(stored.status, QueueStatus::Completed);
    assert_eq!(stored.position, 2, "lenient updates leave the position");

    // and the damage is detectable + repairable
    assert_err!(svc.check_integrity().await);
    assert_eq!(svc.repair().await.unwrap(), 1);
    assert_ok!(svc.check_integrity().await);
}

#[tokio::test]
async fn test_completion_without_auto_promote() {
    let (_, svc) = default_service();
    let a = add(&svc, "a").await;
    add(&svc, "b").await;
    svc.update_status(&a.id, QueueStatus::InConsultation)
        .await
        .unwrap();

    let outcome = svc
        .update_status(&a.id, QueueStatus::Completed)
        .await
        .unwrap();

    assert_eq!(outcome, UpdateOutcome::StatusUpdated);
    assert_eq!(waiting(&svc).await, pairs(&[("b", 1)]));
}

#[tokio::test]
async fn test_completion_with_auto_promote_calls_in_front() {
    let repo = InMemoryQueueRepository::new();
    let svc = service(
        &repo,
        QueuePolicy {
            auto_promote_on_completion: true,
            ..Default::default()
        },
    );
    let a = add(&svc, "a").await;
    let b = add(&svc, "b").await;
    add(&svc, "c").await;
    svc.update_status(&a.id, QueueStatus::InConsultation)
        .await
        .unwrap();

    let outcome = svc
        .update_status(&a.id, QueueStatus::Completed)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        UpdateOutcome::Promoted {
            next: b.id.clone()
        }
    );
    assert_eq!(waiting(&svc).await, pairs(&[("c", 1)]));

    let stats = svc.stats().await.unwrap();
    assert_eq!(
        stats,
        QueueStats {
            waiting: 1,
            in_consultation: 1,
            completed: 1,
        }
    );
}

#[tokio::test]
async fn test_auto_promote_with_empty_queue() {
    let repo = InMemoryQueueRepository::new();
    let svc = service(
        &repo,
        QueuePolicy {
            auto_promote_on_completion: true,
            ..Default::default()
        },
    );
    let a = add(&svc, "a").await;
    svc.update_status(&a.id, QueueStatus::InConsultation)
        .await
        .unwrap();

    let outcome = svc
        .update_status(&a.id, QueueStatus::Completed)
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::StatusUpdated);
}

#[tokio::test]
async fn test_failed_gap_closure_rolls_back() {
    let repo = InMemoryQueueRepository::new();
    let svc = service(&repo, QueuePolicy::default());
    let a = add(&svc, "a").await;
    add(&svc, "b").await;
    add(&svc, "c").await;
    let before = repo.snapshot();

    // first write (the called-in entry) succeeds, the shift of "b" fails
    repo.fail_after_writes(1);
    let err = svc
        .update_status(&a.id, QueueStatus::InConsultation)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Database(_)));
    assert_eq!(repo.snapshot(), before);
    svc.check_integrity().await.unwrap();
}

#[tokio::test]
async fn test_invariant_holds_over_mixed_sequence() {
    let (_, svc) = default_service();
    let mut ids = Vec::new();

    for round in 0..6 {
        for i in 0..4 {
            ids.push(add(&svc, &format!("p{round}-{i}")).await.id);
            svc.check_integrity().await.unwrap();
        }

        // call in whoever is second in line
        let second = svc
            .list_ordered()
            .await
            .unwrap()
            .into_iter()
            .find(|e| e.is_waiting() && e.position == 2)
            .unwrap();
        svc.update_status(&second.id, QueueStatus::InConsultation)
            .await
            .unwrap();
        svc.check_integrity().await.unwrap();

        svc.update_status(&second.id, QueueStatus::Completed)
            .await
            .unwrap();
        svc.check_integrity().await.unwrap();

        // drop the oldest remaining entry, whatever its state
        let oldest = ids.remove(0);
        if svc.remove(&oldest).await.is_ok() {
            svc.check_integrity().await.unwrap();
        }
    }

    let positions: Vec<Position> = waiting(&svc).await.into_iter().map(|(_, p)| p).collect();
    let expected: Vec<Position> = (1..=positions.len() as Position).collect();
    assert_eq!(positions, expected);
}

#[tokio::test]
async fn test_concurrent_adds_get_unique_positions() {
    let repo = InMemoryQueueRepository::new();
    let svc = Arc::new(service(&repo, QueuePolicy::default()));

    let mut tasks = JoinSet::new();
    for i in 0..50 {
        let svc = svc.clone();
        tasks.spawn(async move {
            svc.add(AddRequest::new(format!("walk-in-{i}"), "Dr. Mehta"))
                .await
                .unwrap()
                .position
        });
    }

    let mut positions = Vec::new();
    while let Some(result) = tasks.join_next().await {
        positions.push(result.unwrap());
    }
    positions.sort_unstable();

    assert_eq!(positions, (1..=50).collect::<Vec<Position>>());
    assert_eq!(repo.commit_count(), 50);
    svc.check_integrity().await.unwrap();
}
