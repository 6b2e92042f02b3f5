//! Task queue integration tests
//!
//! Queue initialization, rotation and renumbering against a temporary
//! SQLite database.

use std::sync::{Arc, Once};

use dutyroster::config::init_config;
use dutyroster::services::{QueueService, WorkerService};
use dutyroster::storage::backend::SeaOrmStorage;
use dutyroster::storage::{NewWorker, TaskType, Title, Worker};
use strum::IntoEnumIterator;
use tempfile::TempDir;

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn create_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    init_test_config();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("queue_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");
    (Arc::new(storage), temp_dir)
}

async fn add_worker(service: &WorkerService, name: &str) -> Worker {
    service
        .create_worker(NewWorker::new(name, Title::Soldier))
        .await
        .expect("Failed to create worker")
}

async fn queue_ids(queues: &QueueService, task_type: TaskType) -> Vec<i32> {
    queues
        .queue_for_task(task_type)
        .await
        .expect("Failed to load queue")
        .into_iter()
        .map(|slot| slot.worker.id)
        .collect()
}

async fn assert_compact(storage: &SeaOrmStorage, task_type: TaskType) {
    let positions: Vec<i32> = storage
        .queue(task_type)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.position)
        .collect();
    let expected: Vec<i32> = (0..positions.len() as i32).collect();
    assert_eq!(positions, expected, "{} positions not 0..n-1", task_type);
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_new_workers_join_every_queue_in_order() {
    let (storage, _dir) = create_storage().await;
    let workers = WorkerService::new(storage.clone());
    let queues = QueueService::new(storage.clone());

    let alice = add_worker(&workers, "Alice").await;
    let bob = add_worker(&workers, "Bob").await;
    let carol = add_worker(&workers, "Carol").await;

    for task_type in TaskType::iter() {
        assert_eq!(
            queue_ids(&queues, task_type).await,
            vec![alice.id, bob.id, carol.id]
        );
        assert_compact(&storage, task_type).await;
    }

    let next = queues.next_worker(TaskType::Kitchen).await.unwrap();
    assert_eq!(next.map(|w| w.id), Some(alice.id));
}

#[tokio::test]
async fn test_move_to_end_and_front_renumber() {
    let (storage, _dir) = create_storage().await;
    let workers = WorkerService::new(storage.clone());
    let queues = QueueService::new(storage.clone());

    let a = add_worker(&workers, "A").await;
    let b = add_worker(&workers, "B").await;
    let c = add_worker(&workers, "C").await;

    queues.move_to_end(a.id, TaskType::PatrolA).await.unwrap();
    assert_eq!(queue_ids(&queues, TaskType::PatrolA).await, vec![b.id, c.id, a.id]);
    assert_compact(&storage, TaskType::PatrolA).await;

    queues.move_to_front(c.id, TaskType::PatrolA).await.unwrap();
    assert_eq!(queue_ids(&queues, TaskType::PatrolA).await, vec![c.id, b.id, a.id]);
    assert_compact(&storage, TaskType::PatrolA).await;

    // 其他队列不受影响
    assert_eq!(queue_ids(&queues, TaskType::PatrolB).await, vec![a.id, b.id, c.id]);
}

#[tokio::test]
async fn test_delete_worker_closes_queue_gap() {
    let (storage, _dir) = create_storage().await;
    let workers = WorkerService::new(storage.clone());
    let queues = QueueService::new(storage.clone());

    let a = add_worker(&workers, "A").await;
    let b = add_worker(&workers, "B").await;
    let c = add_worker(&workers, "C").await;

    workers.delete_worker(b.id).await.unwrap();

    for task_type in TaskType::iter() {
        assert_eq!(queue_ids(&queues, task_type).await, vec![a.id, c.id]);
        assert_compact(&storage, task_type).await;
    }
}

#[tokio::test]
async fn test_initialize_all_is_idempotent() {
    let (storage, _dir) = create_storage().await;
    let workers = WorkerService::new(storage.clone());
    let queues = QueueService::new(storage.clone());

    let empty = queues.initialize_all().await.unwrap();
    assert_eq!(empty.workers, 0);
    assert_eq!(empty.created, 0);

    add_worker(&workers, "A").await;
    add_worker(&workers, "B").await;

    // 创建 Worker 时已建好队列项
    let report = queues.initialize_all().await.unwrap();
    assert_eq!(report.workers, 2);
    assert_eq!(report.created, 0);

    let all = queues.all_queues().await.unwrap();
    assert_eq!(all.len(), TaskType::iter().count());
    assert!(all.iter().all(|(_, queue)| queue.len() == 2));
}

#[tokio::test]
async fn test_initialize_for_worker_fills_missing_entries() {
    let (storage, _dir) = create_storage().await;
    let workers = WorkerService::new(storage.clone());
    let queues = QueueService::new(storage.clone());

    let a = add_worker(&workers, "A").await;
    let b = add_worker(&workers, "B").await;

    // 模拟缺失的队列项
    dutyroster::storage::backend::task_queue::delete_for_worker(storage.get_db(), a.id)
        .await
        .unwrap();
    assert_eq!(queue_ids(&queues, TaskType::Kitchen).await, vec![b.id]);

    let created = queues.initialize_for_worker(a.id).await.unwrap();
    assert_eq!(created, TaskType::iter().count());
    assert_eq!(queue_ids(&queues, TaskType::Kitchen).await, vec![b.id, a.id]);
    assert_compact(&storage, TaskType::Kitchen).await;
}

#[tokio::test]
async fn test_rotating_head_cycles_through_all_workers() {
    let (storage, _dir) = create_storage().await;
    let workers = WorkerService::new(storage.clone());
    let queues = QueueService::new(storage.clone());

    let mut expected = Vec::new();
    for name in ["A", "B", "C", "D"] {
        expected.push(add_worker(&workers, name).await.id);
    }

    let mut seen = Vec::new();
    for _ in 0..expected.len() * 2 {
        let head = queues
            .next_worker(TaskType::GuardDuty)
            .await
            .unwrap()
            .expect("queue head");
        seen.push(head.id);
        queues.move_to_end(head.id, TaskType::GuardDuty).await.unwrap();
    }

    let twice: Vec<i32> = expected.iter().chain(expected.iter()).copied().collect();
    assert_eq!(seen, twice);
    assert_eq!(queue_ids(&queues, TaskType::GuardDuty).await, expected);
}
