//! Task queue service
//!
//! Read views over the round-robin queues plus the bulk initialization used
//! by `init-queues` and `POST /api/queues/initialize`.

use std::collections::HashMap;
use std::sync::Arc;

use strum::IntoEnumIterator;
use tracing::{info, warn};

use crate::errors::RosterError;
use crate::storage::backend::task_queue;
use crate::storage::{SeaOrmStorage, TaskType, Worker};

/// One queue position with its worker
#[derive(Debug, Clone)]
pub struct QueueSlot {
    pub position: i32,
    pub worker: Worker,
}

/// Result of initializing queues for every worker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitializeReport {
    pub workers: usize,
    pub created: usize,
}

pub struct QueueService {
    storage: Arc<SeaOrmStorage>,
}

impl QueueService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Queue for one task type, ordered by position
    pub async fn queue_for_task(&self, task_type: TaskType) -> Result<Vec<QueueSlot>, RosterError> {
        let entries = self.storage.queue(task_type).await?;
        let workers: HashMap<i32, Worker> = self
            .storage
            .list_workers()
            .await?
            .into_iter()
            .map(|w| (w.id, w))
            .collect();

        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                workers.get(&entry.worker_id).map(|worker| QueueSlot {
                    position: entry.position,
                    worker: worker.clone(),
                })
            })
            .collect())
    }

    /// Every queue, in task type order
    pub async fn all_queues(&self) -> Result<Vec<(TaskType, Vec<QueueSlot>)>, RosterError> {
        let mut queues = Vec::new();
        for task_type in TaskType::iter() {
            queues.push((task_type, self.queue_for_task(task_type).await?));
        }
        Ok(queues)
    }

    /// Queue head
    pub async fn next_worker(&self, task_type: TaskType) -> Result<Option<Worker>, RosterError> {
        match task_queue::next_worker_id(self.storage.get_db(), task_type).await? {
            Some(id) => self.storage.get_worker(id).await,
            None => Ok(None),
        }
    }

    pub async fn move_to_end(&self, worker_id: i32, task_type: TaskType) -> Result<(), RosterError> {
        let txn = self.storage.begin().await?;
        task_queue::move_to_end(&txn, worker_id, task_type).await?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn move_to_front(&self, worker_id: i32, task_type: TaskType) -> Result<(), RosterError> {
        let txn = self.storage.begin().await?;
        task_queue::move_to_front(&txn, worker_id, task_type).await?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn initialize_for_worker(&self, worker_id: i32) -> Result<usize, RosterError> {
        let txn = self.storage.begin().await?;
        let created = task_queue::initialize_for_worker(&txn, worker_id).await?;
        txn.commit().await?;
        Ok(created)
    }

    /// Add missing queue entries for every worker, in name order
    pub async fn initialize_all(&self) -> Result<InitializeReport, RosterError> {
        let workers = self.storage.list_workers().await?;
        if workers.is_empty() {
            warn!("QueueService: no workers found, nothing to initialize");
            return Ok(InitializeReport::default());
        }

        let txn = self.storage.begin().await?;
        let mut created = 0;
        for worker in &workers {
            created += task_queue::initialize_for_worker(&txn, worker.id).await?;
        }
        txn.commit().await?;

        info!(
            "QueueService: initialized queues for {} workers ({} new entries)",
            workers.len(),
            created
        );
        Ok(InitializeReport {
            workers: workers.len(),
            created,
        })
    }
}
