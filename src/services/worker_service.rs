//! Worker management service
//!
//! Shared by the HTTP handlers and the CLI.

use std::sync::Arc;

use tracing::info;

use crate::errors::RosterError;
use crate::storage::backend::{assignments, task_queue, workers};
use crate::storage::{NewWorker, SeaOrmStorage, Worker, WorkerPatch};

fn validate_name(name: &str) -> Result<(), RosterError> {
    if name.trim().is_empty() {
        return Err(RosterError::validation("Worker name must not be empty"));
    }
    Ok(())
}

fn validate_counter(field: &str, value: i32) -> Result<(), RosterError> {
    if value < 0 {
        return Err(RosterError::validation(format!(
            "{} must be >= 0, got {}",
            field, value
        )));
    }
    Ok(())
}

/// Service for worker CRUD
pub struct WorkerService {
    storage: Arc<SeaOrmStorage>,
}

impl WorkerService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// All workers ordered by name
    pub async fn list_workers(&self) -> Result<Vec<Worker>, RosterError> {
        self.storage.list_workers().await
    }

    pub async fn get_worker(&self, id: i32) -> Result<Worker, RosterError> {
        self.storage
            .get_worker(id)
            .await?
            .ok_or_else(|| RosterError::worker_not_found(id))
    }

    /// Create a worker and give it an entry at the end of every task queue
    pub async fn create_worker(&self, new: NewWorker) -> Result<Worker, RosterError> {
        validate_name(&new.name)?;
        validate_counter("hard_chores_counter", new.hard_chores_counter)?;
        validate_counter("outer_partner_counter", new.outer_partner_counter)?;

        let txn = self.storage.begin().await?;
        let worker = workers::insert(&txn, &new).await?;
        let created = task_queue::initialize_for_worker(&txn, worker.id).await?;
        txn.commit().await?;

        info!(
            "WorkerService: created worker '{}' (id {}), {} queue entries",
            worker.name, worker.id, created
        );
        Ok(worker)
    }

    /// Apply the provided fields only
    pub async fn update_worker(&self, id: i32, patch: WorkerPatch) -> Result<Worker, RosterError> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(value) = patch.hard_chores_counter {
            validate_counter("hard_chores_counter", value)?;
        }
        if let Some(value) = patch.outer_partner_counter {
            validate_counter("outer_partner_counter", value)?;
        }

        let worker = workers::update(self.storage.get_db(), id, &patch).await?;
        info!("WorkerService: updated worker '{}' (id {})", worker.name, id);
        Ok(worker)
    }

    /// Delete a worker; their assignments stay with an empty worker and the
    /// queues close the gap.
    pub async fn delete_worker(&self, id: i32) -> Result<Worker, RosterError> {
        let txn = self.storage.begin().await?;
        let worker = workers::get(&txn, id).await?;

        let cleared = assignments::clear_worker(&txn, id).await?;
        task_queue::delete_for_worker(&txn, id).await?;
        workers::delete(&txn, id).await?;
        txn.commit().await?;

        info!(
            "WorkerService: deleted worker '{}' (id {}), {} assignments unassigned",
            worker.name, id, cleared
        );
        Ok(worker)
    }
}
