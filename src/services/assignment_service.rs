//! Assignment workflow
//!
//! Assign and remove run as one transaction each: the assignment row, the
//! night-shift and department-mix counter bookkeeping and the queue rotation
//! commit or roll back together.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use sea_orm::ConnectionTrait;
use tracing::info;

use super::queue_service::{QueueService, QueueSlot};
use crate::errors::RosterError;
use crate::storage::backend::{assignments, task_queue, workers};
use crate::storage::{Assignment, FairnessCounter, SeaOrmStorage, TaskType, TimeSlot, Worker};

// ============ Request/Response DTOs ============

#[derive(Debug, Clone)]
pub struct AssignRequest {
    pub date: NaiveDate,
    pub task_type: TaskType,
    /// Required for guard duty, rejected for full-day tasks
    pub time_slot: Option<TimeSlot>,
    pub worker_id: i32,
    pub is_commander: bool,
}

#[derive(Debug, Clone)]
pub struct AssignOutcome {
    pub assignment: Assignment,
    pub worker: Worker,
    pub night_shift: bool,
    pub partner_bonus: bool,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct RemoveOutcome {
    pub assignment: Assignment,
    pub worker: Option<Worker>,
    pub night_shift: bool,
    /// Partner bonus taken back from the removed or remaining workers
    pub partner_penalty: bool,
    pub message: String,
}

/// An assignment with its worker, if the worker still exists
#[derive(Debug, Clone)]
pub struct ScheduledAssignment {
    pub assignment: Assignment,
    pub worker: Option<Worker>,
}

#[derive(Debug, Clone)]
pub struct SlotSchedule {
    pub time_slot: TimeSlot,
    pub required_workers: u32,
    pub assignments: Vec<ScheduledAssignment>,
}

#[derive(Debug, Clone)]
pub struct TaskSchedule {
    pub task_type: TaskType,
    pub assignments: Vec<ScheduledAssignment>,
}

#[derive(Debug, Clone)]
pub struct QueueSummary {
    pub task_type: TaskType,
    pub suggestion: Option<Worker>,
    pub queue: Vec<QueueSlot>,
}

/// Calendar view of one day
#[derive(Debug, Clone)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub guard_slots: Vec<SlotSchedule>,
    pub full_day: Vec<TaskSchedule>,
    pub queues: Vec<QueueSummary>,
}

fn assign_message(name: &str, night_shift: bool, partner_bonus: bool) -> String {
    match (night_shift, partner_bonus) {
        (true, true) => format!(
            "{} assigned to a night shift with partners from other departments. Counters updated.",
            name
        ),
        (false, true) => format!(
            "{} assigned with partners from other departments. Outer partner counter increased.",
            name
        ),
        (true, false) => format!(
            "{} assigned to a night shift. Hard chores counter increased.",
            name
        ),
        (false, false) => format!("{} assigned successfully.", name),
    }
}

fn remove_message(worker: Option<&Worker>, task_type: TaskType, night_shift: bool) -> String {
    match worker {
        Some(w) if night_shift => format!("{} removed from night shift. Counters updated.", w.name),
        Some(w) => format!(
            "{} removed and moved to the front of the {} queue.",
            w.name, task_type
        ),
        None => "Assignment removed.".to_string(),
    }
}

fn validate_slot(task_type: TaskType, time_slot: Option<TimeSlot>) -> Result<(), RosterError> {
    match (task_type.is_time_slotted(), time_slot) {
        (true, None) => Err(RosterError::invalid_time_slot(format!(
            "{} requires a time slot",
            task_type
        ))),
        (false, Some(slot)) => Err(RosterError::invalid_time_slot(format!(
            "{} is a full-day task and takes no time slot (got {})",
            task_type, slot
        ))),
        _ => Ok(()),
    }
}

/// Assign inside the caller's transaction
pub(crate) async fn assign_in<C: ConnectionTrait>(
    conn: &C,
    req: &AssignRequest,
) -> Result<AssignOutcome, RosterError> {
    validate_slot(req.task_type, req.time_slot)?;

    let worker = workers::get(conn, req.worker_id).await?;
    if assignments::exists(conn, req.date, req.task_type, req.time_slot, worker.id).await? {
        return Err(RosterError::assignment_conflict(format!(
            "{} is already assigned to {} on {}{}",
            worker.name,
            req.task_type,
            req.date,
            req.time_slot
                .map(|s| format!(" {}", s))
                .unwrap_or_default()
        )));
    }

    let assignment = assignments::insert(
        conn,
        req.date,
        req.task_type,
        req.time_slot,
        worker.id,
        req.is_commander,
    )
    .await?;

    let night_shift = assignment.is_night_shift();
    if night_shift {
        workers::increment_counter(conn, &[worker.id], FairnessCounter::HardChores).await?;
    }

    let mut partner_bonus = false;
    if let (TaskType::GuardDuty, Some(slot)) = (req.task_type, req.time_slot) {
        let (mixed, holders) = assignments::slot_department_mix(conn, req.date, slot).await?;
        if mixed {
            workers::increment_counter(conn, &holders, FairnessCounter::OuterPartner).await?;
            partner_bonus = true;
        }
    }

    task_queue::move_to_end(conn, worker.id, req.task_type).await?;

    let message = assign_message(&worker.name, night_shift, partner_bonus);
    Ok(AssignOutcome {
        assignment,
        worker,
        night_shift,
        partner_bonus,
        message,
    })
}

pub struct AssignmentService {
    storage: Arc<SeaOrmStorage>,
    queues: QueueService,
}

impl AssignmentService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        let queues = QueueService::new(storage.clone());
        Self { storage, queues }
    }

    /// Create an assignment and run the counter and queue bookkeeping
    pub async fn assign(&self, req: AssignRequest) -> Result<AssignOutcome, RosterError> {
        let txn = self.storage.begin().await?;
        let outcome = assign_in(&txn, &req).await?;
        txn.commit().await?;

        info!(
            "AssignmentService: assignment {} created ({}), night_shift={}, partner_bonus={}",
            outcome.assignment.id,
            outcome.assignment.label(Some(&outcome.worker.name)),
            outcome.night_shift,
            outcome.partner_bonus
        );
        Ok(outcome)
    }

    /// Delete an assignment and undo its counter and queue effects
    pub async fn remove(&self, assignment_id: i32) -> Result<RemoveOutcome, RosterError> {
        let txn = self.storage.begin().await?;

        let assignment = assignments::find(&txn, assignment_id)
            .await?
            .ok_or_else(|| RosterError::assignment_not_found(assignment_id))?;
        let worker = match assignment.worker_id {
            Some(id) => workers::find(&txn, id).await?,
            None => None,
        };

        let guard_slot = match (assignment.task_type, assignment.time_slot) {
            (TaskType::GuardDuty, Some(slot)) => Some(slot),
            _ => None,
        };

        let before = match guard_slot {
            Some(slot) => Some(assignments::slot_department_mix(&txn, assignment.date, slot).await?),
            None => None,
        };

        assignments::delete(&txn, assignment.id).await?;

        let mut partner_penalty = false;
        if let (Some(slot), Some((mixed_before, holders_before))) = (guard_slot, before) {
            let (mixed_after, holders_after) =
                assignments::slot_department_mix(&txn, assignment.date, slot).await?;

            if mixed_before && !mixed_after {
                workers::decrement_counter(&txn, &holders_after, FairnessCounter::OuterPartner)
                    .await?;
                partner_penalty = !holders_after.is_empty();
            }

            if let Some(w) = &worker
                && mixed_before
                && holders_before.contains(&w.id)
            {
                workers::decrement_counter(&txn, &[w.id], FairnessCounter::OuterPartner).await?;
                partner_penalty = true;
            }
        }

        let night_shift = assignment.is_night_shift();
        if let Some(w) = &worker {
            task_queue::move_to_front(&txn, w.id, assignment.task_type).await?;
            if night_shift {
                workers::decrement_counter(&txn, &[w.id], FairnessCounter::HardChores).await?;
            }
        }

        txn.commit().await?;

        let message = remove_message(worker.as_ref(), assignment.task_type, night_shift);
        info!(
            "AssignmentService: assignment {} removed ({})",
            assignment.id,
            assignment.label(worker.as_ref().map(|w| w.name.as_str()))
        );

        Ok(RemoveOutcome {
            assignment,
            worker,
            night_shift,
            partner_penalty,
            message,
        })
    }

    /// Guard slots, full-day tasks and queue suggestions for one date
    pub async fn day_schedule(&self, date: NaiveDate) -> Result<DaySchedule, RosterError> {
        let day = self.storage.assignments_for_date(date).await?;
        let workers: HashMap<i32, Worker> = self
            .storage
            .list_workers()
            .await?
            .into_iter()
            .map(|w| (w.id, w))
            .collect();

        let scheduled = |assignment: &Assignment| ScheduledAssignment {
            assignment: assignment.clone(),
            worker: assignment.worker_id.and_then(|id| workers.get(&id).cloned()),
        };

        let guard_slots = TimeSlot::all()
            .map(|slot| SlotSchedule {
                time_slot: slot,
                required_workers: slot.required_workers(),
                assignments: day
                    .iter()
                    .filter(|a| a.task_type == TaskType::GuardDuty && a.time_slot == Some(slot))
                    .map(scheduled)
                    .collect(),
            })
            .collect();

        let full_day = TaskType::full_day_tasks()
            .map(|task_type| TaskSchedule {
                task_type,
                assignments: day
                    .iter()
                    .filter(|a| a.task_type == task_type && a.time_slot.is_none())
                    .map(scheduled)
                    .collect(),
            })
            .collect();

        let mut queues = Vec::new();
        for (task_type, queue) in self.queues.all_queues().await? {
            queues.push(QueueSummary {
                task_type,
                suggestion: queue.first().map(|slot| slot.worker.clone()),
                queue,
            });
        }

        Ok(DaySchedule {
            date,
            guard_slots,
            full_day,
            queues,
        })
    }
}
