//! Next-worker suggestions
//!
//! Candidates are ranked by the task's fairness counter, then by queue
//! position, so the least-loaded worker who is still free that day comes
//! first.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::assignment_service::{AssignOutcome, AssignRequest, assign_in};
use crate::errors::RosterError;
use crate::storage::backend::{assignments, task_queue, workers};
use crate::storage::{SeaOrmStorage, TaskType, TimeSlot, Title, Worker};

#[derive(Debug, Clone)]
pub struct SuggestionQuery {
    pub task_type: TaskType,
    pub date: NaiveDate,
    pub time_slot: Option<TimeSlot>,
    pub commanders_only: bool,
}

impl SuggestionQuery {
    fn assign_request(&self, worker_id: i32, is_commander: bool) -> AssignRequest {
        AssignRequest {
            date: self.date,
            task_type: self.task_type,
            time_slot: self.time_slot,
            worker_id,
            is_commander,
        }
    }
}

/// 公平计数升序，其次队列位置（不在队列中的排最后），再按姓名、id
fn rank(
    task_type: TaskType,
    positions: &HashMap<i32, i32>,
    a: &Worker,
    b: &Worker,
) -> Ordering {
    let counter = task_type.fairness_counter();
    let position = |w: &Worker| positions.get(&w.id).copied().unwrap_or(i32::MAX);

    counter
        .value_of(a)
        .cmp(&counter.value_of(b))
        .then_with(|| position(a).cmp(&position(b)))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

pub struct SuggestionService {
    storage: Arc<SeaOrmStorage>,
}

impl SuggestionService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Best free candidate for the query, or `None` when everyone is taken
    pub async fn next_suggestion(
        &self,
        query: &SuggestionQuery,
    ) -> Result<Option<Worker>, RosterError> {
        let db = self.storage.get_db();

        let busy = assignments::worker_ids_on_date(db, query.date, query.task_type).await?;
        let positions: HashMap<i32, i32> = task_queue::load_queue(db, query.task_type)
            .await?
            .into_iter()
            .map(|e| (e.worker_id, e.position))
            .collect();

        let mut candidates: Vec<Worker> = self
            .storage
            .list_workers()
            .await?
            .into_iter()
            .filter(|w| !query.commanders_only || w.title == Title::Commander)
            .filter(|w| !busy.contains(&w.id))
            .collect();
        candidates.sort_by(|a, b| rank(query.task_type, &positions, a, b));

        debug!(
            "SuggestionService: {} candidates for {} on {} ({} busy)",
            candidates.len(),
            query.task_type,
            query.date,
            busy.len()
        );
        Ok(candidates.into_iter().next())
    }

    /// Assign the suggested worker and book the task's counter
    pub async fn accept_suggestion(
        &self,
        query: &SuggestionQuery,
        worker_id: i32,
    ) -> Result<AssignOutcome, RosterError> {
        let txn = self.storage.begin().await?;

        let worker = workers::get(&txn, worker_id).await?;
        let req = query.assign_request(worker.id, worker.title == Title::Commander);
        let mut outcome = assign_in(&txn, &req).await?;

        if let Some(counter) = query.task_type.accepted_counter() {
            workers::increment_counter(&txn, &[worker.id], counter).await?;
        }
        // 返回提交后的计数
        if let Some(updated) = workers::find(&txn, worker.id).await? {
            outcome.worker = updated;
        }

        txn.commit().await?;

        info!(
            "SuggestionService: {} accepted for {} on {}",
            outcome.worker.name, query.task_type, query.date
        );
        Ok(outcome)
    }

    /// Same as accepting, for a worker picked by hand
    pub async fn manual_assign(
        &self,
        query: &SuggestionQuery,
        worker_id: i32,
    ) -> Result<AssignOutcome, RosterError> {
        self.accept_suggestion(query, worker_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn worker(id: i32, name: &str, hard: i32, outer: i32) -> Worker {
        Worker {
            id,
            name: name.to_string(),
            title: Title::Soldier,
            department: None,
            hard_chores_counter: hard,
            outer_partner_counter: outer,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sorted(task_type: TaskType, positions: &HashMap<i32, i32>, mut list: Vec<Worker>) -> Vec<i32> {
        list.sort_by(|a, b| rank(task_type, positions, a, b));
        list.iter().map(|w| w.id).collect()
    }

    #[test]
    fn test_lowest_counter_wins() {
        let list = vec![worker(1, "A", 3, 0), worker(2, "B", 1, 5), worker(3, "C", 2, 0)];
        assert_eq!(
            sorted(TaskType::Kitchen, &HashMap::new(), list.clone()),
            vec![2, 3, 1]
        );
        // 巡逻按外部搭档计数
        assert_eq!(sorted(TaskType::PatrolA, &HashMap::new(), list), vec![1, 3, 2]);
    }

    #[test]
    fn test_queue_position_breaks_ties() {
        let positions = HashMap::from([(1, 2), (2, 0), (3, 1)]);
        let list = vec![worker(1, "A", 0, 0), worker(2, "B", 0, 0), worker(3, "C", 0, 0)];
        assert_eq!(sorted(TaskType::GuardDuty, &positions, list), vec![2, 3, 1]);
    }

    #[test]
    fn test_missing_queue_entry_goes_last() {
        let positions = HashMap::from([(2, 0)]);
        let list = vec![worker(1, "A", 0, 0), worker(2, "Z", 0, 0)];
        assert_eq!(sorted(TaskType::Kitchen, &positions, list), vec![2, 1]);
    }

    #[test]
    fn test_name_then_id_break_remaining_ties() {
        let list = vec![worker(5, "Same", 0, 0), worker(4, "Same", 0, 0), worker(6, "Abe", 0, 0)];
        assert_eq!(sorted(TaskType::Kitchen, &HashMap::new(), list), vec![6, 4, 5]);
    }
}
