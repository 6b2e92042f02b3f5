//! Assignment queries and the department-mix check for guard slots

use std::collections::{BTreeSet, HashSet};

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};
use tracing::debug;

use super::converters::{model_to_assignment, new_assignment_active_model};
use super::{SeaOrmStorage, retry, workers};
use crate::errors::{Result, RosterError};
use crate::storage::{Assignment, TaskType, TimeSlot};

use migration::entities::assignment;

/// 按 日期 / 时段 / 任务类型 排序（时段按班次顺序，而非字符串顺序）
fn sort_assignments(assignments: &mut [Assignment]) {
    assignments.sort_by(|a, b| {
        (a.date, a.time_slot, a.task_type, a.id).cmp(&(b.date, b.time_slot, b.task_type, b.id))
    });
}

fn collect(models: Vec<assignment::Model>) -> Result<Vec<Assignment>> {
    let mut assignments = models
        .into_iter()
        .map(model_to_assignment)
        .collect::<Result<Vec<_>>>()?;
    sort_assignments(&mut assignments);
    Ok(assignments)
}

fn slot_condition(time_slot: Option<TimeSlot>) -> Condition {
    match time_slot {
        Some(slot) => Condition::all().add(assignment::Column::TimeSlot.eq(slot.as_str())),
        None => Condition::all().add(assignment::Column::TimeSlot.is_null()),
    }
}

pub async fn find<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Option<Assignment>> {
    assignment::Entity::find_by_id(id)
        .one(conn)
        .await?
        .map(model_to_assignment)
        .transpose()
}

pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    date: NaiveDate,
    task_type: TaskType,
    time_slot: Option<TimeSlot>,
    worker_id: i32,
    is_commander: bool,
) -> Result<Assignment> {
    let model = new_assignment_active_model(date, task_type, time_slot, worker_id, is_commander)
        .insert(conn)
        .await?;
    debug!(
        "Assignment {} inserted: {} {:?} worker {}",
        model.id, model.task_type, model.time_slot, worker_id
    );
    model_to_assignment(model)
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> Result<()> {
    let result = assignment::Entity::delete_by_id(id).exec(conn).await?;
    if result.rows_affected == 0 {
        return Err(RosterError::assignment_not_found(id));
    }
    Ok(())
}

/// 是否已存在相同 (日期, 时段, 任务, Worker) 的排班
pub async fn exists<C: ConnectionTrait>(
    conn: &C,
    date: NaiveDate,
    task_type: TaskType,
    time_slot: Option<TimeSlot>,
    worker_id: i32,
) -> Result<bool> {
    let count = assignment::Entity::find()
        .filter(assignment::Column::Date.eq(date))
        .filter(assignment::Column::TaskType.eq(task_type.as_str()))
        .filter(assignment::Column::WorkerId.eq(worker_id))
        .filter(slot_condition(time_slot))
        .count(conn)
        .await?;
    Ok(count > 0)
}

pub async fn list_for_date<C: ConnectionTrait>(conn: &C, date: NaiveDate) -> Result<Vec<Assignment>> {
    let models = assignment::Entity::find()
        .filter(assignment::Column::Date.eq(date))
        .order_by_asc(assignment::Column::Id)
        .all(conn)
        .await?;
    collect(models)
}

/// 当天某任务（guard_duty 时为任意时段）已排班的 Worker
pub async fn worker_ids_on_date<C: ConnectionTrait>(
    conn: &C,
    date: NaiveDate,
    task_type: TaskType,
) -> Result<HashSet<i32>> {
    let ids: Vec<Option<i32>> = assignment::Entity::find()
        .select_only()
        .column(assignment::Column::WorkerId)
        .filter(assignment::Column::Date.eq(date))
        .filter(assignment::Column::TaskType.eq(task_type.as_str()))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(ids.into_iter().flatten().collect())
}

/// 时段内是否混合了多个部门
///
/// 统计该日期、该时段 guard_duty 排班中有部门的 Worker；
/// 返回 (是否存在两个及以上不同部门, 有部门的 Worker id 列表)。
pub async fn slot_department_mix<C: ConnectionTrait>(
    conn: &C,
    date: NaiveDate,
    time_slot: TimeSlot,
) -> Result<(bool, Vec<i32>)> {
    let ids: Vec<Option<i32>> = assignment::Entity::find()
        .select_only()
        .column(assignment::Column::WorkerId)
        .filter(assignment::Column::Date.eq(date))
        .filter(assignment::Column::TaskType.eq(TaskType::GuardDuty.as_str()))
        .filter(assignment::Column::TimeSlot.eq(time_slot.as_str()))
        .into_tuple()
        .all(conn)
        .await?;

    let ids: Vec<i32> = ids
        .into_iter()
        .flatten()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut departments = HashSet::new();
    let mut holders = Vec::new();
    for worker in workers::list_by_ids(conn, &ids).await? {
        if let Some(department) = worker.department.as_deref().map(str::trim)
            && !department.is_empty()
        {
            departments.insert(department.to_string());
            holders.push(worker.id);
        }
    }
    holders.sort_unstable();

    Ok((departments.len() >= 2, holders))
}

/// Worker 被删除前，将其排班置空
pub async fn clear_worker<C: ConnectionTrait>(conn: &C, worker_id: i32) -> Result<u64> {
    let result = assignment::Entity::update_many()
        .col_expr(assignment::Column::WorkerId, Expr::value(Option::<i32>::None))
        .col_expr(assignment::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(assignment::Column::WorkerId.eq(worker_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

impl SeaOrmStorage {
    pub async fn get_assignment(&self, id: i32) -> Result<Option<Assignment>> {
        let db = &self.db;

        let model = retry::with_retry(
            &format!("get_assignment({})", id),
            self.retry_config,
            || async { assignment::Entity::find_by_id(id).one(db).await },
        )
        .await
        .map_err(|e| RosterError::database_operation(format!("Failed to load assignment: {}", e)))?;

        model.map(model_to_assignment).transpose()
    }

    pub async fn assignments_for_date(&self, date: NaiveDate) -> Result<Vec<Assignment>> {
        let db = &self.db;

        let models = retry::with_retry(
            &format!("assignments_for_date({})", date),
            self.retry_config,
            || async {
                assignment::Entity::find()
                    .filter(assignment::Column::Date.eq(date))
                    .all(db)
                    .await
            },
        )
        .await
        .map_err(|e| {
            RosterError::database_operation(format!("Failed to load assignments: {}", e))
        })?;

        collect(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(id: i32, slot: Option<TimeSlot>, task_type: TaskType) -> Assignment {
        Assignment {
            id,
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            time_slot: slot,
            task_type,
            worker_id: Some(id),
            is_commander: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_sort_uses_shift_order() {
        let mut list = vec![
            assignment(1, Some(TimeSlot::H01), TaskType::GuardDuty),
            assignment(2, Some(TimeSlot::H23), TaskType::GuardDuty),
            assignment(3, None, TaskType::Kitchen),
            assignment(4, Some(TimeSlot::H07), TaskType::GuardDuty),
        ];
        sort_assignments(&mut list);
        let ids: Vec<i32> = list.iter().map(|a| a.id).collect();
        // 全天任务（无时段）排在最前，夜间时段排在 23:00 之后
        assert_eq!(ids, vec![3, 4, 2, 1]);
    }
}
