use std::str::FromStr;

use crate::errors::{Result, RosterError};
use crate::storage::{Assignment, NewWorker, QueueEntry, TaskType, TimeSlot, Title, Worker};
use migration::entities::{assignment, task_queue, worker};

fn corrupt(table: &str, id: i32, err: RosterError) -> RosterError {
    RosterError::database_operation(format!(
        "Corrupt {} row {}: {}",
        table,
        id,
        err.message()
    ))
}

/// 将 Sea-ORM Model 转换为 Worker
pub fn model_to_worker(model: worker::Model) -> Result<Worker> {
    let title = Title::from_str(&model.title).map_err(|e| corrupt("workers", model.id, e))?;
    Ok(Worker {
        id: model.id,
        name: model.name,
        title,
        department: model.department,
        hard_chores_counter: model.hard_chores_counter.max(0),
        outer_partner_counter: model.outer_partner_counter.max(0),
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn model_to_assignment(model: assignment::Model) -> Result<Assignment> {
    let task_type =
        TaskType::from_str(&model.task_type).map_err(|e| corrupt("assignments", model.id, e))?;
    let time_slot = model
        .time_slot
        .as_deref()
        .map(TimeSlot::from_str)
        .transpose()
        .map_err(|e| corrupt("assignments", model.id, e))?;

    Ok(Assignment {
        id: model.id,
        date: model.date,
        time_slot,
        task_type,
        worker_id: model.worker_id,
        is_commander: model.is_commander,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn model_to_queue_entry(model: task_queue::Model) -> Result<QueueEntry> {
    let task_type =
        TaskType::from_str(&model.task_type).map_err(|e| corrupt("task_queues", model.id, e))?;
    Ok(QueueEntry {
        id: model.id,
        worker_id: model.worker_id,
        task_type,
        position: model.position,
    })
}

/// 新建 Worker 的 ActiveModel（名称与部门已去除首尾空白）
pub fn new_worker_active_model(new: &NewWorker) -> worker::ActiveModel {
    use sea_orm::ActiveValue::*;

    let now = chrono::Utc::now();
    worker::ActiveModel {
        id: NotSet,
        name: Set(new.name.trim().to_string()),
        title: Set(new.title.as_str().to_string()),
        department: Set(normalize_department(new.department.as_deref())),
        hard_chores_counter: Set(new.hard_chores_counter),
        outer_partner_counter: Set(new.outer_partner_counter),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

/// 空白部门存为 NULL
pub fn normalize_department(department: Option<&str>) -> Option<String> {
    department
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

pub fn new_assignment_active_model(
    date: chrono::NaiveDate,
    task_type: TaskType,
    time_slot: Option<TimeSlot>,
    worker_id: i32,
    is_commander: bool,
) -> assignment::ActiveModel {
    use sea_orm::ActiveValue::*;

    let now = chrono::Utc::now();
    assignment::ActiveModel {
        id: NotSet,
        date: Set(date),
        time_slot: Set(time_slot.map(|s| s.as_str().to_string())),
        task_type: Set(task_type.as_str().to_string()),
        worker_id: Set(Some(worker_id)),
        is_commander: Set(is_commander),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use sea_orm::ActiveValue;

    fn worker_model(title: &str) -> worker::Model {
        worker::Model {
            id: 4,
            name: "Dana".to_string(),
            title: title.to_string(),
            department: Some("logistics".to_string()),
            hard_chores_counter: 2,
            outer_partner_counter: -1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_model_to_worker() {
        let worker = model_to_worker(worker_model("soldier")).unwrap();
        assert_eq!(worker.title, Title::Soldier);
        assert_eq!(worker.hard_chores_counter, 2);
        // 负数计数器按 0 处理
        assert_eq!(worker.outer_partner_counter, 0);
        assert!(worker.has_department());
    }

    #[test]
    fn test_model_to_worker_bad_title() {
        let err = model_to_worker(worker_model("general")).unwrap_err();
        assert!(matches!(err, RosterError::DatabaseOperation(_)));
        assert!(err.message().contains("workers row 4"));
    }

    #[test]
    fn test_model_to_assignment_full_day() {
        let model = assignment::Model {
            id: 9,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            time_slot: None,
            task_type: "kitchen".to_string(),
            worker_id: None,
            is_commander: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let assignment = model_to_assignment(model).unwrap();
        assert_eq!(assignment.task_type, TaskType::Kitchen);
        assert!(assignment.time_slot.is_none());
        assert!(assignment.worker_id.is_none());
    }

    #[test]
    fn test_model_to_assignment_bad_slot() {
        let model = assignment::Model {
            id: 10,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            time_slot: Some("25:00-27:00".to_string()),
            task_type: "guard_duty".to_string(),
            worker_id: Some(1),
            is_commander: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(matches!(
            model_to_assignment(model),
            Err(RosterError::DatabaseOperation(_))
        ));
    }

    #[test]
    fn test_new_assignment_active_model() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let active = new_assignment_active_model(
            date,
            TaskType::GuardDuty,
            Some(TimeSlot::H01),
            3,
            true,
        );
        assert!(matches!(active.id, ActiveValue::NotSet));
        assert_eq!(
            active.time_slot,
            ActiveValue::Set(Some("01:00-03:00".to_string()))
        );
        assert_eq!(active.task_type, ActiveValue::Set("guard_duty".to_string()));
        assert_eq!(active.worker_id, ActiveValue::Set(Some(3)));
    }

    #[test]
    fn test_new_worker_active_model() {
        let new = NewWorker::new("  Eli ", Title::Commander).with_department("   ");
        let active = new_worker_active_model(&new);
        assert_eq!(active.name, ActiveValue::Set("Eli".to_string()));
        assert_eq!(active.title, ActiveValue::Set("commander".to_string()));
        assert_eq!(active.department, ActiveValue::Set(None));
        assert_eq!(active.hard_chores_counter, ActiveValue::Set(0));
        assert_eq!(active.outer_partner_counter, ActiveValue::Set(0));
    }

    #[test]
    fn test_normalize_department() {
        assert_eq!(normalize_department(None), None);
        assert_eq!(normalize_department(Some("")), None);
        assert_eq!(
            normalize_department(Some(" signals ")),
            Some("signals".to_string())
        );
    }
}
