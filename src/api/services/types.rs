//! API 类型定义
//!
//! 请求/响应 DTO。带 `TS` 的类型在测试时导出到前端的 TypeScript 绑定。

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::services::{
    AssignOutcome, DaySchedule, InitializeReport, QueueSlot, QueueSummary, RemoveOutcome,
    ScheduledAssignment,
};
use crate::storage::models::TS_EXPORT_PATH;
use crate::storage::{TaskType, TimeSlot, Title, Worker};

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

// ============ Workers ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct WorkerResponse {
    pub id: i32,
    pub name: String,
    pub title: Title,
    pub title_display: String,
    pub department: Option<String>,
    pub hard_chores_counter: i32,
    pub outer_partner_counter: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Worker> for WorkerResponse {
    fn from(worker: Worker) -> Self {
        Self {
            id: worker.id,
            title_display: worker.title.display_name().to_string(),
            name: worker.name,
            title: worker.title,
            department: worker.department,
            hard_chores_counter: worker.hard_chores_counter,
            outer_partner_counter: worker.outer_partner_counter,
            created_at: worker.created_at.to_rfc3339(),
            updated_at: worker.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CreateWorkerRequest {
    pub name: String,
    pub title: Title,
    pub department: Option<String>,
    pub hard_chores_counter: Option<i32>,
    pub outer_partner_counter: Option<i32>,
}

/// 部分更新；`department: ""` 清除部门
#[derive(Serialize, Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UpdateWorkerRequest {
    pub name: Option<String>,
    pub title: Option<Title>,
    pub department: Option<String>,
    pub hard_chores_counter: Option<i32>,
    pub outer_partner_counter: Option<i32>,
}

// ============ Assignments ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AssignmentResponse {
    pub id: i32,
    pub date: String,
    pub time_slot: Option<TimeSlot>,
    pub task_type: TaskType,
    pub worker_id: Option<i32>,
    pub worker_name: Option<String>,
    pub is_commander: bool,
    pub label: String,
}

impl From<ScheduledAssignment> for AssignmentResponse {
    fn from(item: ScheduledAssignment) -> Self {
        let worker_name = item.worker.map(|w| w.name);
        let a = item.assignment;
        Self {
            id: a.id,
            date: a.date.to_string(),
            time_slot: a.time_slot,
            task_type: a.task_type,
            worker_id: a.worker_id,
            label: a.label(worker_name.as_deref()),
            worker_name,
            is_commander: a.is_commander,
        }
    }
}

/// 创建排班请求；字符串字段在 handler 中解析，以便返回统一的错误码
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CreateAssignmentRequest {
    pub date: String,
    pub task_type: String,
    pub time_slot: Option<String>,
    pub worker_id: i32,
    #[serde(default)]
    pub is_commander: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AssignOutcomeResponse {
    pub assignment: AssignmentResponse,
    pub worker: WorkerResponse,
    pub night_shift: bool,
    pub partner_bonus: bool,
    pub message: String,
}

impl From<AssignOutcome> for AssignOutcomeResponse {
    fn from(outcome: AssignOutcome) -> Self {
        Self {
            assignment: ScheduledAssignment {
                assignment: outcome.assignment,
                worker: Some(outcome.worker.clone()),
            }
            .into(),
            worker: outcome.worker.into(),
            night_shift: outcome.night_shift,
            partner_bonus: outcome.partner_bonus,
            message: outcome.message,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct RemoveOutcomeResponse {
    pub assignment: AssignmentResponse,
    pub worker: Option<WorkerResponse>,
    pub night_shift: bool,
    pub partner_penalty: bool,
    pub message: String,
}

impl From<RemoveOutcome> for RemoveOutcomeResponse {
    fn from(outcome: RemoveOutcome) -> Self {
        Self {
            assignment: ScheduledAssignment {
                assignment: outcome.assignment,
                worker: outcome.worker.clone(),
            }
            .into(),
            worker: outcome.worker.map(Into::into),
            night_shift: outcome.night_shift,
            partner_penalty: outcome.partner_penalty,
            message: outcome.message,
        }
    }
}

// ============ Schedule ============

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ScheduleQuery {
    pub date: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SlotScheduleResponse {
    pub time_slot: TimeSlot,
    pub required_workers: u32,
    pub assignments: Vec<AssignmentResponse>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TaskScheduleResponse {
    pub task_type: TaskType,
    pub display_name: String,
    pub assignments: Vec<AssignmentResponse>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct QueueEntryResponse {
    pub position: i32,
    pub worker: WorkerResponse,
}

impl From<QueueSlot> for QueueEntryResponse {
    fn from(slot: QueueSlot) -> Self {
        Self {
            position: slot.position,
            worker: slot.worker.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct QueueResponse {
    pub task_type: TaskType,
    pub display_name: String,
    /// 队首 Worker
    pub suggestion: Option<WorkerResponse>,
    pub entries: Vec<QueueEntryResponse>,
}

impl QueueResponse {
    pub fn new(task_type: TaskType, queue: Vec<QueueSlot>) -> Self {
        Self {
            task_type,
            display_name: task_type.display_name().to_string(),
            suggestion: queue.first().map(|slot| slot.worker.clone().into()),
            entries: queue.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<QueueSummary> for QueueResponse {
    fn from(summary: QueueSummary) -> Self {
        Self::new(summary.task_type, summary.queue)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct DayScheduleResponse {
    pub date: String,
    pub guard_slots: Vec<SlotScheduleResponse>,
    pub full_day: Vec<TaskScheduleResponse>,
    pub queues: Vec<QueueResponse>,
}

impl From<DaySchedule> for DayScheduleResponse {
    fn from(day: DaySchedule) -> Self {
        Self {
            date: day.date.to_string(),
            guard_slots: day
                .guard_slots
                .into_iter()
                .map(|slot| SlotScheduleResponse {
                    time_slot: slot.time_slot,
                    required_workers: slot.required_workers,
                    assignments: slot.assignments.into_iter().map(Into::into).collect(),
                })
                .collect(),
            full_day: day
                .full_day
                .into_iter()
                .map(|task| TaskScheduleResponse {
                    task_type: task.task_type,
                    display_name: task.task_type.display_name().to_string(),
                    assignments: task.assignments.into_iter().map(Into::into).collect(),
                })
                .collect(),
            queues: day.queues.into_iter().map(Into::into).collect(),
        }
    }
}

// ============ Queues & suggestions ============

#[derive(Serialize, Deserialize, Clone, Copy, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct InitializeQueuesResponse {
    pub workers: usize,
    pub created: usize,
}

impl From<InitializeReport> for InitializeQueuesResponse {
    fn from(report: InitializeReport) -> Self {
        Self {
            workers: report.workers,
            created: report.created,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct SuggestionParams {
    pub date: Option<String>,
    pub time_slot: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub commanders_only: bool,
}

/// 表单风格的布尔值：`true`/`1`/`on`/`yes` 为真
fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!("invalid boolean '{}'", other))),
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AcceptSuggestionRequest {
    pub date: String,
    pub time_slot: Option<String>,
    pub worker_id: i32,
}

// ============ Health ============

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub workers: u64,
    /// 运行秒数
    pub uptime: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web::Query;

    fn commanders_only(query: &str) -> Option<bool> {
        Query::<SuggestionParams>::from_query(query)
            .ok()
            .map(|q| q.commanders_only)
    }

    #[test]
    fn test_commanders_only_accepts_form_values() {
        assert_eq!(commanders_only(""), Some(false));
        assert_eq!(commanders_only("commanders_only=on"), Some(true));
        assert_eq!(commanders_only("commanders_only=1"), Some(true));
        assert_eq!(commanders_only("commanders_only=true"), Some(true));
        assert_eq!(commanders_only("commanders_only=false"), Some(false));
        assert_eq!(commanders_only("commanders_only=maybe"), None);
    }
}
