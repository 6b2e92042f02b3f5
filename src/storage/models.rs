//! Roster domain types
//!
//! Plain data shared by the storage layer, services and HTTP DTOs.
//! Enum values are stored in the database as their `as_str()` form.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use ts_rs::TS;

use crate::errors::RosterError;

/// TypeScript 类型导出路径（相对 ts-rs 输出目录）
pub const TS_EXPORT_PATH: &str = "roster.generated.ts";

/// Worker rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, EnumIter)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "lowercase")]
pub enum Title {
    Commander,
    Soldier,
}

impl Title {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commander => "commander",
            Self::Soldier => "soldier",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Commander => "Commander",
            Self::Soldier => "Soldier",
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Title {
    type Err = RosterError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "commander" => Ok(Self::Commander),
            "soldier" => Ok(Self::Soldier),
            _ => Err(RosterError::validation(format!(
                "Invalid title: '{}'. Valid: commander, soldier",
                s
            ))),
        }
    }
}

/// Which fairness counter a task books against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "snake_case")]
pub enum FairnessCounter {
    HardChores,
    OuterPartner,
}

impl FairnessCounter {
    pub fn value_of(&self, worker: &Worker) -> i32 {
        match self {
            Self::HardChores => worker.hard_chores_counter,
            Self::OuterPartner => worker.outer_partner_counter,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS, EnumIter,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    GuardDuty,
    PatrolA,
    PatrolB,
    Kitchen,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GuardDuty => "guard_duty",
            Self::PatrolA => "patrol_a",
            Self::PatrolB => "patrol_b",
            Self::Kitchen => "kitchen",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::GuardDuty => "Guard Duty",
            Self::PatrolA => "Patrol A",
            Self::PatrolB => "Patrol B",
            Self::Kitchen => "Kitchen",
        }
    }

    /// Only guard duty is split into time slots
    pub fn is_time_slotted(&self) -> bool {
        matches!(self, Self::GuardDuty)
    }

    pub fn is_full_day(&self) -> bool {
        !self.is_time_slotted()
    }

    pub fn is_patrol(&self) -> bool {
        matches!(self, Self::PatrolA | Self::PatrolB)
    }

    /// Counter used to rank suggestions for this task
    pub fn fairness_counter(&self) -> FairnessCounter {
        if self.is_patrol() {
            FairnessCounter::OuterPartner
        } else {
            FairnessCounter::HardChores
        }
    }

    /// Counter booked when a suggestion is accepted. Guard duty counters
    /// follow the night-shift and department rules instead.
    pub fn accepted_counter(&self) -> Option<FairnessCounter> {
        match self {
            Self::GuardDuty => None,
            other => Some(other.fairness_counter()),
        }
    }

    pub fn full_day_tasks() -> impl Iterator<Item = TaskType> {
        Self::iter().filter(TaskType::is_full_day)
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = RosterError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| {
                RosterError::invalid_task_type(format!(
                    "Invalid task type: '{}'. Valid: guard_duty, patrol_a, patrol_b, kitchen",
                    s
                ))
            })
    }
}

/// Guard duty time slots, in shift order starting at 07:00
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS, EnumIter,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub enum TimeSlot {
    #[serde(rename = "07:00-09:00")]
    H07,
    #[serde(rename = "09:00-11:00")]
    H09,
    #[serde(rename = "11:00-13:00")]
    H11,
    #[serde(rename = "13:00-15:00")]
    H13,
    #[serde(rename = "15:00-17:00")]
    H15,
    #[serde(rename = "17:00-19:00")]
    H17,
    #[serde(rename = "19:00-21:00")]
    H19,
    #[serde(rename = "21:00-23:00")]
    H21,
    #[serde(rename = "23:00-01:00")]
    H23,
    #[serde(rename = "01:00-03:00")]
    H01,
    #[serde(rename = "03:00-05:00")]
    H03,
    #[serde(rename = "05:00-07:00")]
    H05,
}

impl TimeSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::H07 => "07:00-09:00",
            Self::H09 => "09:00-11:00",
            Self::H11 => "11:00-13:00",
            Self::H13 => "13:00-15:00",
            Self::H15 => "15:00-17:00",
            Self::H17 => "17:00-19:00",
            Self::H19 => "19:00-21:00",
            Self::H21 => "21:00-23:00",
            Self::H23 => "23:00-01:00",
            Self::H01 => "01:00-03:00",
            Self::H03 => "03:00-05:00",
            Self::H05 => "05:00-07:00",
        }
    }

    pub fn is_daytime(&self) -> bool {
        matches!(
            self,
            Self::H07 | Self::H09 | Self::H11 | Self::H13 | Self::H15
        )
    }

    /// Number of guards the slot calls for
    pub fn required_workers(&self) -> u32 {
        if self.is_daytime() { 1 } else { 2 }
    }

    pub fn is_night_shift(&self) -> bool {
        matches!(self, Self::H01 | Self::H03)
    }

    pub fn all() -> impl Iterator<Item = TimeSlot> {
        Self::iter()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeSlot {
    type Err = RosterError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter().find(|t| t.as_str() == s.trim()).ok_or_else(|| {
            RosterError::invalid_time_slot(format!(
                "Invalid time slot: '{}'. Expected one of the two-hour slots such as 07:00-09:00",
                s
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Worker {
    pub id: i32,
    pub name: String,
    pub title: Title,
    pub department: Option<String>,
    pub hard_chores_counter: i32,
    pub outer_partner_counter: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Worker {
    pub fn has_department(&self) -> bool {
        self.department.as_deref().is_some_and(|d| !d.trim().is_empty())
    }
}

impl fmt::Display for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.title)
    }
}

/// Fields accepted when creating a worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorker {
    pub name: String,
    pub title: Title,
    pub department: Option<String>,
    pub hard_chores_counter: i32,
    pub outer_partner_counter: i32,
}

impl NewWorker {
    pub fn new(name: impl Into<String>, title: Title) -> Self {
        Self {
            name: name.into(),
            title,
            department: None,
            hard_chores_counter: 0,
            outer_partner_counter: 0,
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }
}

/// Partial worker update; `None` leaves a field untouched.
/// `department: Some("")` clears the department.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerPatch {
    pub name: Option<String>,
    pub title: Option<Title>,
    pub department: Option<String>,
    pub hard_chores_counter: Option<i32>,
    pub outer_partner_counter: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i32,
    pub date: NaiveDate,
    pub time_slot: Option<TimeSlot>,
    pub task_type: TaskType,
    pub worker_id: Option<i32>,
    pub is_commander: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn is_time_slotted_task(&self) -> bool {
        self.task_type.is_time_slotted()
    }

    pub fn is_full_day_task(&self) -> bool {
        self.task_type.is_full_day()
    }

    pub fn is_night_shift(&self) -> bool {
        self.task_type.is_time_slotted() && self.time_slot.is_some_and(|s| s.is_night_shift())
    }

    /// Human-readable label, e.g. `Guard Duty - 11:00-13:00 - Dana (2025-01-01)`
    pub fn label(&self, worker_name: Option<&str>) -> String {
        let worker_name = worker_name.unwrap_or("Unassigned");
        match self.time_slot {
            Some(slot) => format!(
                "{} - {} - {} ({})",
                self.task_type.display_name(),
                slot,
                worker_name,
                self.date
            ),
            None => format!(
                "{} - {} ({})",
                self.task_type.display_name(),
                worker_name,
                self.date
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub id: i32,
    pub worker_id: i32,
    pub task_type: TaskType,
    pub position: i32,
}

/// Storage backend description for the health endpoint
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}
