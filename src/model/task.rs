//! Planned tasks and their recorded actuals.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// First row of the planned-task block.
pub const FIRST_TASK_ROW: u32 = 15;
/// Last row of the planned-task block.
pub const LAST_TASK_ROW: u32 = 29;
/// Distance from a planned row to its actuals row.
pub const ACTUALS_OFFSET: u32 = 17;
/// Number of task rows the sheet can hold.
pub const MAX_TASKS: usize = (LAST_TASK_ROW - FIRST_TASK_ROW + 1) as usize;

/// What was actually done for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCompletion {
    /// Date the work was done
    pub date: NaiveDate,
    /// Responsible technician
    pub technician: String,
    /// Number of technicians who did the work
    pub qty_techs: u32,
    /// Hours spent, in tenths
    pub hours: f64,
}

impl TaskCompletion {
    /// A completion record counts only with at least one technician and
    /// some recorded time.
    pub fn is_valid(&self) -> bool {
        self.qty_techs > 0 && self.hours > 0.0
    }
}

/// One planned task line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    /// Task number, normally a multiple of ten
    pub number: i64,
    /// Short description of the task
    pub summary: String,
    /// Procedure document reference
    pub reference: String,
    planned_row: u32,
    completion: Option<TaskCompletion>,
}

impl TaskItem {
    /// Create a task placed on `row`, clamped into the planned block.
    pub fn new(number: i64, summary: impl Into<String>, reference: impl Into<String>, row: u32) -> Self {
        Self {
            number,
            summary: summary.into(),
            reference: reference.into(),
            planned_row: row.clamp(FIRST_TASK_ROW, LAST_TASK_ROW),
            completion: None,
        }
    }

    /// The "Safety Message" task that always occupies the first row.
    pub fn safety_message() -> Self {
        Self::new(0, "Safety Message", "", FIRST_TASK_ROW)
    }

    /// Placeholder inserted when a sheet carries no real task.
    pub fn description_required() -> Self {
        Self::new(10, "TASK DESCRIPTION REQUIRED", "REFERENCE REQUIRED", FIRST_TASK_ROW + 1)
    }

    /// Row holding the planned entry.
    #[inline]
    pub fn planned_row(&self) -> u32 {
        self.planned_row
    }

    /// Move the task, clamped into the planned block.
    pub fn set_planned_row(&mut self, row: u32) {
        self.planned_row = row.clamp(FIRST_TASK_ROW, LAST_TASK_ROW);
    }

    /// Row holding the actuals entry.
    #[inline]
    pub fn actuals_row(&self) -> u32 {
        self.planned_row + ACTUALS_OFFSET
    }

    /// Forget any recorded completion.
    pub fn reset(&mut self) {
        self.completion = None;
    }

    /// Recorded completion, if any.
    pub fn completion(&self) -> Option<&TaskCompletion> {
        self.completion.as_ref()
    }

    /// Record completion data.
    ///
    /// Returns `false` without changing anything when the task is already
    /// complete.
    pub fn complete(&mut self, data: TaskCompletion) -> bool {
        if self.is_complete() {
            return false;
        }
        self.completion = Some(data);
        true
    }

    /// Check if valid completion data has been recorded.
    pub fn is_complete(&self) -> bool {
        self.completion.as_ref().is_some_and(TaskCompletion::is_valid)
    }
}

impl fmt::Display for TaskItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary)
    }
}

/// The task list every new record starts with.
pub fn default_tasks() -> Vec<TaskItem> {
    vec![TaskItem::safety_message(), TaskItem::description_required()]
}
