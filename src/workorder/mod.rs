//! The work order record and its lifecycle.
//!
//! A [`WorkOrder`] lives on disk as two files in the in-progress directory:
//!
//! - `"{full number}.twois"`: a JSON snapshot of the whole record
//! - `"{full number} - {title}.xlsx"`: the Technician Work Order
//!   Information Sheet
//!
//! The full number is the six-digit number plus site and special codes
//! (`123456VBS`) once approved, and the `Pending-NNN` placeholder before.
//! Both files are renamed together whenever the number or title changes.
//!
//! # Lifecycle
//!
//! ```text
//! new / from_spreadsheet ──► pending ──approve──► approved ──complete──► complete/<year>/Week of MM-DD
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use twois::{Config, WorkOrder, WorkOrderPatch};
//!
//! # fn main() -> twois::Result<()> {
//! let config = Arc::new(Config::load("twois.yaml")?);
//! config.ensure_directories()?;
//!
//! let mut wo = WorkOrder::new(
//!     config,
//!     WorkOrderPatch {
//!         title: Some("14-Day AV Updates (OPS GMM)".into()),
//!         ..Default::default()
//!     },
//! )?;
//! wo.save()?;
//! println!("{}", wo); // Pending-001: 14-Day AV Updates (OPS GMM)
//! # Ok(())
//! # }
//! ```

mod lifecycle;
mod patch;
mod persist;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cells::validate::{DEFAULT_DESCRIPTION, DEFAULT_PRIORITY, DEFAULT_TITLE, NOT_APPLICABLE};
use crate::common::Result;
use crate::common::dates::today;
use crate::config::Config;
use crate::model::task::default_tasks;
use crate::model::{CompletionData, LogComment, Site, Special, TaskCompletion, TaskItem, WorkOrderType};
use crate::numbering::{SNAPSHOT_EXTENSION, SPREADSHEET_EXTENSION, is_pending, next_pending_number};

pub use patch::WorkOrderPatch;

/// One Technician Work Order Information Sheet record.
///
/// Fields are read through getters and changed through
/// [`WorkOrder::edit`] (or the construction patch), so every value passes the
/// same validation whichever way it arrives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    description: String,
    due_date: NaiveDate,
    wo_number: String,
    site: Site,
    special: Special,
    title: String,
    #[serde(rename = "type")]
    wo_type: WorkOrderType,
    priority: u8,
    creator: String,
    building: u32,
    room: u32,
    related_wo: String,
    pac_required: bool,
    ncr_required: bool,
    ncr_number: String,
    task_lead_required: bool,
    tech_witness_point: bool,
    peer_review_required: bool,
    peer_review_attached: bool,
    ehs_required: bool,
    qamip: bool,
    qa_review_required: bool,
    tasks: Vec<TaskItem>,
    comments: Vec<LogComment>,
    completion: Option<CompletionData>,
    #[serde(skip)]
    config: Arc<Config>,
}

impl WorkOrder {
    /// Create a record from defaults overridden by `patch`.
    ///
    /// Invalid patch values are ignored in favor of the defaults. The
    /// placeholder number is allocated from the in-progress directory.
    pub fn new(config: Arc<Config>, patch: WorkOrderPatch) -> Result<Self> {
        let mut wo = Self::with_defaults(config)?;
        patch.apply(&mut wo);
        Ok(wo)
    }

    fn with_defaults(config: Arc<Config>) -> Result<Self> {
        let wo_number = next_pending_number(&config.in_progress_dir())?;
        Ok(Self {
            description: DEFAULT_DESCRIPTION.to_string(),
            due_date: today(),
            wo_number,
            site: config.default_site,
            special: config.default_special,
            title: DEFAULT_TITLE.to_string(),
            wo_type: config.default_type,
            priority: DEFAULT_PRIORITY,
            creator: config.primary_user.name.clone(),
            building: config.default_building,
            room: config.default_room,
            related_wo: NOT_APPLICABLE.to_string(),
            pac_required: false,
            ncr_required: false,
            ncr_number: NOT_APPLICABLE.to_string(),
            task_lead_required: false,
            tech_witness_point: false,
            peer_review_required: false,
            peer_review_attached: false,
            ehs_required: false,
            qamip: false,
            qa_review_required: false,
            tasks: default_tasks(),
            comments: Vec::new(),
            completion: None,
            config,
        })
    }

    /// `123456VBS` when approved, otherwise the placeholder number.
    pub fn full_wo_number(&self) -> String {
        if self.is_approved(false) {
            format!("{}{}{}", self.wo_number, self.site, self.special)
        } else {
            self.wo_number.clone()
        }
    }

    /// Snapshot file name, `"{full}.twois"`.
    pub fn snapshot_file_name(&self) -> String {
        format!("{}.{}", self.full_wo_number(), SNAPSHOT_EXTENSION)
    }

    /// Spreadsheet file name, `"{full} - {title}.xlsx"`.
    pub fn spreadsheet_file_name(&self) -> String {
        format!("{} - {}.{}", self.full_wo_number(), self.title, SPREADSHEET_EXTENSION)
    }

    /// Where the snapshot lives while the record is in progress.
    pub fn snapshot_path(&self) -> PathBuf {
        self.config.in_progress_dir().join(self.snapshot_file_name())
    }

    /// Where the spreadsheet lives while the record is in progress.
    pub fn spreadsheet_path(&self) -> PathBuf {
        self.config.in_progress_dir().join(self.spreadsheet_file_name())
    }

    /// Record actuals for the task at `index`.
    ///
    /// Returns `false` when there is no such task or it is already complete.
    /// Only the in-memory record changes; call [`WorkOrder::save`] to persist.
    pub fn complete_task(&mut self, index: usize, data: TaskCompletion) -> bool {
        self.tasks.get_mut(index).is_some_and(|task| task.complete(data))
    }

    /// Check if every task has valid completion data.
    pub fn all_tasks_complete(&self) -> bool {
        self.tasks.iter().all(TaskItem::is_complete)
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Six-digit number, or the `Pending-NNN` placeholder.
    pub fn wo_number(&self) -> &str {
        &self.wo_number
    }

    /// Check if the number is still a placeholder.
    pub fn is_pending(&self) -> bool {
        is_pending(&self.wo_number)
    }

    pub fn site(&self) -> Site {
        self.site
    }

    pub fn special(&self) -> Special {
        self.special
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn wo_type(&self) -> WorkOrderType {
        self.wo_type
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn building(&self) -> u32 {
        self.building
    }

    pub fn room(&self) -> u32 {
        self.room
    }

    /// Related work order number, or `"N/A"`.
    pub fn related_wo(&self) -> &str {
        &self.related_wo
    }

    pub fn pac_required(&self) -> bool {
        self.pac_required
    }

    pub fn ncr_required(&self) -> bool {
        self.ncr_required
    }

    /// NCR number; `"N/A"` when none is required, `"REQUIRED"` when one is
    /// required but not yet known.
    pub fn ncr_number(&self) -> &str {
        &self.ncr_number
    }

    pub fn task_lead_required(&self) -> bool {
        self.task_lead_required
    }

    pub fn tech_witness_point(&self) -> bool {
        self.tech_witness_point
    }

    pub fn peer_review_required(&self) -> bool {
        self.peer_review_required
    }

    pub fn peer_review_attached(&self) -> bool {
        self.peer_review_attached
    }

    pub fn ehs_required(&self) -> bool {
        self.ehs_required
    }

    pub fn qamip(&self) -> bool {
        self.qamip
    }

    pub fn qa_review_required(&self) -> bool {
        self.qa_review_required
    }

    pub fn tasks(&self) -> &[TaskItem] {
        &self.tasks
    }

    pub fn comments(&self) -> &[LogComment] {
        &self.comments
    }

    /// Completion data, set once the record is completed.
    pub fn completion(&self) -> Option<&CompletionData> {
        self.completion.as_ref()
    }
}

impl fmt::Display for WorkOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.wo_number, self.title)
    }
}

/// Approved records are equal when their numbers are.
///
/// Pending records compare equal only when title, first real task summary
/// and due date all differ. Callers depend on this rule as-is.
///
/// Whether a record counts as approved is judged from its number alone; the
/// spreadsheet on disk is never read, so comparing records does no I/O.
impl PartialEq for WorkOrder {
    fn eq(&self, other: &Self) -> bool {
        if self.is_approved(false) {
            return self.wo_number == other.wo_number;
        }
        let summary = |wo: &WorkOrder| wo.tasks.get(1).map(|t| t.summary.clone());
        self.title != other.title && summary(self) != summary(other) && self.due_date != other.due_date
    }
}
