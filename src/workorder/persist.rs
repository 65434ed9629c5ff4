//! Loading and storing work orders: spreadsheet, snapshot and templates.
//!
//! # Which spreadsheet a save starts from
//!
//! The spreadsheet is never regenerated from scratch when the record's own
//! file is still a structurally valid sheet describing this record. In that
//! case the file is loaded, the modeled cells are overwritten, and everything
//! else (notes added by hand, formatting, extra sheets) is kept. Otherwise the
//! configured template, or the built-in blank sheet, is the starting point.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cells::classify::{inspect, input_file_status};
use crate::cells::validate::{NOT_APPLICABLE, format_building, format_room};
use crate::cells::{extract, layout};
use crate::common::dates::{date_to_string, today};
use crate::common::fs::{extension_lower, remove_if_exists};
use crate::common::text::{bool_to_yes_no, name_to_initials};
use crate::common::{Error, Result};
use crate::config::Config;
use crate::model::comment::{FIRST_COMMENT_ROW, LAST_COMMENT_ROW};
use crate::model::task::{ACTUALS_OFFSET, FIRST_TASK_ROW, LAST_TASK_ROW};
use crate::model::{FileStatus, LogComment, TaskItem};
use crate::numbering::{SNAPSHOT_EXTENSION, next_pending_number};
use crate::sheet::CellSink;
use crate::xlsx::Workbook;

use super::{WorkOrder, WorkOrderPatch};

/// Highest `-n` suffix tried when naming a new template.
const MAX_TEMPLATE_SUFFIX: u32 = 999;

impl WorkOrder {
    /// Build a record from a work order spreadsheet.
    ///
    /// The description is not part of the sheet, so it is passed in. A file
    /// that is missing or not a work order sheet yields a default record; a
    /// sheet without a valid number gets the next placeholder number.
    pub fn from_spreadsheet(config: Arc<Config>, path: &Path, description: Option<&str>) -> Result<Self> {
        let description = description.map(str::to_string);
        let (status, book) = inspect(path);
        let Some(book) = book else {
            warn!(path = %path.display(), %status, "not a usable work order sheet, using defaults");
            return Self::new(
                config,
                WorkOrderPatch {
                    description,
                    ..Default::default()
                },
            );
        };

        let ncr_required = extract::yes_no(&book, layout::NCR_REQUIRED);
        let patch = WorkOrderPatch {
            description,
            due_date: Some(extract::date(&book, layout::DUE_DATE).value),
            wo_number: extract::wo_number(&book),
            site: Some(extract::site(&book, &config)),
            special: Some(extract::special(&book, &config)),
            title: Some(extract::title(&book).value),
            wo_type: Some(extract::wo_type(&book, &config)),
            priority: Some(extract::priority(&book).value.into()),
            creator: Some(extract::creator(&book, &config).value),
            building: Some(extract::building(&book, config.default_building).value.into()),
            room: Some(extract::room(&book, config.default_room).value.into()),
            related_wo: Some(extract::related_wo(&book).value),
            pac_required: Some(extract::pac_required(&book)),
            ncr_required: Some(ncr_required),
            ncr_number: Some(extract::ncr_number(&book, ncr_required).value),
            task_lead_required: Some(extract::yes_no(&book, layout::TASK_LEAD_REQUIRED)),
            tech_witness_point: Some(extract::yes_no(&book, layout::TECH_WITNESS_POINT)),
            peer_review_required: Some(extract::yes_no(&book, layout::PEER_REVIEW_REQUIRED)),
            peer_review_attached: Some(extract::yes_no(&book, layout::PEER_REVIEW_ATTACHED)),
            ehs_required: Some(extract::yes_no(&book, layout::EHS_REQUIRED)),
            qamip: Some(extract::yes_no(&book, layout::QAMIP)),
            qa_review_required: Some(extract::yes_no(&book, layout::QA_REVIEW_REQUIRED)),
            tasks: Some(extract::tasks(&book)),
            comments: Some(extract::comments(&book)),
        };

        let wo = Self::new(config, patch)?;
        debug!(path = %path.display(), number = %wo.wo_number, "read work order from spreadsheet");
        Ok(wo)
    }

    /// Load a `.twois` snapshot.
    ///
    /// Anything that isn't a readable snapshot yields a default record.
    pub fn from_snapshot(config: Arc<Config>, path: &Path) -> Result<Self> {
        let is_snapshot = extension_lower(path).as_deref() == Some(SNAPSHOT_EXTENSION);
        if is_snapshot && path.is_file() {
            match read_snapshot(path) {
                Ok(mut wo) => {
                    wo.config = config;
                    return Ok(wo);
                },
                Err(e) => warn!(path = %path.display(), error = %e, "unreadable snapshot, using defaults"),
            }
        }
        Self::new(config, WorkOrderPatch::default())
    }

    /// Start a new pending record from a saved template.
    ///
    /// The copy gets a fresh placeholder number and today's due date; its
    /// comments, completion data and task actuals are cleared.
    pub fn from_template(config: Arc<Config>, path: &Path) -> Result<Self> {
        let mut wo = Self::from_snapshot(config, path)?;
        wo.wo_number = next_pending_number(&wo.config.in_progress_dir())?;
        wo.due_date = today();
        wo.comments.clear();
        wo.completion = None;
        wo.tasks.iter_mut().for_each(|t| t.reset());
        Ok(wo)
    }

    /// Write both files into the in-progress directory.
    ///
    /// The in-progress directory must exist.
    pub fn save(&mut self) -> Result<()> {
        let base = self.matching_base(&self.spreadsheet_path());
        self.save_with_base(base.as_deref())
    }

    /// Write both files, starting the spreadsheet from `base` when it is a
    /// readable work order sheet.
    pub(super) fn save_with_base(&mut self, base: Option<&Path>) -> Result<()> {
        let spreadsheet = self.spreadsheet_path();
        self.write_spreadsheet(base, &spreadsheet)?;
        write_snapshot(self, &self.snapshot_path())?;
        debug!(number = %self.full_wo_number(), "saved work order");
        Ok(())
    }

    /// `path` if it is this record's sheet and may be reused as a base.
    pub(super) fn matching_base(&self, path: &Path) -> Option<PathBuf> {
        let reusable = input_file_status(path) == FileStatus::Valid && self.matches_file(path, false);
        reusable.then(|| path.to_path_buf())
    }

    /// Fill a workbook with this record and save it at `dest`.
    pub(super) fn write_spreadsheet(&mut self, base: Option<&Path>, dest: &Path) -> Result<()> {
        let mut book = match base {
            Some(path) if input_file_status(path) == FileStatus::Valid => match Workbook::open(path) {
                Ok(book) => book,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "can't reuse spreadsheet, starting fresh");
                    self.blank_workbook()?
                },
            },
            _ => self.blank_workbook()?,
        };

        self.normalize_rows();
        self.fill_cells(&mut book);
        book.save(dest)
    }

    fn blank_workbook(&self) -> Result<Workbook> {
        Workbook::from_template(self.config.spreadsheet_template.as_deref())
    }

    /// Put tasks and comments on consecutive rows from the top of their blocks.
    fn normalize_rows(&mut self) {
        for (i, task) in self.tasks.iter_mut().enumerate() {
            task.set_planned_row(FIRST_TASK_ROW + i as u32);
        }
        for (i, comment) in self.comments.iter_mut().enumerate() {
            comment.set_row(FIRST_COMMENT_ROW + i as u32);
        }
    }

    /// Write every modeled field into its cell.
    ///
    /// Task and comment rows not used by this record are cleared; cells
    /// outside the layout are left alone.
    pub fn fill_cells<S: CellSink>(&self, sheet: &mut S) {
        sheet.set(layout::DUE_DATE, date_to_string(self.due_date));
        sheet.set(layout::ORIGINATOR, "RS");
        sheet.set(layout::PREPARER_INITIALS, name_to_initials(&self.creator));
        if self.is_pending() {
            sheet.clear(layout::NUMBER);
        } else {
            sheet.set(layout::NUMBER, self.wo_number.as_str());
        }
        sheet.set(layout::SITE, self.site.code());
        sheet.set(layout::SPECIAL, self.special.code());
        sheet.set(layout::TITLE, self.title.as_str());
        sheet.set(layout::TYPE, self.wo_type.code());
        sheet.set(layout::BUILDING, format_building(self.building));
        sheet.set(layout::ROOM, format_room(self.room, self.building));
        sheet.set(layout::PRIORITY, self.priority.to_string());
        sheet.set(layout::CREATOR, self.creator.as_str());
        sheet.set(layout::RELATED_WO, self.related_wo.as_str());
        sheet.set(layout::PAC, if self.pac_required { "PAC - YES" } else { "PAC - NO" });
        sheet.set(layout::NCR_REQUIRED, bool_to_yes_no(self.ncr_required));
        let ncr = if self.ncr_required { self.ncr_number.as_str() } else { NOT_APPLICABLE };
        sheet.set(layout::NCR_NUMBER, ncr);
        for (cell, value) in [
            (layout::TASK_LEAD_REQUIRED, self.task_lead_required),
            (layout::TECH_WITNESS_POINT, self.tech_witness_point),
            (layout::PEER_REVIEW_REQUIRED, self.peer_review_required),
            (layout::PEER_REVIEW_ATTACHED, self.peer_review_attached),
            (layout::EHS_REQUIRED, self.ehs_required),
            (layout::QAMIP, self.qamip),
            (layout::QA_REVIEW_REQUIRED, self.qa_review_required),
        ] {
            sheet.set(cell, bool_to_yes_no(value));
        }

        self.fill_tasks(sheet);
        self.fill_comments(sheet);

        if let Some(done) = &self.completion {
            sheet.set(layout::COMPLETION_START, date_to_string(done.start_date));
            sheet.set(layout::COMPLETION_END, date_to_string(done.end_date));
            sheet.set(layout::COMPLETION_RESTORE, date_to_string(done.restore_date));
            sheet.set(layout::COMPLETION_REPAIR_TIME, done.to_string());
        }
    }

    fn fill_tasks<S: CellSink>(&self, sheet: &mut S) {
        let planned = [layout::TASK_NUMBER, layout::TASK_SUMMARY, layout::TASK_REFERENCE];
        let actuals = [
            layout::ACTUAL_NUMBER,
            layout::ACTUAL_DATE,
            layout::ACTUAL_TECHNICIAN,
            layout::ACTUAL_QTY_TECHS,
            layout::ACTUAL_HOURS,
        ];

        let used: Vec<u32> = self.tasks.iter().map(TaskItem::planned_row).collect();
        for row in (FIRST_TASK_ROW..=LAST_TASK_ROW).filter(|r| !used.contains(r)) {
            for cell in planned {
                sheet.clear(cell.with_row(row));
            }
            for cell in actuals {
                sheet.clear(cell.with_row(row + ACTUALS_OFFSET));
            }
        }

        for task in &self.tasks {
            let row = task.planned_row();
            sheet.set(layout::TASK_NUMBER.with_row(row), task.number);
            sheet.set(layout::TASK_SUMMARY.with_row(row), task.summary.as_str());
            sheet.set(layout::TASK_REFERENCE.with_row(row), task.reference.as_str());

            let row = task.actuals_row();
            match task.completion().filter(|_| task.is_complete()) {
                Some(done) => {
                    sheet.set(layout::ACTUAL_NUMBER.with_row(row), task.number);
                    sheet.set(layout::ACTUAL_DATE.with_row(row), date_to_string(done.date));
                    sheet.set(layout::ACTUAL_TECHNICIAN.with_row(row), done.technician.as_str());
                    sheet.set(layout::ACTUAL_QTY_TECHS.with_row(row), done.qty_techs);
                    sheet.set(layout::ACTUAL_HOURS.with_row(row), format!("{:.1}", done.hours));
                },
                None => {
                    for cell in actuals {
                        sheet.clear(cell.with_row(row));
                    }
                },
            }
        }
    }

    fn fill_comments<S: CellSink>(&self, sheet: &mut S) {
        let columns = [layout::COMMENT_TEXT, layout::COMMENT_AUTHOR, layout::COMMENT_DATE];

        let used: Vec<u32> = self.comments.iter().map(LogComment::row).collect();
        for row in (FIRST_COMMENT_ROW..=LAST_COMMENT_ROW).filter(|r| !used.contains(r)) {
            for cell in columns {
                sheet.clear(cell.with_row(row));
            }
        }

        for comment in &self.comments {
            let row = comment.row();
            sheet.set(layout::COMMENT_TEXT.with_row(row), comment.text.as_str());
            sheet.set(layout::COMMENT_AUTHOR.with_row(row), comment.author.as_str());
            sheet.set(layout::COMMENT_DATE.with_row(row), date_to_string(comment.date));
        }
    }

    /// Remove both in-progress files. Missing files are fine.
    pub fn delete(&self) -> Result<()> {
        remove_if_exists(&self.spreadsheet_path())?;
        remove_if_exists(&self.snapshot_path())?;
        Ok(())
    }

    /// Save this record as a reusable template and return where it went.
    ///
    /// A `name` ending in `.twois` that names an existing file, or a file in
    /// an existing directory, is written as-is. Anything else becomes
    /// `templates/{name}-{n}.twois` with the first unused `n`; once every
    /// `n` up to 999 is taken this fails rather than overwrite one.
    pub fn save_as_template(&self, name: &str) -> Result<PathBuf> {
        let mut stem = name;
        if let Some(bare) = name.strip_suffix(".twois") {
            let path = Path::new(name);
            let parent_exists = path
                .parent()
                .is_some_and(|p| !p.as_os_str().is_empty() && p.is_dir());
            if path.is_file() || parent_exists {
                write_snapshot(self, path)?;
                info!(path = %path.display(), "saved work order template");
                return Ok(path.to_path_buf());
            }
            stem = Path::new(bare)
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or(bare);
        }
        if stem.is_empty() {
            return Err(Error::Other("template name is empty".to_string()));
        }

        let dir = self.config.template_dir();
        let path = (1..=MAX_TEMPLATE_SUFFIX)
            .map(|n| dir.join(format!("{}-{}.{}", stem, n, SNAPSHOT_EXTENSION)))
            .find(|p| !p.exists())
            .ok_or_else(|| {
                Error::Other(format!("no free template name for '{}' in {}", stem, dir.display()))
            })?;

        write_snapshot(self, &path)?;
        info!(path = %path.display(), "saved work order template");
        Ok(path)
    }
}

fn read_snapshot(path: &Path) -> Result<WorkOrder> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn write_snapshot(wo: &WorkOrder, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(wo)?;
    fs::write(path, bytes)?;
    debug!(path = %path.display(), "wrote snapshot");
    Ok(())
}
