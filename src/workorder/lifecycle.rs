//! State transitions: edit, approve, complete, and comment logging.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::cells::classify::{approved_file_status, input_file_status};
use crate::cells::validate::is_valid_wo_number;
use crate::cells::{extract, layout};
use crate::common::fs::{create_dated_directories, remove_if_exists, safe_rename};
use crate::common::{Error, Result};
use crate::model::comment::{FIRST_COMMENT_ROW, MAX_COMMENTS};
use crate::model::{CompletionData, FileStatus, LogComment};
use crate::xlsx::Workbook;

use super::{WorkOrder, WorkOrderPatch};

impl WorkOrder {
    /// Check if the record carries an assigned number.
    ///
    /// With `check_file`, the record's own spreadsheet must also pass every
    /// approval check.
    pub fn is_approved(&self, check_file: bool) -> bool {
        let number = format!("{}{}{}", self.wo_number, self.site, self.special);
        if !is_valid_wo_number(&number) {
            return false;
        }
        !check_file || approved_file_status(&self.spreadsheet_path()) == FileStatus::Valid
    }

    /// Check if the spreadsheet at `path` describes this record.
    ///
    /// Approved records compare full numbers. Pending ones compare due date,
    /// title and every task summary by position. Unless `preapproved`, the
    /// file must first be a complete work order sheet (approved or not).
    pub fn matches_file(&self, path: &Path, preapproved: bool) -> bool {
        let status = if preapproved {
            FileStatus::Valid
        } else {
            approved_file_status(path)
        };
        if !matches!(status, FileStatus::Valid | FileStatus::NotApproved) {
            return false;
        }

        let book = match Workbook::open(path) {
            Ok(book) => book,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "can't open spreadsheet to compare");
                return false;
            },
        };

        if status == FileStatus::Valid && self.is_approved(true) {
            return extract::full_wo_number(&book).is_some_and(|n| n == self.full_wo_number());
        }

        let other_tasks = extract::tasks(&book);
        let tasks_match = self
            .tasks
            .iter()
            .enumerate()
            .all(|(i, task)| other_tasks.get(i).is_some_and(|other| other.summary == task.summary));

        self.due_date == extract::date(&book, layout::DUE_DATE).value
            && self.title == extract::title(&book).value
            && tasks_match
    }

    /// Apply `patch`, rename both files to match, and save.
    ///
    /// A file already at the new name is never overwritten by the rename. If
    /// the old spreadsheet described this record before the edit, the new
    /// one is written on top of it.
    pub fn edit(&mut self, patch: WorkOrderPatch) -> Result<()> {
        let old_spreadsheet = self.spreadsheet_path();
        let old_snapshot = self.snapshot_path();
        let was_matching = self.matching_base(&old_spreadsheet).is_some();

        patch.apply(self);

        let spreadsheet = self.spreadsheet_path();
        let moved = safe_rename(&old_spreadsheet, &spreadsheet)? || old_spreadsheet == spreadsheet;
        safe_rename(&old_snapshot, &self.snapshot_path())?;

        if was_matching && moved {
            self.save_with_base(Some(&spreadsheet))
        } else {
            self.save()
        }
    }

    /// Replace this pending record with the approved sheet at `candidate`.
    ///
    /// Unless `force`, the candidate must pass every approval check and
    /// describe this record. With `force`, it only needs to be a work order
    /// sheet with a valid number in A7. On success the pending files are
    /// removed and the approved record (keeping this record's description)
    /// is saved in their place.
    pub fn approve(&mut self, candidate: &Path, force: bool) -> Result<FileStatus> {
        if self.is_approved(false) {
            return Ok(FileStatus::AlreadyApproved);
        }

        if force {
            let status = input_file_status(candidate);
            if !status.is_valid() {
                return Ok(status);
            }
        } else {
            let status = approved_file_status(candidate);
            if !status.is_valid() {
                return Ok(status);
            }
            if !self.matches_file(candidate, true) {
                return Ok(FileStatus::FilesUnmatched);
            }
        }

        let mut approved = Self::from_spreadsheet(self.config.clone(), candidate, Some(self.description.as_str()))?;
        if !approved.is_approved(false) {
            // Only reachable when forced: the sheet carries no usable number
            debug!(candidate = %candidate.display(), "candidate has no work order number");
            return Ok(FileStatus::NotApproved);
        }
        // Save first: the candidate may be this record's own spreadsheet
        approved.save_with_base(Some(candidate))?;
        self.delete()?;
        info!(
            pending = %self.wo_number,
            number = %approved.full_wo_number(),
            forced = force,
            "approved work order"
        );
        *self = approved;
        Ok(FileStatus::Valid)
    }

    /// Close out the record.
    ///
    /// Returns `Ok(false)` without touching anything unless the record is
    /// approved and every task is complete. Otherwise the spreadsheet goes to
    /// `complete/<year>/Week of MM-DD/` for the week of the end date,
    /// alongside a `{full}_description.txt`, and the in-progress files are
    /// removed. If either output can't be written, nothing is left behind
    /// and the record is unchanged.
    pub fn complete(&mut self, data: CompletionData) -> Result<bool> {
        if !self.is_approved(true) || !self.all_tasks_complete() {
            return Ok(false);
        }

        let dir = create_dated_directories(&self.config.complete_dir(), data.end_date)?;
        let description = dir.join(format!("{}_description.txt", self.full_wo_number()));
        let sheet = dir.join(self.spreadsheet_file_name());
        let base = self.matching_base(&self.spreadsheet_path());

        // Claim the description name first so a clash fails before any write
        let mut file = OpenOptions::new().write(true).create_new(true).open(&description)?;
        let previous = self.completion.replace(data);
        let written = file
            .write_all(self.description.as_bytes())
            .map_err(Error::from)
            .and_then(|()| self.write_spreadsheet(base.as_deref(), &sheet));
        drop(file);

        if let Err(e) = written {
            self.completion = previous;
            if let Err(cleanup) = remove_if_exists(&description).and_then(|_| remove_if_exists(&sheet)) {
                warn!(dir = %dir.display(), error = %cleanup, "couldn't clean up failed completion");
            }
            return Err(e);
        }

        self.delete()?;
        info!(number = %self.full_wo_number(), dir = %dir.display(), "completed work order");
        Ok(true)
    }

    /// Append comments and save if anything was added.
    ///
    /// A comment is refused once the list holds twenty-four, or when its row
    /// is already taken by an existing comment; refusing one does not undo
    /// the ones before it. Returns `Ok(true)` only if every comment was
    /// added.
    pub fn log_comment(&mut self, comments: Vec<LogComment>) -> Result<bool> {
        let mut all_added = true;
        let mut changed = false;

        for mut comment in comments {
            if self.comments.len() >= MAX_COMMENTS {
                all_added = false;
                break;
            }
            if self.comments.iter().any(|c| c.row() == comment.row()) {
                all_added = false;
                continue;
            }
            comment.set_row(FIRST_COMMENT_ROW + self.comments.len() as u32);
            self.comments.push(comment);
            changed = true;
        }

        if changed {
            self.save()?;
        }
        Ok(all_added)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::common::dates::today;
    use crate::config::Config;
    use crate::model::{TaskCompletion, TaskItem};
    use crate::sheet::{CellSink, CellSource};
    use crate::workorder::tests::setup;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    fn three_tasks(config: &Arc<Config>) -> WorkOrder {
        WorkOrder::new(
            config.clone(),
            WorkOrderPatch {
                title: Some("14-Day AV Updates (OPS GMM)".into()),
                description: Some("Monthly antivirus maintenance".into()),
                tasks: Some(vec![
                    TaskItem::safety_message(),
                    TaskItem::new(10, "Update definitions", "SOP-12", 16),
                    TaskItem::new(20, "Run full scan", "SOP-13", 17),
                ]),
                ..Default::default()
            },
        )
        .unwrap()
    }

    /// Copy the record's sheet to `dest`, numbered and marked approved.
    fn approved_copy(wo: &WorkOrder, dest: &Path) {
        let mut book = Workbook::open(wo.spreadsheet_path()).unwrap();
        book.set(layout::NUMBER, "123456");
        for cell in layout::APPROVAL_MARKS {
            book.set(cell, "RS");
        }
        book.save(dest).unwrap();
    }

    fn approved_record(config: &Arc<Config>, scratch: &Path) -> WorkOrder {
        let mut wo = three_tasks(config);
        wo.save().unwrap();
        let candidate = scratch.join("signed.xlsx");
        approved_copy(&wo, &candidate);
        assert_eq!(wo.approve(&candidate, false).unwrap(), FileStatus::Valid);
        wo
    }

    fn finished(qty_techs: u32) -> TaskCompletion {
        TaskCompletion {
            date: day(6),
            technician: "Brian Cobb".into(),
            qty_techs,
            hours: 1.0,
        }
    }

    fn file_count(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_pending_is_not_approved() {
        let (_dir, config) = setup();
        let mut wo = three_tasks(&config);
        wo.save().unwrap();
        assert!(!wo.is_approved(false));
        assert!(!wo.is_approved(true));
        assert!(wo.matches_file(&wo.spreadsheet_path(), false));
    }

    #[test]
    fn test_edit_renames_both_files() {
        let (_dir, config) = setup();
        let mut wo = three_tasks(&config);
        wo.save().unwrap();

        let note = crate::sheet::CellRef::from_a1("L50");
        let mut book = Workbook::open(wo.spreadsheet_path()).unwrap();
        book.set(note, "keep me");
        book.save(wo.spreadsheet_path()).unwrap();

        wo.edit(WorkOrderPatch {
            title: Some("AV Updates: Part 2".into()),
            ..Default::default()
        })
        .unwrap();

        let mut names: Vec<String> = fs::read_dir(config.in_progress_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["Pending-001 - AV Updates Part 2.xlsx", "Pending-001.twois"]);

        let book = Workbook::open(wo.spreadsheet_path()).unwrap();
        assert_eq!(book.text(note), "keep me");
        assert_eq!(book.text(layout::TITLE), "AV Updates Part 2");
    }

    #[test]
    fn test_edit_invalid_values_keep_current() {
        let (_dir, config) = setup();
        let mut wo = three_tasks(&config);
        wo.save().unwrap();
        wo.edit(WorkOrderPatch {
            building: Some(3),
            room: Some(12),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(wo.building(), 1768);
        assert_eq!(wo.room(), 12);
        assert_eq!(file_count(&config.in_progress_dir()), 2);
    }

    #[test]
    fn test_approve() {
        let (dir, config) = setup();
        let wo = approved_record(&config, dir.path());

        assert_eq!(wo.full_wo_number(), "123456VBS");
        assert_eq!(wo.description(), "Monthly antivirus maintenance");
        assert!(wo.is_approved(true));

        let mut names: Vec<String> = fs::read_dir(config.in_progress_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["123456VBS - 14-Day AV Updates (OPS GMM).xlsx", "123456VBS.twois"]);
    }

    #[test]
    fn test_approve_own_spreadsheet() {
        let (_dir, config) = setup();
        let mut wo = three_tasks(&config);
        wo.save().unwrap();
        let own = wo.spreadsheet_path();
        approved_copy(&wo, &own);

        assert_eq!(wo.approve(&own, false).unwrap(), FileStatus::Valid);
        assert!(!own.exists());
        assert!(wo.spreadsheet_path().is_file());
        assert_eq!(file_count(&config.in_progress_dir()), 2);
    }

    #[test]
    fn test_approve_rejections() {
        let (dir, config) = setup();
        let mut wo = three_tasks(&config);
        wo.save().unwrap();

        assert_eq!(wo.approve(&dir.path().join("missing.xlsx"), false).unwrap(), FileStatus::NotFound);

        // Complete but unsigned
        assert_eq!(wo.approve(&wo.spreadsheet_path(), false).unwrap(), FileStatus::NotApproved);

        // Signed, but for a different job
        let candidate = dir.path().join("other.xlsx");
        approved_copy(&wo, &candidate);
        let mut book = Workbook::open(&candidate).unwrap();
        book.set(layout::TITLE, "Something else");
        book.save(&candidate).unwrap();
        assert_eq!(wo.approve(&candidate, false).unwrap(), FileStatus::FilesUnmatched);
        assert!(wo.is_pending());
        assert_eq!(file_count(&config.in_progress_dir()), 2);

        // Forcing takes it anyway
        assert_eq!(wo.approve(&candidate, true).unwrap(), FileStatus::Valid);
        assert_eq!(wo.title(), "Something else");
        assert_eq!(wo.approve(&candidate, true).unwrap(), FileStatus::AlreadyApproved);
    }

    #[test]
    fn test_forced_approve_needs_number() {
        let (dir, config) = setup();
        let mut wo = three_tasks(&config);
        wo.save().unwrap();

        // Signed and retitled, but A7 left blank
        let candidate = dir.path().join("unnumbered.xlsx");
        let mut book = Workbook::open(wo.spreadsheet_path()).unwrap();
        for cell in layout::APPROVAL_MARKS {
            book.set(cell, "RS");
        }
        book.set(layout::TITLE, "Other");
        book.save(&candidate).unwrap();

        assert_eq!(wo.approve(&candidate, true).unwrap(), FileStatus::NotApproved);
        assert_eq!(wo.wo_number(), "Pending-001");
        assert_eq!(wo.title(), "14-Day AV Updates (OPS GMM)");
        let mut names: Vec<String> = fs::read_dir(config.in_progress_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["Pending-001 - 14-Day AV Updates (OPS GMM).xlsx", "Pending-001.twois"]);
    }

    #[test]
    fn test_complete_requires_every_task() {
        let (dir, config) = setup();
        let mut wo = approved_record(&config, dir.path());
        assert!(wo.complete_task(0, finished(1)));
        assert!(wo.complete_task(1, finished(2)));

        let data = CompletionData::new(day(5), day(8), day(8), "2:30");
        assert!(!wo.complete(data.clone()).unwrap());
        assert!(wo.spreadsheet_path().is_file());
        assert!(wo.snapshot_path().is_file());
        assert!(wo.completion().is_none());
        assert_eq!(file_count(&config.complete_dir()), 0);

        // Zero technicians doesn't count
        assert!(wo.complete_task(2, finished(0)));
        assert!(!wo.complete(data).unwrap());
    }

    #[test]
    fn test_complete_moves_to_dated_directory() {
        let (dir, config) = setup();
        let mut wo = approved_record(&config, dir.path());
        for i in 0..3 {
            assert!(wo.complete_task(i, finished(1)));
        }
        wo.save().unwrap();

        let data = CompletionData::new(day(5), day(8), day(9), "1:2:30");
        assert!(wo.complete(data).unwrap());

        let week = config.complete_dir().join("2024").join("Week of 08-05");
        let sheet = week.join("123456VBS - 14-Day AV Updates (OPS GMM).xlsx");
        let description = week.join("123456VBS_description.txt");
        assert!(sheet.is_file());
        assert_eq!(fs::read_to_string(description).unwrap(), "Monthly antivirus maintenance");
        assert_eq!(file_count(&config.in_progress_dir()), 0);

        let book = Workbook::open(&sheet).unwrap();
        assert_eq!(book.text(layout::COMPLETION_END), "8/8/2024");
        assert_eq!(book.text(layout::COMPLETION_REPAIR_TIME), "1d, 2h, 30m");
        assert_eq!(book.text(layout::ACTUAL_TECHNICIAN.with_row(34)), "Brian Cobb");
        // Approval marks came through from the signed sheet
        assert_eq!(book.text(layout::APPROVAL_MARKS[0]), "RS");
    }

    #[test]
    fn test_complete_description_clash_leaves_no_trace() {
        let (dir, config) = setup();
        let mut wo = approved_record(&config, dir.path());
        for i in 0..3 {
            assert!(wo.complete_task(i, finished(1)));
        }
        wo.save().unwrap();

        let week = config.complete_dir().join("2024").join("Week of 08-05");
        fs::create_dir_all(&week).unwrap();
        let description = week.join("123456VBS_description.txt");
        fs::write(&description, "from an earlier run").unwrap();

        let data = CompletionData::new(day(5), day(8), day(9), "2:30");
        assert!(wo.complete(data.clone()).is_err());
        assert!(wo.completion().is_none());
        assert_eq!(fs::read_to_string(&description).unwrap(), "from an earlier run");
        assert_eq!(file_count(&week), 1);
        assert_eq!(file_count(&config.in_progress_dir()), 2);

        fs::remove_file(&description).unwrap();
        assert!(wo.complete(data).unwrap());
        assert_eq!(file_count(&week), 2);
        assert_eq!(file_count(&config.in_progress_dir()), 0);
    }

    #[test]
    fn test_comment_capacity() {
        let (_dir, config) = setup();
        let mut wo = three_tasks(&config);
        let full: Vec<LogComment> = (0..24).map(|i| LogComment::new(format!("note {}", i), "BC", today(), i)).collect();
        assert!(wo.log_comment(full).unwrap());
        assert_eq!(wo.comments().len(), 24);

        let extra = LogComment::new("one too many", "BC", today(), 24);
        assert!(!wo.log_comment(vec![extra]).unwrap());
        assert_eq!(wo.comments().len(), 24);
        for (i, comment) in wo.comments().iter().enumerate() {
            assert_eq!(comment.text, format!("note {}", i));
            assert_eq!(comment.row(), 86 + i as u32);
        }
    }

    #[test]
    fn test_comment_row_placement() {
        let (_dir, config) = setup();
        let mut wo = three_tasks(&config);
        let existing: Vec<LogComment> = (0..3).map(|i| LogComment::new(format!("c{}", i), "BC", today(), i)).collect();
        assert!(wo.log_comment(existing).unwrap());

        // Asked for row 92, lands on the next free row
        assert!(wo.log_comment(vec![LogComment::new("new", "BC", today(), 6)]).unwrap());
        assert_eq!(wo.comments()[3].row(), 89);
    }

    #[test]
    fn test_comment_row_collision() {
        let (_dir, config) = setup();
        let mut wo = three_tasks(&config);
        let existing: Vec<LogComment> = (0..10).map(|i| LogComment::new(format!("c{}", i), "BC", today(), i)).collect();
        assert!(wo.log_comment(existing).unwrap());

        let batch = vec![
            LogComment::new("collides", "BC", today(), 6),
            LogComment::new("fits", "BC", today(), 20),
        ];
        assert!(!wo.log_comment(batch).unwrap());
        assert_eq!(wo.comments().len(), 11);
        assert_eq!(wo.comments()[10].text, "fits");
        assert_eq!(wo.comments()[10].row(), 96);

        let back = WorkOrder::from_spreadsheet(config.clone(), &wo.spreadsheet_path(), None).unwrap();
        assert_eq!(back.comments().len(), 11);
    }
}
