//! Field overrides shared by construction and editing.

use chrono::NaiveDate;
use tracing::warn;

use crate::cells::validate::{
    NCR_REQUIRED_MARKER, NOT_APPLICABLE, is_valid_ncr_number, is_valid_priority, is_valid_wo_number,
    sanitize_title, truncate_description,
};
use crate::common::text::{make_filepath_friendly, truncate_chars};
use crate::config::{BUILDING_RANGE, ROOM_RANGE};
use crate::model::comment::{FIRST_COMMENT_ROW, MAX_COMMENTS};
use crate::model::task::{FIRST_TASK_ROW, MAX_TASKS};
use crate::model::{LogComment, Site, Special, TaskItem, WorkOrderType};

use super::WorkOrder;

/// A partial set of work order fields.
///
/// `None` leaves a field alone. Values that fail validation are dropped
/// silently: an out-of-range building keeps the current building, a
/// malformed related order number keeps the current one, and so on. Numbers
/// are taken as `i64` so out-of-range input can be expressed at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkOrderPatch {
    /// Free text; truncated and stripped of filepath-hostile characters
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    /// Accepted only if valid; only the six digits are kept
    pub wo_number: Option<String>,
    pub site: Option<Site>,
    pub special: Option<Special>,
    /// Truncated and stripped of filepath-hostile characters
    pub title: Option<String>,
    pub wo_type: Option<WorkOrderType>,
    /// Accepted only in `1..=3`
    pub priority: Option<i64>,
    pub creator: Option<String>,
    /// Accepted only in `10..=99999`
    pub building: Option<i64>,
    /// Accepted only in `1..=999`
    pub room: Option<i64>,
    /// Accepted only if it is a valid work order number
    pub related_wo: Option<String>,
    pub pac_required: Option<bool>,
    /// Also resets the NCR number to `"REQUIRED"` or `"N/A"`
    pub ncr_required: Option<bool>,
    /// Accepted only when an NCR is required and the number is valid
    pub ncr_number: Option<String>,
    pub task_lead_required: Option<bool>,
    pub tech_witness_point: Option<bool>,
    pub peer_review_required: Option<bool>,
    pub peer_review_attached: Option<bool>,
    pub ehs_required: Option<bool>,
    pub qamip: Option<bool>,
    pub qa_review_required: Option<bool>,
    /// At most fifteen are kept
    pub tasks: Option<Vec<TaskItem>>,
    /// At most twenty-four are kept
    pub comments: Option<Vec<LogComment>>,
}

fn in_range(value: i64, range: &std::ops::RangeInclusive<u32>) -> Option<u32> {
    u32::try_from(value).ok().filter(|v| range.contains(v))
}

impl WorkOrderPatch {
    /// Apply every valid override to `wo`.
    pub(super) fn apply(self, wo: &mut WorkOrder) {
        if let Some(description) = self.description
            && !description.trim().is_empty()
        {
            wo.description = make_filepath_friendly(&truncate_description(&description));
        }
        if let Some(due_date) = self.due_date {
            wo.due_date = due_date;
        }
        if let Some(site) = self.site {
            wo.site = site;
        }
        if let Some(special) = self.special {
            wo.special = special;
        }
        if let Some(number) = self.wo_number
            && is_valid_wo_number(&number)
        {
            wo.wo_number = truncate_chars(number.trim(), 6).to_string();
        }
        if let Some(title) = self.title {
            wo.title = sanitize_title(&title);
        }
        if let Some(wo_type) = self.wo_type {
            wo.wo_type = wo_type;
        }
        if let Some(priority) = self.priority
            && is_valid_priority(priority)
        {
            wo.priority = priority as u8;
        }
        if let Some(creator) = self.creator {
            wo.creator = creator;
        }
        if let Some(building) = self.building.and_then(|b| in_range(b, &BUILDING_RANGE)) {
            wo.building = building;
        }
        if let Some(room) = self.room.and_then(|r| in_range(r, &ROOM_RANGE)) {
            wo.room = room;
        }
        if let Some(related) = self.related_wo
            && is_valid_wo_number(&related)
        {
            wo.related_wo = related.trim().to_string();
        }
        if let Some(pac) = self.pac_required {
            wo.pac_required = pac;
        }
        if let Some(required) = self.ncr_required {
            wo.ncr_required = required;
            wo.ncr_number = if required { NCR_REQUIRED_MARKER } else { NOT_APPLICABLE }.to_string();
        }
        if let Some(ncr) = self.ncr_number
            && wo.ncr_required
            && is_valid_ncr_number(&ncr)
        {
            wo.ncr_number = ncr.trim().to_string();
        }

        let flags = [
            (self.task_lead_required, &mut wo.task_lead_required),
            (self.tech_witness_point, &mut wo.tech_witness_point),
            (self.peer_review_required, &mut wo.peer_review_required),
            (self.peer_review_attached, &mut wo.peer_review_attached),
            (self.ehs_required, &mut wo.ehs_required),
            (self.qamip, &mut wo.qamip),
            (self.qa_review_required, &mut wo.qa_review_required),
        ];
        for (value, field) in flags {
            if let Some(value) = value {
                *field = value;
            }
        }

        if let Some(mut tasks) = self.tasks {
            if tasks.len() > MAX_TASKS {
                warn!(count = tasks.len(), kept = MAX_TASKS, "dropping tasks that don't fit the sheet");
                tasks.truncate(MAX_TASKS);
            }
            for (i, task) in tasks.iter_mut().enumerate() {
                task.set_planned_row(FIRST_TASK_ROW + i as u32);
            }
            wo.tasks = tasks;
        }
        if let Some(mut comments) = self.comments {
            if comments.len() > MAX_COMMENTS {
                warn!(count = comments.len(), kept = MAX_COMMENTS, "dropping comments that don't fit the sheet");
                comments.truncate(MAX_COMMENTS);
            }
            for (i, comment) in comments.iter_mut().enumerate() {
                comment.set_row(FIRST_COMMENT_ROW + i as u32);
            }
            wo.comments = comments;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cells::validate::{DEFAULT_DESCRIPTION, MAX_DESCRIPTION, MAX_TITLE};
    use crate::common::dates::today;
    use crate::config::Config;
    use proptest::prelude::*;

    fn record(patch: WorkOrderPatch) -> WorkOrder {
        // Nothing is written, so a data directory that doesn't exist is fine
        let config = Arc::new(Config::default().with_data_dir("/nonexistent/twois-data"));
        WorkOrder::new(config, patch).unwrap()
    }

    #[test]
    fn test_invalid_values_are_dropped() {
        let wo = record(WorkOrderPatch {
            wo_number: Some("1234567891".into()),
            priority: Some(7),
            building: Some(5),
            room: Some(0),
            related_wo: Some("see notes".into()),
            ncr_number: Some("NCR123456W".into()),
            ..Default::default()
        });
        assert_eq!(wo.wo_number(), "Pending-001");
        assert_eq!(wo.priority(), 3);
        assert_eq!(wo.building(), 1768);
        assert_eq!(wo.room(), 6);
        assert_eq!(wo.related_wo(), "N/A");
        // Not required, so the number is ignored
        assert_eq!(wo.ncr_number(), "N/A");
    }

    #[test]
    fn test_valid_values_are_taken() {
        let wo = record(WorkOrderPatch {
            wo_number: Some("123456VBS".into()),
            priority: Some(1),
            building: Some(220),
            room: Some(14),
            related_wo: Some("654321".into()),
            ncr_required: Some(true),
            ncr_number: Some("NCR123456W".into()),
            qamip: Some(true),
            ehs_required: Some(true),
            ..Default::default()
        });
        assert_eq!(wo.wo_number(), "123456");
        assert_eq!(wo.priority(), 1);
        assert_eq!(wo.building(), 220);
        assert_eq!(wo.room(), 14);
        assert_eq!(wo.related_wo(), "654321");
        assert_eq!(wo.ncr_number(), "NCR123456W");
        assert!(wo.qamip());
        assert!(wo.ehs_required());
        assert!(!wo.task_lead_required());
    }

    #[test]
    fn test_ncr_required_sentinel() {
        let mut wo = record(WorkOrderPatch {
            ncr_required: Some(true),
            ncr_number: Some("later".into()),
            ..Default::default()
        });
        assert_eq!(wo.ncr_number(), "REQUIRED");

        WorkOrderPatch {
            ncr_required: Some(false),
            ..Default::default()
        }
        .apply(&mut wo);
        assert_eq!(wo.ncr_number(), "N/A");
    }

    #[test]
    fn test_title_and_description() {
        let wo = record(WorkOrderPatch {
            title: Some(format!("{}: more", "t".repeat(70))),
            description: Some("d".repeat(400)),
            ..Default::default()
        });
        assert_eq!(wo.title(), "t".repeat(MAX_TITLE));
        assert_eq!(wo.description().chars().count(), MAX_DESCRIPTION);

        let blank = record(WorkOrderPatch {
            description: Some("   ".into()),
            ..Default::default()
        });
        assert_eq!(blank.description(), DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_lists_are_capped_and_renumbered() {
        let tasks: Vec<TaskItem> = (0..20).map(|i| TaskItem::new(i * 10, format!("task {}", i), "SOP", 29)).collect();
        let comments: Vec<LogComment> = (0..30).map(|i| LogComment::new(format!("c{}", i), "BC", today(), 0)).collect();
        let wo = record(WorkOrderPatch {
            tasks: Some(tasks),
            comments: Some(comments),
            ..Default::default()
        });

        assert_eq!(wo.tasks().len(), 15);
        assert_eq!(wo.tasks()[3].planned_row(), 18);
        assert_eq!(wo.comments().len(), 24);
        assert_eq!(wo.comments()[23].row(), 109);
        assert_eq!(wo.comments()[23].text, "c23");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_building_in_bounds_or_default(b in -1000i64..200_000) {
            let wo = record(WorkOrderPatch { building: Some(b), ..Default::default() });
            let expected = if (10..=99999).contains(&b) { b as u32 } else { 1768 };
            prop_assert_eq!(wo.building(), expected);
        }

        #[test]
        fn prop_room_in_bounds_or_default(r in -100i64..5000) {
            let wo = record(WorkOrderPatch { room: Some(r), ..Default::default() });
            let expected = if (1..=999).contains(&r) { r as u32 } else { 6 };
            prop_assert_eq!(wo.room(), expected);
        }

        #[test]
        fn prop_priority_in_bounds_or_default(p in -10i64..10) {
            let wo = record(WorkOrderPatch { priority: Some(p), ..Default::default() });
            let expected = if (1..=3).contains(&p) { p as u8 } else { 3 };
            prop_assert_eq!(wo.priority(), expected);
        }
    }
}
