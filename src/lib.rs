//! Twois - Technician Work Order Information Sheet records
//!
//! This library manages the lifecycle of TWOIS work orders: each record is
//! kept both as an `.xlsx` sheet with a fixed cell layout and as a `.twois`
//! JSON snapshot, and moves from *pending* through *approved* to *complete*.
//!
//! # Features
//!
//! - **Tolerant extraction**: every field read from a sheet degrades to a
//!   default instead of failing
//! - **Layered classification**: a candidate file is reported as
//!   [`FileStatus::NotFound`], [`FileStatus::NotSpreadsheet`],
//!   [`FileStatus::NotWorkOrder`], [`FileStatus::Incomplete`] or
//!   [`FileStatus::NotApproved`] before it is accepted
//! - **Content-preserving saves**: edits are written on top of the existing
//!   sheet whenever it still describes the record
//! - **Pending numbers**: placeholder numbers fill gaps left by approved or
//!   deleted records
//!
//! # Example - Creating and approving a work order
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use twois::{Config, FileStatus, WorkOrder, WorkOrderPatch};
//!
//! # fn main() -> twois::Result<()> {
//! let config = Arc::new(Config::load("twois.yaml")?);
//! config.ensure_directories()?;
//!
//! let mut wo = WorkOrder::new(
//!     config.clone(),
//!     WorkOrderPatch {
//!         title: Some("14-Day AV Updates (OPS GMM)".into()),
//!         priority: Some(2),
//!         ..Default::default()
//!     },
//! )?;
//! wo.save()?;
//!
//! // Later, once planning and control return the signed sheet
//! match wo.approve(Path::new("signed.xlsx"), false)? {
//!     FileStatus::Valid => println!("approved as {}", wo.full_wo_number()),
//!     status => println!("not approved: {}", status),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Checking a spreadsheet
//!
//! ```no_run
//! use std::path::Path;
//! use twois::cells::approved_file_status;
//!
//! let status = approved_file_status(Path::new("123456VBS - AV Updates.xlsx"));
//! println!("{}", status);
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.

/// Cell layout, validation, tolerant extraction and file classification
pub mod cells;

/// Shared error type and small utilities
pub mod common;

/// Runtime configuration loaded from YAML
pub mod config;

/// Record value types: codes, tasks, comments, people, statuses
pub mod model;

/// Placeholder number allocation
pub mod numbering;

/// Format-independent cell abstraction
pub mod sheet;

/// The work order record and its lifecycle
pub mod workorder;

/// `.xlsx` package reading and writing
pub mod xlsx;

// Re-export commonly used types for convenience
pub use cells::Parsed;
pub use common::{Error, Result};
pub use config::Config;
pub use model::{
    CompletionData, FileStatus, Group, LogComment, Person, Site, Special, TaskCompletion, TaskItem,
    WorkOrderType,
};
pub use workorder::{WorkOrder, WorkOrderPatch};
