//! Value types that make up a work order record.

pub mod codes;
pub mod comment;
pub mod completion;
pub mod person;
pub mod status;
pub mod task;

pub use codes::{Site, Special, WorkOrderType};
pub use comment::LogComment;
pub use completion::CompletionData;
pub use person::{Group, Person, people_in_group, technicians};
pub use status::FileStatus;
pub use task::{TaskCompletion, TaskItem};
