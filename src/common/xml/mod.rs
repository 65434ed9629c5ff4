//! XML text helpers shared by the spreadsheet reader and writer.

mod escape;

pub use escape::{escape_xml, resolve_entity, unescape_xml};
