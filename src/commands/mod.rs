//! Command handlers for worldbook-doc
//!
//! The merge check itself lives in the crate root; this module holds the
//! other commands:
//! - `package`: bundle the authoring tree into a zip archive
//! - `audit`: deep-lint the worldbook and write reports
//! - `report`: JSON and Markdown rendering for audit results

pub mod audit;
pub mod package;
pub mod report;
