//! Integration tests for worldbook-doc.
//!
//! These tests drive the library and the binary against mock worldbook projects.

pub mod audit_tests;
pub mod cli_tests;
pub mod output_tests;
pub mod package_tests;
