//! Mock worldbook projects for testing.
//!
//! This module provides configurable worldbook documents and scratch project
//! directories that simulate healthy, broken, and partially merged career
//! systems.

pub mod worldbook;

pub use worldbook::*;
