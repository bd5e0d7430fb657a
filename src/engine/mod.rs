//! Validation engine module.
//!
//! Provides check orchestration and result aggregation.

pub mod orchestrator;
pub mod result;
