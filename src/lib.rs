//! worldbook-doc library
//!
//! Tooling for a worldbook authoring project that merges two career systems
//! ("academic" and "entertainment") into one lore document.
//!
//! This library provides:
//! - The merge check: a fixed checklist of structural conditions over
//!   `worldbook.json`, aggregated with an 80% pass rule
//! - The deep audit: uid registry, profession chain analysis, reference and
//!   trigger diagnostics, with JSON and Markdown reports
//! - The packager: bundles the authoring tree into a zip archive
//!
//! # Example
//!
//! ```no_run
//! use worldbook_doc::{run_checks, ValidateConfig};
//!
//! let config = ValidateConfig::default();
//! let report = run_checks(&config).expect("worldbook.json could not be loaded");
//! println!("Checks passed: {}", report.summary().passed);
//! ```

pub mod checks;
pub mod cli;
pub mod commands;
pub mod engine;
pub mod model;
pub mod version;

use engine::orchestrator::{create_all_checks, CheckOrchestrator};
use engine::result::ValidationReport;
use model::MergeView;
use std::fmt;
use std::path::{Path, PathBuf};

pub use engine::result::{ResultSummary, ValidationReport as Report};

/// File name the merge check and the audit read from the working directory.
pub const WORLDBOOK_FILE: &str = "worldbook.json";

/// Minimum share of passing line items, in percent, for a successful merge check.
pub const DEFAULT_PASS_THRESHOLD_PCT: u32 = 80;

/// Check result indicating the outcome of a validation check.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckResult {
    /// Check passed
    Pass {
        message: String,
        duration_ms: u64,
    },
    /// Advisory outcome; recorded, but not counted as a pass
    Warn {
        message: String,
        details: String,
        duration_ms: u64,
    },
    /// Check failed
    Fail {
        message: String,
        details: String,
        duration_ms: u64,
    },
    /// Check did not apply to this document and records no line item
    Skip {
        reason: String,
    },
}

impl CheckResult {
    pub fn pass(message: impl Into<String>) -> Self {
        CheckResult::Pass {
            message: message.into(),
            duration_ms: 0,
        }
    }

    pub fn warn(message: impl Into<String>, details: impl Into<String>) -> Self {
        CheckResult::Warn {
            message: message.into(),
            details: details.into(),
            duration_ms: 0,
        }
    }

    pub fn fail(message: impl Into<String>, details: impl Into<String>) -> Self {
        CheckResult::Fail {
            message: message.into(),
            details: details.into(),
            duration_ms: 0,
        }
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        CheckResult::Skip {
            reason: reason.into(),
        }
    }

    /// Stamp the measured execution time onto the result.
    pub fn with_duration(self, elapsed_ms: u64) -> Self {
        match self {
            CheckResult::Pass { message, .. } => CheckResult::Pass {
                message,
                duration_ms: elapsed_ms,
            },
            CheckResult::Warn { message, details, .. } => CheckResult::Warn {
                message,
                details,
                duration_ms: elapsed_ms,
            },
            CheckResult::Fail { message, details, .. } => CheckResult::Fail {
                message,
                details,
                duration_ms: elapsed_ms,
            },
            skip @ CheckResult::Skip { .. } => skip,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, CheckResult::Pass { .. })
    }

    /// Whether this outcome counts as a line item in the pass ratio.
    pub fn is_recorded(&self) -> bool {
        !matches!(self, CheckResult::Skip { .. })
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckResult::Pass { message, .. } => write!(f, "PASS: {}", message),
            CheckResult::Warn { message, details, .. } => {
                write!(f, "WARN: {} ({})", message, details)
            }
            CheckResult::Fail { message, details, .. } => {
                write!(f, "FAIL: {} ({})", message, details)
            }
            CheckResult::Skip { reason } => write!(f, "SKIP: {}", reason),
        }
    }
}

/// Merge criterion a check belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CheckCategory {
    /// Criterion 1: both systems present with no naming/uid conflicts
    Naming,
    /// Criterion 2: shared resources reference both systems
    SharedResources,
    /// Criterion 3: status-bar metadata present and ready
    StatusBar,
    /// Criterion 4: no contradictory lore, bridging content present
    Lore,
}

impl CheckCategory {
    /// All categories in reporting order.
    pub const ALL: [CheckCategory; 4] = [
        CheckCategory::Naming,
        CheckCategory::SharedResources,
        CheckCategory::StatusBar,
        CheckCategory::Lore,
    ];

    pub fn criterion(&self) -> u8 {
        match self {
            CheckCategory::Naming => 1,
            CheckCategory::SharedResources => 2,
            CheckCategory::StatusBar => 3,
            CheckCategory::Lore => 4,
        }
    }

    /// Headline describing what the criterion asserts.
    pub fn heading(&self) -> &'static str {
        match self {
            CheckCategory::Naming => "Both career systems with no naming/UID conflicts",
            CheckCategory::SharedResources => "Shared resources reference both systems",
            CheckCategory::StatusBar => "StatusBar metadata present and ready",
            CheckCategory::Lore => "No contradictory lore",
        }
    }
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckCategory::Naming => write!(f, "Naming"),
            CheckCategory::SharedResources => write!(f, "Shared Resources"),
            CheckCategory::StatusBar => write!(f, "StatusBar"),
            CheckCategory::Lore => write!(f, "Lore"),
        }
    }
}

/// A validation check with its result.
#[derive(Debug, Clone)]
pub struct Check {
    /// Unique identifier (e.g., "NAM-001")
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Criterion this check belongs to
    pub category: CheckCategory,
    /// Description of what this check validates
    pub description: String,
    /// Result of the check (None if not yet executed)
    pub result: Option<CheckResult>,
}

/// Error types for worldbook-doc operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldbookError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing required key: {path}")]
    MissingKey { path: String },

    #[error("expected an object at {path}")]
    NotAnObject { path: String },

    #[error("archive error in {context}: {source}")]
    Archive {
        context: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("I/O error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render report: {source}")]
    Report {
        #[source]
        source: serde_json::Error,
    },
}

impl WorldbookError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        WorldbookError::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the error came from loading the worldbook document.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            WorldbookError::Read { .. }
                | WorldbookError::Parse { .. }
                | WorldbookError::MissingKey { .. }
                | WorldbookError::NotAnObject { .. }
        )
    }
}

/// Configuration for the merge check.
#[derive(Debug, Clone)]
pub struct ValidateConfig {
    /// Document to validate
    pub path: PathBuf,
    /// Minimum passing share of recorded line items, in percent
    pub pass_threshold_pct: u32,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        ValidateConfig {
            path: PathBuf::from(WORLDBOOK_FILE),
            pass_threshold_pct: DEFAULT_PASS_THRESHOLD_PCT,
        }
    }
}

impl ValidateConfig {
    /// Configuration for the `worldbook.json` inside `root`.
    pub fn in_dir(root: &Path) -> Self {
        ValidateConfig {
            path: root.join(WORLDBOOK_FILE),
            ..Default::default()
        }
    }
}

/// Run the merge check.
///
/// Loads the document named by `config`, verifies the keys every check
/// indexes directly, and evaluates all registered checks.
///
/// # Errors
///
/// Returns a `WorldbookError` when the document cannot be read or is not
/// valid JSON, or when a key the checks index directly is missing. No partial report is produced in that case.
///
/// # Example
///
/// ```no_run
/// use worldbook_doc::{run_checks, ValidateConfig};
///
/// match run_checks(&ValidateConfig::default()) {
///     Ok(report) => {
///         let summary = report.summary();
///         println!("Passed: {}/{}", summary.passed, summary.recorded());
///     }
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_checks(config: &ValidateConfig) -> Result<ValidationReport, WorldbookError> {
    let document = model::read_json(&config.path)?;
    let view = MergeView::from_value(&document)?;

    let mut orchestrator = CheckOrchestrator::new();
    orchestrator.register_checks(create_all_checks());

    let mut report = orchestrator.run_all(&view);
    report.source = config.path.clone();
    report.pass_threshold_pct = config.pass_threshold_pct;
    Ok(report)
}
