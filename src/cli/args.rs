//! Command line arguments for worldbook-doc.

use clap::{Parser, Subcommand};

/// Command to execute
#[derive(Debug, Clone, PartialEq, Eq, Default, Subcommand)]
pub enum Command {
    /// Run the merge check against ./worldbook.json (default)
    #[default]
    Check,
    /// Package the authoring tree into dist/optimized-worldbook.zip
    Package,
    /// Deep-audit ./worldbook.json and write reports under ./reports
    Audit {
        /// Report format: json, markdown, or both
        #[arg(long, env = "WORLDBOOK_DOC_FORMAT")]
        format: Option<String>,
    },
    /// List all merge checks
    List,
    /// Print version information
    Version,
}

/// Parsed command line arguments
#[derive(Debug, Clone, Parser)]
#[command(
    name = "worldbook-doc",
    version,
    about = "Worldbook packaging, merge validation, and lore auditing",
    after_help = "EXIT CODES:\n    0   Success\n    1   Validation failed or worldbook could not be loaded\n    3   Runtime error"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Only output failures and warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Include details on every line and enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,
}

impl Args {
    /// The command to run, falling back to the merge check.
    pub fn selected_command(&self) -> Command {
        self.command.clone().unwrap_or_default()
    }
}
