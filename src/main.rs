//! worldbook-doc CLI entry point
//!
//! Packaging, merge validation, and lore auditing for a worldbook project.
//! Every command works on the current directory.

use worldbook_doc::cli::args::{Args, Command};
use worldbook_doc::cli::output::{OutputFormatter, TerminalFormatter};
use worldbook_doc::commands::{audit, package};
use worldbook_doc::engine::orchestrator::create_all_checks;
use worldbook_doc::version::get_build_info;
use worldbook_doc::{run_checks, CheckCategory, ValidateConfig, WORLDBOOK_FILE};

use clap::error::ErrorKind;
use clap::Parser;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(3),
            };
        }
    };

    init_logging(args.verbose);

    match args.selected_command() {
        Command::Check => run_merge_check(&args),
        Command::Package => run_package(&args),
        Command::Audit { format } => run_audit(format),
        Command::List => {
            print_check_list();
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("{}", get_build_info());
            ExitCode::SUCCESS
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("WORLDBOOK_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn print_check_list() {
    let checks = create_all_checks();

    println!("Available checks:");
    for category in CheckCategory::ALL {
        println!();
        println!("CRITERIA {}: {}", category.criterion(), category.heading());
        for check in checks.iter().filter(|c| c.category == category) {
            println!("  {:<9}{}", check.id, check.name);
        }
    }
}

fn run_merge_check(args: &Args) -> ExitCode {
    let report = match run_checks(&ValidateConfig::default()) {
        Ok(report) => report,
        Err(e) => {
            println!("Error reading {}: {}", WORLDBOOK_FILE, e);
            return ExitCode::from(1);
        }
    };

    let color = !args.no_color && io::stdout().is_terminal();
    let formatter = TerminalFormatter::new(color, args.verbose, args.quiet);
    println!("{}", formatter.format(&report));

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn run_package(args: &Args) -> ExitCode {
    let verbose = args.verbose;
    let result = package::create_package(&package::PackageConfig::default(), |event| {
        if let Some(line) = package::format_event(&event, verbose) {
            println!("{}", line);
        }
    });

    match result {
        Ok(summary) => {
            println!("{}", package::format_summary(&summary));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error creating package: {}", e);
            ExitCode::from(3)
        }
    }
}

fn run_audit(format: Option<String>) -> ExitCode {
    let config = audit::AuditConfig {
        format,
        ..Default::default()
    };

    match audit::run(&config) {
        Ok(outcome) => {
            println!("{}", audit::format_text(&outcome));
            if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("Error writing reports: {}", e);
            ExitCode::from(3)
        }
    }
}
