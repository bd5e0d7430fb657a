//! Package command
//!
//! Bundles the authoring tree into `dist/optimized-worldbook.zip`.
//!
//! # Graceful Degradation
//!
//! - Missing include item: reported as a warning, packaging continues
//! - Unreadable directory entry during the walk: logged and skipped
//!
//! Any failure to create or write the archive itself is an error. Progress
//! is reported through a callback while the archive is built.

use crate::WorldbookError;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Top-level items packaged, relative to the project root.
pub const INCLUDE_ITEMS: [&str; 6] = [
    "lorebook/",
    "docs/",
    "scripts/",
    "reports/",
    "README.md",
    "package.json",
];

/// Files found inside included directories are skipped when their relative
/// path contains any of these.
pub const EXCLUDED_SUBSTRINGS: [&str; 4] = [".git", "dist", "node_modules", ".log"];

/// Archive location, relative to the project root.
pub const OUTPUT_PATH: &str = "dist/optimized-worldbook.zip";

/// Configuration for the package command.
#[derive(Debug, Clone)]
pub struct PackageConfig {
    /// Project root the include items and output path resolve against
    pub root: PathBuf,
    pub include: Vec<String>,
    pub excluded: Vec<String>,
    pub output: PathBuf,
}

impl Default for PackageConfig {
    fn default() -> Self {
        PackageConfig {
            root: PathBuf::from("."),
            include: INCLUDE_ITEMS.iter().map(|s| s.to_string()).collect(),
            excluded: EXCLUDED_SUBSTRINGS.iter().map(|s| s.to_string()).collect(),
            output: PathBuf::from(OUTPUT_PATH),
        }
    }
}

impl PackageConfig {
    /// Default package layout for a project rooted at `root`.
    pub fn in_dir(root: &Path) -> Self {
        PackageConfig {
            root: root.to_path_buf(),
            ..Default::default()
        }
    }

    fn is_excluded(&self, relative: &str) -> bool {
        self.excluded.iter().any(|skip| relative.contains(skip.as_str()))
    }
}

/// What the package command wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageSummary {
    /// Archive path as configured (relative to the root)
    pub archive: PathBuf,
    /// Entry names, in the order they were added
    pub entries: Vec<String>,
    /// Include items that did not exist
    pub missing: Vec<String>,
}

/// Progress reported while the archive is being built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PackageEvent<'a> {
    /// Nothing has been touched yet
    Started,
    /// An include item does not exist and is skipped
    Missing(&'a str),
    /// A file was written to the archive under this entry name
    Added(&'a str),
}

/// Archive entry name for a path relative to the root, `/`-separated.
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Files to add for one include item, as (absolute path, entry name).
fn collect_files(config: &PackageConfig, item_path: &Path) -> Vec<(PathBuf, String)> {
    let mut files = Vec::new();

    for entry in WalkDir::new(item_path).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.path().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(&config.root) else {
            continue;
        };
        let name = entry_name(relative);

        if config.is_excluded(&name) {
            debug!(file = %name, "excluded");
            continue;
        }
        files.push((entry.path().to_path_buf(), name));
    }

    files
}

fn add_file(
    zip: &mut ZipWriter<File>,
    path: &Path,
    name: &str,
    options: SimpleFileOptions,
) -> Result<(), WorldbookError> {
    zip.start_file(name, options)
        .map_err(|source| WorldbookError::Archive {
            context: name.to_string(),
            source,
        })?;

    let mut input =
        File::open(path).map_err(|e| WorldbookError::io(format!("reading {}", path.display()), e))?;
    io::copy(&mut input, zip)
        .map_err(|e| WorldbookError::io(format!("compressing {}", name), e))?;

    debug!(file = name, "archived");
    Ok(())
}

/// Build the archive described by `config`, replacing any previous one.
///
/// `progress` sees every step as it happens, starting with
/// [`PackageEvent::Started`] before the output is created.
///
/// # Errors
///
/// Returns an error when the output directory or archive cannot be created,
/// or a selected file cannot be read or compressed.
pub fn create_package(
    config: &PackageConfig,
    mut progress: impl FnMut(PackageEvent<'_>),
) -> Result<PackageSummary, WorldbookError> {
    progress(PackageEvent::Started);

    let output = config.root.join(&config.output);
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| WorldbookError::io(format!("creating {}", parent.display()), e))?;
    }

    let file = File::create(&output)
        .map_err(|e| WorldbookError::io(format!("creating {}", output.display()), e))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = Vec::new();
    let mut missing = Vec::new();

    for item in &config.include {
        let item_path = config.root.join(item);

        if !item_path.exists() {
            debug!(item = %item, "include item not found");
            progress(PackageEvent::Missing(item));
            missing.push(item.clone());
            continue;
        }

        if item_path.is_dir() {
            for (path, name) in collect_files(config, &item_path) {
                add_file(&mut zip, &path, &name, options)?;
                progress(PackageEvent::Added(&name));
                entries.push(name);
            }
        } else {
            let name = entry_name(Path::new(item));
            add_file(&mut zip, &item_path, &name, options)?;
            progress(PackageEvent::Added(&name));
            entries.push(name);
        }
    }

    zip.finish().map_err(|source| WorldbookError::Archive {
        context: output.display().to_string(),
        source,
    })?;

    info!(entries = entries.len(), archive = %output.display(), "package created");

    Ok(PackageSummary {
        archive: config.output.clone(),
        entries,
        missing,
    })
}

/// Console line for a progress event, if it shows at this verbosity.
pub fn format_event(event: &PackageEvent<'_>, verbose: bool) -> Option<String> {
    match event {
        PackageEvent::Started => Some("Creating zip package...".to_string()),
        PackageEvent::Missing(item) => Some(format!("Warning: {} not found, skipping", item)),
        PackageEvent::Added(entry) if verbose => Some(format!("  adding {}", entry)),
        PackageEvent::Added(_) => None,
    }
}

/// Closing console line of a successful package run.
pub fn format_summary(summary: &PackageSummary) -> String {
    format!("Package created: {}", entry_name(&summary.archive))
}
