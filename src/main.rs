//! stalefile - find large directories and installed packages nobody uses.
//!
//! Usage:
//!   stf                                 Audit / with the default thresholds
//!   stf --root /srv --days 180          Audit /srv for directories idle 180 days
//!   stf --package-manager pacman        Also report unused pacman packages
//!   stf --interactive                   Decide per directory: delete, ignore, skip
//!   stf --format json                   Machine-readable report
//!   stf --help                          Show help

mod ignore_list;
mod prompt;
mod settings;

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

use stalefile_analyze::{
    DAY, StaleDirConfig, StaleDirFinder, StaleDirectoryReport, StalePackageConfig, StalePackageFinder,
    StalePackageReport, format_age, format_gb,
};
use stalefile_core::{IgnoreMode, ScanConfig, ScanTree, ScanWarning, TreeStats};
use stalefile_pkg::{PackageManagerKind, ResolverError};
use stalefile_scan::{ProgressReceiver, ScanProgress, TreeBuilder};

use crate::prompt::{Outcome, Prompt};
use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "stalefile",
    version,
    about = "Find large, long-unaccessed directories and unused installed packages",
    long_about = "stalefile walks a directory tree, rolls up sizes and last-access times, \
                  and reports the largest directories nobody has touched in a while. \
                  With a package backend it also reports installed packages whose files \
                  have not been accessed.\n\n\
                  Defaults for most options can be set in <config dir>/stalefile/settings.toml."
)]
struct Cli {
    /// Directory to audit
    #[arg(long, default_value = "/")]
    root: PathBuf,

    /// Report directories not accessed for more than this many days [default: 365]
    #[arg(long)]
    days: Option<u64>,

    /// Report packages not accessed for more than this many days [default: 365]
    #[arg(long)]
    pkg_days: Option<u64>,

    /// Only report directories larger than this many bytes (e.g. 1e8) [default: 1e8]
    #[arg(long)]
    size: Option<f64>,

    /// Paths to leave out of the audit
    #[arg(long, num_args = 1..)]
    ignore: Vec<PathBuf>,

    /// File with one ignored path per line [default: ignorelist.txt]
    #[arg(long)]
    ignore_file: Option<PathBuf>,

    /// Package database backend (none, pacman, dpkg) [default: none]
    #[arg(long, value_parser = parse_backend)]
    package_manager: Option<PackageManagerKind>,

    /// Which path ignore patterns are tested against
    #[arg(long, value_enum, default_value_t)]
    ignore_mode: IgnoreModeArg,

    /// Also report directories containing package-owned files
    #[arg(long)]
    allow_owned: bool,

    /// Prompt for an action after each reported directory
    #[arg(short, long)]
    interactive: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Log verbosity (written to stderr)
    #[arg(long, value_enum, default_value_t)]
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum IgnoreModeArg {
    /// Leave out each ignored entry
    #[default]
    Child,
    /// Keep ignored directories as empty entries
    Parent,
}

impl From<IgnoreModeArg> for IgnoreMode {
    fn from(arg: IgnoreModeArg) -> Self {
        match arg {
            IgnoreModeArg::Child => IgnoreMode::Child,
            IgnoreModeArg::Parent => IgnoreMode::Parent,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Everything printed by `--format json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    root: &'a Path,
    scanned_at: SystemTime,
    scan_duration: Duration,
    stats: &'a TreeStats,
    stale_directories: &'a StaleDirectoryReport,
    stale_packages: &'a StalePackageReport,
    warnings: &'a [ScanWarning],
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(LevelFilter::from(cli.log_level))
        .without_time()
        .compact()
        .init();

    let settings = Settings::load();
    run(cli, settings)
}

fn run(cli: Cli, settings: Settings) -> Result<()> {
    if cli.interactive && matches!(cli.format, OutputFormat::Json) {
        bail!("--interactive cannot be combined with --format json");
    }

    let days = cli.days.or(settings.days).unwrap_or(365);
    let pkg_days = cli.pkg_days.or(settings.pkg_days).unwrap_or(365);
    let min_size = parse_min_size(cli.size.or(settings.size).unwrap_or(1e8))?;
    let require_unowned = !cli.allow_owned && settings.require_unowned.unwrap_or(true);
    let backend = match cli.package_manager {
        Some(kind) => kind,
        None => settings
            .package_manager
            .as_deref()
            .map(PackageManagerKind::parse)
            .transpose()?
            .unwrap_or_default(),
    };

    let given_root = std::path::absolute(&cli.root).context("Invalid root path")?;
    let root = given_root.canonicalize().context("Invalid root path")?;
    let ignore_file = cli
        .ignore_file
        .or(settings.ignore_file)
        .unwrap_or_else(|| PathBuf::from(ignore_list::DEFAULT_IGNORE_FILE));

    let mut ignores = cli.ignore;
    ignores.extend(settings.ignore);
    ignores.extend(
        ignore_list::load(&ignore_file)
            .with_context(|| format!("Failed to read ignore list {}", ignore_file.display()))?,
    );
    let ignores = ignores
        .iter()
        .map(|pattern| resolve_ignore(pattern, &given_root, &root))
        .collect::<io::Result<Vec<_>>>()
        .context("Invalid ignore path")?;

    let config = ScanConfig::builder()
        .root(&root)
        .ignore_patterns(ignores)
        .ignore_mode(IgnoreMode::from(cli.ignore_mode))
        .build()
        .context("Invalid scan configuration")?;
    debug!(?config, days, pkg_days, min_size, require_unowned, "resolved options");

    let resolver = backend.open().context("Failed to load package database")?;

    eprintln!("Scanning {}...", root.display());

    let builder = TreeBuilder::new();
    let progress = io::stderr().is_terminal().then(|| spawn_progress(builder.subscribe()));
    let tree = builder.build(&*resolver, &config).context("Scan failed")?;
    drop(builder);
    if let Some(handle) = progress {
        let _ = handle.join();
    }

    let now = SystemTime::now();
    let dir_config = StaleDirConfig::builder()
        .reference_time(now)
        .age_threshold(days_to_duration(days))
        .min_size(min_size)
        .require_unowned(require_unowned)
        .build()?;
    let pkg_config = StalePackageConfig::builder()
        .reference_time(now)
        .age_threshold(days_to_duration(pkg_days))
        .build()?;

    let dirs = StaleDirFinder::with_config(dir_config).find(&tree.root);
    let packages = StalePackageFinder::with_config(pkg_config).find(&tree.root.packages);
    for dir in &dirs.directories {
        info!(path = %dir.path.display(), idle = %format_age(dir.age), "stale directory");
    }

    match cli.format {
        OutputFormat::Text if cli.interactive => {
            review_interactively(&dirs, &ignore_file)?;
            println!("{} GB", format_gb(dirs.total_size));
            packages.render_text(&mut io::stdout().lock())?;
        }
        OutputFormat::Text => {
            let mut out = io::stdout().lock();
            dirs.render_text(&mut out)?;
            packages.render_text(&mut out)?;
            out.flush()?;
        }
        OutputFormat::Json => print_json(&tree, &dirs, &packages)?,
    }

    if tree.has_warnings() {
        for warning in &tree.warnings {
            debug!(path = %warning.path.display(), kind = ?warning.kind, "{}", warning.message);
        }
        eprintln!("{} warning(s) during scan", tree.warnings.len());
    }

    Ok(())
}

/// Print each directory, then ask what to do with it.
fn review_interactively(dirs: &StaleDirectoryReport, ignore_file: &Path) -> Result<()> {
    let stdin = io::stdin();
    let mut prompt = Prompt::new(stdin.lock(), io::stdout(), ignore_file);
    let mut freed = 0u64;
    let mut deleted = 0usize;

    for dir in &dirs.directories {
        println!("{dir}");
        match prompt.run(&dir.path)? {
            Outcome::Deleted(path) => {
                deleted += 1;
                if path == dir.path {
                    freed += dir.size;
                }
            }
            Outcome::Ignored(path) => info!(path = %path.display(), "added to ignore list"),
            Outcome::Skipped => {}
        }
    }

    if deleted > 0 {
        eprintln!(
            "Deleted {deleted} director{}, freed at least {}",
            if deleted == 1 { "y" } else { "ies" },
            humansize::format_size(freed, humansize::DECIMAL)
        );
    }
    Ok(())
}

fn print_json(tree: &ScanTree, dirs: &StaleDirectoryReport, packages: &StalePackageReport) -> Result<()> {
    let report = JsonReport {
        root: &tree.root_path,
        scanned_at: tree.scanned_at,
        scan_duration: tree.scan_duration,
        stats: &tree.stats,
        stale_directories: dirs,
        stale_packages: packages,
        warnings: &tree.warnings,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Redraw a single status line on stderr until the scan finishes.
fn spawn_progress(rx: ProgressReceiver) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stderr = io::stderr();
        follow_progress(rx, |progress| {
            let _ = write!(stderr, "\r{}", progress_line(progress));
            let _ = stderr.flush();
            if progress.finished {
                let _ = writeln!(stderr);
            }
        });
    })
}

/// Feed updates to `on_update` until the final one or until the builder is gone.
///
/// Updates dropped because the reader fell behind are skipped.
fn follow_progress(mut rx: ProgressReceiver, mut on_update: impl FnMut(&ScanProgress)) {
    loop {
        match rx.blocking_recv() {
            Ok(progress) => {
                on_update(&progress);
                if progress.finished {
                    break;
                }
            }
            Err(RecvError::Lagged(skipped)) => debug!(skipped, "progress updates dropped"),
            Err(RecvError::Closed) => break,
        }
    }
}

fn progress_line(progress: &ScanProgress) -> String {
    format!(
        "{} files, {} dirs, {} ({:.0} files/s)",
        progress.files_scanned,
        progress.dirs_scanned,
        humansize::format_size(progress.bytes_scanned, humansize::DECIMAL),
        progress.files_per_second()
    )
}

/// Express an ignore path in the same resolved form as the scanned paths.
///
/// Existing paths are canonicalized. Missing paths under the root as given on
/// the command line are rebased onto the canonical root.
fn resolve_ignore(pattern: &Path, given_root: &Path, root: &Path) -> io::Result<PathBuf> {
    if let Ok(resolved) = pattern.canonicalize() {
        return Ok(resolved);
    }
    let pattern = std::path::absolute(pattern)?;
    Ok(match pattern.strip_prefix(given_root) {
        Ok(rest) => root.join(rest),
        Err(_) => pattern,
    })
}

fn parse_backend(name: &str) -> Result<PackageManagerKind, ResolverError> {
    PackageManagerKind::parse(name)
}

/// Validate a byte threshold given as a float (`1e8`, `5e9`, ...).
fn parse_min_size(size: f64) -> Result<u64> {
    if !size.is_finite() || size < 0.0 {
        bail!("--size must be a non-negative number of bytes, got {size}");
    }
    Ok(size as u64)
}

fn days_to_duration(days: u64) -> Duration {
    Duration::from_secs(days.saturating_mul(DAY.as_secs()))
}
