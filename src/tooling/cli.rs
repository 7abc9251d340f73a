//! CLI Tooling
//!
//! `csum list` writes a listing of a directory; `csum compare` reconciles two
//! snapshots, each either a live directory or a listing file; `csum config`
//! prints the effective configuration.

use crate::codec::SnapshotWriter;
use crate::config::{ConfigLoader, CsumConfig};
use crate::error::ApiError;
use crate::logging::{validate_format, LoggingConfig};
use crate::reconcile::Reconciler;
use crate::report::{format_report_json, format_report_text, ReportFormat, ReportSelection};
use crate::snapshot::{ArchiveSource, SnapshotSource};
use crate::tree::{WalkSource, WalkerConfig};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// CSum - directory fingerprints and reconciliation
#[derive(Parser, Debug)]
#[command(name = "csum", version)]
#[command(about = "Fingerprint directory trees and report what changed between two snapshots")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Fold the logging flags over the configured logging section.
    pub fn logging_config(&self, base: &LoggingConfig) -> Result<LoggingConfig, ApiError> {
        let mut logging = base.clone();
        if let Some(level) = &self.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            validate_format(format)?;
            logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            logging.file = Some(file.clone());
        }
        Ok(logging)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a listing of every file under a directory
    List {
        /// Directory to fingerprint
        path: PathBuf,
        /// Include special Mac files (.DS_Store, ._*)
        #[arg(short, long)]
        all: bool,
        /// Write the listing here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Report the differences between two snapshots (directories or listings)
    Compare {
        /// Old snapshot
        old: PathBuf,
        /// New snapshot
        new: PathBuf,
        /// Show added files
        #[arg(short = 'a', long)]
        added: bool,
        /// Show changed files
        #[arg(short = 'c', long)]
        changed: bool,
        /// Show removed files
        #[arg(short = 'r', long)]
        removed: bool,
        /// Show moved or renamed files
        #[arg(short = 'm', long)]
        moved: bool,
        /// Show unchanged files
        #[arg(short = 's', long)]
        same: bool,
        /// Output format (defaults to the configured report format)
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// CLI context holding the loaded configuration
pub struct CliContext {
    config: CsumConfig,
    color: bool,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(config_path: Option<&Path>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load(config_path)?;
        let color = config.report.color
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stdout().is_terminal();
        Ok(Self { config, color })
    }

    /// Context over an already-built configuration; headings stay plain.
    pub fn from_config(config: CsumConfig) -> Self {
        Self {
            config,
            color: false,
        }
    }

    pub fn config(&self) -> &CsumConfig {
        &self.config
    }

    /// Execute a CLI command, writing its primary output to `out`.
    pub fn execute(&self, command: &Commands, out: &mut dyn Write) -> Result<(), ApiError> {
        match command {
            Commands::List { path, all, output } => {
                self.handle_list(path, *all, output.as_deref(), out)
            }
            Commands::Compare {
                old,
                new,
                added,
                changed,
                removed,
                moved,
                same,
                format,
            } => {
                let selection =
                    ReportSelection::from_flags(*added, *changed, *removed, *moved, *same);
                let format = format.unwrap_or(self.config.report.format);
                self.handle_compare(old, new, &selection, format, out)
            }
            Commands::Config => {
                let text = self.config.to_toml()?;
                write_output(out, &text)
            }
        }
    }

    fn handle_list(
        &self,
        path: &Path,
        all: bool,
        output: Option<&Path>,
        out: &mut dyn Write,
    ) -> Result<(), ApiError> {
        if !path.is_dir() {
            return Err(ApiError::InvalidArgument(format!(
                "Not a directory: {}",
                path.display()
            )));
        }
        let walker = WalkerConfig {
            include_special_files: all || self.config.walker.include_special_files,
            ..self.config.walker.clone()
        };
        let mut source = WalkSource::new(path, &walker);

        let count = match output {
            Some(target) => {
                let file = File::create(target).map_err(|source| ApiError::Io {
                    path: target.to_path_buf(),
                    source,
                })?;
                let mut writer = SnapshotWriter::with_target(BufWriter::new(file), target);
                let count = writer.write_source(&mut source)?;
                writer.flush()?;
                count
            }
            None => {
                let mut writer = SnapshotWriter::with_target(out, "<stdout>");
                let count = writer.write_source(&mut source)?;
                writer.flush()?;
                count
            }
        };
        info!(root = %path.display(), records = count, "Listing complete");
        Ok(())
    }

    fn handle_compare(
        &self,
        old: &Path,
        new: &Path,
        selection: &ReportSelection,
        format: ReportFormat,
        out: &mut dyn Write,
    ) -> Result<(), ApiError> {
        let mut old_source = self.open_source(old)?;
        let mut new_source = self.open_source(new)?;
        let result = Reconciler::new(&mut old_source, &mut new_source)?;
        let text = match format {
            ReportFormat::Text => format_report_text(&result, selection, self.color),
            ReportFormat::Json => {
                let mut json = format_report_json(&result, selection)?;
                json.push('\n');
                json
            }
        };
        write_output(out, &text)
    }

    /// A directory is walked; anything else is parsed as a listing.
    fn open_source(&self, path: &Path) -> Result<Box<dyn SnapshotSource>, ApiError> {
        if path.is_dir() {
            Ok(Box::new(WalkSource::new(path, &self.config.walker)))
        } else {
            Ok(Box::new(ArchiveSource::open(path)?))
        }
    }
}

fn write_output(out: &mut dyn Write, text: &str) -> Result<(), ApiError> {
    out.write_all(text.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|source| ApiError::Io {
            path: PathBuf::from("<stdout>"),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnapshotError;
    use std::fs;

    fn run(context: &CliContext, args: &[&str]) -> Result<String, ApiError> {
        let mut argv = vec!["csum"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        let mut out = Vec::new();
        context.execute(&cli.command, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_compare_flags() {
        let cli = Cli::try_parse_from(["csum", "compare", "a", "b", "-s", "-m"]).unwrap();
        match cli.command {
            Commands::Compare {
                same, moved, added, ..
            } => {
                assert!(same);
                assert!(moved);
                assert!(!added);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["csum", "config", "--log-level", "debug"]).unwrap();
        let logging = cli.logging_config(&LoggingConfig::default()).unwrap();
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.output, "stderr");
    }

    #[test]
    fn test_bad_log_format_rejected() {
        let cli = Cli::try_parse_from(["csum", "config", "--log-format", "xml"]).unwrap();
        assert!(cli.logging_config(&LoggingConfig::default()).is_err());
    }

    #[test]
    fn test_config_command_prints_toml() {
        let context = CliContext::from_config(CsumConfig::default());
        let text = run(&context, &["config"]).unwrap();
        assert!(text.contains("[walker]"));
        assert!(text.contains("algorithm = \"sha256\""));
    }

    #[test]
    fn test_list_then_compare_against_directory() {
        let dir = tempfile::tempdir().unwrap();
        let tree = dir.path().join("tree");
        fs::create_dir(&tree).unwrap();
        fs::write(tree.join("keep.txt"), "keep").unwrap();
        fs::write(tree.join("move.txt"), "move").unwrap();
        let listing = dir.path().join("before.csum");

        let context = CliContext::from_config(CsumConfig::default());
        let printed = run(
            &context,
            &["list", tree.to_str().unwrap(), "-o", listing.to_str().unwrap()],
        )
        .unwrap();
        assert!(printed.is_empty());
        assert!(fs::read_to_string(&listing).unwrap().starts_with("# CSum\n"));

        fs::create_dir(tree.join("sub")).unwrap();
        fs::rename(tree.join("move.txt"), tree.join("sub/move.txt")).unwrap();
        fs::write(tree.join("new.txt"), "new").unwrap();

        let report = run(
            &context,
            &["compare", listing.to_str().unwrap(), tree.to_str().unwrap()],
        )
        .unwrap();
        assert!(report.contains("\nAdded Files\n--------------------\n./new.txt\n"));
        assert!(report.contains("./move.txt\n\t\tmoved to: ./sub/move.txt\n"));
        assert!(!report.contains("keep.txt"));
    }

    #[test]
    fn test_list_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let context = CliContext::from_config(CsumConfig::default());
        let err = run(&context, &["list", dir.path().join("nope").to_str().unwrap()]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[test]
    fn test_compare_missing_listing_is_source_io() {
        let dir = tempfile::tempdir().unwrap();
        let context = CliContext::from_config(CsumConfig::default());
        let err = run(
            &context,
            &[
                "compare",
                dir.path().join("a.csum").to_str().unwrap(),
                dir.path().to_str().unwrap(),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Snapshot(SnapshotError::SourceIo { .. })
        ));
    }
}
