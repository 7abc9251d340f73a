//! Reconciliation reports
//!
//! Renders a [`Reconciler`] as a plain-text listing per category with a
//! summary table, or as JSON.

use crate::error::ApiError;
use crate::record::{ChangedRecord, FileRecord, MovedRecord};
use crate::reconcile::Reconciler;
use clap::ValueEnum;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const RULE: &str = "--------------------";

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
        }
    }
}

/// Report configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Bold headings on terminals (text format only)
    #[serde(default = "default_true")]
    pub color: bool,

    #[serde(default)]
    pub format: ReportFormat,
}

fn default_true() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            color: true,
            format: ReportFormat::default(),
        }
    }
}

/// Which categories a report shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSelection {
    pub changed: bool,
    pub added: bool,
    pub removed: bool,
    pub moved: bool,
    pub unchanged: bool,
}

impl Default for ReportSelection {
    /// Everything that differs; unchanged files only on request.
    fn default() -> Self {
        Self {
            changed: true,
            added: true,
            removed: true,
            moved: true,
            unchanged: false,
        }
    }
}

impl ReportSelection {
    /// Selection from command-line flags; no flag at all means the default.
    pub fn from_flags(added: bool, changed: bool, removed: bool, moved: bool, same: bool) -> Self {
        if !(added || changed || removed || moved || same) {
            return Self::default();
        }
        Self {
            changed,
            added,
            removed,
            moved,
            unchanged: same,
        }
    }
}

/// Format a section heading, bold and underlined when `color` is set.
pub fn format_section_heading(title: &str, color: bool) -> String {
    if color {
        format!("{}", title.bold().underline())
    } else {
        title.to_string()
    }
}

fn write_section<'a>(
    out: &mut String,
    title: &str,
    paths: impl Iterator<Item = &'a str>,
    color: bool,
) {
    let _ = writeln!(out, "\n{}", format_section_heading(title, color));
    let _ = writeln!(out, "{}", RULE);
    for path in paths {
        let _ = writeln!(out, "{}", path);
    }
}

/// Render the selected categories as text, followed by a count summary.
pub fn format_report_text(result: &Reconciler, selection: &ReportSelection, color: bool) -> String {
    let mut out = String::new();
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Category", "Files"]);

    if selection.changed {
        write_section(
            &mut out,
            "Changed Files",
            result.changed().iter().map(ChangedRecord::path),
            color,
        );
        table.add_row(vec!["Changed".to_string(), result.changed().len().to_string()]);
    }
    if selection.added {
        write_section(
            &mut out,
            "Added Files",
            result.added().iter().map(FileRecord::path),
            color,
        );
        table.add_row(vec!["Added".to_string(), result.added().len().to_string()]);
    }
    if selection.removed {
        write_section(
            &mut out,
            "Removed Files",
            result.removed().iter().map(FileRecord::path),
            color,
        );
        table.add_row(vec!["Removed".to_string(), result.removed().len().to_string()]);
    }
    if selection.moved {
        let _ = writeln!(
            out,
            "\n{}",
            format_section_heading("Moved or Renamed Files", color)
        );
        let _ = writeln!(out, "{}", RULE);
        for moved in result.moved_or_renamed() {
            let _ = writeln!(out, "{}\n\t\tmoved to: {}", moved.old_path(), moved.new_path());
        }
        table.add_row(vec![
            "Moved or renamed".to_string(),
            result.moved_or_renamed().len().to_string(),
        ]);
    }
    if selection.unchanged {
        write_section(
            &mut out,
            "Unchanged Files",
            result.unchanged().iter().map(FileRecord::path),
            color,
        );
        table.add_row(vec!["Unchanged".to_string(), result.unchanged().len().to_string()]);
    }

    let _ = writeln!(out, "\n{}\n", format_section_heading("Summary", color));
    let _ = writeln!(out, "{}", table);
    out
}

#[derive(Debug, Serialize)]
struct RecordView<'a> {
    path: &'a str,
    checksum: String,
    size: u64,
    modified_at: i64,
}

impl<'a> From<&'a FileRecord> for RecordView<'a> {
    fn from(record: &'a FileRecord) -> Self {
        RecordView {
            path: record.path(),
            checksum: record.checksum().to_hex(),
            size: record.size(),
            modified_at: record.modified_at().as_millis(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChangedView<'a> {
    path: &'a str,
    old_checksum: String,
    new_checksum: String,
}

#[derive(Debug, Serialize)]
struct MovedView<'a> {
    old_path: &'a str,
    new_path: &'a str,
    checksum: String,
    size: u64,
}

#[derive(Debug, Default, Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    changed: Option<Vec<ChangedView<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    added: Option<Vec<RecordView<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    removed: Option<Vec<RecordView<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    moved_or_renamed: Option<Vec<MovedView<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unchanged: Option<Vec<RecordView<'a>>>,
}

/// Render the selected categories as a pretty-printed JSON object.
pub fn format_report_json(
    result: &Reconciler,
    selection: &ReportSelection,
) -> Result<String, ApiError> {
    let mut report = JsonReport::default();
    if selection.changed {
        report.changed = Some(
            result
                .changed()
                .iter()
                .map(|c| ChangedView {
                    path: c.path(),
                    old_checksum: c.old_checksum().to_hex(),
                    new_checksum: c.new_checksum().to_hex(),
                })
                .collect(),
        );
    }
    if selection.added {
        report.added = Some(result.added().iter().map(RecordView::from).collect());
    }
    if selection.removed {
        report.removed = Some(result.removed().iter().map(RecordView::from).collect());
    }
    if selection.moved {
        report.moved_or_renamed = Some(
            result
                .moved_or_renamed()
                .iter()
                .map(|m: &MovedRecord| MovedView {
                    old_path: m.old_path(),
                    new_path: m.new_path(),
                    checksum: m.checksum().to_hex(),
                    size: m.record().size(),
                })
                .collect(),
        );
    }
    if selection.unchanged {
        report.unchanged = Some(result.unchanged().iter().map(RecordView::from).collect());
    }
    serde_json::to_string_pretty(&report)
        .map_err(|e| ApiError::InvalidArgument(format!("Failed to serialize report: {}", e)))
}
