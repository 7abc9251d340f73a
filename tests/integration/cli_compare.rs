use clap::Parser;
use csum::config::CsumConfig;
use csum::error::{ApiError, SnapshotError};
use csum::tooling::cli::{Cli, CliContext};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn run(args: &[&str]) -> Result<String, ApiError> {
    let mut argv = vec!["csum"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    let context = CliContext::from_config(CsumConfig::default());
    let mut out = Vec::new();
    context.execute(&cli.command, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn write_listing(dir: &Path, name: &str, lines: &[&str]) -> String {
    let path = dir.join(name);
    let mut text = String::from("# CSum\n# Version 1\n# Directory \"/snap\"\n");
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    fs::write(&path, text).unwrap();
    path.to_string_lossy().into_owned()
}

const DATE: &str = "2011.08.13.09.14.57.123";

#[test]
fn compare_listings_default_categories() {
    let dir = TempDir::new().unwrap();
    let old = write_listing(
        dir.path(),
        "old.csum",
        &[
            &format!("00\t1\t{}\t\"./old.txt\"", DATE),
            &format!("aa\t1\t{}\t\"./same.txt\"", DATE),
        ],
    );
    let new = write_listing(
        dir.path(),
        "new.csum",
        &[
            &format!("00\t1\t{}\t\"./other/old.txt\"", DATE),
            &format!("aa\t1\t{}\t\"./same.txt\"", DATE),
        ],
    );

    let report = run(&["compare", &old, &new]).unwrap();
    assert!(report.starts_with(
        "\nChanged Files\n--------------------\n\
         \nAdded Files\n--------------------\n\
         \nRemoved Files\n--------------------\n\
         \nMoved or Renamed Files\n--------------------\n./old.txt\n\t\tmoved to: ./other/old.txt\n"
    ));
    assert!(!report.contains("Unchanged Files"));
}

#[test]
fn compare_same_flag_only_shows_unchanged() {
    let dir = TempDir::new().unwrap();
    let line = format!("aa\t1\t{}\t\"./same.txt\"", DATE);
    let old = write_listing(dir.path(), "old.csum", &[&line]);
    let new = write_listing(dir.path(), "new.csum", &[&line]);

    let report = run(&["compare", "-s", &old, &new]).unwrap();
    assert!(report.starts_with("\nUnchanged Files\n--------------------\n./same.txt\n"));
    assert!(!report.contains("Changed Files"));
}

#[test]
fn compare_json_output() {
    let dir = TempDir::new().unwrap();
    let old = write_listing(dir.path(), "old.csum", &[&format!("00\t1\t{}\tone.txt", DATE)]);
    let new = write_listing(
        dir.path(),
        "new.csum",
        &[
            &format!("00\t1\t{}\ttwo.txt", DATE),
            &format!("00\t1\t{}\tthree.txt", DATE),
        ],
    );

    let report = run(&["compare", "--format", "json", &old, &new]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(value["moved_or_renamed"].as_array().unwrap().len(), 0);
    assert_eq!(value["removed"][0]["path"], "./one.txt");
    let added: Vec<&str> = value["added"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["path"].as_str().unwrap())
        .collect();
    assert_eq!(added, vec!["./three.txt", "./two.txt"]);
    assert!(value.get("unchanged").is_none());
}

#[test]
fn compare_rejects_duplicate_paths() {
    let dir = TempDir::new().unwrap();
    let old = write_listing(
        dir.path(),
        "old.csum",
        &[
            &format!("00\t1\t{}\tdup.txt", DATE),
            &format!("01\t1\t{}\t./dup.txt", DATE),
        ],
    );
    let new = write_listing(dir.path(), "new.csum", &[]);

    let err = run(&["compare", &old, &new]).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Snapshot(SnapshotError::DuplicatePath { .. })
    ));
    assert!(err.to_string().contains("./dup.txt"));
}

#[test]
fn compare_reports_malformed_listing() {
    let dir = TempDir::new().unwrap();
    let old = write_listing(dir.path(), "old.csum", &["00\t1\tnot-a-date\tx"]);
    let new = write_listing(dir.path(), "new.csum", &[]);

    let err = run(&["compare", &old, &new]).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Snapshot(SnapshotError::MalformedToken { .. })
    ));
}

#[test]
fn list_to_stdout_writes_header_and_records() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::write(dir.path().join("._a.txt"), "meta").unwrap();

    let listing = run(&["list", dir.path().to_str().unwrap()]).unwrap();
    assert!(listing.starts_with("# CSum\n# Version 1\n# Directory \""));
    assert_eq!(listing.lines().filter(|l| !l.starts_with('#')).count(), 1);

    let listing = run(&["list", "--all", dir.path().to_str().unwrap()]).unwrap();
    assert_eq!(listing.lines().filter(|l| !l.starts_with('#')).count(), 2);
}
