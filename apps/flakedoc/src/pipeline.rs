//! End-to-end flows behind the `run` and `ingest` commands: produce reports,
//! then write one Markdown file per report plus `SUMMARY.md`.

use crate::collect::{collect_files, explicit_files, relative_display};
use crate::config::Effective;
use crate::error::{Error, Result};
use crate::models::{LintReport, RunSummary};
use crate::parse::split_by_file;
use crate::render::{render_report, render_summary};
use crate::report::{build_report, meets_threshold, report_file_name, summarize};
use crate::runner::analyze_files;
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "SUMMARY.md";

#[derive(Serialize, Debug, Clone)]
/// A file that could not be analysed.
pub struct FileFailure {
    pub file: String,
    pub message: String,
}

#[derive(Debug)]
/// Outcome of one command run.
pub struct Batch {
    pub reports: Vec<LintReport>,
    pub failures: Vec<FileFailure>,
    pub summary: RunSummary,
    /// Files written to disk; empty on dry runs.
    pub written: Vec<PathBuf>,
}

impl Batch {
    fn new(reports: Vec<LintReport>, failures: Vec<FileFailure>) -> Self {
        let summary = summarize(&reports);
        Self {
            reports,
            failures,
            summary,
            written: Vec::new(),
        }
    }

    /// Whether the command should exit non-zero.
    pub fn failed(&self, eff: &Effective) -> bool {
        !self.failures.is_empty()
            || eff
                .fail_on
                .map(|t| meets_threshold(&self.reports, t))
                .unwrap_or(false)
    }
}

/// Run flake8 on explicit `files`, or on everything the configured patterns
/// match when `files` is empty.
pub fn run(eff: &Effective, files: &[String], dry_run: bool) -> Result<Batch> {
    let targets = if files.is_empty() {
        collect_files(&eff.repo_root, &eff.patterns, &eff.exclude)?
    } else {
        explicit_files(&eff.repo_root, files)?
    };
    if targets.is_empty() {
        tracing::warn!("no files matched {:?}", eff.patterns);
    }

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for (path, res) in analyze_files(&eff.tool, &eff.repo_root, &targets, eff.max_output_lines) {
        match res {
            Ok(r) => reports.push(r),
            // a missing tool fails every file the same way
            Err(e @ Error::ToolMissing { .. }) => return Err(e),
            Err(e) if e.is_tool_error() => {
                tracing::error!("{e}");
                failures.push(FileFailure {
                    file: relative_display(&eff.repo_root, &path),
                    message: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }
    finish(eff, Batch::new(reports, failures), dry_run)
}

/// Build reports from a saved flake8 dump. Only files that appear in the
/// dump get a report; the sources themselves need not exist.
pub fn ingest(eff: &Effective, text: &str, dry_run: bool) -> Result<Batch> {
    let analyzed_at = Utc::now();
    let slices = split_by_file(text, |p| normalize_source(&eff.repo_root, p));
    tracing::info!("ingested findings for {} file(s)", slices.len());
    // keys are normalized sources, so the map order is already report order
    let reports: Vec<LintReport> = slices
        .iter()
        .map(|(source, slice)| {
            build_report(source, &slice.diags, &slice.raw, analyzed_at, eff.max_output_lines)
        })
        .collect();
    finish(eff, Batch::new(reports, Vec::new()), dry_run)
}

fn finish(eff: &Effective, mut batch: Batch, dry_run: bool) -> Result<Batch> {
    if dry_run {
        tracing::info!("dry run: {} report(s) not written", batch.reports.len());
        return Ok(batch);
    }
    let summary = eff.summary.then_some(&batch.summary);
    batch.written = write_reports(&eff.out_dir, &batch.reports, summary)?;
    Ok(batch)
}

/// Read a saved flake8 dump from a file, or from stdin when `input` is `-`.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, the same
/// way captured flake8 output is decoded in `run`.
pub fn read_input(input: &str) -> Result<String> {
    let bytes = if input == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        fs::read(input).map_err(|e| Error::path_io(input, e))?
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Map every output file name to the source that claims it. Fails on the
/// first name claimed twice, before anything is written.
fn plan_names<'a>(
    reports: &'a [LintReport],
    with_summary: bool,
) -> Result<Vec<(String, &'a LintReport)>> {
    let mut claimed: BTreeMap<String, &str> = BTreeMap::new();
    if with_summary {
        claimed.insert(SUMMARY_FILE.to_string(), SUMMARY_FILE);
    }
    let mut plan = Vec::with_capacity(reports.len());
    for r in reports {
        let name = report_file_name(&r.source);
        if let Some(first) = claimed.get(&name) {
            return Err(Error::ReportNameClash {
                name,
                first: first.to_string(),
                second: r.source.clone(),
            });
        }
        claimed.insert(name.clone(), &r.source);
        plan.push((name, r));
    }
    Ok(plan)
}

/// Write every report and, when given, the summary into `out_dir`.
pub fn write_reports(
    out_dir: &Path,
    reports: &[LintReport],
    summary: Option<&RunSummary>,
) -> Result<Vec<PathBuf>> {
    let plan = plan_names(reports, summary.is_some())?;
    fs::create_dir_all(out_dir).map_err(|e| Error::path_io(out_dir, e))?;
    let mut written = Vec::with_capacity(reports.len() + 1);
    for (name, r) in plan {
        let path = out_dir.join(name);
        fs::write(&path, render_report(r)).map_err(|e| Error::path_io(&path, e))?;
        tracing::debug!("wrote {}", path.display());
        written.push(path);
    }
    if let Some(s) = summary {
        let path = out_dir.join(SUMMARY_FILE);
        fs::write(&path, render_summary(s)).map_err(|e| Error::path_io(&path, e))?;
        written.push(path);
    }
    Ok(written)
}

/// Root-relative form of a path printed by flake8.
fn normalize_source(root: &Path, printed: &str) -> String {
    let p = Path::new(printed);
    if p.is_absolute() {
        if p.starts_with(root) {
            return relative_display(root, p);
        }
        // the root is canonical; the printed path may go through a symlink
        if let Ok(canon) = p.canonicalize() {
            if canon.starts_with(root) {
                return relative_display(root, &canon);
            }
        }
    }
    let mut s = printed.replace('\\', "/");
    while let Some(rest) = s.strip_prefix("./") {
        s = rest.to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{resolve_effective, Overrides};
    use crate::models::catalog::Priority;
    use tempfile::tempdir;

    const DUMP: &str = "\
./security/preliminary/scan.py:1:1: F401 're' imported but unused
./security/preliminary/scan.py:9:80: E501 line too long (99 > 79 characters)
scripts/deploy.py:4:11: F541 f-string is missing placeholders
scripts/deploy.py:5:1: W293 whitespace on blank line
";

    fn eff(root: &Path) -> Effective {
        resolve_effective(&Overrides {
            repo_root: root.to_str().map(str::to_string),
            ..Overrides::default()
        })
        .unwrap()
    }

    #[test]
    fn test_ingest_writes_reports_and_summary() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let eff = eff(dir.path());
        let batch = ingest(&eff, DUMP, false).unwrap();
        let sources: Vec<&str> = batch.reports.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, vec!["scripts/deploy.py", "security/preliminary/scan.py"]);
        assert_eq!(batch.written.len(), 3);

        let scan = fs::read_to_string(eff.out_dir.join("security__preliminary__scan.py.md")).unwrap();
        assert!(scan.contains("# Flake8 Report: security/preliminary/scan.py"));
        assert!(scan.contains("| F401 | 1 |"));
        assert!(!scan.contains("deploy.py"));

        let summary = fs::read_to_string(eff.out_dir.join(SUMMARY_FILE)).unwrap();
        assert!(summary.contains("- Total issues: 4"));
        assert!(!batch.failed(&eff));
    }

    #[test]
    fn test_dry_run_writes_nothing_and_threshold_fails() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let mut eff = eff(dir.path());
        eff.fail_on = Some(Priority::High);
        let batch = ingest(&eff, DUMP, true).unwrap();
        assert!(batch.written.is_empty());
        assert!(!eff.out_dir.exists());
        assert!(batch.failed(&eff));
        eff.fail_on = Some(Priority::Critical);
        assert!(!batch.failed(&eff));
    }

    #[test]
    fn test_write_without_summary() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let written = write_reports(&out, &[], None).unwrap();
        assert!(written.is_empty());
        assert!(out.is_dir());
        assert!(!out.join(SUMMARY_FILE).exists());
    }

    #[test]
    fn test_ingest_merges_spellings_of_one_file() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let eff = eff(dir.path());
        let abs = eff.repo_root.join("a.py");
        let dump = format!(
            "./a.py:1:1: F401 'os' imported but unused\n\
             {}:2:1: W293 whitespace on blank line\n\
             a.py:3:1: E501 line too long (88 > 79 characters)\n",
            abs.display()
        );
        let batch = ingest(&eff, &dump, false).unwrap();
        assert_eq!(batch.reports.len(), 1);
        assert_eq!(batch.reports[0].source, "a.py");
        assert_eq!(batch.reports[0].total, 3);
        assert_eq!(batch.summary.files, 1);
        let report = fs::read_to_string(eff.out_dir.join("a.py.md")).unwrap();
        assert!(report.contains("**Total issues:** 3"));
        assert!(report.contains("W293 whitespace on blank line"));
    }

    #[test]
    fn test_write_rejects_flattened_name_clash() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let reports = vec![
            build_report("a/b__c.py", &[], "", Utc::now(), 50),
            build_report("a__b/c.py", &[], "", Utc::now(), 50),
        ];
        let err = write_reports(&out, &reports, None).unwrap_err();
        match err {
            Error::ReportNameClash { name, first, second } => {
                assert_eq!(name, "a__b__c.py.md");
                assert_eq!(first, "a/b__c.py");
                assert_eq!(second, "a__b/c.py");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!out.exists());
    }

    #[test]
    fn test_write_rejects_report_named_like_summary() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let reports = vec![build_report("SUMMARY", &[], "", Utc::now(), 50)];
        let summary = summarize(&reports);
        let err = write_reports(&out, &reports, Some(&summary)).unwrap_err();
        assert!(matches!(err, Error::ReportNameClash { ref name, .. } if name == SUMMARY_FILE));
        // without a summary the name is free
        let written = write_reports(&out, &reports, None).unwrap();
        assert_eq!(written, vec![out.join(SUMMARY_FILE)]);
    }

    #[test]
    fn test_read_input_replaces_invalid_utf8() {
        let dir = tempdir().unwrap();
        let dump = dir.path().join("flake8.txt");
        let mut bytes = b"a.py:1:1: E501 line too long \xff\xfe\n".to_vec();
        bytes.extend_from_slice(b"a.py:2:1: W293 whitespace on blank line\n");
        fs::write(&dump, bytes).unwrap();
        let text = read_input(dump.to_str().unwrap()).unwrap();
        assert!(text.contains('\u{FFFD}'));
        assert_eq!(text.lines().count(), 2);

        let missing = read_input(dir.path().join("nope.txt").to_str().unwrap()).unwrap_err();
        assert!(matches!(missing, Error::PathIo { .. }));
    }

    #[test]
    fn test_normalize_source() {
        let root = Path::new("/repo");
        assert_eq!(normalize_source(root, "./a/b.py"), "a/b.py");
        assert_eq!(normalize_source(root, "/repo/a/b.py"), "a/b.py");
        assert_eq!(normalize_source(root, "a\\b.py"), "a/b.py");
    }
}
