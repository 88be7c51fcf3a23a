//! flake8 invocation.
//!
//! One process per file, run on the rayon pool. flake8 exits 1 when it
//! reports findings, so only statuses other than 0 and 1 are failures.

use crate::collect::relative_display;
use crate::error::{Error, Result};
use crate::models::LintReport;
use crate::parse::parse_output;
use crate::report::build_report;
use chrono::Utc;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// How to call flake8.
#[derive(Debug, Clone)]
pub struct Tool {
    pub bin: String,
    pub args: Vec<String>,
}

impl Default for Tool {
    fn default() -> Self {
        Self {
            bin: "flake8".to_string(),
            args: Vec::new(),
        }
    }
}

/// Captured result of one flake8 run.
#[derive(Debug, Clone)]
pub struct Flake8Run {
    pub stdout: String,
    pub status: i32,
}

/// Run flake8 on `file` with `root` as working directory.
///
/// The file is passed root-relative so flake8 prints the same paths the
/// reports are named after.
pub fn run_flake8(tool: &Tool, root: &Path, file: &Path) -> Result<Flake8Run> {
    let rel = relative_display(root, file);
    tracing::debug!(bin = %tool.bin, file = %rel, "running flake8");
    let out = Command::new(&tool.bin)
        .args(&tool.args)
        .arg(&rel)
        .current_dir(root)
        .output()
        .map_err(|source| Error::ToolMissing {
            bin: tool.bin.clone(),
            source,
        })?;
    match out.status.code() {
        Some(code @ (0 | 1)) => Ok(Flake8Run {
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            status: code,
        }),
        other => Err(Error::ToolFailed {
            file: rel,
            status: other.map_or_else(|| "signal".to_string(), |c| c.to_string()),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        }),
    }
}

/// Analyse one file: run flake8 and build its report.
pub fn analyze_file(tool: &Tool, root: &Path, file: &Path, max_output_lines: usize) -> Result<LintReport> {
    let run = run_flake8(tool, root, file)?;
    let source = relative_display(root, file);
    let diags = parse_output(&run.stdout);
    if run.status == 1 && diags.is_empty() {
        tracing::warn!(file = %source, "flake8 reported failure but printed no parsable findings");
    }
    Ok(build_report(&source, &diags, &run.stdout, Utc::now(), max_output_lines))
}

/// Analyse files in parallel. Results come back sorted by file path; a
/// failure on one file does not stop the others.
pub fn analyze_files(
    tool: &Tool,
    root: &Path,
    files: &[PathBuf],
    max_output_lines: usize,
) -> Vec<(PathBuf, Result<LintReport>)> {
    let mut results: Vec<(PathBuf, Result<LintReport>)> = files
        .par_iter()
        .map(|f| (f.clone(), analyze_file(tool, root, f, max_output_lines)))
        .collect();
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// Shell script standing in for flake8, run through `sh` so the
    /// freshly written file never needs to be executable.
    fn fake_flake8(dir: &Path, body: &str) -> Tool {
        let script = dir.join("fake-flake8.sh");
        fs::write(&script, format!("{}\n", body)).unwrap();
        Tool {
            bin: "sh".into(),
            args: vec![script.to_string_lossy().to_string()],
        }
    }

    #[test]
    fn test_analyze_files_with_findings_and_clean() {
        let tools = tempdir().unwrap();
        let repo = tempdir().unwrap();
        let root = repo.path();
        fs::create_dir_all(root.join("scripts")).unwrap();
        fs::write(root.join("scripts/a.py"), "import os\n").unwrap();
        fs::write(root.join("scripts/b.py"), "x = 1\n").unwrap();
        let tool = fake_flake8(
            tools.path(),
            r#"case "$1" in
  *a.py) echo "$1:1:1: F401 'os' imported but unused"; echo "$1:2:1: W293 whitespace on blank line"; exit 1;;
  *) exit 0;;
esac"#,
        );
        let files = vec![root.join("scripts/b.py"), root.join("scripts/a.py")];
        let results = analyze_files(&tool, root, &files, 50);
        assert_eq!(results.len(), 2);
        let a = results[0].1.as_ref().unwrap();
        assert_eq!(a.source, "scripts/a.py");
        assert_eq!(a.total, 2);
        assert_eq!(a.codes["F401"].count, 1);
        let b = results[1].1.as_ref().unwrap();
        assert!(b.is_clean());
    }

    #[test]
    fn test_tool_failure_status() {
        let tools = tempdir().unwrap();
        let repo = tempdir().unwrap();
        fs::write(repo.path().join("c.py"), "").unwrap();
        let tool = fake_flake8(tools.path(), "echo boom >&2; exit 2");
        let err = run_flake8(&tool, repo.path(), &repo.path().join("c.py")).unwrap_err();
        match err {
            Error::ToolFailed { status, stderr, .. } => {
                assert_eq!(status, "2");
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_binary() {
        let repo = tempdir().unwrap();
        let tool = Tool {
            bin: "/nonexistent/flake8-binary".into(),
            args: vec![],
        };
        let err = run_flake8(&tool, repo.path(), &repo.path().join("c.py")).unwrap_err();
        assert!(matches!(err, Error::ToolMissing { .. }));
    }
}
