//! Parser for flake8's default text output.
//!
//! flake8 prints one finding per line as `path:row:col: CODE message`.
//! Anything else in the stream (statistics, benchmark output, tracebacks)
//! is skipped.

use crate::models::Diagnostic;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<path>.+?):(?P<row>\d+):(?:(?P<col>\d+):)?\s*(?P<code>[A-Z]+[0-9]+)\b\s*(?P<msg>.*)$",
        )
        .expect("static regex")
    })
}

/// Parse one output line. Returns `None` when the line is not a finding.
pub fn parse_line(line: &str) -> Option<Diagnostic> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    let caps = line_re().captures(line)?;
    let row = caps.name("row")?.as_str().parse().ok()?;
    // flake8 omits the column only with custom formats; treat as column 1
    let col = match caps.name("col") {
        Some(m) => m.as_str().parse().ok()?,
        None => 1,
    };
    Some(Diagnostic {
        path: caps["path"].to_string(),
        row,
        col,
        code: caps["code"].to_string(),
        message: caps["msg"].trim().to_string(),
    })
}

/// Parse every finding in `text`, in output order.
pub fn parse_output(text: &str) -> Vec<Diagnostic> {
    text.lines().filter_map(parse_line).collect()
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
/// Findings and raw output lines of one file within a combined dump.
pub struct FileSlice {
    pub diags: Vec<Diagnostic>,
    pub raw: String,
}

/// Split a combined dump by file in a single pass.
///
/// `key` maps the path as printed to the grouping key, so different
/// spellings of one file (`./a.py`, `a.py`, `/root/a.py`) land in the same
/// slice. Per-file order is preserved.
pub fn split_by_file<F>(text: &str, key: F) -> BTreeMap<String, FileSlice>
where
    F: Fn(&str) -> String,
{
    let mut out: BTreeMap<String, FileSlice> = BTreeMap::new();
    for line in text.lines() {
        let d = match parse_line(line) {
            Some(d) => d,
            None => continue,
        };
        let slice = out.entry(key(&d.path)).or_default();
        if !slice.raw.is_empty() {
            slice.raw.push('\n');
        }
        slice.raw.push_str(line.trim_end_matches(&['\r', '\n'][..]));
        slice.diags.push(d);
    }
    out
}
