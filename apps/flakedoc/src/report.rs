//! Build `LintReport`s from parsed diagnostics and aggregate them into a
//! `RunSummary`.

use crate::models::catalog::{describe, Priority};
use crate::models::{CodeStat, Diagnostic, FileEntry, LintReport, RunSummary};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Build the report for one source file.
///
/// `max_output_lines == 0` keeps the raw output untruncated.
pub fn build_report(
    source: &str,
    diags: &[Diagnostic],
    raw_output: &str,
    analyzed_at: DateTime<Utc>,
    max_output_lines: usize,
) -> LintReport {
    let mut codes: BTreeMap<String, CodeStat> = BTreeMap::new();
    for d in diags {
        codes
            .entry(d.code.clone())
            .and_modify(|s| s.count += 1)
            .or_insert_with(|| CodeStat {
                count: 1,
                description: describe(&d.code)
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback_description(&d.message)),
                priority: Priority::classify(&d.code),
            });
    }
    let (raw, truncated_lines) = truncate_lines(raw_output, max_output_lines);
    LintReport {
        source: source.to_string(),
        analyzed_at,
        total: diags.len(),
        codes,
        raw_output: raw,
        truncated_lines,
    }
}

/// Description for codes missing from the catalog: the flake8 message with
/// a trailing parenthesised detail removed, e.g. `(85 > 79 characters)`.
fn fallback_description(message: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\s*\([^()]*\)\s*$").expect("static regex"));
    let out = re.replace(message.trim(), "").to_string();
    if out.is_empty() {
        message.trim().to_string()
    } else {
        out
    }
}

/// Keep the first `max` lines; returns the kept text and how many lines were dropped.
fn truncate_lines(text: &str, max: usize) -> (String, usize) {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    if max == 0 || lines.len() <= max {
        return (lines.join("\n"), 0);
    }
    (lines[..max].join("\n"), lines.len() - max)
}

/// File name of the Markdown report for `source`.
///
/// Path separators become `__` so reports of different directories never
/// collide in the flat output directory.
pub fn report_file_name(source: &str) -> String {
    let mut s = source.replace('\\', "/");
    // drive prefix like `C:`
    if s.len() >= 2 && s.as_bytes()[1] == b':' && s.as_bytes()[0].is_ascii_alphabetic() {
        s = s[2..].to_string();
    }
    while let Some(rest) = s.strip_prefix("./") {
        s = rest.to_string();
    }
    let trimmed = s.trim_start_matches('/');
    let parts: Vec<&str> = trimmed
        .split('/')
        .filter(|p| !p.is_empty() && *p != ".")
        .collect();
    format!("{}.md", parts.join("__"))
}

/// Aggregate a batch of reports. Entries are ordered by total (desc), then path.
pub fn summarize(reports: &[LintReport]) -> RunSummary {
    let mut summary = RunSummary {
        files: reports.len(),
        ..RunSummary::default()
    };
    for r in reports {
        summary.total += r.total;
        if !r.is_clean() {
            summary.files_with_issues += 1;
        }
        for (code, stat) in &r.codes {
            *summary.by_code.entry(code.clone()).or_insert(0) += stat.count;
            *summary.by_priority.entry(stat.priority).or_insert(0) += stat.count;
        }
        summary.entries.push(FileEntry {
            source: r.source.clone(),
            total: r.total,
            report: report_file_name(&r.source),
            max_priority: r.max_priority(),
        });
    }
    summary
        .entries
        .sort_by(|a, b| b.total.cmp(&a.total).then(a.source.cmp(&b.source)));
    summary
}

/// True when any report has a finding at or above `threshold`.
pub fn meets_threshold(reports: &[LintReport], threshold: Priority) -> bool {
    reports
        .iter()
        .filter_map(LintReport::max_priority)
        .any(|p| p >= threshold)
}
