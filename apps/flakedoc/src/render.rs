//! Markdown rendering for per-file reports and the batch summary.
//!
//! Per-file layout:
//! - heading with path, analysis time and total
//! - `## Statistics` table (code, count, description, priority)
//! - `## Recommendations` grouped by priority, highest first
//! - `## Raw flake8 output` fenced block, truncated with a trailing note
//!
//! Rendering is pure; writing files is left to the pipeline.

use crate::models::{LintReport, RunSummary};
use std::fmt::Write as _;

const TIME_FMT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Render the Markdown document for one report.
pub fn render_report(r: &LintReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Flake8 Report: {}", r.source);
    out.push('\n');
    let _ = writeln!(out, "**Analyzed:** {}  ", r.analyzed_at.format(TIME_FMT));
    let _ = writeln!(out, "**Total issues:** {}", r.total);
    out.push('\n');

    out.push_str("## Statistics\n\n");
    if r.is_clean() {
        out.push_str("No issues found.\n");
    } else {
        out.push_str("| Code | Count | Description | Priority |\n");
        out.push_str("|------|------:|-------------|----------|\n");
        for (code, stat) in &r.codes {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} |",
                code,
                stat.count,
                escape_cell(&stat.description),
                stat.priority
            );
        }
    }

    let groups = r.by_priority();
    if !groups.is_empty() {
        out.push_str("\n## Recommendations\n");
        for (prio, items) in groups {
            let _ = writeln!(out, "\n### {} priority\n", prio);
            let _ = writeln!(out, "{}\n", prio.hint());
            for (code, stat) in items {
                let _ = writeln!(out, "- **{}** ({}): {}", code, stat.count, stat.description);
            }
        }
    }

    out.push_str("\n## Raw flake8 output\n\n");
    let fence = fence_for(&r.raw_output);
    let _ = writeln!(out, "{}text", fence);
    if !r.raw_output.is_empty() {
        out.push_str(&r.raw_output);
        out.push('\n');
    }
    if r.truncated_lines > 0 {
        let _ = writeln!(out, "... ({} more lines truncated)", r.truncated_lines);
    }
    let _ = writeln!(out, "{}", fence);
    out
}

/// Render the batch summary (`SUMMARY.md`).
pub fn render_summary(s: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str("# Flake8 Summary\n\n");
    let _ = writeln!(out, "- Files analyzed: {}", s.files);
    let _ = writeln!(out, "- Files with issues: {}", s.files_with_issues);
    let _ = writeln!(out, "- Total issues: {}", s.total);

    if !s.by_priority.is_empty() {
        out.push_str("\n## By priority\n\n");
        out.push_str("| Priority | Count |\n|----------|------:|\n");
        for (prio, count) in s.by_priority.iter().rev() {
            let _ = writeln!(out, "| {} | {} |", prio, count);
        }
    }

    out.push_str("\n## Files\n\n");
    if s.entries.is_empty() {
        out.push_str("No files analyzed.\n");
    } else {
        out.push_str("| File | Issues | Highest priority |\n|------|-------:|------------------|\n");
        for e in &s.entries {
            let prio = e.max_priority.map(|p| p.label()).unwrap_or("-");
            let _ = writeln!(
                out,
                "| [{}]({}) | {} | {} |",
                escape_cell(&e.source),
                e.report,
                e.total,
                prio
            );
        }
    }

    if !s.by_code.is_empty() {
        out.push_str("\n## Codes\n\n");
        out.push_str("| Code | Count |\n|------|------:|\n");
        let mut codes: Vec<(&String, &usize)> = s.by_code.iter().collect();
        codes.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (code, count) in codes {
            let _ = writeln!(out, "| {} | {} |", code, count);
        }
    }
    out
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}

/// Backtick fence longer than any backtick run inside `body` (minimum 3).
fn fence_for(body: &str) -> String {
    let mut longest = 0usize;
    let mut run = 0usize;
    for ch in body.chars() {
        if ch == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}
