//! Shared data models for parsed diagnostics, per-file reports and batch summaries.

pub mod catalog;

use catalog::Priority;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// One flake8 finding: `path:row:col: CODE message`.
pub struct Diagnostic {
    pub path: String,
    pub row: usize,
    pub col: usize,
    pub code: String,
    pub message: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// Count and description of one code within a report.
pub struct CodeStat {
    pub count: usize,
    pub description: String,
    pub priority: Priority,
}

#[derive(Serialize, Debug, Clone)]
/// Lint report for a single source file. Built once, never mutated.
pub struct LintReport {
    pub source: String,
    pub analyzed_at: DateTime<Utc>,
    pub total: usize,
    pub codes: BTreeMap<String, CodeStat>,
    pub raw_output: String,
    /// Lines of raw output dropped by truncation.
    pub truncated_lines: usize,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.total == 0
    }

    /// Highest priority among the report's codes, `None` when clean.
    pub fn max_priority(&self) -> Option<Priority> {
        self.codes.values().map(|s| s.priority).max()
    }

    /// Codes grouped by priority, highest priority first. Codes inside a
    /// group keep ascending code order; absent priorities are skipped.
    pub fn by_priority(&self) -> Vec<(Priority, Vec<(&str, &CodeStat)>)> {
        Priority::DESCENDING
            .iter()
            .filter_map(|p| {
                let items: Vec<(&str, &CodeStat)> = self
                    .codes
                    .iter()
                    .filter(|(_, s)| s.priority == *p)
                    .map(|(c, s)| (c.as_str(), s))
                    .collect();
                if items.is_empty() {
                    None
                } else {
                    Some((*p, items))
                }
            })
            .collect()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// Per-file line of a batch summary.
pub struct FileEntry {
    pub source: String,
    pub total: usize,
    pub report: String,
    pub max_priority: Option<Priority>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
/// Aggregated counts across a batch of reports.
pub struct RunSummary {
    pub files: usize,
    pub files_with_issues: usize,
    pub total: usize,
    pub by_code: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    pub entries: Vec<FileEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(count: usize, priority: Priority) -> CodeStat {
        CodeStat {
            count,
            description: String::new(),
            priority,
        }
    }

    #[test]
    fn test_by_priority_orders_groups_and_skips_empty() {
        let mut codes = BTreeMap::new();
        codes.insert("W293".to_string(), stat(4, Priority::Low));
        codes.insert("F401".to_string(), stat(2, Priority::High));
        codes.insert("E501".to_string(), stat(7, Priority::Medium));
        codes.insert("F541".to_string(), stat(1, Priority::High));
        let report = LintReport {
            source: "a.py".into(),
            analyzed_at: Utc::now(),
            total: 14,
            codes,
            raw_output: String::new(),
            truncated_lines: 0,
        };
        let groups = report.by_priority();
        let prios: Vec<Priority> = groups.iter().map(|(p, _)| *p).collect();
        assert_eq!(prios, vec![Priority::High, Priority::Medium, Priority::Low]);
        let high: Vec<&str> = groups[0].1.iter().map(|(c, _)| *c).collect();
        assert_eq!(high, vec!["F401", "F541"]);
        assert_eq!(report.max_priority(), Some(Priority::High));
        assert!(!report.is_clean());
    }
}
