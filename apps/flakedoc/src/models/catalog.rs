//! Static knowledge about flake8 codes: short descriptions and the
//! remediation priority each code is filed under in reports.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
/// Remediation priority. Ordering is `Low < Medium < High < Critical`.
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// All priorities, highest first (report order).
    pub const DESCENDING: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    /// File a flake8 code under a priority.
    ///
    /// - Critical: `E9xx`, `F63x`, `F7xx`, `F82x`, `F811` (code that may not run).
    /// - High: other pyflakes `F` codes, `E722`, `W605`, `C9xx`.
    /// - Medium: remaining `E` codes outside the `E1`/`E2`/`E3` layout classes.
    /// - Low: whitespace/layout (`W`, `E1xx`-`E3xx`) and unknown prefixes.
    pub fn classify(code: &str) -> Priority {
        let split = code
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(code.len());
        let (prefix, digits) = code.split_at(split);
        let num: u32 = match digits.parse() {
            Ok(n) => n,
            Err(_) => return Priority::Low,
        };
        match prefix {
            "E" => match num {
                900..=999 => Priority::Critical,
                722 => Priority::High,
                100..=399 => Priority::Low,
                _ => Priority::Medium,
            },
            "F" => match num {
                630..=639 | 700..=799 | 820..=829 | 811 => Priority::Critical,
                _ => Priority::High,
            },
            "W" if num == 605 => Priority::High,
            "C" if (900..=999).contains(&num) => Priority::High,
            _ => Priority::Low,
        }
    }

    /// Title-case label used in Markdown headings and tables.
    pub fn label(self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// One-sentence remediation hint for the recommendations section.
    pub fn hint(self) -> &'static str {
        match self {
            Priority::Critical => {
                "Fix immediately: these findings indicate code that fails to parse or names that do not resolve at runtime."
            }
            Priority::High => {
                "Fix soon: likely bugs or dead code such as unused imports, unused variables and bare excepts."
            }
            Priority::Medium => {
                "Schedule cleanup: style issues that hurt readability, such as long lines and misplaced imports."
            }
            Priority::Low => {
                "Cosmetic: whitespace and blank-line issues, usually fixed automatically by a formatter."
            }
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            _ => Err(Error::InvalidValue {
                key: "fail_on",
                value: s.to_string(),
                expected: "low|medium|high|critical",
            }),
        }
    }
}

/// Short description of a well-known flake8 code (pycodestyle, pyflakes, mccabe).
pub fn describe(code: &str) -> Option<&'static str> {
    let d = match code {
        // pycodestyle: indentation
        "E101" => "indentation contains mixed spaces and tabs",
        "E111" => "indentation is not a multiple of four",
        "E112" => "expected an indented block",
        "E113" => "unexpected indentation",
        "E114" => "indentation is not a multiple of four (comment)",
        "E115" => "expected an indented block (comment)",
        "E116" => "unexpected indentation (comment)",
        "E117" => "over-indented",
        "E121" => "continuation line under-indented for hanging indent",
        "E122" => "continuation line missing indentation or outdented",
        "E123" => "closing bracket does not match indentation of opening bracket's line",
        "E124" => "closing bracket does not match visual indentation",
        "E125" => "continuation line with same indent as next logical line",
        "E126" => "continuation line over-indented for hanging indent",
        "E127" => "continuation line over-indented for visual indent",
        "E128" => "continuation line under-indented for visual indent",
        "E129" => "visually indented line with same indent as next logical line",
        "E131" => "continuation line unaligned for hanging indent",
        // pycodestyle: whitespace
        "E201" => "whitespace after '('",
        "E202" => "whitespace before ')'",
        "E203" => "whitespace before ':'",
        "E211" => "whitespace before '('",
        "E221" => "multiple spaces before operator",
        "E222" => "multiple spaces after operator",
        "E225" => "missing whitespace around operator",
        "E226" => "missing whitespace around arithmetic operator",
        "E228" => "missing whitespace around modulo operator",
        "E231" => "missing whitespace after ','",
        "E241" => "multiple spaces after ','",
        "E251" => "unexpected spaces around keyword / parameter equals",
        "E261" => "at least two spaces before inline comment",
        "E262" => "inline comment should start with '# '",
        "E265" => "block comment should start with '# '",
        "E266" => "too many leading '#' for block comment",
        "E271" => "multiple spaces after keyword",
        // pycodestyle: blank lines
        "E301" => "expected 1 blank line",
        "E302" => "expected 2 blank lines",
        "E303" => "too many blank lines",
        "E304" => "blank lines found after function decorator",
        "E305" => "expected 2 blank lines after class or function definition",
        "E306" => "expected 1 blank line before a nested definition",
        // pycodestyle: imports, line length, statements
        "E401" => "multiple imports on one line",
        "E402" => "module level import not at top of file",
        "E501" => "line too long",
        "E502" => "the backslash is redundant between brackets",
        "E701" => "multiple statements on one line (colon)",
        "E702" => "multiple statements on one line (semicolon)",
        "E703" => "statement ends with a semicolon",
        "E711" => "comparison to None should be 'if cond is None:'",
        "E712" => "comparison to True should be 'if cond is True:' or 'if cond:'",
        "E713" => "test for membership should be 'not in'",
        "E714" => "test for object identity should be 'is not'",
        "E721" => "do not compare types, use 'isinstance()'",
        "E722" => "do not use bare 'except'",
        "E731" => "do not assign a lambda expression, use a def",
        "E741" => "ambiguous variable name",
        "E902" => "IOError",
        "E999" => "SyntaxError or IndentationError",
        // pycodestyle: warnings
        "W191" => "indentation contains tabs",
        "W291" => "trailing whitespace",
        "W292" => "no newline at end of file",
        "W293" => "whitespace on blank line",
        "W391" => "blank line at end of file",
        "W503" => "line break before binary operator",
        "W504" => "line break after binary operator",
        "W605" => "invalid escape sequence",
        // pyflakes
        "F401" => "module imported but unused",
        "F403" => "'from module import *' used; unable to detect undefined names",
        "F405" => "name may be undefined, or defined from star imports",
        "F541" => "f-string is missing placeholders",
        "F632" => "use ==/!= to compare constant literals",
        "F811" => "redefinition of unused name",
        "F821" => "undefined name",
        "F841" => "local variable is assigned to but never used",
        // mccabe
        "C901" => "function is too complex",
        _ => return None,
    };
    Some(d)
}
