//! Configuration discovery and effective settings resolution.
//!
//! flakedoc reads `flakedoc.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config.
//! Defaults:
//! - `patterns`: `["**/*.py"]`
//! - `exclude`: VCS, virtualenv and cache directories
//! - `out_dir`: `lint-reports`
//! - `output`: `human`
//! - `fail_on`: unset (never fail on findings)
//! - `flake8.bin`: `flake8`, `flake8.args`: `[]`
//! - `report.max_output_lines`: 50, `report.summary`: true
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{Error, Result};
use crate::models::catalog::Priority;
use crate::runner::Tool;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILES: [&str; 3] = ["flakedoc.toml", "flakedoc.yaml", "flakedoc.yml"];

pub const DEFAULT_PATTERNS: [&str; 1] = ["**/*.py"];
pub const DEFAULT_EXCLUDE: [&str; 5] = [
    ".git/**",
    ".venv/**",
    "venv/**",
    "**/__pycache__/**",
    "node_modules/**",
];
pub const DEFAULT_OUT_DIR: &str = "lint-reports";
pub const DEFAULT_MAX_OUTPUT_LINES: usize = 50;

#[derive(Debug, Default, Deserialize, Clone)]
/// `[flake8]` section: how the tool is invoked.
pub struct Flake8Cfg {
    pub bin: Option<String>,
    pub args: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// `[report]` section: rendering knobs.
pub struct ReportCfg {
    pub max_output_lines: Option<usize>,
    pub summary: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `flakedoc.toml|yaml`.
pub struct FlakedocConfig {
    pub patterns: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub out_dir: Option<String>,
    pub output: Option<String>,
    pub fail_on: Option<String>,
    pub flake8: Option<Flake8Cfg>,
    pub report: Option<ReportCfg>,
}

#[derive(Debug, Default, Clone)]
/// Values given on the command line; `None` means "not given".
pub struct Overrides {
    pub repo_root: Option<String>,
    pub out_dir: Option<String>,
    pub output: Option<String>,
    pub fail_on: Option<String>,
    pub flake8_bin: Option<String>,
    pub max_output_lines: Option<usize>,
    pub no_summary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "human" => Ok(OutputMode::Human),
            "json" => Ok(OutputMode::Json),
            _ => Err(Error::InvalidValue {
                key: "output",
                value: s.to_string(),
                expected: "human|json",
            }),
        }
    }
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    /// Config file that was loaded, if any.
    pub config_path: Option<PathBuf>,
    pub patterns: Vec<String>,
    pub exclude: Vec<String>,
    /// Absolute output directory.
    pub out_dir: PathBuf,
    pub output: OutputMode,
    pub fail_on: Option<Priority>,
    pub tool: Tool,
    pub max_output_lines: usize,
    pub summary: bool,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `flakedoc.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) if !p.as_os_str().is_empty() => cur = p,
            _ => return start.to_path_buf(),
        }
    }
}

/// Load `FlakedocConfig` from the first config file present in `root`.
///
/// Returns `Ok(None)` when there is no config file; a file that exists but
/// does not parse is an error.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, FlakedocConfig)>> {
    for name in CONFIG_FILES {
        let path = root.join(name);
        if !path.exists() {
            continue;
        }
        let s = fs::read_to_string(&path).map_err(|e| Error::path_io(&path, e))?;
        let cfg: FlakedocConfig = if name.ends_with(".toml") {
            toml::from_str(&s).map_err(|e| Error::ConfigParse {
                path: path.clone(),
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(&s).map_err(|e| Error::ConfigParse {
                path: path.clone(),
                message: e.to_string(),
            })?
        };
        return Ok(Some((path, cfg)));
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &Overrides) -> Result<Effective> {
    let start = PathBuf::from(cli.repo_root.as_deref().unwrap_or("."));
    let start = start.canonicalize().unwrap_or(start);
    let repo_root = detect_repo_root(&start);
    let (config_path, cfg) = match load_config(&repo_root)? {
        Some((p, c)) => (Some(p), c),
        None => (None, FlakedocConfig::default()),
    };

    let patterns = cfg
        .patterns
        .unwrap_or_else(|| DEFAULT_PATTERNS.iter().map(|s| s.to_string()).collect());
    let exclude = cfg
        .exclude
        .unwrap_or_else(|| DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect());

    let out_dir = cli
        .out_dir
        .clone()
        .or(cfg.out_dir)
        .unwrap_or_else(|| DEFAULT_OUT_DIR.to_string());
    let out_dir = repo_root.join(out_dir);

    let output = OutputMode::parse(
        cli.output
            .as_deref()
            .or(cfg.output.as_deref())
            .unwrap_or("human"),
    )?;

    let fail_on = match cli.fail_on.as_deref().or(cfg.fail_on.as_deref()) {
        Some(s) => Some(s.parse::<Priority>()?),
        None => None,
    };

    let flake8 = cfg.flake8.unwrap_or_default();
    let tool = Tool {
        bin: cli
            .flake8_bin
            .clone()
            .or(flake8.bin)
            .unwrap_or_else(|| Tool::default().bin),
        args: flake8.args.unwrap_or_default(),
    };

    let report = cfg.report.unwrap_or_default();
    let max_output_lines = cli
        .max_output_lines
        .or(report.max_output_lines)
        .unwrap_or(DEFAULT_MAX_OUTPUT_LINES);
    let summary = !cli.no_summary && report.summary.unwrap_or(true);

    Ok(Effective {
        repo_root,
        config_path,
        patterns,
        exclude,
        out_dir,
        output,
        fail_on,
        tool,
        max_output_lines,
        summary,
    })
}
