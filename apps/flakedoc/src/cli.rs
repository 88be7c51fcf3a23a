//! CLI argument parsing via `clap`.

use crate::config::Overrides;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "flakedoc",
    version,
    about = "Per-file flake8 reports in Markdown",
    long_about = "flakedoc runs flake8 on each Python file (or reads a saved flake8 dump) and writes one Markdown report per file plus a SUMMARY.md.\n\nConfiguration precedence: CLI > flakedoc.toml > defaults.",
    after_help = "Examples:\n  flakedoc run\n  flakedoc run security/ai_agents/agent.py --out-dir docs/lint\n  flake8 . > flake8.txt && flakedoc ingest flake8.txt\n  flakedoc explain W293",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "More log output on stderr (repeatable)")]
    pub verbose: u8,
    #[arg(short, long, global = true, action = clap::ArgAction::SetTrue, help = "Only log errors")]
    pub quiet: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Clone, Default)]
/// Options shared by commands that produce reports.
pub struct ReportArgs {
    #[arg(long, help = "Repository root (default: current dir)")]
    pub repo_root: Option<String>,
    #[arg(long, help = "Directory for the Markdown reports (default: lint-reports)")]
    pub out_dir: Option<String>,
    #[arg(long, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
    #[arg(long, help = "Raw output lines kept per report, 0 = all (default: 50)")]
    pub max_lines: Option<usize>,
    #[arg(long, help = "Exit 1 when a finding reaches this priority: low|medium|high|critical")]
    pub fail_on: Option<String>,
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Build reports without writing files")]
    pub dry_run: bool,
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Do not write SUMMARY.md")]
    pub no_summary: bool,
}

impl ReportArgs {
    pub fn overrides(&self, flake8_bin: Option<String>) -> Overrides {
        Overrides {
            repo_root: self.repo_root.clone(),
            out_dir: self.out_dir.clone(),
            output: self.output.clone(),
            fail_on: self.fail_on.clone(),
            flake8_bin,
            max_output_lines: self.max_lines,
            no_summary: self.no_summary,
        }
    }
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current flakedoc version.")]
    Version,
    /// Run flake8 and write reports
    #[command(
        about = "Run flake8 per file and write reports",
        long_about = "Invoke flake8 once per file (in parallel) and write one Markdown report per file. Without FILES, the configured patterns are used.",
        after_help = "Examples:\n  flakedoc run\n  flakedoc run scripts/deploy.py --dry-run --output json"
    )]
    Run {
        #[command(flatten)]
        args: ReportArgs,
        #[arg(long, help = "flake8 executable (default: flake8)")]
        flake8: Option<String>,
        #[arg(help = "Files to analyse, relative to the repository root")]
        files: Vec<String>,
    },
    /// Build reports from saved flake8 output
    #[command(
        about = "Write reports from a saved flake8 dump",
        long_about = "Parse flake8's default text output from a file (or '-' for stdin), group findings by file, and write the reports.",
        after_help = "Examples:\n  flakedoc ingest flake8.txt\n  flake8 security | flakedoc ingest -"
    )]
    Ingest {
        #[command(flatten)]
        args: ReportArgs,
        #[arg(help = "flake8 output file, or '-' for stdin")]
        input: String,
    },
    /// Describe a flake8 code
    #[command(
        about = "Describe a flake8 code",
        long_about = "Print the catalog description and remediation priority of a flake8 code."
    )]
    Explain {
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(help = "Code such as E501 or W293")]
        code: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_files_and_flags() {
        let cli = Cli::try_parse_from([
            "flakedoc", "-vv", "run", "--out-dir", "docs/lint", "--fail-on", "high", "--flake8",
            "/opt/flake8", "a.py", "b.py",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.cmd {
            Commands::Run { args, flake8, files } => {
                assert_eq!(files, vec!["a.py", "b.py"]);
                let ov = args.overrides(flake8);
                assert_eq!(ov.out_dir.as_deref(), Some("docs/lint"));
                assert_eq!(ov.fail_on.as_deref(), Some("high"));
                assert_eq!(ov.flake8_bin.as_deref(), Some("/opt/flake8"));
                assert!(!ov.no_summary);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_ingest_stdin() {
        let cli = Cli::try_parse_from(["flakedoc", "ingest", "-", "--dry-run", "-q"]).unwrap();
        assert!(cli.quiet);
        match cli.cmd {
            Commands::Ingest { args, input } => {
                assert_eq!(input, "-");
                assert!(args.dry_run);
            }
            _ => panic!("expected ingest"),
        }
    }
}
