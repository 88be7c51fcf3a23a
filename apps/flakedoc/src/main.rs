//! flakedoc CLI binary entry point.
//! Resolves configuration, delegates to the pipeline and prints results.

use clap::Parser;
use flakedoc::cli::{Cli, Commands};
use flakedoc::config::{self, Effective, OutputMode, Overrides};
use flakedoc::error::{Error, Result};
use flakedoc::logging::{init_logging, Verbosity};
use flakedoc::{output, pipeline, utils};
use std::process::ExitCode;

fn resolve(ov: &Overrides) -> Result<Effective> {
    let eff = config::resolve_effective(ov)?;
    match &eff.config_path {
        Some(p) => tracing::info!("using config {}", p.display()),
        None => {
            if eff.output != OutputMode::Json {
                eprintln!("{} No flakedoc.toml found; using defaults.", utils::note_prefix());
            }
        }
    }
    Ok(eff)
}

fn exec(cli: Cli) -> Result<ExitCode> {
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Run {
            args,
            flake8,
            files,
        } => {
            let eff = resolve(&args.overrides(flake8))?;
            let batch = pipeline::run(&eff, &files, args.dry_run)?;
            output::print_batch(&batch, eff.output)?;
            if batch.failed(&eff) {
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Ingest { args, input } => {
            let eff = resolve(&args.overrides(None))?;
            let text = pipeline::read_input(&input)?;
            let batch = pipeline::ingest(&eff, &text, args.dry_run)?;
            output::print_batch(&batch, eff.output)?;
            if batch.failed(&eff) {
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Explain { output: out, code } => {
            let mode = match out.as_deref() {
                Some("json") => OutputMode::Json,
                Some("human") | None => OutputMode::Human,
                Some(other) => {
                    return Err(Error::InvalidValue {
                        key: "output",
                        value: other.to_string(),
                        expected: "human|json",
                    })
                }
            };
            output::print_explain(&code, mode)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.quiet, cli.verbose));
    match exec(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            ExitCode::from(2)
        }
    }
}
