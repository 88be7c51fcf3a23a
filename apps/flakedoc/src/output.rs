//! Console output for `run` and `ingest`.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-file fields, a top-level summary and per-file failures.

use crate::config::OutputMode;
use crate::error::Result;
use crate::models::catalog::{describe, Priority};
use crate::pipeline::Batch;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: OutputMode) -> bool {
    output != OutputMode::Json && std::env::var_os("NO_COLOR").is_none()
}

fn priority_icon(p: Option<Priority>, color: bool) -> String {
    let icon = match p {
        None => "✔",
        Some(Priority::Critical | Priority::High) => "✖",
        Some(Priority::Medium) => "▲",
        Some(Priority::Low) => "◆",
    };
    if !color {
        return icon.to_string();
    }
    match p {
        None => icon.green().to_string(),
        Some(Priority::Critical) => icon.red().bold().to_string(),
        Some(Priority::High) => icon.red().to_string(),
        Some(Priority::Medium) => icon.yellow().to_string(),
        Some(Priority::Low) => icon.blue().to_string(),
    }
}

/// Print a batch in the requested format.
pub fn print_batch(batch: &Batch, output: OutputMode) -> Result<()> {
    match output {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&compose_batch_json(batch)?)?);
        }
        OutputMode::Human => {
            for line in compose_batch_human(batch, use_colors(output)) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Human lines (pure) for testing purposes.
pub fn compose_batch_human(batch: &Batch, color: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for e in &batch.summary.entries {
        let file = if color {
            e.source.clone().bold().to_string()
        } else {
            e.source.clone()
        };
        let prio = e
            .max_priority
            .map(|p| format!(" ❲{}❳", p.label().to_lowercase()))
            .unwrap_or_default();
        lines.push(format!(
            "{} {} — {} issue(s){} → {}",
            priority_icon(e.max_priority, color),
            file,
            e.total,
            prio,
            e.report
        ));
    }
    for f in &batch.failures {
        let tag = if color {
            "⟦failed⟧".red().bold().to_string()
        } else {
            "⟦failed⟧".to_string()
        };
        lines.push(format!("{} {} — {}", tag, f.file, f.message));
    }
    let s = &batch.summary;
    let summary = format!(
        "— Summary — files={} with_issues={} issues={} failed={} written={}",
        s.files,
        s.files_with_issues,
        s.total,
        batch.failures.len(),
        batch.written.len()
    );
    lines.push(if color {
        summary.bold().to_string()
    } else {
        summary
    });
    lines
}

/// Compose batch JSON object (pure) for testing/snapshot purposes.
pub fn compose_batch_json(batch: &Batch) -> Result<JsonVal> {
    Ok(json!({
        "files": serde_json::to_value(&batch.reports)?,
        "summary": serde_json::to_value(&batch.summary)?,
        "errors": serde_json::to_value(&batch.failures)?,
        "written": batch
            .written
            .iter()
            .map(|p| p.to_string_lossy().to_string())
            .collect::<Vec<_>>(),
    }))
}

/// Print the description and priority of one code for `flakedoc explain`.
pub fn print_explain(code: &str, output: OutputMode) -> Result<()> {
    match output {
        OutputMode::Json => {
            println!("{}", serde_json::to_string_pretty(&compose_explain_json(code))?);
        }
        OutputMode::Human => {
            let code = code.trim().to_ascii_uppercase();
            let prio = Priority::classify(&code);
            let desc = describe(&code).unwrap_or("not in the built-in catalog");
            println!("{} {}: {}", priority_icon(Some(prio), use_colors(output)), code, desc);
            println!("priority: {}", prio);
            println!("{}", prio.hint());
        }
    }
    Ok(())
}

/// Explain JSON object (pure).
pub fn compose_explain_json(code: &str) -> JsonVal {
    let code = code.trim().to_ascii_uppercase();
    json!({
        "code": code,
        "description": describe(&code),
        "priority": Priority::classify(&code),
    })
}
