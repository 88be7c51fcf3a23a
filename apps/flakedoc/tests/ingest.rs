//! End-to-end: a saved flake8 dump becomes per-file reports and a summary.

use flakedoc::config::{resolve_effective, Overrides};
use flakedoc::pipeline::{ingest, SUMMARY_FILE};
use std::fs;
use tempfile::tempdir;

const DUMP: &str = "\
security/ai_agents/orchestrator.py:1:1: F401 'typing.Any' imported but unused
security/ai_agents/orchestrator.py:14:80: E501 line too long (112 > 79 characters)
security/ai_agents/orchestrator.py:15:1: W293 whitespace on blank line
security/ai_agents/orchestrator.py:22:1: W293 whitespace on blank line
security/family/parental_controls.py:7:15: F541 f-string is missing placeholders
scripts/setup_env.py:3:1: E302 expected 2 blank lines, found 1
5     W293 whitespace on blank line
";

#[test]
fn ingest_writes_one_report_per_file() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(
        root.join("flakedoc.toml"),
        "out_dir = \"reports\"\n[report]\nmax_output_lines = 3\n",
    )
    .unwrap();
    let eff = resolve_effective(&Overrides {
        repo_root: root.to_str().map(str::to_string),
        ..Overrides::default()
    })
    .unwrap();

    let batch = ingest(&eff, DUMP, false).unwrap();
    assert_eq!(batch.reports.len(), 3);
    assert_eq!(batch.summary.total, 6);

    let out = root.join("reports");
    let mut names: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "SUMMARY.md",
            "scripts__setup_env.py.md",
            "security__ai_agents__orchestrator.py.md",
            "security__family__parental_controls.py.md",
        ]
    );

    let md = fs::read_to_string(out.join("security__ai_agents__orchestrator.py.md")).unwrap();
    assert!(md.contains("**Total issues:** 4"));
    assert!(md.contains("| W293 | 2 | whitespace on blank line | Low |"));
    assert!(md.contains("### High priority"));
    assert!(md.contains("... (1 more lines truncated)"));

    let summary = fs::read_to_string(out.join(SUMMARY_FILE)).unwrap();
    assert!(summary.contains(
        "| [security/ai_agents/orchestrator.py](security__ai_agents__orchestrator.py.md) | 4 | High |"
    ));
    assert!(summary.contains("| W293 | 2 |"));
}
