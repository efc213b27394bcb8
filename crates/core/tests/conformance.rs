//! Parses every program under conformance/. Files in positive/ must parse;
//! files in negative/ must fail as announced by their first line:
//!
//! ```text
//! // expect: <kind> <line>:<column>
//! ```

use std::path::{Path, PathBuf};

use coverilang_core::parse_source;

fn conformance_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../conformance")
}

fn collect_cvt_files(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", dir.display(), e))
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|e| e == "cvt"))
        .collect();
    paths.sort();
    paths
}

fn expectation(src: &str) -> Option<(String, u32, u32)> {
    let rest = src.lines().next()?.strip_prefix("// expect:")?;
    let mut parts = rest.split_whitespace();
    let kind = parts.next()?.to_owned();
    let (line, column) = parts.next()?.split_once(':')?;
    Some((kind, line.parse().ok()?, column.parse().ok()?))
}

#[test]
fn positive_programs_parse() {
    let files = collect_cvt_files(&conformance_root().join("positive"));
    assert!(!files.is_empty());
    let mut failures = Vec::new();
    for path in &files {
        let src = std::fs::read_to_string(path).unwrap();
        if let Err(e) = parse_source(&src) {
            failures.push(format!("{}: {}", path.display(), e));
        }
    }
    assert!(failures.is_empty(), "failures:\n{}", failures.join("\n"));
}

#[test]
fn negative_programs_fail_where_announced() {
    let files = collect_cvt_files(&conformance_root().join("negative"));
    assert!(!files.is_empty());
    let mut failures = Vec::new();
    for path in &files {
        let src = std::fs::read_to_string(path).unwrap();
        let Some((kind, line, column)) = expectation(&src) else {
            failures.push(format!("{}: missing '// expect:' header", path.display()));
            continue;
        };
        match parse_source(&src) {
            Ok(_) => failures.push(format!("{}: parsed but should not", path.display())),
            Err(e) => {
                let pos = e.position();
                if e.kind() != kind || pos.line != line || pos.column != column {
                    failures.push(format!(
                        "{}: expected {} at {}:{}, got {} at {} ({})",
                        path.display(),
                        kind,
                        line,
                        column,
                        e.kind(),
                        pos,
                        e
                    ));
                }
                if e.is_internal() {
                    failures.push(format!("{}: internal error {}", path.display(), e));
                }
            }
        }
    }
    assert!(failures.is_empty(), "failures:\n{}", failures.join("\n"));
}
