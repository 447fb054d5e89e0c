//! Integration Test: Core Layering
//!
//! The widget core is headless: it must not depend on terminal or CLI
//! crates, and it must not panic on recoverable errors.

use std::fs;

use architectural_enforcement::{find_violations, workspace_root};

const UI_CRATES: &[&str] = &["ratatui", "crossterm", "clap"];

/// rustfmt's default `max_width`
const MAX_LINE_WIDTH: usize = 100;

#[test]
fn test_core_manifest_has_no_ui_crates() {
    let manifest = fs::read_to_string(workspace_root().join("chat/core/Cargo.toml")).unwrap();

    for krate in UI_CRATES {
        assert!(
            !manifest.lines().any(|line| line.trim_start().starts_with(krate)),
            "chat/core must not depend on {krate}"
        );
    }
}

#[test]
fn test_core_sources_have_no_ui_imports() {
    let violations = find_violations(&["chat/core/src"], |_, lines, idx| {
        let code = &lines[idx].code;
        UI_CRATES
            .iter()
            .find(|krate| code.contains(&format!("{krate}::")))
            .map(|krate| format!("UI crate {krate} used in core"))
    });

    assert!(violations.is_empty(), "{}", violations.join("\n"));
}

#[test]
fn test_no_unwrap_in_production_code() {
    let violations = find_violations(&["chat/core/src", "tui/src"], |_, lines, idx| {
        let code = &lines[idx].code;
        (code.contains(".unwrap()") || code.contains(".expect("))
            .then(|| "Panicking unwrap/expect".to_string())
    });

    assert!(violations.is_empty(), "{}", violations.join("\n"));
}

#[test]
fn test_production_lines_fit_rustfmt_width() {
    // Only string literal pieces may run past the limit
    let violations = find_violations(&["chat/core/src", "tui/src"], |_, lines, idx| {
        let code = lines[idx].code.trim_end();
        let trimmed = code.trim_start();
        let literal_piece = trimmed.starts_with('"') || trimmed.ends_with('\\');
        (code.chars().count() > MAX_LINE_WIDTH && !literal_piece)
            .then(|| format!("Line wider than {MAX_LINE_WIDTH} columns"))
    });

    assert!(violations.is_empty(), "{}", violations.join("\n"));
}
