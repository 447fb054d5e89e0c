//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call sleep methods. Waiting happens on
//! I/O (channels, sockets, terminal events).
//! **Exception**: frame rate limiting in the TUI event loop.

use std::path::Path;

use architectural_enforcement::{find_violations, CodeLine, PRODUCTION_DIRS};

/// Check if sleep is used for frame rate limiting (acceptable in the TUI app)
fn is_frame_limiting_context(path: &Path, lines: &[CodeLine], idx: usize) -> bool {
    if !path.ends_with("tui/src/app.rs") {
        return false;
    }

    let start = idx.saturating_sub(10);
    let end = (idx + 5).min(lines.len());
    lines[start..end].iter().any(|line| {
        let code = line.code.to_lowercase();
        code.contains("frame") || code.contains("fps")
    })
}

fn is_sleep_call(code: &str) -> bool {
    code.contains("::sleep(") || code.contains(".sleep(")
}

#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_violations(PRODUCTION_DIRS, |path, lines, idx| {
        let code = &lines[idx].code;
        if code.contains("thread::sleep") {
            return Some("Blocking thread sleep".to_string());
        }
        if is_sleep_call(code) && !is_frame_limiting_context(path, lines, idx) {
            return Some("Sleep outside frame limiting".to_string());
        }
        None
    });

    assert!(
        violations.is_empty(),
        "Found {} sleep violation(s) in production code:\n{}",
        violations.len(),
        violations.join("\n")
    );
}

#[test]
fn test_sleep_detection() {
    assert!(is_sleep_call("    tokio::time::sleep(Duration::from_millis(10)).await;"));
    assert!(!is_sleep_call("    let asleep = true;"));
}
