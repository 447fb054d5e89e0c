//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: Async functions in production code MUST NOT use blocking I/O.
//! **Required**: `tokio::io`, `tokio::net` and async `reqwest` inside async code.
//! Synchronous helpers (config loading, logging setup) may use `std::fs`.

use architectural_enforcement::{find_violations, is_in_async_function, PRODUCTION_DIRS};

fn blocking_io_kind(code: &str) -> Option<&'static str> {
    if code.contains("std::fs::") {
        Some("Blocking file I/O")
    } else if code.contains("std::net::") {
        Some("Blocking network I/O")
    } else if code.contains("std::process::Command") {
        Some("Blocking process I/O")
    } else if code.contains("std::io::stdin()") || code.contains("std::io::stdout()") {
        Some("Blocking stdin/stdout")
    } else {
        None
    }
}

#[test]
fn test_no_blocking_io_in_async_code() {
    let violations = find_violations(PRODUCTION_DIRS, |_, lines, idx| {
        let kind = blocking_io_kind(&lines[idx].code)?;
        is_in_async_function(lines, idx).then(|| kind.to_string())
    });

    assert!(
        violations.is_empty(),
        "Found {} blocking I/O violation(s) in async code:\n{}",
        violations.len(),
        violations.join("\n")
    );
}

#[test]
fn test_no_blocking_http_client() {
    let violations = find_violations(PRODUCTION_DIRS, |_, lines, idx| {
        lines[idx]
            .code
            .contains("reqwest::blocking")
            .then(|| "Blocking HTTP client".to_string())
    });

    assert!(violations.is_empty(), "{}", violations.join("\n"));
}

#[test]
fn test_blocking_io_detection() {
    assert_eq!(
        blocking_io_kind("let s = std::fs::read_to_string(path)?;"),
        Some("Blocking file I/O")
    );
    assert_eq!(blocking_io_kind("let s = tokio::fs::read(path).await?;"), None);
}
