//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No sleep() calls in production code (frame limiting in the TUI excepted)
//! - No blocking I/O inside async functions
//! - The widget core stays free of terminal and CLI crates
//! - No unwrap()/expect() in production code
//! - Production lines fit rustfmt's width
//!
//! The helpers below are shared by the tests in `tests/`.

use std::fs;
use std::path::{Path, PathBuf};

/// Production source roots, relative to the workspace root
pub const PRODUCTION_DIRS: &[&str] = &["chat/core/src", "tui/src"];

/// Workspace root (two levels above this package)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// All `.rs` files under `dir` (relative to the workspace root)
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);
    if !root.exists() {
        return Vec::new();
    }

    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// One line of production code with comments stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLine {
    /// 1-based line number
    pub number: usize,
    /// Code before any `//` comment
    pub code: String,
}

/// Production lines of a source file
///
/// Everything from the first `#[cfg(test)]` on is test code and skipped, as
/// are comment-only lines.
pub fn production_lines(content: &str) -> Vec<CodeLine> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .filter_map(|(idx, line)| {
            let code = line.split("//").next().unwrap_or(line);
            if code.trim().is_empty() {
                None
            } else {
                Some(CodeLine {
                    number: idx + 1,
                    code: code.to_string(),
                })
            }
        })
        .collect()
}

/// Whether a line opens a function
pub fn is_fn_signature(code: &str) -> bool {
    let trimmed = code.trim_start();
    trimmed.starts_with("fn ")
        || trimmed.contains(" fn ")
        || trimmed.starts_with("async fn ")
}

/// Whether the function enclosing `lines[idx]` is `async`
///
/// Scans backwards for the nearest function signature.
pub fn is_in_async_function(lines: &[CodeLine], idx: usize) -> bool {
    lines[..=idx]
        .iter()
        .rev()
        .find(|line| is_fn_signature(&line.code))
        .is_some_and(|line| line.code.contains("async fn "))
}

/// Scan production code, reporting every line `check` flags
pub fn find_violations<F>(dirs: &[&str], mut check: F) -> Vec<String>
where
    F: FnMut(&Path, &[CodeLine], usize) -> Option<String>,
{
    let mut violations = Vec::new();

    for dir in dirs {
        for path in rust_files(dir) {
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            let lines = production_lines(&content);

            for idx in 0..lines.len() {
                if let Some(reason) = check(&path, &lines, idx) {
                    violations.push(format!(
                        "{}:{} - {reason}: {}",
                        path.display(),
                        lines[idx].number,
                        lines[idx].code.trim()
                    ));
                }
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_tests() {
        let content = "fn a() {}\n// comment\n#[cfg(test)]\nmod tests { fn b() {} }\n";
        let lines = production_lines(content);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].number, 1);
    }

    #[test]
    fn test_async_detection() {
        let lines = production_lines(
            "pub async fn load() {\n    let x = std::fs::read(\"a\");\n}\nfn sync() {\n    let y = 1;\n}\n",
        );
        assert!(is_in_async_function(&lines, 1));
        assert!(!is_in_async_function(&lines, 4));
    }

    #[test]
    fn test_workspace_root_contains_members() {
        assert!(workspace_root().join("chat/core/Cargo.toml").exists());
    }
}
