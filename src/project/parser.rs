//! Output-block parser.
//!
//! Generation responses introduce each file as `### path/to/file.ext`
//! followed by a fenced code block (the fence may carry a language hint).
//! [`parse_generated_files`] extracts those pairs from one response blob.
//! Parsing is pure: no filesystem access, no errors; a blob with no
//! recognizable blocks yields an empty vec and the caller decides what
//! that means.

use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;

/// One file extracted from a generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the project working directory.
    pub relative_path: String,
    /// File body, trimmed of leading and trailing whitespace.
    pub content: String,
}

/// True when `path` stays inside whatever directory it is joined to:
/// non-empty, relative, and free of `.`/`..` components.
pub fn is_safe_relative_path(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    let path = Path::new(path);
    if path.is_absolute() {
        return false;
    }
    path.components()
        .all(|component| matches!(component, Component::Normal(_)))
}

/// Extract `(path, content)` pairs from a generation response.
///
/// Paths that are absolute or contain parent-directory components are
/// discarded rather than surfaced.
pub fn parse_generated_files(blob: &str) -> Vec<GeneratedFile> {
    static FILE_BLOCK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)###\s+([\w./]+\.\w+)\s+```\w*\n(.*?)```").unwrap());

    let mut files = Vec::new();
    for cap in FILE_BLOCK_RE.captures_iter(blob) {
        let relative_path = cap[1].to_string();
        if !is_safe_relative_path(&relative_path) {
            tracing::warn!(path = %relative_path, "Discarding generated file with unsafe path");
            continue;
        }
        files.push(GeneratedFile {
            relative_path,
            content: cap[2].trim().to_string(),
        });
    }
    files
}
