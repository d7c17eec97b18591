//! Candidate file enumeration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};
use walkdir::WalkDir;

/// Default file name pattern
pub const DEFAULT_PATTERN: &str = "*.cs";

/// Rewrite a pattern so that only `*` and `?` are wildcards
///
/// Brackets and braces become one-character classes, and runs of `*` collapse
/// into one since a file name has no separators to cross.
fn escape_pattern(pattern: &str) -> String {
    let mut glob = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        match c {
            '[' | ']' | '{' | '}' => {
                glob.push('[');
                glob.push(c);
                glob.push(']');
            }
            '*' if glob.ends_with('*') => {}
            c => glob.push(c),
        }
    }
    glob
}

/// Compile a file-name pattern (`*` and `?` wildcards, everything else literal)
pub fn compile_pattern(pattern: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(&escape_pattern(pattern))
        .literal_separator(true)
        .backslash_escape(false)
        .build()
        .with_context(|| format!("Invalid search pattern: {}", pattern))?;
    Ok(glob.compile_matcher())
}

/// List the files to process under `root`
///
/// A file root is returned as-is regardless of the pattern. A directory root is
/// walked recursively and files whose name matches `pattern` are returned in
/// file-name order.
pub fn find_files(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        anyhow::bail!("Path does not exist: {}", root.display());
    }

    let matcher = compile_pattern(pattern)?;
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
