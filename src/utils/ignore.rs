//! Path pattern matching for the `include` / `ignore` config lists
//!
//! Three pattern forms, all matched against the Unix-style path:
//! - `dir/`: a whole directory component, plus everything under it
//! - `*.ext`: a path suffix (`*.min.js`)
//! - anything else: a substring of the path

use std::path::Path;
use tracing::debug;

/// Check if a path matches any of the patterns
///
/// Directory patterns respect component boundaries: "dist/" matches "dist"
/// and "web/dist/app.js" but NOT "my-dist" or "distance.js".
pub fn is_ignored_by_pattern(path: &Path, patterns: &[String]) -> bool {
    matching_pattern(path, patterns).is_some()
}

/// The first pattern matching `path`, if any
pub fn matching_pattern<'p>(path: &Path, patterns: &'p [String]) -> Option<&'p str> {
    if patterns.is_empty() {
        return None;
    }

    // Normalize path to Unix-style for consistent pattern matching
    let path_str = path.to_string_lossy().replace('\\', "/");

    patterns
        .iter()
        .map(|pattern| pattern.trim())
        .filter(|pattern| !pattern.is_empty())
        .find(|pattern| matches_pattern(&path_str, pattern))
}

fn matches_pattern(path_str: &str, pattern: &str) -> bool {
    // Directory pattern (ends with /)
    if let Some(dir_name) = pattern.strip_suffix('/') {
        let dir_name = dir_name.trim_start_matches("./");

        // Leading component ("dist/app.js") or exact match ("dist")
        if path_str == dir_name || path_str.starts_with(&format!("{}/", dir_name)) {
            return true;
        }

        // Nested component ("/web/dist/app.js") or trailing component ("web/dist")
        if path_str.contains(&format!("/{}/", dir_name)) {
            return true;
        }
        return path_str.ends_with(&format!("/{}", dir_name));
    }

    // Wildcard suffix pattern (e.g., *.min.js)
    if let Some(suffix) = pattern.strip_prefix('*') {
        return path_str.ends_with(suffix);
    }

    path_str.contains(pattern)
}

/// Apply the include list (empty = everything) and then the ignore list
pub fn is_selected(path: &Path, include: &[String], ignore: &[String]) -> bool {
    if !include.is_empty() && !is_ignored_by_pattern(path, include) {
        debug!("{} not matched by any include pattern", path.display());
        return false;
    }
    if let Some(pattern) = matching_pattern(path, ignore) {
        debug!("{} ignored by pattern '{}'", path.display(), pattern);
        return false;
    }
    true
}
