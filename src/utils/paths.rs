// Path display helpers
//
// Reports show paths relative to the scanned root, Unix-style, so output is
// stable across machines and platforms.

use std::path::Path;

/// Relative Unix-style form of `path` under `root`.
///
/// Falls back to the path as given when it is not under `root`.
pub fn to_relative_unix_style(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let display = relative.to_string_lossy().replace('\\', "/");
    if display.is_empty() {
        // The root itself was a file
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().replace('\\', "/"))
    } else {
        display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_relative_path_under_root() {
        let root = PathBuf::from("/home/dev/site");
        let file = root.join("src").join("app.css");
        assert_eq!(to_relative_unix_style(&file, &root), "src/app.css");
    }

    #[test]
    fn test_path_outside_root_is_kept() {
        let root = PathBuf::from("/home/dev/site");
        let file = PathBuf::from("/tmp/other.js");
        assert_eq!(to_relative_unix_style(&file, &root), "/tmp/other.js");
    }

    #[test]
    fn test_root_is_the_file() {
        let file = PathBuf::from("/home/dev/site/index.html");
        assert_eq!(to_relative_unix_style(&file, &file), "index.html");
    }
}
