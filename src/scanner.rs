//! File-level orchestration
//!
//! Resolves the paths given on the command line into a sorted file queue,
//! then reads, detects and classifies one file at a time. Failures local to
//! a file are stored on its report and never stop the queue.

use crate::classify::{classify, passed, FeatureResult, Severity};
use crate::config::Config;
use crate::error::{Result, ScanError};
use crate::language::is_supported_path;
use crate::mapper::FeatureMapper;
use crate::utils::ignore::{is_ignored_by_pattern, is_selected};
use crate::utils::paths::to_relative_unix_style;
use crate::walkers::WalkerManager;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Files above this size are rejected before they are read
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Why a file produced no results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    pub kind: &'static str,
    pub message: String,
}

impl From<&ScanError> for FileError {
    fn from(error: &ScanError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Path relative to the scanned root, Unix-style
    pub path: String,
    pub results: Vec<FeatureResult>,
    /// Parse warnings; detection still ran on the partial tree
    pub warnings: Vec<String>,
    pub error: Option<FileError>,
    pub passed: bool,
}

impl FileReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.results
            .iter()
            .filter(|result| result.severity == severity)
            .count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_files: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub passed_files: usize,
    pub failed_files: usize,
}

impl Summary {
    pub fn from_files(files: &[FileReport]) -> Self {
        let mut summary = Summary {
            total_files: files.len(),
            ..Summary::default()
        };
        for file in files {
            summary.total_errors += file.count(Severity::Error);
            summary.total_warnings += file.count(Severity::Warn);
            if file.passed {
                summary.passed_files += 1;
            } else {
                summary.failed_files += 1;
            }
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub files: Vec<FileReport>,
    pub summary: Summary,
    pub strict: bool,
}

impl ScanReport {
    /// Exit status 0 condition: no errors, no warnings in strict mode, and
    /// no file rejected before detection
    pub fn passed(&self) -> bool {
        self.summary.failed_files == 0
    }
}

/// A file queued for scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedFile {
    pub path: PathBuf,
    /// Name used in reports
    pub display: String,
}

pub struct Scanner<'m> {
    manager: WalkerManager<'m>,
    mapper: &'m FeatureMapper,
    config: Config,
    max_file_size: u64,
}

impl<'m> Scanner<'m> {
    pub fn new(mapper: &'m FeatureMapper, config: Config) -> Self {
        Self {
            manager: WalkerManager::new(mapper),
            mapper,
            config,
            max_file_size: MAX_FILE_SIZE,
        }
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Expand files and directories into the ordered scan queue.
    ///
    /// A path that does not exist is fatal; everything else is per-file.
    pub fn discover(&self, paths: &[PathBuf]) -> Result<Vec<QueuedFile>> {
        let mut queue = Vec::new();

        for root in paths {
            let metadata = std::fs::metadata(root).map_err(|source| ScanError::FileSystem {
                path: root.clone(),
                source,
            })?;

            if metadata.is_file() {
                // Explicit files are always scanned, even when unsupported
                queue.push(QueuedFile {
                    path: root.clone(),
                    display: root.to_string_lossy().replace('\\', "/"),
                });
                continue;
            }

            let before = queue.len();
            self.discover_directory(root, &mut queue);
            debug!(
                "Discovered {} files under {}",
                queue.len() - before,
                root.display()
            );
        }

        Ok(queue)
    }

    fn discover_directory(&self, root: &Path, queue: &mut Vec<QueuedFile>) {
        let ignore = &self.config.ignore;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let relative = to_relative_unix_style(entry.path(), root);
                !is_ignored_by_pattern(Path::new(&relative), ignore)
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_supported_path(entry.path()) {
                continue;
            }

            let display = to_relative_unix_style(entry.path(), root);
            if !is_selected(Path::new(&display), &self.config.include, ignore) {
                continue;
            }

            queue.push(QueuedFile {
                path: entry.path().to_path_buf(),
                display,
            });
        }
    }

    /// Scan every queued file sequentially
    pub fn scan_paths(&self, paths: &[PathBuf]) -> Result<ScanReport> {
        let queue = self.discover(paths)?;
        info!("Scanning {} files", queue.len());

        let files: Vec<FileReport> = queue.iter().map(|file| self.scan_file(file)).collect();
        Ok(ScanReport {
            summary: Summary::from_files(&files),
            files,
            strict: self.config.strict,
        })
    }

    pub fn scan_file(&self, file: &QueuedFile) -> FileReport {
        match self.detect_file(file) {
            Ok((results, warnings)) => FileReport {
                path: file.display.clone(),
                passed: passed(&results, self.config.strict),
                results,
                warnings,
                error: None,
            },
            Err(e) => {
                warn!("{}", e);
                FileReport {
                    path: file.display.clone(),
                    results: Vec::new(),
                    warnings: Vec::new(),
                    error: Some(FileError::from(&e)),
                    passed: false,
                }
            }
        }
    }

    fn detect_file(&self, file: &QueuedFile) -> Result<(Vec<FeatureResult>, Vec<String>)> {
        let content = read_source(&file.path, self.max_file_size)?;
        let output = self.manager.detect(&file.display, &content)?;

        let index = self.mapper.index().ok_or_else(|| ScanError::Dataset {
            message: "feature mapper used before initialization".to_string(),
        })?;
        let results = classify(&output.features, &self.config, index);

        debug!(
            "{}: {} detected, {} reported",
            file.display,
            output.features.len(),
            results.len()
        );
        Ok((results, output.warnings))
    }
}

/// Read a source file, rejecting it by size before any bytes are read
pub fn read_source(path: &Path, max_file_size: u64) -> Result<String> {
    let metadata = std::fs::metadata(path).map_err(|source| ScanError::FileSystem {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.len() > max_file_size {
        return Err(ScanError::FileSize {
            path: path.to_path_buf(),
            size: metadata.len(),
            max: max_file_size,
        });
    }

    std::fs::read_to_string(path).map_err(|source| ScanError::FileSystem {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleLevel;
    use crate::mapper::shared;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, content: &str) -> PathBuf {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn scanner(config: Config) -> Scanner<'static> {
        Scanner::new(shared().unwrap(), config)
    }

    #[test]
    fn test_discovery_is_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b.css", "a { color: red }");
        write(temp.path(), "a.js", "let x = 1;");
        write(temp.path(), "notes.md", "# notes");
        write(temp.path(), "node_modules/lib/index.js", "fetch(u);");
        write(temp.path(), "src/app.min.js", "fetch(u);");
        write(temp.path(), "src/page.html", "<p>hi</p>");

        let mut config = Config::default();
        config.ignore.push("*.min.js".to_string());
        let queue = scanner(config).discover(&[temp.path().to_path_buf()]).unwrap();
        let names: Vec<&str> = queue.iter().map(|f| f.display.as_str()).collect();
        assert_eq!(names, vec!["a.js", "b.css", "src/page.html"]);
    }

    #[test]
    fn test_include_patterns() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/a.css", "a {}");
        write(temp.path(), "test/b.css", "b {}");

        let mut config = Config::default();
        config.include.push("src/".to_string());
        let queue = scanner(config).discover(&[temp.path().to_path_buf()]).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].display, "src/a.css");
    }

    #[test]
    fn test_missing_path_is_fatal() {
        let temp = TempDir::new().unwrap();
        let err = scanner(Config::default())
            .scan_paths(&[temp.path().join("nope")])
            .unwrap_err();
        assert_eq!(err.kind(), "file-system");
    }

    #[test]
    fn test_oversized_file_is_rejected_before_parsing() {
        let temp = TempDir::new().unwrap();
        let big = write(temp.path(), "big.css", &"a { display: grid; }\n".repeat(10));
        write(temp.path(), "small.css", "a { display: grid; }");

        let report = scanner(Config::default())
            .with_max_file_size(64)
            .scan_paths(&[temp.path().to_path_buf()])
            .unwrap();

        assert_eq!(report.files.len(), 2);
        let rejected = &report.files[0];
        assert_eq!(rejected.path, "big.css");
        assert_eq!(rejected.error.as_ref().unwrap().kind, "file-size");
        assert!(rejected.results.is_empty());
        assert!(!rejected.passed);
        assert!(report.files[1].error.is_none());
        assert_eq!(report.summary.failed_files, 1);

        let err = read_source(&big, 64).unwrap_err();
        assert!(matches!(err, ScanError::FileSize { max: 64, .. }));
    }

    #[test]
    fn test_rule_off_drops_fetch() {
        let temp = TempDir::new().unwrap();
        let file = write(temp.path(), "app.js", "fetch('/api');\n");

        let report = scanner(Config::default()).scan_paths(&[file.clone()]).unwrap();
        assert!(report.files[0].results.iter().any(|r| r.feature == "fetch"));

        let mut config = Config::default();
        config.rules.insert("fetch".to_string(), RuleLevel::Off);
        let report = scanner(config).scan_paths(&[file]).unwrap();
        assert!(report.files[0].results.iter().all(|r| r.feature != "fetch"));
    }

    #[test]
    fn test_grid_is_info_on_line_three() {
        let temp = TempDir::new().unwrap();
        let file = write(temp.path(), "layout.css", "/* layout */\n.page {\n  display: grid;\n}\n");

        let report = scanner(Config::default()).scan_paths(&[file]).unwrap();
        let grid = report.files[0]
            .results
            .iter()
            .find(|r| r.feature == "grid")
            .unwrap();
        assert_eq!(grid.line, 3);
        assert_eq!(grid.severity, Severity::Info);
        assert!(report.passed());
    }

    #[test]
    fn test_explicit_unsupported_file_is_reported() {
        let temp = TempDir::new().unwrap();
        let file = write(temp.path(), "notes.md", "# notes");
        let report = scanner(Config::default()).scan_paths(&[file]).unwrap();
        assert_eq!(report.files[0].error.as_ref().unwrap().kind, "unsupported-file");
        assert_eq!(report.summary.failed_files, 1);
        assert!(!report.passed());
    }

    #[test]
    fn test_parse_errors_do_not_stop_the_queue() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.js", "function (\n");
        write(temp.path(), "b.js", "fetch(u);");

        let report = scanner(Config::default())
            .scan_paths(&[temp.path().to_path_buf()])
            .unwrap();
        assert_eq!(report.files.len(), 2);
        assert!(!report.files[0].warnings.is_empty());
        assert!(report.files[1].results.iter().any(|r| r.feature == "fetch"));
    }

    #[test]
    fn test_sample_site() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_samples/site");
        let report = scanner(Config::default()).scan_paths(&[root]).unwrap();

        let paths: Vec<&str> = report.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["app.js", "index.html", "styles.css"]);

        let expected: [&[&str]; 3] = [
            &[
                "destructuring-assignment",
                "fetch",
                "optional-chaining",
                "nullish-coalescing",
                "class-private-fields",
                "async-clipboard",
                "intersection-observer",
                "template-literals",
            ],
            &[
                "custom-elements",
                "aria",
                "dialog",
                "input-email",
                "form-validation",
                "loading-lazy",
                "flexbox",
                "structured-clone",
            ],
            &["grid", "has", "backdrop-filter", "container-queries", "prefers-color-scheme"],
        ];

        for (file, features) in report.files.iter().zip(expected) {
            assert!(file.error.is_none(), "{}: {:?}", file.path, file.error);
            for feature in features {
                assert!(
                    file.results.iter().any(|r| r.feature == *feature),
                    "{} missing from {}",
                    feature,
                    file.path
                );
            }
        }

        let html = &report.files[1];
        let flexbox = html.results.iter().find(|r| r.feature == "flexbox").unwrap();
        assert_eq!(flexbox.line, 7);
        let clone = html.results.iter().find(|r| r.feature == "structured-clone").unwrap();
        assert_eq!(clone.line, 20);
    }

    #[test]
    fn test_strict_mode_fails_on_warnings() {
        let temp = TempDir::new().unwrap();
        let file = write(temp.path(), "page.html", "<dialog></dialog>");

        let mut config = Config::default();
        config.rules.insert("dialog".to_string(), RuleLevel::Warn);
        let report = scanner(config.clone()).scan_paths(&[file.clone()]).unwrap();
        assert!(report.passed());

        config.strict = true;
        let report = scanner(config).scan_paths(&[file]).unwrap();
        assert!(!report.passed());
        assert_eq!(report.summary.failed_files, 1);
    }
}
