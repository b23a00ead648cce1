//! WalkerManager - public entry point for feature detection
//!
//! Parses one file with the grammar its extension selects and runs the
//! matching walker over the tree.

use crate::error::{Result, ScanError};
use crate::language::SourceLanguage;
use crate::mapper::FeatureMapper;
use crate::walkers::base::{BaseWalker, LineIndex, WalkOutput, Walker};
use crate::walkers::css::CssWalker;
use crate::walkers::html::HtmlWalker;
use crate::walkers::javascript::JavaScriptWalker;
use std::path::Path;
use tree_sitter::{Parser, Tree};

/// Dispatches files to the CSS, JavaScript and HTML walkers
pub struct WalkerManager<'m> {
    mapper: &'m FeatureMapper,
}

impl<'m> WalkerManager<'m> {
    pub fn new(mapper: &'m FeatureMapper) -> Self {
        Self { mapper }
    }

    /// Detect features in `content`, choosing the language from `file_path`
    pub fn detect(&self, file_path: &str, content: &str) -> Result<WalkOutput> {
        let language = SourceLanguage::from_path(Path::new(file_path)).ok_or_else(|| {
            ScanError::UnsupportedFile {
                path: file_path.into(),
            }
        })?;
        self.detect_as(language, file_path, content)
    }

    pub fn detect_as(
        &self,
        language: SourceLanguage,
        file_path: &str,
        content: &str,
    ) -> Result<WalkOutput> {
        let tree = parse(language, content, file_path)?;
        let line_index = LineIndex::new(content);
        let base = BaseWalker::new(
            language.feature_type(),
            file_path,
            content,
            0,
            &line_index,
            self.mapper,
        );

        let output = match language {
            SourceLanguage::Css => CssWalker::new(base).walk(&tree),
            SourceLanguage::JavaScript | SourceLanguage::TypeScript | SourceLanguage::Tsx => {
                JavaScriptWalker::new(base).walk(&tree)
            }
            SourceLanguage::Html => HtmlWalker::new(base).walk(&tree),
        };

        tracing::debug!(
            "Detected {} features ({} warnings) in {} file: {}",
            output.features.len(),
            output.warnings.len(),
            language.name(),
            file_path
        );
        Ok(output)
    }
}

/// Parse `content` with the grammar for `language`
pub(crate) fn parse(language: SourceLanguage, content: &str, file_path: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    let tree_sitter_language = language.tree_sitter_language()?;

    parser
        .set_language(&tree_sitter_language)
        .map_err(|e| ScanError::Parsing {
            path: file_path.into(),
            message: format!("failed to set parser language for {}: {}", language.name(), e),
        })?;

    parser.parse(content, None).ok_or_else(|| ScanError::Parsing {
        path: file_path.into(),
        message: "parser returned no tree".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::shared;

    #[test]
    fn test_unsupported_extension() {
        let manager = WalkerManager::new(shared().unwrap());
        let err = manager.detect("notes.md", "# hi").unwrap_err();
        assert_eq!(err.kind(), "unsupported-file");
    }

    #[test]
    fn test_syntax_errors_become_warnings() {
        let manager = WalkerManager::new(shared().unwrap());
        let output = manager
            .detect("broken.js", "const x = fetch('/a');\nfunction (\n")
            .unwrap();
        assert!(!output.warnings.is_empty());
        assert!(output.warnings[0].starts_with("syntax error near line"));
        assert!(output.features.iter().any(|f| f.name == "fetch"));
    }

    #[test]
    fn test_empty_file() {
        let manager = WalkerManager::new(shared().unwrap());
        let output = manager.detect("empty.css", "").unwrap();
        assert_eq!(output, WalkOutput::default());
    }

    #[test]
    fn test_uninitialized_mapper_under_reports() {
        let mapper = FeatureMapper::bundled();
        let manager = WalkerManager::new(&mapper);
        let output = manager.detect("a.js", "navigator.clipboard.readText();").unwrap();
        assert!(output.features.iter().all(|f| f.name != "async-clipboard"));
    }
}
