//! Language Support - Shared tree-sitter language configuration
//!
//! ALL language-specific tree-sitter configuration lives here: the scanner,
//! the walker manager and the HTML walker's embedded regions all resolve
//! grammars through this module.

use crate::error::{Result, ScanError};
use crate::types::FeatureType;
use std::path::Path;

/// Get tree-sitter language parser for a given language name
///
/// This is the SINGLE SOURCE OF TRUTH for language support.
///
/// # Supported Languages
///
/// **Stylesheets**: CSS
/// **Scripts**: JavaScript (incl. JSX), TypeScript, TSX
/// **Markup**: HTML
pub fn get_tree_sitter_language(language: &str) -> Result<tree_sitter::Language> {
    match language {
        "css" => Ok(tree_sitter_css::LANGUAGE.into()),
        "javascript" | "jsx" => Ok(tree_sitter_javascript::LANGUAGE.into()),
        "typescript" => Ok(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
        "tsx" => Ok(tree_sitter_typescript::LANGUAGE_TSX.into()),
        "html" => Ok(tree_sitter_html::LANGUAGE.into()),
        _ => Err(ScanError::UnsupportedFile {
            path: language.into(),
        }),
    }
}

/// Detect language from file extension
///
/// Returns the language name that can be passed to `get_tree_sitter_language()`.
pub fn detect_language_from_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "css" => Some("css"),
        "js" | "mjs" | "cjs" | "jsx" => Some("javascript"),
        "ts" | "mts" | "cts" => Some("typescript"),
        "tsx" => Some("tsx"),
        "html" | "htm" => Some("html"),
        _ => None,
    }
}

/// Closed set of languages the walkers understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    Css,
    JavaScript,
    TypeScript,
    Tsx,
    Html,
}

impl SourceLanguage {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "css" => Some(Self::Css),
            "javascript" | "jsx" => Some(Self::JavaScript),
            "typescript" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "html" => Some(Self::Html),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(detect_language_from_extension)
            .and_then(Self::from_name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::Html => "html",
        }
    }

    pub fn feature_type(&self) -> FeatureType {
        match self {
            Self::Css => FeatureType::Css,
            Self::JavaScript | Self::TypeScript | Self::Tsx => FeatureType::Js,
            Self::Html => FeatureType::Html,
        }
    }

    pub fn tree_sitter_language(&self) -> Result<tree_sitter::Language> {
        get_tree_sitter_language(self.name())
    }
}

pub fn is_supported_path(path: &Path) -> bool {
    SourceLanguage::from_path(path).is_some()
}
