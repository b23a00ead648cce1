// BaseWalker - shared state and emission helpers for the language walkers
//
// A walker owns one parsed region: the whole file, or an embedded
// <script>/<style> body inside an HTML document. All node offsets are
// relative to that region and are shifted by `region_start` before they are
// turned into positions.

use super::position::LineIndex;
use crate::mapper::{FeatureMapper, FeatureMatch};
use crate::types::{Confidence, DetectedFeature, FeatureType};
use std::collections::HashSet;
use tracing::{debug, warn};
use tree_sitter::Node;

/// Features and parse warnings produced by one walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutput {
    pub features: Vec<DetectedFeature>,
    pub warnings: Vec<String>,
}

pub struct BaseWalker<'a> {
    pub feature_type: FeatureType,
    pub file_path: &'a str,
    /// Text the tree was parsed from
    pub content: &'a str,
    /// Byte offset of `content` inside the document
    pub region_start: usize,
    pub line_index: &'a LineIndex<'a>,
    pub mapper: &'a FeatureMapper,
    pub detected: Vec<DetectedFeature>,
    pub warnings: Vec<String>,
    seen: HashSet<(String, u32, u32)>,
}

impl<'a> BaseWalker<'a> {
    pub fn new(
        feature_type: FeatureType,
        file_path: &'a str,
        content: &'a str,
        region_start: usize,
        line_index: &'a LineIndex<'a>,
        mapper: &'a FeatureMapper,
    ) -> Self {
        Self {
            feature_type,
            file_path,
            content,
            region_start,
            line_index,
            mapper,
            detected: Vec::new(),
            warnings: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Walker for a sub-region of the same document
    pub fn nested(&self, feature_type: FeatureType, content: &'a str, region_start: usize) -> Self {
        Self::new(
            feature_type,
            self.file_path,
            content,
            region_start,
            self.line_index,
            self.mapper,
        )
    }

    /// Get text from a tree-sitter node
    pub fn get_node_text(&self, node: &Node) -> &'a str {
        self.content
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    /// Document position of a region-relative byte offset
    pub fn position_of(&self, offset: usize) -> (u32, u32) {
        self.line_index.position(self.region_start + offset)
    }

    /// Record a feature at `offset`. Exact (name, line, column) repeats are
    /// dropped; returns whether the feature was recorded.
    pub fn emit(
        &mut self,
        name: &str,
        offset: usize,
        context: impl Into<String>,
        confidence: Confidence,
    ) -> bool {
        let (line, column) = self.position_of(offset);
        if !self.seen.insert((name.to_string(), line, column)) {
            return false;
        }

        self.detected.push(DetectedFeature {
            name: name.to_string(),
            feature_type: self.feature_type,
            line,
            column,
            context: truncate_context(context.into()),
            confidence,
        });
        true
    }

    pub fn emit_match(&mut self, hit: &FeatureMatch, offset: usize, context: impl Into<String>) -> bool {
        self.emit(&hit.feature, offset, context, hit.confidence)
    }

    /// Emit unless `name` was already emitted for the current construct
    pub fn emit_once(
        &mut self,
        construct: &mut HashSet<String>,
        name: &str,
        offset: usize,
        context: impl Into<String>,
        confidence: Confidence,
    ) {
        if construct.insert(name.to_string()) {
            self.emit(name, offset, context, confidence);
        }
    }

    pub fn emitted_on_line(&self, name: &str, line: u32) -> bool {
        self.detected
            .iter()
            .any(|feature| feature.name == name && feature.line == line)
    }

    /// Re-scan the region text with the domain's source-level enhanced
    /// mappings. A hit is skipped when the same feature is already on its line.
    pub fn scan_source(&mut self) {
        for (offset, hit) in self.mapper.scan_source(self.feature_type, self.content) {
            let (line, _) = self.position_of(offset);
            if self.emitted_on_line(&hit.feature, line) {
                continue;
            }
            let snippet = line_snippet(self.content, offset);
            self.emit_match(&hit, offset, format!("source pattern: {}", snippet));
        }
    }

    /// Turn ERROR / MISSING nodes into parse warnings. Errors for which
    /// `tolerated` returns true are logged at debug level only.
    pub fn collect_syntax_errors(&mut self, root: &Node, tolerated: fn(&Node) -> bool) {
        if !root.has_error() {
            return;
        }

        let mut errors = Vec::new();
        self.find_error_nodes(root, &mut errors);
        for node in errors {
            if tolerated(&node) {
                debug!(
                    "{}: ignoring grammar gap at byte {}",
                    self.file_path,
                    self.region_start + node.start_byte()
                );
                continue;
            }
            let (line, column) = self.position_of(node.start_byte());
            let message = if node.is_missing() {
                format!(
                    "syntax error near line {}, column {}: missing `{}`",
                    line,
                    column,
                    node.kind()
                )
            } else {
                format!("syntax error near line {}, column {}", line, column)
            };
            debug!("{}: {}", self.file_path, message);
            self.warnings.push(message);
        }
    }

    /// Outermost error nodes only; nested errors repeat the same location
    fn find_error_nodes<'t>(&self, node: &Node<'t>, errors: &mut Vec<Node<'t>>) {
        if node.is_error() || node.is_missing() {
            errors.push(*node);
            return;
        }
        if !node.has_error() {
            return;
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.find_error_nodes(&child, errors);
        }
    }

    pub fn record_walk_failure(&mut self, node_kind: &str) {
        warn!(
            "{} walker stopped at a `{}` node in {}",
            self.feature_type, node_kind, self.file_path
        );
        self.warnings.push(format!(
            "{} detection aborted inside a `{}` node; results for this file may be incomplete",
            self.feature_type, node_kind
        ));
    }

    /// Fold the output of a nested walker into this one
    pub fn absorb(&mut self, output: WalkOutput) {
        for feature in output.features {
            if self
                .seen
                .insert((feature.name.clone(), feature.line, feature.column))
            {
                self.detected.push(feature);
            }
        }
        self.warnings.extend(output.warnings);
    }

    pub fn into_output(self) -> WalkOutput {
        WalkOutput {
            features: self.detected,
            warnings: self.warnings,
        }
    }
}

const MAX_CONTEXT_CHARS: usize = 120;

/// Collapse whitespace and cap the length of a context string
pub fn truncate_context(context: String) -> String {
    let collapsed = context.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_CONTEXT_CHARS {
        return collapsed;
    }
    let mut truncated: String = collapsed.chars().take(MAX_CONTEXT_CHARS - 3).collect();
    truncated.push_str("...");
    truncated
}

/// The line of `text` containing `offset`, trimmed
fn line_snippet(text: &str, offset: usize) -> &str {
    let offset = offset.min(text.len());
    let start = text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let end = text[offset..]
        .find('\n')
        .map(|i| offset + i)
        .unwrap_or(text.len());
    text[start..end].trim()
}
