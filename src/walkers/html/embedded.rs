// HTML Walker Embedded - <script> and <style> bodies
//
// The raw_text child of a script/style element is parsed with the JS or CSS
// grammar and walked by the matching walker. Positions stay document-relative
// because the nested walker shares the document's LineIndex.

use super::helpers::HtmlHelpers;
use crate::language::SourceLanguage;
use crate::types::FeatureType;
use crate::walkers::base::{BaseWalker, Walker};
use crate::walkers::css::CssWalker;
use crate::walkers::javascript::JavaScriptWalker;
use crate::walkers::manager::parse;
use tracing::debug;
use tree_sitter::Node;

/// `type` values of <script> whose body is JavaScript
const SCRIPT_TYPES: &[&str] = &[
    "module",
    "text/javascript",
    "application/javascript",
    "text/ecmascript",
    "application/ecmascript",
    "text/jsx",
];

pub(super) struct EmbeddedRules;

impl EmbeddedRules {
    pub(super) fn visit_script(base: &mut BaseWalker, node: Node) {
        let script_type = HtmlHelpers::find_tag(base, &node).and_then(|tag| {
            let attributes = HtmlHelpers::extract_attributes(base, &tag);
            HtmlHelpers::attribute_value(&attributes, "type")
        });
        if let Some(script_type) = script_type {
            let script_type = script_type.trim().to_ascii_lowercase();
            if !script_type.is_empty() && !SCRIPT_TYPES.contains(&script_type.as_str()) {
                // JSON, templates, importmaps
                debug!("skipping <script type=\"{}\"> in {}", script_type, base.file_path);
                return;
            }
        }

        Self::walk_region(base, node, SourceLanguage::JavaScript);
    }

    pub(super) fn visit_style(base: &mut BaseWalker, node: Node) {
        let style_type = HtmlHelpers::find_tag(base, &node).and_then(|tag| {
            let attributes = HtmlHelpers::extract_attributes(base, &tag);
            HtmlHelpers::attribute_value(&attributes, "type")
        });
        if style_type.is_some_and(|t| !t.trim().is_empty() && !t.trim().eq_ignore_ascii_case("text/css")) {
            return;
        }

        Self::walk_region(base, node, SourceLanguage::Css);
    }

    fn walk_region(base: &mut BaseWalker, node: Node, language: SourceLanguage) {
        let Some(raw_text) = base.find_child_by_type(&node, "raw_text") else {
            return;
        };
        let text = base.get_node_text(&raw_text);
        if text.trim().is_empty() {
            return;
        }

        let tree = match parse(language, text, base.file_path) {
            Ok(tree) => tree,
            Err(e) => {
                let (line, _) = base.position_of(raw_text.start_byte());
                base.warnings.push(format!(
                    "embedded {} at line {} could not be parsed: {}",
                    language.name(),
                    line,
                    e
                ));
                return;
            }
        };

        let region_start = base.region_start + raw_text.start_byte();
        let output = match language.feature_type() {
            FeatureType::Css => {
                CssWalker::new(base.nested(FeatureType::Css, text, region_start)).walk(&tree)
            }
            _ => JavaScriptWalker::new(base.nested(FeatureType::Js, text, region_start))
                .walk(&tree),
        };
        base.absorb(output);
    }
}
