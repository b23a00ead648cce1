// CSS Walker At-Rules - @container, @layer, @media features, ...

use crate::mapper::patterns::strip_vendor_prefix;
use crate::types::Confidence;
use crate::walkers::base::BaseWalker;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tree_sitter::Node;

pub(super) const AT_RULE_FEATURES: &[(&str, &str)] = &[
    ("container", "container-queries"),
    ("layer", "cascade-layers"),
    ("scope", "scope"),
    ("starting-style", "starting-style"),
    ("property", "registered-custom-properties"),
    ("keyframes", "animations-css"),
    ("media", "media-queries"),
    ("supports", "supports"),
    ("import", "css-import"),
    ("font-face", "font-face"),
    ("counter-style", "counter-style"),
];

/// (media feature, feature id); `any-*` must precede its bare name
const MEDIA_FEATURES: &[(&str, &str)] = &[
    ("prefers-color-scheme", "prefers-color-scheme"),
    ("prefers-reduced-motion", "prefers-reduced-motion"),
    ("prefers-contrast", "prefers-contrast"),
    ("prefers-reduced-data", "prefers-reduced-data"),
    ("prefers-reduced-transparency", "prefers-reduced-transparency"),
    ("forced-colors", "forced-colors"),
    ("any-hover", "interaction-media-features"),
    ("any-pointer", "interaction-media-features"),
    ("hover", "interaction-media-features"),
    ("pointer", "interaction-media-features"),
];

static MEDIA_FEATURE: LazyLock<Regex> = LazyLock::new(|| {
    let names: Vec<&str> = MEDIA_FEATURES.iter().map(|(name, _)| *name).collect();
    Regex::new(&format!(r"\b({})\b", names.join("|"))).unwrap()
});

pub(super) struct AtRuleRules;

impl AtRuleRules {
    pub(super) fn is_at_rule(kind: &str) -> bool {
        kind == "at_rule" || kind.ends_with("_statement")
    }

    /// At-rules the grammar has no production for, such as `@scope (.a) {}`,
    /// parse as an ERROR holding the bare at_keyword
    pub(super) fn is_unparsed_at_rule(node: &Node) -> bool {
        node.is_error() && node.child(0).is_some_and(|child| child.kind() == "at_keyword")
    }

    /// The rule set the grammar recovered from the rest of an unparsed at-rule
    pub(super) fn follows_unparsed_at_rule(rule_set: &Node) -> bool {
        rule_set
            .prev_sibling()
            .is_some_and(|prev| Self::is_unparsed_at_rule(&prev))
    }

    /// Errors in an at-rule prelude, an unparsed at-rule, and the leftover
    /// prelude error inside the rule set recovered after it
    pub(super) fn is_grammar_gap(node: &Node) -> bool {
        if Self::is_unparsed_at_rule(node) {
            return true;
        }
        let mut current = node.parent();
        while let Some(parent) = current {
            match parent.kind() {
                kind if Self::is_at_rule(kind) => return true,
                "rule_set" => return Self::follows_unparsed_at_rule(&parent),
                "block" | "stylesheet" => return false,
                _ => current = parent.parent(),
            }
        }
        false
    }

    pub(super) fn visit_at_rule(base: &mut BaseWalker, node: Node) {
        let Some(rule_name) = Self::extract_at_rule_name(base, &node) else {
            return;
        };
        let name = rule_name.trim_start_matches('@').to_ascii_lowercase();
        let plain = strip_vendor_prefix(&name).unwrap_or(&name).to_string();

        let prelude = Self::extract_prelude(base, &node);
        let context = prelude.trim().to_string();
        let start = node.start_byte();
        let mut emitted = HashSet::new();

        if let Some(hit) = base.mapper.map_css_at_rule(&name) {
            base.emit_once(&mut emitted, &hit.feature, start, context.clone(), hit.confidence);
        }

        if let Some((_, feature)) = AT_RULE_FEATURES.iter().find(|(rule, _)| *rule == plain) {
            base.emit_once(&mut emitted, feature, start, context.clone(), Confidence::High);
        }

        if plain == "media" {
            Self::detect_media_features(base, &mut emitted, prelude, start, &context);
        }
    }

    /// `@keyword` from an at_keyword child, or the first child starting with '@'
    fn extract_at_rule_name<'a>(base: &BaseWalker<'a>, node: &Node) -> Option<&'a str> {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            let text = base.get_node_text(&child);
            if child.kind() == "at_keyword" {
                return Some(text);
            }
            if text.starts_with('@') {
                return text.split_whitespace().next();
            }
        }
        None
    }

    /// At-rule text up to its block or terminating `;`. An unparsed at-rule
    /// only holds its keyword, so its prelude is read from the region text.
    fn extract_prelude<'a>(base: &BaseWalker<'a>, node: &Node) -> &'a str {
        let text = if node.is_error() {
            base.content.get(node.start_byte()..).unwrap_or("")
        } else {
            base.get_node_text(node)
        };
        let end = text.find(['{', ';']).unwrap_or(text.len());
        &text[..end]
    }

    fn detect_media_features(
        base: &mut BaseWalker,
        emitted: &mut HashSet<String>,
        prelude: &str,
        start: usize,
        context: &str,
    ) {
        for m in MEDIA_FEATURE.find_iter(prelude) {
            let Some((_, feature)) = MEDIA_FEATURES.iter().find(|(name, _)| *name == m.as_str())
            else {
                continue;
            };
            base.emit_once(emitted, feature, start + m.start(), context, Confidence::High);
        }
    }
}
