// CSS Walker Selectors - modern pseudo-classes and pseudo-elements
//
// Fixed patterns are emitted at the exact pseudo position; anything else the
// mapper resolves for the selector list is emitted at the list start.

use super::at_rules::AtRuleRules;
use crate::types::Confidence;
use crate::walkers::base::BaseWalker;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tree_sitter::Node;

/// (pattern, feature id); `(?:$|[^\w-])` stands in for a word end
pub(super) const PSEUDO_PATTERNS: &[(&str, &str)] = &[
    (r":has\(", "has"),
    (r":is\(", "is"),
    (r":where\(", "where"),
    (r":not\(", "not"),
    (r"::backdrop(?:$|[^\w-])", "backdrop"),
    (r"::placeholder(?:$|[^\w-])", "placeholder"),
    (r"::marker(?:$|[^\w-])", "marker"),
    (r"::selection(?:$|[^\w-])", "selection"),
    (r"::part\(", "part"),
    (r"::slotted\(", "slotted"),
    (r":focus-visible(?:$|[^\w-])", "focus-visible"),
    (r":focus-within(?:$|[^\w-])", "focus-within"),
    (r":target(?:$|[^\w-])", "target"),
    (r":nth-(?:last-)?child\([^)]*\bof\b", "nth-child-of"),
];

static PSEUDO_TABLE: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    PSEUDO_PATTERNS
        .iter()
        .map(|(pattern, feature)| (Regex::new(pattern).unwrap(), *feature))
        .collect()
});

pub(super) struct SelectorRules;

impl SelectorRules {
    pub(super) fn visit_selectors(base: &mut BaseWalker, node: Node) {
        let text = base.get_node_text(&node);
        if text.trim().is_empty() {
            return;
        }

        let start = node.start_byte();
        let context = format!("selector {}", text.trim());
        let mut emitted = HashSet::new();

        let mut hits: Vec<(usize, &'static str)> = PSEUDO_TABLE
            .iter()
            .filter_map(|(regex, feature)| regex.find(text).map(|m| (m.start(), *feature)))
            .collect();
        hits.sort();

        for (offset, feature) in hits {
            base.emit_once(&mut emitted, feature, start + offset, context.clone(), Confidence::High);
        }

        for hit in base.mapper.map_css_selector(text) {
            base.emit_once(
                &mut emitted,
                &hit.feature,
                start,
                context.clone(),
                hit.confidence,
            );
        }
    }

    /// A rule set directly inside another rule set's block is CSS nesting.
    /// Owners recovered from a parse error (the body of `@scope (.a) { b {} }`
    /// lands in one) do not count.
    pub(super) fn visit_nested_rule(base: &mut BaseWalker, node: Node) {
        let nested = node
            .parent()
            .filter(|parent| parent.kind() == "block")
            .and_then(|block| block.parent())
            .is_some_and(|owner| owner.kind() == "rule_set" && !Self::is_recovered_rule(&owner));

        if nested {
            let selector = base
                .get_field_text(&node, "selectors")
                .or_else(|| {
                    base.find_child_by_type(&node, "selectors")
                        .map(|s| base.get_node_text(&s))
                })
                .unwrap_or("")
                .trim()
                .to_string();
            base.emit(
                "nesting",
                node.start_byte(),
                format!("nested rule {}", selector),
                Confidence::Medium,
            );
        }
    }

    fn is_recovered_rule(rule_set: &Node) -> bool {
        if AtRuleRules::follows_unparsed_at_rule(rule_set) {
            return true;
        }
        let mut cursor = rule_set.walk();
        let has_error_child = rule_set.children(&mut cursor).any(|child| child.is_error());
        has_error_child
    }
}
