// CSS Walker
//
// Detects web-platform features in stylesheets:
// - Declarations (property names, value keywords, value functions, units)
// - Selectors (modern pseudo-classes / pseudo-elements, nesting)
// - At-rules (@container, @layer, @media features, ...)

mod at_rules;
mod declarations;
mod selectors;

use crate::walkers::base::{BaseWalker, Walker};
use at_rules::AtRuleRules;
use declarations::DeclarationRules;
use selectors::SelectorRules;
use tree_sitter::Node;

pub struct CssWalker<'a> {
    base: BaseWalker<'a>,
}

impl<'a> CssWalker<'a> {
    pub fn new(base: BaseWalker<'a>) -> Self {
        Self { base }
    }

    fn visit_children(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit_node(child);
        }
    }
}

impl<'a> Walker<'a> for CssWalker<'a> {
    fn base(&mut self) -> &mut BaseWalker<'a> {
        &mut self.base
    }

    fn into_base(self) -> BaseWalker<'a> {
        self.base
    }

    fn visit_node(&mut self, node: Node) {
        match node.kind() {
            "declaration" => {
                DeclarationRules::visit_declaration(&mut self.base, node);
            }
            "selectors" => {
                SelectorRules::visit_selectors(&mut self.base, node);
            }
            "rule_set" => {
                SelectorRules::visit_nested_rule(&mut self.base, node);
                self.visit_children(node);
            }
            "comment" | "string_value" => {}
            kind if AtRuleRules::is_at_rule(kind) => {
                AtRuleRules::visit_at_rule(&mut self.base, node);
                self.visit_children(node);
            }
            "ERROR" if AtRuleRules::is_unparsed_at_rule(&node) => {
                AtRuleRules::visit_at_rule(&mut self.base, node);
            }
            _ => self.visit_children(node),
        }
    }

    fn is_grammar_gap(node: &Node) -> bool {
        AtRuleRules::is_grammar_gap(node)
    }
}

#[cfg(test)]
mod tests {
    use crate::mapper::shared;
    use crate::types::DetectedFeature;
    use crate::walkers::WalkerManager;

    fn detect(css: &str) -> Vec<DetectedFeature> {
        detect_with_warnings(css).0
    }

    fn detect_with_warnings(css: &str) -> (Vec<DetectedFeature>, Vec<String>) {
        let manager = WalkerManager::new(shared().unwrap());
        let output = manager.detect("test.css", css).unwrap();
        (output.features, output.warnings)
    }

    fn names(features: &[DetectedFeature]) -> Vec<&str> {
        features.iter().map(|f| f.name.as_str()).collect()
    }

    fn find<'f>(features: &'f [DetectedFeature], name: &str) -> &'f DetectedFeature {
        features
            .iter()
            .find(|f| f.name == name)
            .unwrap_or_else(|| panic!("{} not detected in {:?}", name, names(features)))
    }

    #[test]
    fn test_display_grid_is_one_feature_on_its_line() {
        let features = detect(".a {\n  color: red;\n  display: grid;\n}\n");
        assert_eq!(names(&features), vec!["grid"]);
        assert_eq!(features[0].line, 3);
        assert_eq!(features[0].column, 3);
        assert_eq!(features[0].context, "display: grid");
    }

    #[test]
    fn test_backdrop_filter_and_blur() {
        let features = detect(".glass {\n  backdrop-filter: blur(4px);\n}");
        assert_eq!(names(&features), vec!["backdrop-filter", "filter-effects"]);
        assert!(features.iter().all(|f| f.line == 2));
        assert_eq!(find(&features, "filter-effects").column, 20);
    }

    #[test]
    fn test_vendor_prefixed_property() {
        let features = detect(".glass { -webkit-backdrop-filter: blur(2px); }");
        assert!(names(&features).contains(&"backdrop-filter"));
    }

    #[test]
    fn test_value_markers() {
        let css = ".a {\n  width: clamp(1rem, 50cqw, 3rem);\n  height: 100dvh;\n  color: oklch(70% 0.1 200);\n  background: conic-gradient(red, blue);\n  margin: var(--gap);\n}";
        let features = detect(css);
        let found = names(&features);
        for expected in [
            "min-max-clamp",
            "container-queries",
            "viewport-unit-variants",
            "oklab",
            "conic-gradients",
            "custom-properties",
        ] {
            assert!(found.contains(&expected), "missing {} in {:?}", expected, found);
        }
        assert_eq!(find(&features, "viewport-unit-variants").line, 3);
    }

    #[test]
    fn test_special_properties() {
        let css = ".a { margin-inline: 1rem; scroll-snap-type: x mandatory; gap: 4px; text-decoration-thickness: 2px; overscroll-behavior: contain; }";
        let found: Vec<String> = detect(css).into_iter().map(|f| f.name).collect();
        for expected in [
            "logical-properties",
            "scroll-snap",
            "flexbox-gap",
            "text-decoration",
            "overscroll-behavior",
        ] {
            assert!(found.iter().any(|f| f == expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_selector_pseudo_classes_at_exact_columns() {
        let features = detect(".card:has(img), li:is(.x) {}\ninput:focus-visible::placeholder {}");
        let has = find(&features, "has");
        assert_eq!((has.line, has.column), (1, 6));
        assert_eq!(find(&features, "is").column, 19);
        let focus = find(&features, "focus-visible");
        assert_eq!((focus.line, focus.column), (2, 6));
        assert_eq!(find(&features, "placeholder").line, 2);
    }

    #[test]
    fn test_target_does_not_match_longer_names() {
        let features = detect("a:target-within {}");
        assert!(!names(&features).contains(&"target"));
    }

    #[test]
    fn test_at_rules_and_media_features() {
        let css = "@layer base;\n@container card (min-width: 400px) {\n  .a { color: red; }\n}\n@media (prefers-color-scheme: dark) and (hover: hover) {\n  .b { color: blue; }\n}";
        let features = detect(css);
        assert_eq!(find(&features, "cascade-layers").line, 1);
        assert_eq!(find(&features, "container-queries").line, 2);
        assert_eq!(find(&features, "media-queries").line, 5);
        let scheme = find(&features, "prefers-color-scheme");
        assert_eq!((scheme.line, scheme.column), (5, 9));
        assert_eq!(find(&features, "interaction-media-features").line, 5);
    }

    #[test]
    fn test_container_prelude_is_not_a_syntax_error() {
        let (features, warnings) =
            detect_with_warnings("@container card (min-width: 400px) {\n  .a { color: red; }\n}");
        assert_eq!(find(&features, "container-queries").line, 1);
        assert!(warnings.is_empty(), "unexpected warnings {:?}", warnings);
    }

    #[test]
    fn test_scope_is_an_at_rule_not_nesting() {
        let css = ".x { color: red; }\n@scope (.card) { img { inset-inline: 0 } }";
        let (features, warnings) = detect_with_warnings(css);
        let scope = find(&features, "scope");
        assert_eq!((scope.line, scope.column), (2, 1));
        assert_eq!(scope.context, "@scope (.card)");
        assert!(!names(&features).contains(&"nesting"));
        assert_eq!(find(&features, "logical-properties").line, 2);
        assert!(warnings.is_empty(), "unexpected warnings {:?}", warnings);
    }

    #[test]
    fn test_genuine_syntax_errors_still_warn() {
        let (_, warnings) = detect_with_warnings(".a { color: red; }\n.b { color: ; }}");
        assert!(!warnings.is_empty());
    }

    #[test]
    fn test_keyframes_and_font_face() {
        let features = detect("@keyframes spin { from { opacity: 0 } }\n@font-face { font-family: X; }");
        assert_eq!(find(&features, "animations-css").line, 1);
        assert_eq!(find(&features, "font-face").line, 2);
    }

    #[test]
    fn test_nested_rules() {
        let features = detect(".parent {\n  color: red;\n  & .child { color: blue; }\n}");
        let nesting = find(&features, "nesting");
        assert_eq!(nesting.line, 3);
    }

    #[test]
    fn test_import_layer_source_scan() {
        let features = detect("@import url(\"base.css\") layer(base);\n");
        let found = names(&features);
        assert!(found.contains(&"css-import"));
        assert!(found.contains(&"cascade-layers"));
    }

    #[test]
    fn test_detection_is_idempotent() {
        let css = ".a:has(b) { display: grid; width: min(1px, 2px); }\n@media (forced-colors: active) {}";
        assert_eq!(detect(css), detect(css));
    }
}
