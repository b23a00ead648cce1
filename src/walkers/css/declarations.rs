// CSS Walker Declarations - `property: value` pairs
//
// The property is mapped by name (with its value keyword for keys such as
// css.properties.display.grid); the value is then checked for function,
// unit and keyword markers. One feature id is emitted at most once per
// declaration.

use crate::mapper::patterns::strip_vendor_prefix;
use crate::types::Confidence;
use crate::walkers::base::BaseWalker;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tree_sitter::Node;

static FUNCTION_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z_-][\w-]*\(").unwrap());

static CONTAINER_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d(?:cqw|cqh|cqi|cqb|cqmin|cqmax)\b").unwrap());

static VIEWPORT_VARIANT_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[dsl]v(?:h|w|i|b|min|max)\b").unwrap());

static SUBGRID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bsubgrid\b").unwrap());

static LOGICAL_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:margin|padding|inset|border)-(?:inline|block)(?:-.*)?|inline-size|block-size|min-inline-size|max-inline-size|min-block-size|max-block-size)$").unwrap()
});

/// Value functions with a fixed feature id
const FUNCTION_FEATURES: &[(&str, &str)] = &[
    ("min", "min-max-clamp"),
    ("max", "min-max-clamp"),
    ("clamp", "min-max-clamp"),
    ("var", "custom-properties"),
    ("calc", "calc"),
    ("linear-gradient", "gradients"),
    ("radial-gradient", "gradients"),
    ("repeating-linear-gradient", "gradients"),
    ("repeating-radial-gradient", "gradients"),
    ("conic-gradient", "conic-gradients"),
    ("repeating-conic-gradient", "conic-gradients"),
    ("oklch", "oklab"),
    ("oklab", "oklab"),
    ("lab", "lab"),
    ("lch", "lab"),
    ("color-mix", "color-mix"),
    ("color", "color-function"),
    ("hwb", "hwb"),
    ("anchor", "anchor-positioning"),
    ("anchor-size", "anchor-positioning"),
    ("scroll", "scroll-driven-animations"),
    ("view", "scroll-driven-animations"),
];

const FILTER_FUNCTIONS: &[&str] = &[
    "blur",
    "brightness",
    "contrast",
    "drop-shadow",
    "grayscale",
    "hue-rotate",
    "invert",
    "opacity",
    "saturate",
    "sepia",
];

pub(super) struct DeclarationRules;

impl DeclarationRules {
    pub(super) fn visit_declaration(base: &mut BaseWalker, node: Node) {
        let Some(property_node) = base.find_child_by_type(&node, "property_name") else {
            return;
        };
        let property = base.get_node_text(&property_node).trim().to_lowercase();
        if property.is_empty() {
            return;
        }

        let (value_start, value) = Self::extract_value(base, &node);
        let context = format!("{}: {}", property, value);
        let mut emitted = HashSet::new();

        if let Some(hit) = base.mapper.map_css_property(&property, Some(value)) {
            base.emit_once(
                &mut emitted,
                &hit.feature,
                property_node.start_byte(),
                context.clone(),
                hit.confidence,
            );
        }

        let plain = strip_vendor_prefix(&property).unwrap_or(&property);
        if let Some(feature) = Self::special_property_feature(plain) {
            base.emit_once(
                &mut emitted,
                feature,
                property_node.start_byte(),
                context.clone(),
                Confidence::High,
            );
        }

        if !value.is_empty() {
            Self::check_value(base, &mut emitted, plain, value, value_start, &context);
        }
    }

    /// Value text between `:` and `;` without `!important`, with its offset
    fn extract_value<'a>(base: &BaseWalker<'a>, node: &Node) -> (usize, &'a str) {
        let mut cursor = node.walk();
        let mut after_colon = false;
        let mut range: Option<(usize, usize)> = None;

        for child in node.children(&mut cursor) {
            if !after_colon {
                after_colon = child.kind() == ":";
                continue;
            }
            if !child.is_named() || child.kind() == "important" || child.kind() == "comment" {
                continue;
            }
            range = Some(match range {
                Some((start, _)) => (start, child.end_byte()),
                None => (child.start_byte(), child.end_byte()),
            });
        }

        match range {
            Some((start, end)) => (start, base.content.get(start..end).unwrap_or("")),
            None => (node.end_byte(), ""),
        }
    }

    /// Property families reported even when the dataset keys them differently
    fn special_property_feature(property: &str) -> Option<&'static str> {
        if LOGICAL_PROPERTY.is_match(property) {
            return Some("logical-properties");
        }
        match property {
            "container" | "container-type" | "container-name" => Some("container-queries"),
            "gap" | "row-gap" | "column-gap" => Some("flexbox-gap"),
            "text-underline-offset" => Some("text-decoration"),
            _ if property.starts_with("scroll-snap-")
                || property.starts_with("scroll-padding")
                || property.starts_with("scroll-margin") =>
            {
                Some("scroll-snap")
            }
            _ if property.starts_with("overscroll-behavior") => Some("overscroll-behavior"),
            _ if property.starts_with("text-decoration-") => Some("text-decoration"),
            _ => None,
        }
    }

    fn check_value(
        base: &mut BaseWalker,
        emitted: &mut HashSet<String>,
        property: &str,
        value: &str,
        value_start: usize,
        context: &str,
    ) {
        let lowered = value.to_ascii_lowercase();

        if property == "display" {
            let display = lowered.split_whitespace().last().unwrap_or("");
            let feature = match display {
                "grid" | "inline-grid" => Some("grid"),
                "flex" | "inline-flex" => Some("flexbox"),
                "contents" => Some("display-contents"),
                _ => None,
            };
            if let Some(feature) = feature {
                base.emit_once(emitted, feature, value_start, context, Confidence::High);
            }
        }

        if let Some(m) = SUBGRID.find(&lowered) {
            base.emit_once(emitted, "subgrid", value_start + m.start(), context, Confidence::High);
        }

        for m in FUNCTION_CALL.find_iter(&lowered) {
            let name = m.as_str().trim_end_matches('(');
            let name = strip_vendor_prefix(name).unwrap_or(name);
            let offset = value_start + m.start();
            let function_context = format!("{}() in {}", name, context);

            if let Some((_, feature)) = FUNCTION_FEATURES.iter().find(|(f, _)| *f == name) {
                base.emit_once(emitted, feature, offset, function_context, Confidence::High);
            } else if let Some(hit) = base.mapper.map_css_type(name) {
                base.emit_once(emitted, &hit.feature, offset, function_context, hit.confidence);
            } else if FILTER_FUNCTIONS.contains(&name) {
                base.emit_once(emitted, "filter-effects", offset, function_context, Confidence::Medium);
            }
        }

        if let Some(m) = CONTAINER_UNIT.find(&lowered) {
            base.emit_once(
                emitted,
                "container-queries",
                value_start + m.start(),
                context,
                Confidence::Medium,
            );
        }

        if let Some(m) = VIEWPORT_VARIANT_UNIT.find(&lowered) {
            base.emit_once(
                emitted,
                "viewport-unit-variants",
                value_start + m.start(),
                context,
                Confidence::Medium,
            );
        }
    }
}
