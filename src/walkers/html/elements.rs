// HTML Walker Elements - tag names and attributes

use super::helpers::{Attribute, HtmlHelpers};
use crate::types::Confidence;
use crate::walkers::base::BaseWalker;
use std::collections::HashSet;
use tree_sitter::Node;

/// Elements reported under their own name as feature id
const MODERN_ELEMENTS: &[&str] = &[
    "dialog", "details", "summary", "template", "slot", "canvas", "video", "audio", "picture",
    "source", "track", "progress", "meter", "output", "datalist", "time", "mark", "svg", "math",
];

const INPUT_TYPES: &[&str] = &[
    "email",
    "url",
    "tel",
    "number",
    "range",
    "date",
    "time",
    "datetime-local",
    "month",
    "week",
    "color",
    "search",
];

const FORM_VALIDATION_ATTRIBUTES: &[&str] =
    &["required", "pattern", "min", "max", "minlength", "maxlength", "step"];

const FIXED_ATTRIBUTES: &[(&str, &str)] = &[
    ("contenteditable", "contenteditable"),
    ("spellcheck", "spellcheck"),
    ("draggable", "drag-and-drop"),
    ("decoding", "img-decoding"),
    ("referrerpolicy", "referrer-policy"),
    ("crossorigin", "cors"),
    ("integrity", "subresource-integrity"),
];

pub(super) struct ElementRules;

impl ElementRules {
    /// Tag name and attributes of one start_tag / self_closing_tag
    pub(super) fn visit_tag(base: &mut BaseWalker, tag: Node) {
        let Some(tag_name) = HtmlHelpers::extract_tag_name(base, &tag) else {
            return;
        };
        let tag_text = base.get_node_text(&tag);
        let start = tag.start_byte();
        let mut emitted = HashSet::new();

        // Hyphenated names are always custom elements, whatever the mapper says
        if tag_name.contains('-') {
            base.emit_once(&mut emitted, "custom-elements", start, tag_text, Confidence::High);
        }
        if let Some(hit) = base.mapper.map_html_element(&tag_name) {
            base.emit_once(&mut emitted, &hit.feature, start, tag_text, hit.confidence);
        }
        if MODERN_ELEMENTS.contains(&tag_name.as_str()) {
            base.emit_once(&mut emitted, &tag_name, start, tag_text, Confidence::High);
        }

        for attribute in HtmlHelpers::extract_attributes(base, &tag) {
            Self::visit_attribute(base, &tag_name, &attribute);
        }
    }

    fn visit_attribute(base: &mut BaseWalker, tag_name: &str, attribute: &Attribute) {
        let name = attribute.name.as_str();
        let value = attribute.value;
        let start = attribute.start;
        let context = match value {
            Some(value) => format!("<{} {}=\"{}\">", tag_name, name, value),
            None => format!("<{} {}>", tag_name, name),
        };
        let mut emitted = HashSet::new();

        if let Some(hit) = base.mapper.map_html_attribute(tag_name, name, value) {
            base.emit_once(&mut emitted, &hit.feature, start, context.clone(), hit.confidence);
        }

        let mut fixed: Vec<String> = Vec::new();
        if name.starts_with("aria-") {
            fixed.push("aria".into());
        }
        if name.starts_with("data-") {
            fixed.push("dataset".into());
        }
        if let Some((_, feature)) = FIXED_ATTRIBUTES.iter().find(|(attr, _)| *attr == name) {
            fixed.push(feature.to_string());
        }
        if FORM_VALIDATION_ATTRIBUTES.contains(&name) {
            fixed.push("form-validation".into());
        }
        if name == "loading" && value.is_some_and(|v| v.eq_ignore_ascii_case("lazy")) {
            fixed.push("loading-lazy".into());
        }
        if tag_name == "input" && name == "type" {
            let input_type = value.unwrap_or("").trim().to_ascii_lowercase();
            if INPUT_TYPES.contains(&input_type.as_str()) {
                fixed.push(format!("input-{}", input_type));
            }
        }

        for feature in fixed {
            base.emit_once(&mut emitted, &feature, start, context.clone(), Confidence::High);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walkers::base::assert_in_bundled_snapshot;

    #[test]
    fn test_fixed_ids_exist_in_bundled_snapshot() {
        assert_in_bundled_snapshot(MODERN_ELEMENTS.iter().copied());
        assert_in_bundled_snapshot(FIXED_ATTRIBUTES.iter().map(|(_, id)| *id));
        let input_ids: Vec<String> = INPUT_TYPES.iter().map(|t| format!("input-{}", t)).collect();
        assert_in_bundled_snapshot(input_ids.iter().map(String::as_str));
        assert_in_bundled_snapshot([
            "custom-elements",
            "aria",
            "dataset",
            "form-validation",
            "loading-lazy",
        ]);
    }
}
