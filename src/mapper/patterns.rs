//! Compat-key templates and key generation
//!
//! A template is a dot-separated compat key with `${placeholder}` tokens.
//! Template order matters: the direct-key strategy takes the first key that
//! exists in the index, so more specific templates come first.

pub const CSS_PROPERTY_TEMPLATES: &[&str] = &[
    "css.properties.${property}.${value}",
    "css.properties.${property}",
];

pub const CSS_AT_RULE_TEMPLATES: &[&str] = &["css.at-rules.${name}"];

pub const CSS_SELECTOR_TEMPLATES: &[&str] = &["css.selectors.${name}"];

pub const CSS_TYPE_TEMPLATES: &[&str] = &[
    "css.types.${name}",
    "css.types.filter-function.${name}",
    "css.types.color.${name}",
    "css.types.image.gradient.${name}",
];

pub const JS_TEMPLATES: &[&str] = &[
    "api.${name}",
    // Constructors are keyed as api.Foo.Foo
    "api.${name}.${name}",
    "javascript.builtins.${name}",
    "javascript.statements.${name}",
    "javascript.operators.${name}",
    "javascript.functions.${name}",
    "javascript.classes.${name}",
    "javascript.grammar.${name}",
    "api._globals.${name}",
    "api.Window.${name}",
];

pub const HTML_ELEMENT_TEMPLATES: &[&str] = &["html.elements.${element}"];

pub const HTML_ATTRIBUTE_TEMPLATES: &[&str] = &[
    "html.elements.${element}.${attribute}",
    "html.global_attributes.${attribute}",
];

pub const HTML_INPUT_TYPE_TEMPLATES: &[&str] = &["html.elements.input.type_${value}"];

/// Substitute every supplied placeholder into every template.
///
/// Empty values count as missing. Any key still holding a `${` token or the
/// literal `undefined` is dropped; the surviving keys keep template order.
pub fn generate_keys(templates: &[&str], substitutions: &[(&str, &str)]) -> Vec<String> {
    templates
        .iter()
        .map(|template| {
            let mut key = template.to_string();
            for (name, value) in substitutions {
                if value.is_empty() {
                    continue;
                }
                key = key.replace(&format!("${{{}}}", name), value);
            }
            key
        })
        .filter(|key| !key.contains("${") && !key.contains("undefined"))
        .collect()
}

/// Vendor prefixes stripped from CSS names before retrying a lookup
pub const VENDOR_PREFIXES: &[&str] = &["-webkit-", "-moz-", "-ms-", "-o-"];

pub fn strip_vendor_prefix(name: &str) -> Option<&str> {
    VENDOR_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .filter(|rest| !rest.is_empty())
}
