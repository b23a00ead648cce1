// JavaScript Walker Calls - property access, calls and `new` expressions
//
// Only simple dotted paths (`a.b.c`, `a?.b`) are mapped; computed access and
// call chains are left to the nested nodes.

use crate::types::Confidence;
use crate::walkers::base::BaseWalker;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tree_sitter::Node;

static SIMPLE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][\w$]*(?:\s*\??\.\s*#?[A-Za-z_$][\w$]*)*$").unwrap()
});

const GLOBAL_FUNCTIONS: &[(&str, &str)] = &[
    ("fetch", "fetch"),
    ("requestAnimationFrame", "request-animation-frame"),
    ("requestIdleCallback", "request-idle-callback"),
    ("queueMicrotask", "queue-microtask"),
];

const BUILTIN_CONSTRUCTORS: &[(&str, &str)] = &[
    ("WeakMap", "weakmap"),
    ("WeakSet", "weakset"),
    ("Map", "map"),
    ("Set", "set"),
    ("Symbol", "symbol"),
    ("Proxy", "proxy"),
    ("Promise", "promise"),
    ("WeakRef", "weakref"),
    ("FinalizationRegistry", "finalization-registry"),
];

/// Global object prefixes that do not change which API is called
const GLOBAL_OBJECTS: &[&str] = &["window.", "globalThis.", "self."];

pub(super) struct CallRules;

impl CallRules {
    pub(super) fn visit_member_expression(base: &mut BaseWalker, node: Node) {
        if Self::is_callee(&node) {
            return;
        }

        let path = base.get_node_text(&node);
        if !SIMPLE_PATH.is_match(path) {
            return;
        }

        if let Some(hit) = base.mapper.map_js_property(path) {
            base.emit_match(&hit, node.start_byte(), path);
        }
    }

    pub(super) fn visit_call_expression(base: &mut BaseWalker, node: Node) {
        let Some(function) = node.child_by_field_name("function") else {
            return;
        };
        let start = node.start_byte();
        let mut emitted = HashSet::new();

        if function.kind() == "import" {
            let context = base.get_node_text(&node);
            base.emit_once(&mut emitted, "dynamic-import", start, context, Confidence::High);
            return;
        }

        let callee = base.get_node_text(&function);
        if !SIMPLE_PATH.is_match(callee) {
            return;
        }
        let callee: String = callee.split_whitespace().collect();
        let context = format!("{}()", callee);

        if let Some(hit) = base.mapper.map_js_method(&callee) {
            base.emit_once(&mut emitted, &hit.feature, start, context.clone(), hit.confidence);
        }

        let bare = GLOBAL_OBJECTS
            .iter()
            .find_map(|prefix| callee.strip_prefix(prefix))
            .unwrap_or(&callee);

        if let Some((_, feature)) = GLOBAL_FUNCTIONS.iter().find(|(name, _)| *name == bare) {
            base.emit_once(&mut emitted, feature, start, context.clone(), Confidence::High);
        }

        let promise_feature = match bare {
            "Promise.allSettled" => Some("promise-allsettled"),
            "Promise.any" => Some("promise-any"),
            _ if bare.starts_with("Reflect.") => Some("reflect"),
            _ => None,
        };
        if let Some(feature) = promise_feature {
            base.emit_once(&mut emitted, feature, start, context, Confidence::High);
        }
    }

    pub(super) fn visit_new_expression(base: &mut BaseWalker, node: Node) {
        let text = base.get_node_text(&node);
        let start = node.start_byte();
        let mut emitted = HashSet::new();

        if let Some(hit) = base.mapper.map_js_constructor(text) {
            base.emit_once(&mut emitted, &hit.feature, start, text, hit.confidence);
        }

        let constructor = base.get_field_text(&node, "constructor").unwrap_or("").trim();
        if let Some((_, feature)) = BUILTIN_CONSTRUCTORS
            .iter()
            .find(|(name, _)| *name == constructor)
        {
            base.emit_once(&mut emitted, feature, start, text, Confidence::High);
        }
    }

    /// `a.b` in `a.b()` is handled by the call
    fn is_callee(node: &Node) -> bool {
        node.parent()
            .filter(|parent| parent.kind() == "call_expression")
            .and_then(|parent| parent.child_by_field_name("function"))
            .is_some_and(|function| function.id() == node.id())
    }
}
