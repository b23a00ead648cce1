//! Feature mapper
//!
//! Turns syntactic fragments handed over by the walkers into feature ids.
//! Each `map_*` entry point builds the candidate compat keys for its
//! construct and runs the domain's [`Strategy`] pipeline over them.
//!
//! The lookup tables (dataset index + compiled enhanced mappings) are built
//! lazily by [`FeatureMapper::initialize`]. Queries made before that point log
//! a warning and return no match.

pub mod enhanced;
pub mod patterns;
pub mod strategy;

pub use enhanced::{Construct, EnhancedTable};
pub use strategy::{FeatureMatch, Query, Strategy};

use crate::dataset::{Dataset, DatasetIndex};
use crate::error::Result;
use crate::types::FeatureType;
use once_cell::sync::OnceCell;
use patterns::{
    generate_keys, strip_vendor_prefix, CSS_AT_RULE_TEMPLATES, CSS_PROPERTY_TEMPLATES,
    CSS_SELECTOR_TEMPLATES, CSS_TYPE_TEMPLATES, HTML_ATTRIBUTE_TEMPLATES, HTML_ELEMENT_TEMPLATES,
    HTML_INPUT_TYPE_TEMPLATES, JS_TEMPLATES,
};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::{debug, warn};

static PSEUDO_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"::?([a-zA-Z][a-zA-Z0-9-]*)").unwrap());

static CONSTRUCTOR_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^new\s+([A-Za-z_$][\w$]*(?:\s*\.\s*[A-Za-z_$][\w$]*)*)").unwrap()
});

/// Where the mapper gets its dataset from
#[derive(Debug, Clone)]
pub enum DatasetSource {
    /// Snapshot compiled into the binary
    Bundled,
    /// A web-features `data.json` on disk
    Path(PathBuf),
    /// Already parsed (tests, embedding)
    Inline(Dataset),
}

/// Read-only tables shared by every query once built
#[derive(Debug)]
pub struct MapperTables {
    pub index: DatasetIndex,
    pub enhanced: EnhancedTable,
}

impl MapperTables {
    fn build(source: &DatasetSource) -> Result<Self> {
        let dataset = match source {
            DatasetSource::Bundled => Dataset::bundled()?,
            DatasetSource::Path(path) => Dataset::from_path(path)?,
            DatasetSource::Inline(dataset) => dataset.clone(),
        };

        let index = DatasetIndex::build(&dataset);
        let enhanced = EnhancedTable::build()?;
        debug!(
            "Feature mapper ready: {} features, {} compat keys, {} enhanced mappings",
            index.feature_count(),
            index.len(),
            enhanced.len()
        );

        Ok(Self { index, enhanced })
    }
}

#[derive(Debug)]
pub struct FeatureMapper {
    source: DatasetSource,
    tables: OnceCell<MapperTables>,
}

impl FeatureMapper {
    pub fn new(source: DatasetSource) -> Self {
        Self {
            source,
            tables: OnceCell::new(),
        }
    }

    pub fn bundled() -> Self {
        Self::new(DatasetSource::Bundled)
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self::new(DatasetSource::Inline(dataset))
    }

    /// Build the lookup tables. O(size of dataset), done once.
    ///
    /// Concurrent callers block on the same in-flight build; a failed build
    /// leaves the mapper uninitialized so a later call can retry.
    pub fn initialize(&self) -> Result<&MapperTables> {
        self.tables.get_or_try_init(|| MapperTables::build(&self.source))
    }

    pub fn is_initialized(&self) -> bool {
        self.tables.get().is_some()
    }

    /// Dataset index, if the mapper has been initialized
    pub fn index(&self) -> Option<&DatasetIndex> {
        self.tables.get().map(|tables| &tables.index)
    }

    fn tables(&self) -> Option<&MapperTables> {
        let tables = self.tables.get();
        if tables.is_none() {
            warn!("Feature mapper queried before initialization; reporting no match");
        }
        tables
    }

    fn lookup(&self, query: Query<'_>) -> Option<FeatureMatch> {
        let tables = self.tables()?;
        strategy::resolve(tables, &query)
    }

    /// `property` with an optional declared value. Custom properties
    /// (`--x`) map as `custom-property`.
    pub fn map_css_property(&self, property: &str, value: Option<&str>) -> Option<FeatureMatch> {
        let property = property.trim().to_lowercase();
        let property = if property.starts_with("--") {
            "custom-property".to_string()
        } else {
            property
        };
        let value = value.and_then(|v| css_value_keyword(&property, v)).unwrap_or_default();

        let keys = generate_keys(
            CSS_PROPERTY_TEMPLATES,
            &[("property", &property), ("value", &value)],
        );
        let hit = self.lookup(Query::new(Construct::CssProperty, keys, &property));
        if hit.is_some() {
            return hit;
        }

        let unprefixed = strip_vendor_prefix(&property)?;
        self.map_css_property(unprefixed, Some(&value))
    }

    /// All features a selector uses, in first-seen order
    pub fn map_css_selector(&self, selector: &str) -> Vec<FeatureMatch> {
        let Some(tables) = self.tables() else {
            return Vec::new();
        };

        let mut found: Vec<FeatureMatch> = Vec::new();
        let mut push = |hit: FeatureMatch| {
            if !found.iter().any(|existing| existing.feature == hit.feature) {
                found.push(hit);
            }
        };

        for captures in PSEUDO_NAME.captures_iter(selector) {
            let name = captures[1].to_lowercase();
            let keys = generate_keys(CSS_SELECTOR_TEMPLATES, &[("name", &name)]);
            if let Some(hit) = Strategy::DirectKey.resolve(tables, &Query::new(
                Construct::CssSelector,
                keys,
                &name,
            )) {
                push(hit);
            }
        }

        for entry in tables.enhanced.all_matches(Construct::CssSelector, selector) {
            push(FeatureMatch {
                feature: entry.feature.to_string(),
                confidence: entry.confidence,
                strategy: Strategy::Enhanced,
            });
        }

        found
    }

    /// At-rule name with or without the leading `@`
    pub fn map_css_at_rule(&self, name: &str) -> Option<FeatureMatch> {
        let name = name.trim().trim_start_matches('@').to_lowercase();
        let keys = generate_keys(CSS_AT_RULE_TEMPLATES, &[("name", &name)]);
        let hit = self.lookup(Query::new(Construct::CssAtRule, keys, &name));
        if hit.is_some() {
            return hit;
        }

        let unprefixed = strip_vendor_prefix(&name)?;
        self.map_css_at_rule(unprefixed)
    }

    /// CSS value function (`blur`, `oklch`, `conic-gradient`, ...)
    pub fn map_css_type(&self, function: &str) -> Option<FeatureMatch> {
        let name = function.trim().trim_end_matches('(').to_lowercase();
        let keys = generate_keys(CSS_TYPE_TEMPLATES, &[("name", &name)]);
        let hit = self.lookup(Query::new(Construct::CssValue, keys, &name));
        if hit.is_some() {
            return hit;
        }

        let unprefixed = strip_vendor_prefix(&name)?;
        self.map_css_type(unprefixed)
    }

    /// Dotted property-access path (`navigator.clipboard`)
    pub fn map_js_property(&self, path: &str) -> Option<FeatureMatch> {
        let path = normalize_js_path(path);
        let keys = generate_keys(JS_TEMPLATES, &[("name", &path)]);
        self.lookup(Query::new(Construct::JsMember, keys, &path).with_fuzzy_term(&path))
    }

    /// Callee of a call expression: `fetch` or `object.method`
    pub fn map_js_method(&self, callee: &str) -> Option<FeatureMatch> {
        let callee = normalize_js_path(callee);
        let keys = generate_keys(JS_TEMPLATES, &[("name", &callee)]);
        self.lookup(Query::new(Construct::JsCall, keys, &callee).with_fuzzy_term(&callee))
    }

    /// Full `new X(...)` expression text
    pub fn map_js_constructor(&self, expression: &str) -> Option<FeatureMatch> {
        let expression = expression.trim();
        let name = CONSTRUCTOR_NAME
            .captures(expression)
            .map(|captures| normalize_js_path(&captures[1]))
            .unwrap_or_default();

        let keys = generate_keys(JS_TEMPLATES, &[("name", &name)]);
        let query = Query::new(Construct::JsConstructor, keys, expression);
        if name.is_empty() {
            self.lookup(query)
        } else {
            self.lookup(query.with_fuzzy_term(&name))
        }
    }

    /// Lowercase tag name
    pub fn map_html_element(&self, tag: &str) -> Option<FeatureMatch> {
        let tag = tag.trim().to_lowercase();
        let keys = generate_keys(HTML_ELEMENT_TEMPLATES, &[("element", &tag)]);
        self.lookup(Query::new(Construct::HtmlElement, keys, &tag))
    }

    /// Attribute on an element; `value` only refines `input[type]`
    pub fn map_html_attribute(
        &self,
        element: &str,
        attribute: &str,
        value: Option<&str>,
    ) -> Option<FeatureMatch> {
        let element = element.trim().to_lowercase();
        let attribute = attribute.trim().to_lowercase();

        let mut keys = Vec::new();
        if element == "input" && attribute == "type" {
            if let Some(value) = value {
                let input_type = value.trim().to_lowercase().replace('-', "_");
                keys.extend(generate_keys(
                    HTML_INPUT_TYPE_TEMPLATES,
                    &[("value", &input_type)],
                ));
            }
        }
        keys.extend(generate_keys(
            HTML_ATTRIBUTE_TEMPLATES,
            &[("element", &element), ("attribute", &attribute)],
        ));

        self.lookup(Query::new(Construct::HtmlAttribute, keys, &attribute))
    }

    /// Whole-text re-scan with the domain's source-level enhanced mappings.
    ///
    /// Returns `(byte offset, match)` pairs ordered by offset.
    pub fn scan_source(&self, domain: FeatureType, text: &str) -> Vec<(usize, FeatureMatch)> {
        let Some(tables) = self.tables() else {
            return Vec::new();
        };

        let mut hits: Vec<(usize, FeatureMatch)> = tables
            .enhanced
            .entries_for(Construct::source_for(domain))
            .flat_map(|entry| {
                entry.trigger.find_iter(text).map(move |m| {
                    (
                        m.start(),
                        FeatureMatch {
                            feature: entry.feature.to_string(),
                            confidence: entry.confidence,
                            strategy: Strategy::Enhanced,
                        },
                    )
                })
            })
            .collect();

        hits.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.feature.cmp(&b.1.feature)));
        hits
    }
}

/// Value keyword used for `css.properties.<p>.<value>` keys.
///
/// `display` takes its last keyword (`inline grid` -> `grid`); other
/// properties only qualify when the value is a single bare keyword.
fn css_value_keyword(property: &str, value: &str) -> Option<String> {
    let value = value.trim().trim_end_matches(';').trim();
    let value = value
        .strip_suffix("!important")
        .map(str::trim_end)
        .unwrap_or(value)
        .to_lowercase();

    let keyword = if property == "display" {
        value.split_whitespace().last()?.to_string()
    } else {
        value
    };

    let is_keyword = !keyword.is_empty()
        && keyword
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    is_keyword.then_some(keyword)
}

fn normalize_js_path(path: &str) -> String {
    path.replace("?.", ".")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

static SHARED: OnceCell<FeatureMapper> = OnceCell::new();

/// Process-wide mapper over the bundled snapshot, initialized on first use
pub fn shared() -> Result<&'static FeatureMapper> {
    let mapper = SHARED.get_or_init(FeatureMapper::bundled);
    mapper.initialize()?;
    Ok(mapper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Confidence;

    fn mapper() -> &'static FeatureMapper {
        shared().unwrap()
    }

    fn id(hit: Option<FeatureMatch>) -> Option<String> {
        hit.map(|m| m.feature)
    }

    #[test]
    fn test_uninitialized_mapper_reports_no_match() {
        let mapper = FeatureMapper::bundled();
        assert!(!mapper.is_initialized());
        assert!(mapper.map_css_property("display", Some("grid")).is_none());
        assert!(mapper.map_css_selector("a:has(b)").is_empty());
        assert!(mapper.index().is_none());

        mapper.initialize().unwrap();
        assert!(mapper.is_initialized());
        assert_eq!(id(mapper.map_css_property("display", Some("grid"))), Some("grid".into()));
    }

    #[test]
    fn test_initialize_builds_tables_once() {
        let mapper = FeatureMapper::bundled();
        let first = mapper.initialize().unwrap() as *const MapperTables;
        let second = mapper.initialize().unwrap() as *const MapperTables;
        assert_eq!(first, second);

        let a = shared().unwrap() as *const FeatureMapper;
        let b = shared().unwrap() as *const FeatureMapper;
        assert_eq!(a, b);
    }

    #[test]
    fn test_concurrent_initialization_shares_one_build() {
        let mapper = FeatureMapper::bundled();
        let addresses: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| mapper.initialize().unwrap() as *const _ as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_failed_dataset_load_is_reported() {
        let mapper = FeatureMapper::new(DatasetSource::Path(PathBuf::from(
            "/definitely/not/here/data.json",
        )));
        assert!(mapper.initialize().is_err());
        assert!(!mapper.is_initialized());
    }

    #[test]
    fn test_vendor_prefix_equivalence() {
        let prefixed = id(mapper().map_css_property("-webkit-backdrop-filter", None));
        let plain = id(mapper().map_css_property("backdrop-filter", None));
        assert_eq!(prefixed, plain);
        assert_eq!(plain, Some("backdrop-filter".into()));
    }

    #[test]
    fn test_css_property_value_keys() {
        assert_eq!(
            id(mapper().map_css_property("display", Some("inline grid !important"))),
            Some("grid".into())
        );
        assert_eq!(
            id(mapper().map_css_property("text-wrap", Some("balance"))),
            Some("text-wrap-balance".into())
        );
        assert_eq!(
            id(mapper().map_css_property("--brand", Some("#fff"))),
            Some("custom-properties".into())
        );
        assert_eq!(
            id(mapper().map_css_property("container-type", Some("inline-size"))),
            Some("container-queries".into())
        );
        assert!(mapper().map_css_property("color", Some("red")).is_none());
    }

    #[test]
    fn test_selector_returns_every_feature() {
        let found: Vec<String> = mapper()
            .map_css_selector(".card:has(> img):is(.a, .b)")
            .into_iter()
            .map(|m| m.feature)
            .collect();
        assert_eq!(found, vec!["has", "is"]);
        assert!(mapper().map_css_selector(".plain > a").is_empty());
    }

    #[test]
    fn test_at_rules() {
        assert_eq!(id(mapper().map_css_at_rule("@layer")), Some("cascade-layers".into()));
        assert_eq!(id(mapper().map_css_at_rule("container")), Some("container-queries".into()));
        assert_eq!(
            id(mapper().map_css_at_rule("@-webkit-keyframes")),
            id(mapper().map_css_at_rule("@keyframes"))
        );
    }

    #[test]
    fn test_css_types() {
        assert_eq!(id(mapper().map_css_type("blur(")), Some("filter-effects".into()));
    }

    #[test]
    fn test_js_mapping() {
        assert_eq!(id(mapper().map_js_method("fetch")), Some("fetch".into()));
        assert_eq!(
            id(mapper().map_js_method("Promise.allSettled")),
            Some("promise-allsettled".into())
        );
        assert_eq!(
            id(mapper().map_js_property("navigator?.clipboard")),
            Some("async-clipboard".into())
        );
        assert_eq!(
            id(mapper().map_js_constructor("new IntersectionObserver(cb, {})")),
            Some("intersection-observer".into())
        );
        assert_eq!(id(mapper().map_js_constructor("new Map()")), Some("map".into()));
        assert!(mapper().map_js_method("doSomethingLocal").is_none());
    }

    #[test]
    fn test_html_mapping() {
        assert_eq!(id(mapper().map_html_element("DIALOG")), Some("dialog".into()));
        assert_eq!(
            id(mapper().map_html_attribute("input", "type", Some("email"))),
            Some("input-email".into())
        );
        assert_eq!(
            id(mapper().map_html_attribute("img", "loading", Some("lazy"))),
            Some("loading-lazy".into())
        );
        let aria = mapper().map_html_attribute("foo-bar", "aria-label", Some("x")).unwrap();
        assert_eq!(aria.feature, "aria");
        assert_eq!(aria.strategy, Strategy::Enhanced);
        assert_eq!(aria.confidence, Confidence::High);
    }

    #[test]
    fn test_scan_source_orders_by_offset() {
        let text = "const a = globalThis.x;\nx ??= import.meta.url;";
        let hits: Vec<(usize, String)> = mapper()
            .scan_source(FeatureType::Js, text)
            .into_iter()
            .map(|(offset, m)| (offset, m.feature))
            .collect();
        assert_eq!(
            hits,
            vec![
                (10, "globalthis".to_string()),
                (26, "logical-assignment".to_string()),
                (30, "import-meta".to_string()),
            ]
        );
    }
}
