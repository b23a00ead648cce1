// Hand-curated regex -> feature id table
//
// Covers syntax that name-based key generation cannot resolve: pseudo
// selectors, at-rules, constructor calls, well-known member paths. `*Source`
// rows are only used by the whole-file re-scan.

use crate::error::{Result, ScanError};
use crate::types::{Confidence, FeatureType};
use regex::Regex;

/// The syntactic position a fragment was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    CssProperty,
    CssSelector,
    CssAtRule,
    CssValue,
    CssSource,
    JsMember,
    JsCall,
    JsConstructor,
    JsSource,
    HtmlElement,
    HtmlAttribute,
    HtmlSource,
}

impl Construct {
    pub fn domain(&self) -> FeatureType {
        match self {
            Construct::CssProperty
            | Construct::CssSelector
            | Construct::CssAtRule
            | Construct::CssValue
            | Construct::CssSource => FeatureType::Css,
            Construct::JsMember | Construct::JsCall | Construct::JsConstructor | Construct::JsSource => {
                FeatureType::Js
            }
            Construct::HtmlElement | Construct::HtmlAttribute | Construct::HtmlSource => {
                FeatureType::Html
            }
        }
    }

    /// Whole-file scan rows for a domain
    pub fn source_for(domain: FeatureType) -> Construct {
        match domain {
            FeatureType::Css => Construct::CssSource,
            FeatureType::Js => Construct::JsSource,
            FeatureType::Html => Construct::HtmlSource,
        }
    }
}

use Confidence::{High, Low, Medium};
use Construct::*;

const ENHANCED_MAPPINGS: &[(Construct, &str, &str, Confidence)] = &[
    // CSS properties the dataset keys under a different name
    (CssProperty, r"^container(-type|-name)?$", "container-queries", High),
    (CssProperty, r"^(margin|padding|inset|border)-(inline|block)", "logical-properties", High),
    (CssProperty, r"^inset$", "logical-properties", High),
    (CssProperty, r"^view-transition-", "view-transitions", High),
    (CssProperty, r"^(anchor-name|position-anchor|position-area|position-try)", "anchor-positioning", High),
    (CssProperty, r"^(animation|scroll|view)-timeline", "scroll-driven-animations", High),
    (CssProperty, r"^scroll-snap-", "scroll-snap", High),
    (CssProperty, r"^overscroll-behavior", "overscroll-behavior", High),
    // Selectors
    (CssSelector, r":has\(", "has", High),
    (CssSelector, r":is\(", "is", High),
    (CssSelector, r":where\(", "where", High),
    (CssSelector, r":focus-visible\b", "focus-visible", High),
    (CssSelector, r"::view-transition", "view-transitions", Medium),
    (CssSelector, r"(^|[\s,>+~(])&", "nesting", Medium),
    // At-rules
    (CssAtRule, r"^container$", "container-queries", High),
    (CssAtRule, r"^layer$", "cascade-layers", High),
    (CssAtRule, r"^scope$", "scope", High),
    (CssAtRule, r"^starting-style$", "starting-style", High),
    (CssAtRule, r"^property$", "registered-custom-properties", High),
    (CssSource, r"@import[^;{]*\blayer\b", "cascade-layers", Medium),
    // JS member paths
    (JsMember, r"^navigator\.clipboard\b", "async-clipboard", High),
    (JsMember, r"^navigator\.(share|canShare)$", "web-share", High),
    (JsMember, r"^navigator\.serviceWorker\b", "service-workers", High),
    (JsMember, r"^(window\.)?(localStorage|sessionStorage)\b", "localstorage", High),
    (JsMember, r"^(window\.)?customElements\b", "custom-elements", High),
    (JsMember, r"^globalThis\b", "globalthis", High),
    // JS calls
    (JsCall, r"^structuredClone$", "structured-clone", High),
    (JsCall, r"^Promise\.allSettled$", "promise-allsettled", High),
    (JsCall, r"^Promise\.any$", "promise-any", High),
    (JsCall, r"^Promise\.withResolvers$", "promise-withresolvers", High),
    (JsCall, r"^Object\.hasOwn$", "object-hasown", High),
    (JsCall, r"^(Object|Map)\.groupBy$", "array-group", High),
    (JsCall, r"^crypto\.randomUUID$", "crypto-random-uuid", High),
    (JsCall, r"^customElements\.define$", "custom-elements", High),
    (JsCall, r"^document\.startViewTransition$", "view-transitions", High),
    (JsCall, r"^navigator\.(share|canShare)$", "web-share", High),
    (JsCall, r"^navigator\.clipboard\.", "async-clipboard", High),
    (JsCall, r"\.attachShadow$", "shadow-dom", High),
    (JsCall, r"\.replaceAll$", "string-replaceall", Medium),
    (JsCall, r"\.findLast(Index)?$", "array-findlast", Medium),
    (JsCall, r"\.(toSorted|toReversed|toSpliced)$", "array-by-copy", Medium),
    (JsCall, r"\.showModal$", "dialog", Medium),
    (JsCall, r"\.(showPopover|hidePopover|togglePopover)$", "popover", Medium),
    (JsCall, r"\.animate$", "web-animations", Low),
    (JsCall, r"\.at$", "array-at", Low),
    (JsCall, r"\.(union|intersection|difference|symmetricDifference|isSubsetOf|isSupersetOf|isDisjointFrom)$", "set-methods", Low),
    // JS constructors, matched against the whole `new X(...)` text
    (JsConstructor, r"new\s+IntersectionObserver\b", "intersection-observer", High),
    (JsConstructor, r"new\s+ResizeObserver\b", "resize-observer", High),
    (JsConstructor, r"new\s+MutationObserver\b", "mutation-observer", High),
    (JsConstructor, r"new\s+AbortController\b", "abort-controller", High),
    (JsConstructor, r"new\s+BroadcastChannel\b", "broadcast-channel", High),
    (JsConstructor, r"new\s+Intl\.Segmenter\b", "intl-segmenter", High),
    (JsSource, r"\bimport\.meta\b", "import-meta", High),
    (JsSource, r"\bglobalThis\b", "globalthis", High),
    (JsSource, r"(\?\?=|&&=|\|\|=)", "logical-assignment", Medium),
    // HTML
    (HtmlElement, r"^[a-z][a-z0-9]*-[a-z0-9-]*$", "custom-elements", Medium),
    (HtmlAttribute, r"^popover(target|targetaction)?$", "popover", High),
    (HtmlAttribute, r"^inert$", "inert", High),
    (HtmlAttribute, r"^aria-", "aria", High),
    (HtmlAttribute, r"^data-", "dataset", High),
];

#[derive(Debug)]
pub struct EnhancedMapping {
    pub construct: Construct,
    pub trigger: Regex,
    pub feature: &'static str,
    pub confidence: Confidence,
}

/// Compiled enhanced mappings, in declaration order
#[derive(Debug)]
pub struct EnhancedTable {
    entries: Vec<EnhancedMapping>,
}

impl EnhancedTable {
    pub fn build() -> Result<Self> {
        let entries = ENHANCED_MAPPINGS
            .iter()
            .map(|&(construct, pattern, feature, confidence)| {
                let trigger = Regex::new(pattern).map_err(|source| ScanError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })?;
                Ok(EnhancedMapping {
                    construct,
                    trigger,
                    feature,
                    confidence,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    /// First entry for `construct` whose pattern matches the fragment
    pub fn first_match(&self, construct: Construct, fragment: &str) -> Option<&EnhancedMapping> {
        self.entries_for(construct)
            .find(|entry| entry.trigger.is_match(fragment))
    }

    /// Every entry for `construct` whose pattern matches, in table order
    pub fn all_matches<'a>(
        &'a self,
        construct: Construct,
        fragment: &'a str,
    ) -> impl Iterator<Item = &'a EnhancedMapping> + 'a {
        self.entries_for(construct)
            .filter(move |entry| entry.trigger.is_match(fragment))
    }

    pub fn entries_for(&self, construct: Construct) -> impl Iterator<Item = &EnhancedMapping> {
        self.entries
            .iter()
            .filter(move |entry| entry.construct == construct)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
