// Ordered resolution pipeline
//
// Each strategy answers one question about a syntactic fragment. The
// pipeline for a domain tries them in declared order and stops at the first
// answer: direct key > enhanced mapping > fuzzy (JS only).

use super::enhanced::Construct;
use super::MapperTables;
use crate::types::{Confidence, FeatureType};
use tracing::trace;

/// Fuzzy search is skipped for terms shorter than this
pub const MIN_FUZZY_TERM_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// First generated compat key present in the dataset index
    DirectKey,
    /// First enhanced-mapping regex matching the raw fragment
    Enhanced,
    /// Substring search over `api.` / `javascript.` keys
    Fuzzy,
}

const CSS_PIPELINE: &[Strategy] = &[Strategy::DirectKey, Strategy::Enhanced];
const JS_PIPELINE: &[Strategy] = &[Strategy::DirectKey, Strategy::Enhanced, Strategy::Fuzzy];
const HTML_PIPELINE: &[Strategy] = &[Strategy::DirectKey, Strategy::Enhanced];

/// What the walker extracted for one construct
#[derive(Debug, Clone)]
pub struct Query<'q> {
    pub construct: Construct,
    /// Candidate compat keys in template order
    pub keys: Vec<String>,
    /// Raw token or construct text tested by the enhanced table
    pub fragment: &'q str,
    /// Dotted member path eligible for fuzzy search
    pub fuzzy_term: Option<&'q str>,
}

impl<'q> Query<'q> {
    pub fn new(construct: Construct, keys: Vec<String>, fragment: &'q str) -> Self {
        Self {
            construct,
            keys,
            fragment,
            fuzzy_term: None,
        }
    }

    pub fn with_fuzzy_term(mut self, term: &'q str) -> Self {
        self.fuzzy_term = Some(term);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureMatch {
    pub feature: String,
    pub confidence: Confidence,
    pub strategy: Strategy,
}

impl Strategy {
    pub fn pipeline(domain: FeatureType) -> &'static [Strategy] {
        match domain {
            FeatureType::Css => CSS_PIPELINE,
            FeatureType::Js => JS_PIPELINE,
            FeatureType::Html => HTML_PIPELINE,
        }
    }

    pub fn resolve(&self, tables: &MapperTables, query: &Query<'_>) -> Option<FeatureMatch> {
        match self {
            Strategy::DirectKey => query.keys.iter().find_map(|key| {
                tables.index.get(key).map(|record| FeatureMatch {
                    feature: record.feature_id.clone(),
                    confidence: Confidence::High,
                    strategy: *self,
                })
            }),
            Strategy::Enhanced => tables
                .enhanced
                .first_match(query.construct, query.fragment)
                .map(|entry| FeatureMatch {
                    feature: entry.feature.to_string(),
                    confidence: entry.confidence,
                    strategy: *self,
                }),
            Strategy::Fuzzy => {
                let term = query.fuzzy_term?;
                if term.chars().count() < MIN_FUZZY_TERM_LEN || !term.contains('.') {
                    return None;
                }
                tables.index.fuzzy_find(term).map(|(key, record)| {
                    trace!("Fuzzy match '{}' -> {} ({})", term, record.feature_id, key);
                    FeatureMatch {
                        feature: record.feature_id.clone(),
                        confidence: Confidence::Low,
                        strategy: *self,
                    }
                })
            }
        }
    }
}

/// Run the pipeline for the query's domain; first answer wins
pub fn resolve(tables: &MapperTables, query: &Query<'_>) -> Option<FeatureMatch> {
    Strategy::pipeline(query.construct.domain())
        .iter()
        .find_map(|strategy| strategy.resolve(tables, query))
}
