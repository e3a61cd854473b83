//! Keyword taxonomy matcher: free text to a disjunctive boolean query.
//!
//! Every taxonomy term is escaped and wrapped in word boundaries once, when
//! the matcher is built. Matching is recall-oriented: every hit is reported,
//! unranked, in taxonomy order.

use regex::Regex;

use super::{DataSourceError, Taxonomy};

/// Returned when no taxonomy term occurs in the text.
pub const NO_TERMS_FOUND: &str = "No relevant terms found.";

/// Operator placed between matched terms.
const OR_OPERATOR: &str = " OR ";

/// A compiled whole-word pattern with the term it stands for.
struct TermPattern {
    term: String,
    regex: Regex,
}

/// Precompiled matcher over an immutable taxonomy. Shared across requests.
pub struct KeywordMatcher {
    patterns: Vec<TermPattern>,
}

impl KeywordMatcher {
    pub fn new(taxonomy: &Taxonomy) -> Result<Self, DataSourceError> {
        let patterns = taxonomy
            .entries()
            .map(|(_, term)| compile_term(term))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(patterns = patterns.len(), "Keyword matcher compiled");
        Ok(Self { patterns })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Terms found in `free_text`, in taxonomy order. A term listed under two
    /// categories is reported twice.
    pub fn find_terms<'a>(&'a self, free_text: &str) -> Vec<&'a str> {
        let text = free_text.to_lowercase();
        if text.is_empty() {
            return Vec::new();
        }

        self.patterns
            .iter()
            .filter(|p| p.regex.is_match(&text))
            .map(|p| p.term.as_str())
            .collect()
    }

    /// Build the boolean query for `free_text`: matched terms joined by `OR`,
    /// or [`NO_TERMS_FOUND`].
    pub fn generate_boolean_query(&self, free_text: &str) -> String {
        let terms = self.find_terms(free_text);
        if terms.is_empty() {
            NO_TERMS_FOUND.to_string()
        } else {
            terms.join(OR_OPERATOR)
        }
    }
}

fn compile_term(term: &str) -> Result<TermPattern, DataSourceError> {
    let pattern = format!(r"\b{}\b", regex::escape(term));
    let regex = Regex::new(&pattern).map_err(|e| DataSourceError::Pattern {
        term: term.to_string(),
        reason: e.to_string(),
    })?;
    Ok(TermPattern {
        term: term.to_string(),
        regex,
    })
}
