//! Taxonomy store: the controlled medical vocabulary.
//!
//! Loaded once at startup from a CSV source with a `category,term` header and
//! shared read-only for the lifetime of the process. Category order and term
//! order within a category follow first appearance in the source, which is
//! the order the matcher reports hits in.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::DataSourceError;

/// A clinical category and its terms, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub terms: Vec<String>,
}

/// Immutable category → term vocabulary.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    /// Load the vocabulary from a CSV file on disk.
    pub fn load(path: &Path) -> Result<Self, DataSourceError> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DataSourceError::NotFound(path.to_path_buf())
            } else {
                DataSourceError::Io(e)
            }
        })?;

        let taxonomy = Self::from_reader(file)?;
        tracing::info!(
            path = %path.display(),
            categories = taxonomy.category_count(),
            terms = taxonomy.term_count(),
            "Taxonomy loaded"
        );
        Ok(taxonomy)
    }

    /// Parse the vocabulary from any CSV byte source. The first row is a header
    /// and is skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataSourceError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut categories: Vec<Category> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut seen: Vec<HashSet<String>> = Vec::new();

        for result in csv_reader.records() {
            let record = result?;
            if record.len() != 2 {
                return Err(DataSourceError::MalformedRow {
                    line: record.position().map(|p| p.line()).unwrap_or(0),
                    found: record.len(),
                });
            }

            let category = &record[0];
            let term = record[1].to_lowercase();
            if term.is_empty() {
                tracing::warn!(category, "Skipping taxonomy row with empty term");
                continue;
            }

            let slot = match index.get(category) {
                Some(&slot) => slot,
                None => {
                    categories.push(Category {
                        name: category.to_string(),
                        terms: Vec::new(),
                    });
                    seen.push(HashSet::new());
                    index.insert(category.to_string(), categories.len() - 1);
                    categories.len() - 1
                }
            };

            if seen[slot].insert(term.clone()) {
                categories[slot].terms.push(term);
            }
        }

        Ok(Self { categories })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Every `(category, term)` pair in iteration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.categories.iter().flat_map(|c| {
            c.terms
                .iter()
                .map(move |t| (c.name.as_str(), t.as_str()))
        })
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn term_count(&self) -> usize {
        self.categories.iter().map(|c| c.terms.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.term_count() == 0
    }
}
