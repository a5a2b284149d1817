//! Suggestion query builder.

use serde::{Deserialize, Serialize};

/// A suggestion query: where the parent lives, when the baby is due, and
/// free-text preference terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionQuery {
    /// Free-form location (e.g. "Seattle, WA").
    pub location: String,
    /// Due date as entered; any non-empty value counts.
    pub due_date: String,
    /// Preference terms as entered.
    pub terms: Vec<String>,
}

impl SuggestionQuery {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Set the due date.
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = due_date.into();
        self
    }

    /// Add one preference term.
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.terms.push(term.into());
        self
    }

    /// Add every term from a raw comma/newline separated string.
    pub fn with_terms_raw(mut self, raw: &str) -> Self {
        self.terms.extend(split_terms(raw));
        self
    }

    /// Terms ready for matching: trimmed, lowercased, whitespace-only terms
    /// dropped, duplicates removed (first occurrence wins).
    pub fn normalized_terms(&self) -> Vec<String> {
        let mut terms: Vec<String> = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            let term = term.trim().to_lowercase();
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
        terms
    }

    /// Whether a due date was given. Content is not inspected.
    pub fn has_due_date(&self) -> bool {
        !self.due_date.is_empty()
    }
}

/// Split a raw preference string on commas and newlines, trimming each
/// piece and dropping empty ones.
pub fn split_terms(raw: &str) -> Vec<String> {
    raw.split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
