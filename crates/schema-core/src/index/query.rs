//! Search key built from a raw search string.

use std::borrow::Cow;

/// Normalized search terms derived from one raw search string.
///
/// A key with no terms matches every name. All terms must match (AND), each
/// as a case-insensitive substring of the name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryKey {
    raw: String,
    terms: Vec<String>,
}

impl QueryKey {
    /// Build a key by splitting `raw` on whitespace and uppercasing each piece.
    ///
    /// ```
    /// use schema_library::QueryKey;
    ///
    /// let key = QueryKey::build("  pie  app ");
    /// assert_eq!(key.terms(), ["PIE", "APP"]);
    /// assert!(QueryKey::build("   ").is_empty());
    /// ```
    pub fn build(raw: &str) -> Self {
        let terms = raw
            .split_whitespace()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_uppercase)
            .collect();

        Self {
            raw: raw.to_string(),
            terms,
        }
    }

    /// The raw string this key was built from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Whether this is the "match everything" key.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether this key was built from exactly `raw`, so recomputation can be skipped.
    pub fn is_based_on(&self, raw: &str) -> bool {
        self.raw == raw
    }

    /// Whether `name` contains every term, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        if self.terms.is_empty() {
            return true;
        }

        let name: Cow<'_, str> = if name.chars().any(char::is_lowercase) {
            Cow::Owned(name.to_uppercase())
        } else {
            Cow::Borrowed(name)
        };

        self.terms.iter().all(|term| name.contains(term.as_str()))
    }
}
