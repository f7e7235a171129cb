// src/services/query.rs

//! Search query construction.

use chrono::NaiveDate;

/// Privacy and legal-notice terms in the languages used on Spanish sites.
pub const KEYWORDS: &[&str] = &[
    // Spanish
    "privacidad",
    "cookies",
    "protección de datos",
    "tratamiento de datos",
    // Catalan
    "privadesa",
    "protecció de dades",
    "dades",
    // Basque
    "pribatutasuna",
    "cookieak",
    "datuen babesa",
    // Galician
    "privacidade",
    // Universal
    "legal",
    "aviso legal",
    "rgpd",
    "gdpr",
];

/// Builds `site:{domain} ("kw1" OR ...) before:{date}` queries.
///
/// The keyword disjunction is rendered once at construction.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    keyword_clause: String,
    cutoff: String,
}

impl QueryBuilder {
    /// Create a builder over the default multilingual keyword set.
    pub fn new(cutoff: NaiveDate) -> Self {
        Self::with_keywords(KEYWORDS, cutoff)
    }

    /// Create a builder over a custom keyword set.
    pub fn with_keywords<S: AsRef<str>>(keywords: &[S], cutoff: NaiveDate) -> Self {
        let keyword_clause = keywords
            .iter()
            .map(|kw| format!("\"{}\"", kw.as_ref()))
            .collect::<Vec<_>>()
            .join(" OR ");

        Self {
            keyword_clause,
            cutoff: cutoff.format("%Y-%m-%d").to_string(),
        }
    }

    /// Query for a single domain.
    pub fn build(&self, domain: &str) -> String {
        format!(
            "site:{} ({}) before:{}",
            domain, self.keyword_clause, self.cutoff
        )
    }
}
