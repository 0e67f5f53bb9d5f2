//! Query parser — turns the raw search box text into a [`ParsedQuery`].
//!
//! # Syntax
//!
//! The search text is a `;`-separated list of segments. Each segment is one of:
//!
//! | Segment           | Goes to                     |
//! |-------------------|-----------------------------|
//! | `batman begins`   | `term` (split on `' '`)     |
//! | `genre=action`    | `metadata["genre"]`         |
//! | `a=b=c`           | `invalid` (raw, untrimmed)  |
//!
//! Parsing never fails. Anything that cannot be classified lands in
//! `invalid` and the remaining segments are still processed.
//!
//! Term splitting is on single spaces without collapsing, so `"a  b"` yields
//! `["a", "", "b"]`, and an empty input yields a single empty term. The
//! backend drops short terms itself; the parser keeps the tokens verbatim.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Result limit used when the caller does not ask for one.
pub const DEFAULT_LIMIT: u32 = 20;
/// Accepted and serialized, but no backend reads it yet.
pub const DEFAULT_OFFSET: u32 = 0;

const SEGMENT_SEP: char = ';';
const KV_SEP: char = '=';
const TERM_SEP: char = ' ';

// ---------------------------------------------------------------------------
// ParsedQuery
// ---------------------------------------------------------------------------

/// The structured form of one search box submission.
///
/// Built fresh for every request by [`build_query`] and serialized as the
/// `query` member of a [`SearchRequest`](crate::types::SearchRequest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// Free-text tokens in order of appearance across all segments.
    pub term: Vec<String>,
    /// `key=value` filters. Repeated keys accumulate values in order.
    pub metadata: BTreeMap<String, Vec<String>>,
    /// Raw segments with more than one `=`.
    #[serde(default)]
    pub invalid: Vec<String>,
    pub limit: u32,
    pub offset: u32,
}

impl ParsedQuery {
    /// Parse with [`DEFAULT_LIMIT`] and [`DEFAULT_OFFSET`].
    pub fn parse(text: &str) -> Self {
        build_query(text, DEFAULT_LIMIT, DEFAULT_OFFSET)
    }

    /// True when no term carries any text and there are no metadata filters.
    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty() && self.term.iter().all(|t| t.is_empty())
    }

    /// Count what the backend will make of this query.
    pub fn summary(&self) -> QuerySummary {
        let mut summary = QuerySummary {
            invalid: self.invalid.len(),
            filters: self.metadata.len(),
            filter_values: self.metadata.values().map(Vec::len).sum(),
            ..QuerySummary::default()
        };
        for term in &self.term {
            match Polarity::of_term(term) {
                Polarity::Include(_) => summary.included_terms += 1,
                Polarity::Exclude(_) => summary.excluded_terms += 1,
                Polarity::Ignored => summary.ignored_terms += 1,
            }
        }
        summary
    }
}

impl Default for ParsedQuery {
    fn default() -> Self {
        Self {
            term: Vec::new(),
            metadata: BTreeMap::new(),
            invalid: Vec::new(),
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

/// Split `text` into terms, metadata filters and invalid segments.
pub fn build_query(text: &str, limit: u32, offset: u32) -> ParsedQuery {
    let mut parsed = ParsedQuery {
        limit,
        offset,
        ..ParsedQuery::default()
    };

    for segment in text.split(SEGMENT_SEP) {
        let parts: Vec<&str> = trim(segment).split(KV_SEP).collect();
        match parts.as_slice() {
            [words] => {
                parsed
                    .term
                    .extend(trim(words).split(TERM_SEP).map(str::to_string));
            }
            [key, value] => {
                parsed
                    .metadata
                    .entry(trim(key).to_string())
                    .or_default()
                    .push(trim(value).to_string());
            }
            _ => parsed.invalid.push(segment.to_string()),
        }
    }

    parsed
}

/// Whitespace trim that also strips the byte order mark, which browsers and
/// pasted text leave at the start of input.
fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

// ---------------------------------------------------------------------------
// Polarity
// ---------------------------------------------------------------------------

/// How the backend reads a term, metadata key or metadata value.
///
/// A leading `-` excludes; a bare `-` carries nothing and is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity<'a> {
    Include(&'a str),
    Exclude(&'a str),
    Ignored,
}

impl<'a> Polarity<'a> {
    /// Classify a metadata key or value.
    pub fn of(token: &'a str) -> Self {
        match token.strip_prefix('-') {
            Some("") => Polarity::Ignored,
            Some(rest) => Polarity::Exclude(rest),
            None => Polarity::Include(token),
        }
    }

    /// Classify a free-text term. Terms shorter than two characters are
    /// never matched on.
    pub fn of_term(term: &'a str) -> Self {
        if term.chars().count() < 2 {
            return Polarity::Ignored;
        }
        Self::of(term)
    }
}

// ---------------------------------------------------------------------------
// QuerySummary
// ---------------------------------------------------------------------------

/// Counts shown next to the query input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuerySummary {
    pub included_terms: usize,
    pub excluded_terms: usize,
    pub ignored_terms: usize,
    /// Distinct metadata keys.
    pub filters: usize,
    pub filter_values: usize,
    pub invalid: usize,
}

impl fmt::Display for QuerySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "terms:{}", self.included_terms)?;
        if self.excluded_terms > 0 {
            write!(f, " -{}", self.excluded_terms)?;
        }
        write!(f, " filters:{}", self.filters)?;
        if self.invalid > 0 {
            write!(f, " invalid:{}", self.invalid)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
