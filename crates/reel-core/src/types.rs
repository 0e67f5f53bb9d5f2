//! Wire types shared by the client, the TUI and the test backend.
//!
//! Request bodies look like `{"type": "movie", "query": {...}}` and are sent
//! to both the hint and the search endpoint. Responses carry a numeric
//! `code` (0 on success), an optional `errmsg`, and a `payload` list of
//! movies which is rendered even when `code` is non-zero.

use crate::query::ParsedQuery;
use serde::{Deserialize, Deserializer, Serialize};

/// Which endpoint a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Cheap lookup fired while typing. The backend only reads `term`.
    Hint,
    /// Full search including metadata filters and the limit.
    Search,
}

impl Endpoint {
    pub fn default_path(self) -> &'static str {
        match self {
            Endpoint::Hint => "/api/gethint",
            Endpoint::Search => "/api/search",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Hint => write!(f, "hint"),
            Endpoint::Search => write!(f, "search"),
        }
    }
}

/// Media type a request asks for. Only `movie` is served today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    All,
    #[default]
    Movie,
    Podcast,
    Song,
    Tvshow,
}

/// Body POSTed to either endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "type")]
    pub kind: SearchKind,
    pub query: ParsedQuery,
}

impl SearchRequest {
    pub fn movie(query: ParsedQuery) -> Self {
        Self {
            kind: SearchKind::Movie,
            query,
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Known values of the response `code` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Success,
    /// The backend rejected the query contents (e.g. unknown metadata type).
    UserError,
    /// The request body was missing required members.
    InvalidRequest,
    Other(i64),
}

impl From<i64> for ResponseCode {
    fn from(code: i64) -> Self {
        match code {
            0 => ResponseCode::Success,
            1 => ResponseCode::UserError,
            1000 => ResponseCode::InvalidRequest,
            other => ResponseCode::Other(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errmsg: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub payload: Vec<Movie>,
}

impl SearchResponse {
    pub fn status(&self) -> ResponseCode {
        self.code.into()
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Movie>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Movie>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub movie_id: i64,
    pub movie_title: String,
    #[serde(default)]
    pub release_year: Option<ReleaseYear>,
    /// Ranking score, present when the backend matched on terms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

/// Release year as the backend sends it: a number from the database or a
/// string from hand-written fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReleaseYear {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for ReleaseYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReleaseYear::Number(n) => write!(f, "{n}"),
            ReleaseYear::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
