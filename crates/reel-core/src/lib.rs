//! reel-core — query parsing and wire types for the reel movie search.
//!
//! # Architecture
//!
//! ```text
//! search text ──► query::build_query ──► types::SearchRequest ──► (reel-client)
//!                                                                     │
//!                        results table ◄── types::SearchResponse ◄────┘
//! ```
//!
//! Nothing in this crate performs I/O except [`config::Config::load`].

pub mod config;
pub mod query;
pub mod types;

pub use query::{build_query, ParsedQuery, Polarity, QuerySummary, DEFAULT_LIMIT, DEFAULT_OFFSET};
pub use types::{
    Endpoint, Movie, ReleaseYear, ResponseCode, SearchKind, SearchRequest, SearchResponse,
};
