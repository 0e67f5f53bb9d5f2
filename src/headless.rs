//! Headless subcommands: one request in, plain text out.
//!
//! Nothing here touches the terminal. Each renderer returns a `String` so
//! `main` decides where it goes and tests can assert on it directly.

use reel_client::{request_for, ClientError, SearchClient};
use reel_core::config::QueryConfig;
use reel_core::{build_query, Endpoint, Movie, SearchRequest, SearchResponse};

/// The request body `reel parse` prints: what the TUI would send for `text`.
pub fn parse_request(query: &QueryConfig, text: &str, limit: u32, offset: u32) -> SearchRequest {
    SearchRequest {
        kind: query.kind,
        query: build_query(text, limit, offset),
    }
}

pub fn render_request(request: &SearchRequest) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(request)? + "\n")
}

/// Run one hint or search. `limit` overrides the configured limit for
/// `endpoint`.
pub async fn run_request(
    client: &SearchClient,
    query: &QueryConfig,
    endpoint: Endpoint,
    text: &str,
    limit: Option<u32>,
) -> Result<SearchResponse, ClientError> {
    let mut request = request_for(query, endpoint, text);
    if let Some(limit) = limit {
        request.query.limit = limit;
    }
    client.send(endpoint, &request).await
}

pub fn render_response(response: &SearchResponse, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(response)? + "\n");
    }
    Ok(render_table(&response.payload))
}

/// Plain, uncoloured table: `ID  Title  Year`, columns padded to the widest
/// cell. Missing years render as `-`.
pub fn render_table(movies: &[Movie]) -> String {
    if movies.is_empty() {
        return "no movies\n".to_string();
    }

    let rows: Vec<[String; 3]> = movies
        .iter()
        .map(|m| {
            [
                m.movie_id.to_string(),
                m.movie_title.clone(),
                m.release_year
                    .as_ref()
                    .map_or_else(|| "-".to_string(), ToString::to_string),
            ]
        })
        .collect();

    let header = ["ID", "Title", "Year"];
    let width = |col: usize| {
        rows.iter()
            .map(|r| r[col].chars().count())
            .chain(std::iter::once(header[col].len()))
            .max()
            .unwrap_or(0)
    };
    let (id_w, title_w) = (width(0), width(1));

    let mut out = String::new();
    for [id, title, year] in std::iter::once(header.map(String::from)).chain(rows) {
        out.push_str(&format!("{id:<id_w$}  {title:<title_w$}  {year}\n"));
    }
    out
}
