//! Domain-specific assertion macros for reel harnesses.
//!
//! These wrap `pretty_assertions` so a failure shows which titles or which
//! part of the request body differed.

/// Assert that a movie list holds exactly these titles, in order.
///
/// ```rust
/// assert_titles!(response.payload, ["Heat", "Alien"]);
/// ```
#[macro_export]
macro_rules! assert_titles {
    ($movies:expr, [$($title:expr),* $(,)?]) => {{
        let actual: Vec<&str> = $movies.iter().map(|m| m.movie_title.as_str()).collect();
        let expected: Vec<&str> = vec![$($title),*];
        pretty_assertions::assert_eq!(actual, expected, "movie titles differ");
    }};
}

/// Assert a field of the recorded `query` object equals a JSON literal.
///
/// ```rust
/// assert_query_field!(recorded.body, "term", ["heat"]);
/// ```
#[macro_export]
macro_rules! assert_query_field {
    ($body:expr, $field:expr, $value:tt) => {{
        let body: &serde_json::Value = &$body;
        pretty_assertions::assert_eq!(
            body["query"][$field],
            serde_json::json!($value),
            "request body field query.{} differs in {}",
            $field,
            body
        );
    }};
}
