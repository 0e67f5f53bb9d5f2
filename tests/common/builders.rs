//! Test builders: ergonomic constructors for `Movie` rows and response bodies.
//!
//! These are for readability in test assertions, not production use.

use reel_core::{Movie, ReleaseYear};

// ---------------------------------------------------------------------------
// MovieBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Movie`] fixtures.
///
/// ```rust
/// let movie = MovieBuilder::new(42, "Heat").year(1995).similarity(0.9).build();
/// ```
pub struct MovieBuilder {
    movie_id: i64,
    movie_title: String,
    release_year: Option<ReleaseYear>,
    similarity: Option<f64>,
}

impl MovieBuilder {
    pub fn new(movie_id: i64, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            movie_title: title.into(),
            release_year: None,
            similarity: None,
        }
    }

    pub fn year(mut self, year: i64) -> Self {
        self.release_year = Some(ReleaseYear::Number(year));
        self
    }

    /// Year as a string, the way hand-written fixtures on the backend send it.
    pub fn year_text(mut self, year: impl Into<String>) -> Self {
        self.release_year = Some(ReleaseYear::Text(year.into()));
        self
    }

    pub fn similarity(mut self, score: f64) -> Self {
        self.similarity = Some(score);
        self
    }

    pub fn build(self) -> Movie {
        Movie {
            movie_id: self.movie_id,
            movie_title: self.movie_title,
            release_year: self.release_year,
            similarity: self.similarity,
        }
    }
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// `{"code":0,"payload":[...]}`
pub fn ok_response(movies: &[Movie]) -> serde_json::Value {
    serde_json::json!({ "code": 0, "payload": movies })
}

/// A non-zero code with an error message and, optionally, a payload anyway.
pub fn error_response(code: i64, errmsg: &str, movies: &[Movie]) -> serde_json::Value {
    serde_json::json!({ "code": code, "errmsg": errmsg, "payload": movies })
}
