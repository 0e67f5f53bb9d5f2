//! Results table: the movie list under the query bar.
//!
//! # Navigation (when pane is focused)
//!
//! | Key | Action |
//! |-----|--------|
//! | `↑` / `k` | Move cursor up one row |
//! | `↓` / `j` | Move cursor down one row |
//! | `PageUp` / `Ctrl+u` | Up one page |
//! | `PageDown` / `Ctrl+d` | Down one page |
//! | `g` / `G` | First / last row |
//!
//! # Update semantics
//!
//! Every applied response clears the list and repopulates it from the
//! payload, non-zero `code` or not. Responses are applied in the order they
//! land, so a slow hint can overwrite a newer search. With `drop_stale` set,
//! a response older than the last one applied is discarded instead.

use std::cell::Cell;

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::Line,
    widgets::{
        Block, Cell as TableCell, Row, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Table, Widget,
    },
};
use reel_client::{Landed, RequestId};
use reel_core::{Endpoint, Movie};

const PAGE_STEP: usize = 10;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// What [`ResultsState::apply`] did with a landed response.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// The list now holds the payload of this response.
    Replaced {
        endpoint: Endpoint,
        count: usize,
        code: i64,
        errmsg: Option<String>,
    },
    /// Older than what is on screen; ignored.
    Stale { endpoint: Endpoint },
    /// The request failed; the list is untouched.
    Failed { endpoint: Endpoint, error: String },
}

pub struct ResultsState {
    pub movies: Vec<Movie>,
    /// Index into `movies` of the highlighted row.
    pub cursor: usize,
    /// Index of the first visible row.
    pub offset: usize,
    pub drop_stale: bool,
    pub show_similarity: bool,
    /// Id of the response currently on screen.
    pub shown: Option<RequestId>,
    /// Cached from the last render so `handle()` can page by screenfuls.
    last_height: Cell<usize>,
}

impl Default for ResultsState {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl ResultsState {
    pub fn new(drop_stale: bool, show_similarity: bool) -> Self {
        Self {
            movies: Vec::new(),
            cursor: 0,
            offset: 0,
            drop_stale,
            show_similarity,
            shown: None,
            last_height: Cell::new(20),
        }
    }

    fn height(&self) -> usize {
        self.last_height.get().max(1)
    }

    /// Fold a landed response into the list.
    pub fn apply(&mut self, landed: Landed) -> Applied {
        let Landed {
            id,
            endpoint,
            outcome,
            ..
        } = landed;

        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                return Applied::Failed {
                    endpoint,
                    error: e.to_string(),
                }
            }
        };

        if self.drop_stale && self.shown.is_some_and(|shown| id < shown) {
            tracing::debug!(id = id.0, %endpoint, "results: dropped stale response");
            return Applied::Stale { endpoint };
        }

        // The client already logged the non-zero code at warn.
        if !response.is_success() {
            tracing::debug!(
                %endpoint,
                code = response.code,
                "results: rendering payload of non-zero response"
            );
        }

        self.replace(response.payload);
        self.shown = Some(id);
        tracing::debug!(id = id.0, %endpoint, count = self.movies.len(), "results: replaced");

        Applied::Replaced {
            endpoint,
            count: self.movies.len(),
            code: response.code,
            errmsg: response.errmsg,
        }
    }

    /// Clear-then-repopulate; the cursor returns to the top.
    pub fn replace(&mut self, movies: Vec<Movie>) {
        self.movies.clear();
        self.movies.extend(movies);
        self.cursor = 0;
        self.offset = 0;
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    pub fn selected(&self) -> Option<&Movie> {
        self.movies.get(self.cursor)
    }

    /// Handle a navigation event from the app shell.
    pub fn handle(&mut self, event: &AppEvent) {
        let total = self.movies.len();
        if total == 0 {
            return;
        }
        let last = total - 1;

        self.cursor = match event {
            AppEvent::Nav(Direction::Up) => self.cursor.saturating_sub(1),
            AppEvent::Nav(Direction::Down) => (self.cursor + 1).min(last),
            AppEvent::ScrollUp => self.cursor.saturating_sub(PAGE_STEP.min(self.height())),
            AppEvent::ScrollDown => (self.cursor + PAGE_STEP.min(self.height())).min(last),
            AppEvent::Top => 0,
            AppEvent::Bottom => last,
            _ => return,
        };
        self.scroll_to_cursor();
        tracing::debug!(cursor = self.cursor, offset = self.offset, "results: cursor moved");
    }

    fn scroll_to_cursor(&mut self) {
        let height = self.height();
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct ResultsTable<'a> {
    state: &'a ResultsState,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> ResultsTable<'a> {
    pub fn new(state: &'a ResultsState, focused: bool, theme: &'a Theme) -> Self {
        Self { state, focused, theme }
    }
}

impl Widget for ResultsTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused
        } else {
            self.theme.border_unfocused
        };

        let title = format!("Movies ({})", self.state.movies.len());
        let block = Block::bordered().title(title).border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        // One row is taken by the header.
        let height = (inner.height as usize).saturating_sub(1);
        self.state.last_height.set(height);

        let total = self.state.movies.len();
        let start = self.state.offset.min(total);
        let end = (start + height).min(total);

        let mut header = vec!["ID", "Title", "Year"];
        let mut widths = vec![
            Constraint::Length(8),
            Constraint::Fill(1),
            Constraint::Length(6),
        ];
        if self.state.show_similarity {
            header.push("Score");
            widths.push(Constraint::Length(6));
        }

        let rows: Vec<Row> = self.state.movies[start..end]
            .iter()
            .enumerate()
            .map(|(i, movie)| {
                let row = movie_row(movie, self.state.show_similarity, self.theme);
                if self.focused && start + i == self.state.cursor {
                    row.style(self.theme.row_selected)
                } else {
                    row
                }
            })
            .collect();

        let text_area = Rect { width: inner.width.saturating_sub(1), ..inner };
        let sb_area = Rect {
            x: inner.right().saturating_sub(1),
            width: 1,
            ..inner
        };

        if total == 0 {
            Widget::render(
                Line::styled("no results", self.theme.query_summary),
                Rect { height: 1.min(text_area.height), ..text_area },
                buf,
            );
            return;
        }

        Widget::render(
            Table::new(rows, widths)
                .header(Row::new(header).style(self.theme.table_header)),
            text_area,
            buf,
        );

        let mut sb_state = ScrollbarState::new(total)
            .position(start)
            .viewport_content_length(height);
        StatefulWidget::render(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            sb_area,
            buf,
            &mut sb_state,
        );
    }
}

fn movie_row(movie: &Movie, show_similarity: bool, theme: &Theme) -> Row<'static> {
    let year = movie
        .release_year
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();

    let mut cells = vec![
        TableCell::from(movie.movie_id.to_string()).style(theme.column_id),
        TableCell::from(movie.movie_title.clone()).style(theme.column_title),
        TableCell::from(year).style(theme.column_year),
    ];
    if show_similarity {
        let score = movie
            .similarity
            .map(|s| format!("{s:.2}"))
            .unwrap_or_default();
        cells.push(TableCell::from(score).style(theme.column_id));
    }
    Row::new(cells)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reel_client::ClientError;
    use reel_core::SearchResponse;
    use std::time::Duration;

    fn movie(id: i64, title: &str) -> Movie {
        Movie {
            movie_id: id,
            movie_title: title.to_string(),
            release_year: None,
            similarity: None,
        }
    }

    fn landed(id: u64, code: i64, titles: &[&str]) -> Landed {
        Landed {
            id: RequestId(id),
            endpoint: Endpoint::Hint,
            text: String::new(),
            outcome: Ok(SearchResponse {
                code,
                errmsg: None,
                payload: titles
                    .iter()
                    .enumerate()
                    .map(|(i, t)| movie(i as i64, t))
                    .collect(),
            }),
        }
    }

    fn titles(state: &ResultsState) -> Vec<&str> {
        state.movies.iter().map(|m| m.movie_title.as_str()).collect()
    }

    #[test]
    fn response_replaces_list() {
        let mut s = ResultsState::default();
        s.apply(landed(0, 0, &["Heat", "Ran"]));
        s.apply(landed(1, 0, &["Alien"]));
        assert_eq!(titles(&s), vec!["Alien"]);
        assert_eq!(s.shown, Some(RequestId(1)));
    }

    #[test]
    fn nonzero_code_still_renders_payload() {
        let mut s = ResultsState::default();
        let applied = s.apply(landed(0, 1, &["Heat"]));
        assert_eq!(titles(&s), vec!["Heat"]);
        assert!(matches!(applied, Applied::Replaced { code: 1, count: 1, .. }));
    }

    #[test]
    fn nonzero_code_is_not_warned_again() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;
        use tracing_subscriber::layer::{Context, SubscriberExt};

        struct CountWarnings(Arc<AtomicUsize>);
        impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CountWarnings {
            fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                if *event.metadata().level() == tracing::Level::WARN {
                    self.0.fetch_add(1, Ordering::SeqCst);
                }
            }
        }

        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber =
            tracing_subscriber::registry().with(CountWarnings(Arc::clone(&warnings)));
        tracing::subscriber::with_default(subscriber, || {
            let mut s = ResultsState::default();
            s.apply(landed(0, 1, &["Heat"]));
            assert_eq!(titles(&s), vec!["Heat"]);
        });
        assert_eq!(warnings.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn last_landed_wins_by_default() {
        let mut s = ResultsState::default();
        s.apply(landed(5, 0, &["newer"]));
        let applied = s.apply(landed(3, 0, &["older"]));
        assert_eq!(titles(&s), vec!["older"]);
        assert!(matches!(applied, Applied::Replaced { .. }));
    }

    #[test]
    fn stale_response_dropped_when_enabled() {
        let mut s = ResultsState::new(true, false);
        s.apply(landed(5, 0, &["newer"]));
        let applied = s.apply(landed(3, 0, &["older"]));
        assert_eq!(titles(&s), vec!["newer"]);
        assert_eq!(applied, Applied::Stale { endpoint: Endpoint::Hint });
    }

    #[test]
    fn failure_keeps_list() {
        let mut s = ResultsState::default();
        s.apply(landed(0, 0, &["Heat"]));
        let applied = s.apply(Landed {
            id: RequestId(1),
            endpoint: Endpoint::Search,
            text: "x".to_string(),
            outcome: Err(ClientError::Timeout {
                endpoint: Endpoint::Search,
                after: Duration::from_millis(10),
            }),
        });
        assert_eq!(titles(&s), vec!["Heat"]);
        assert!(matches!(applied, Applied::Failed { endpoint: Endpoint::Search, .. }));
    }

    #[test]
    fn cursor_navigation_and_scroll() {
        let mut s = ResultsState::default();
        s.last_height.set(3);
        s.replace((0..10).map(|i| movie(i, "m")).collect());

        s.handle(&AppEvent::Nav(Direction::Up));
        assert_eq!(s.cursor, 0);

        for _ in 0..4 {
            s.handle(&AppEvent::Nav(Direction::Down));
        }
        assert_eq!(s.cursor, 4);
        assert_eq!(s.offset, 2);

        s.handle(&AppEvent::Bottom);
        assert_eq!(s.cursor, 9);
        assert_eq!(s.offset, 7);

        s.handle(&AppEvent::ScrollUp);
        assert_eq!(s.cursor, 6);
        assert_eq!(s.offset, 6);

        s.handle(&AppEvent::Top);
        assert_eq!((s.cursor, s.offset), (0, 0));
        assert_eq!(s.selected().map(|m| m.movie_id), Some(0));
    }

    #[test]
    fn replace_resets_cursor() {
        let mut s = ResultsState::default();
        s.replace((0..5).map(|i| movie(i, "m")).collect());
        s.handle(&AppEvent::Bottom);
        s.apply(landed(0, 0, &["only"]));
        assert_eq!(s.cursor, 0);
        assert_eq!(s.selected().map(|m| m.movie_title.as_str()), Some("only"));
    }

    #[test]
    fn navigation_on_empty_list_is_noop() {
        let mut s = ResultsState::default();
        s.handle(&AppEvent::Nav(Direction::Down));
        assert_eq!(s.cursor, 0);
        assert!(s.selected().is_none());
    }
}
