//! Top-level application state and the main event loop.
//!
//! [`AppState`] is pure: it turns [`AppEvent`]s and [`Landed`] responses into
//! state changes and, where a request is needed, an [`Action`]. [`App`] owns
//! the terminal and the [`Dispatcher`] and carries those actions out.

use crate::{
    commands::{execute_command, Command},
    event::{self, AppEvent},
    theme::Theme,
    widgets::{
        command_bar::{CommandBar, CommandBarState},
        help::HelpPopup,
        query_bar::{QueryBar, QueryBarState},
        results_table::{Applied, ResultsState, ResultsTable},
        status_bar::{StatusBar, StatusKind, StatusState},
    },
};
use crossterm::{
    event::{self as ct_event, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    Frame, Terminal,
};
use reel_client::{Dispatcher, Landed, SearchBackend};
use reel_core::{config::Config, Endpoint};
use std::{io, sync::Arc, time::Duration};
use tokio::{runtime::Handle, sync::mpsc};

// ---------------------------------------------------------------------------
// Focus + actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    QueryBar,
    Results,
    /// Vim-style `:` command line is active.
    Command,
}

/// Side effect requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Dispatch { endpoint: Endpoint, text: String },
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub focus: Focus,
    /// Focus state before entering command mode, restored on exit.
    pub prev_focus: Focus,
    pub query: QueryBarState,
    pub results: ResultsState,
    pub status: StatusState,
    pub theme: Theme,
    pub config: Config,
    pub show_help: bool,
    pub command_bar: CommandBarState,
    pub quit: bool,
}

impl AppState {
    pub fn new(config: Config, theme: Theme) -> Self {
        let results = ResultsState::new(config.ui.drop_stale_responses, config.ui.show_similarity);
        Self {
            focus: Focus::QueryBar,
            prev_focus: Focus::QueryBar,
            query: QueryBarState::default(),
            results,
            status: StatusState::default(),
            theme,
            config,
            show_help: false,
            command_bar: CommandBarState::default(),
            quit: false,
        }
    }

    pub fn handle(&mut self, event: AppEvent) -> Option<Action> {
        // Help popup intercepts all events; only close keys pass through.
        if self.show_help {
            if matches!(event, AppEvent::Char('?') | AppEvent::Escape | AppEvent::Quit) {
                tracing::debug!("help popup closed");
                self.show_help = false;
            }
            return None;
        }

        if self.focus == Focus::Command {
            return self.handle_command_bar(event);
        }

        match event {
            AppEvent::Char('?') if self.focus != Focus::QueryBar => {
                tracing::debug!("help popup opened");
                self.show_help = true;
                None
            }

            AppEvent::Char(':') if self.focus != Focus::QueryBar => {
                tracing::debug!(prev_focus = ?self.focus, "entering command mode");
                self.prev_focus = self.focus;
                self.command_bar.clear();
                self.focus = Focus::Command;
                None
            }

            AppEvent::Quit => {
                tracing::debug!("quit");
                self.quit = true;
                None
            }

            AppEvent::Escape => {
                if self.focus == Focus::QueryBar {
                    tracing::debug!("focus: QueryBar -> Results");
                    self.focus = Focus::Results;
                }
                None
            }

            AppEvent::FocusNext => {
                self.focus = match self.focus {
                    Focus::QueryBar => Focus::Results,
                    Focus::Results | Focus::Command => Focus::QueryBar,
                };
                tracing::debug!(to = ?self.focus, "focus cycle");
                None
            }

            AppEvent::QueryFocus => {
                self.focus = Focus::QueryBar;
                None
            }

            // Terminal resize is handled automatically by ratatui
            AppEvent::Resize(_, _) => None,

            AppEvent::Enter => self.submit(),

            other => self.dispatch_to_focused(other),
        }
    }

    fn handle_command_bar(&mut self, event: AppEvent) -> Option<Action> {
        match event {
            AppEvent::Escape => {
                tracing::debug!("command bar cancelled");
                self.command_bar.clear();
                self.focus = self.prev_focus;
                None
            }
            AppEvent::Enter => match Command::parse(&self.command_bar.input) {
                Ok(cmd) => {
                    tracing::debug!(command = ?cmd, "executing command");
                    self.command_bar.clear();
                    self.focus = self.prev_focus;
                    execute_command(self, cmd)
                }
                Err(msg) if msg.is_empty() => {
                    self.command_bar.clear();
                    self.focus = self.prev_focus;
                    None
                }
                Err(msg) => {
                    // Show the error; bar stays open
                    self.command_bar.error = Some(msg);
                    None
                }
            },
            // Ctrl+c still quits from the command line
            AppEvent::Quit => {
                self.quit = true;
                None
            }
            other => {
                self.command_bar.handle(&other);
                None
            }
        }
    }

    /// `Enter` outside the command bar: search from the query bar, or show
    /// the selected movie's link from the results.
    fn submit(&mut self) -> Option<Action> {
        match self.focus {
            Focus::QueryBar => Some(Action::Dispatch {
                endpoint: Endpoint::Search,
                text: self.query.query.clone(),
            }),
            Focus::Results => {
                if let Some(movie) = self.results.selected() {
                    let link = self.config.server.movie_link(movie.movie_id);
                    let msg = format!("{} → {}", movie.movie_title, link);
                    self.status.set(StatusKind::Info, msg);
                }
                None
            }
            Focus::Command => None,
        }
    }

    fn dispatch_to_focused(&mut self, event: AppEvent) -> Option<Action> {
        match self.focus {
            Focus::QueryBar => {
                let edited = self.query.handle(&event);
                (edited && self.config.ui.hint_on_type).then(|| Action::Dispatch {
                    endpoint: Endpoint::Hint,
                    text: self.query.query.clone(),
                })
            }
            Focus::Results => {
                self.results.handle(&event);
                None
            }
            Focus::Command => None, // handled before dispatch, should not reach here
        }
    }

    /// Fold a completed request into the table and the status line.
    pub fn on_landed(&mut self, landed: Landed) {
        self.status.in_flight = self.status.in_flight.saturating_sub(1);

        match self.results.apply(landed) {
            Applied::Replaced {
                endpoint,
                count,
                code: 0,
                ..
            } => self
                .status
                .set(StatusKind::Info, format!("{endpoint}: {count} movies")),
            Applied::Replaced {
                endpoint,
                count,
                code,
                errmsg,
            } => self.status.set(
                StatusKind::Warn,
                format!(
                    "{endpoint}: code {code} ({}), {count} movies",
                    errmsg.as_deref().unwrap_or("no message")
                ),
            ),
            Applied::Stale { .. } => {}
            Applied::Failed { endpoint, error } => self
                .status
                .set(StatusKind::Error, format!("{endpoint} failed: {error}")),
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App<B: SearchBackend> {
    state: AppState,
    dispatcher: Dispatcher<B>,
    landed: mpsc::UnboundedReceiver<Landed>,
}

impl<B: SearchBackend> App<B> {
    pub fn new(backend: Arc<B>, config: Config, theme: Theme, handle: Handle) -> Self {
        let (dispatcher, landed) = Dispatcher::new(backend, config.query.clone(), handle);
        Self {
            state: AppState::new(config, theme),
            dispatcher,
            landed,
        }
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.drain_landed();

            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                let raw = ct_event::read()?;
                if let Event::Key(key) = &raw {
                    if key.kind != crossterm::event::KeyEventKind::Press {
                        continue;
                    }
                }
                // Use insert-mode mapping when a text widget is focused
                let app_event = if is_insert_mode(self.state.focus) {
                    event::to_app_event_insert(raw)
                } else {
                    event::to_app_event(raw)
                };
                if let Some(ev) = app_event {
                    tracing::debug!(focus = ?self.state.focus, event = ?ev, "key event");
                    if let Some(action) = self.state.handle(ev) {
                        self.perform(action);
                    }
                }
            }
        }
        Ok(())
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::Dispatch { endpoint, text } => {
                self.dispatcher.dispatch(endpoint, &text);
                self.state.status.in_flight += 1;
            }
        }
    }

    fn drain_landed(&mut self) {
        while let Ok(landed) = self.landed.try_recv() {
            self.state.on_landed(landed);
        }
    }
}

/// Returns true when the current focus is on a text-input widget, meaning
/// alphabetic keys should produce characters rather than trigger shortcuts.
fn is_insert_mode(focus: Focus) -> bool {
    matches!(focus, Focus::QueryBar | Focus::Command)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: 1-line status bar | 3-line query bar | results table
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .split(area);

    frame.render_widget(StatusBar::new(&state.status, &state.theme), vert[0]);
    frame.render_widget(
        QueryBar::new(&state.query, state.focus == Focus::QueryBar, &state.theme),
        vert[1],
    );
    frame.render_widget(
        ResultsTable::new(&state.results, state.focus == Focus::Results, &state.theme),
        vert[2],
    );

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme), area);
    }

    // Command bar overlays the bottom row of the screen
    if state.focus == Focus::Command {
        let cmd_area = Rect { y: area.bottom().saturating_sub(1), height: 1, ..area };
        frame.render_widget(CommandBar::new(&state.command_bar, &state.theme), cmd_area);
        let col = state.command_bar.cursor_col(cmd_area);
        frame.set_cursor_position((col, cmd_area.y));
        return;
    }

    if state.focus == Focus::QueryBar {
        let qb = QueryBar::new(&state.query, true, &state.theme);
        frame.set_cursor_position(qb.cursor_position(vert[1]));
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Direction;
    use pretty_assertions::assert_eq;
    use reel_client::{ClientError, RequestId};
    use reel_core::{Movie, SearchResponse};

    fn state() -> AppState {
        AppState::new(Config::defaults(), Theme::load_default())
    }

    fn type_text(s: &mut AppState, text: &str) -> Vec<Action> {
        text.chars().filter_map(|c| s.handle(AppEvent::Char(c))).collect()
    }

    fn landed(id: u64, endpoint: Endpoint, code: i64, titles: &[&str]) -> Landed {
        Landed {
            id: RequestId(id),
            endpoint,
            text: String::new(),
            outcome: Ok(SearchResponse {
                code,
                errmsg: (code != 0).then(|| "invaild metadata type".to_string()),
                payload: titles
                    .iter()
                    .enumerate()
                    .map(|(i, t)| Movie {
                        movie_id: 100 + i as i64,
                        movie_title: t.to_string(),
                        release_year: None,
                        similarity: None,
                    })
                    .collect(),
            }),
        }
    }

    #[test]
    fn typing_fires_hint_per_edit() {
        let mut s = state();
        let actions = type_text(&mut s, "he");
        assert_eq!(
            actions,
            vec![
                Action::Dispatch { endpoint: Endpoint::Hint, text: "h".to_string() },
                Action::Dispatch { endpoint: Endpoint::Hint, text: "he".to_string() },
            ]
        );
    }

    #[test]
    fn cursor_moves_do_not_fire_hints() {
        let mut s = state();
        type_text(&mut s, "x");
        assert_eq!(s.handle(AppEvent::Nav(Direction::Left)), None);
    }

    #[test]
    fn hint_on_type_can_be_disabled() {
        let mut config = Config::defaults();
        config.ui.hint_on_type = false;
        let mut s = AppState::new(config, Theme::load_default());
        assert!(type_text(&mut s, "heat").is_empty());
    }

    #[test]
    fn enter_in_query_bar_searches() {
        let mut s = state();
        type_text(&mut s, "heat;year=1995");
        assert_eq!(
            s.handle(AppEvent::Enter),
            Some(Action::Dispatch {
                endpoint: Endpoint::Search,
                text: "heat;year=1995".to_string()
            })
        );
    }

    #[test]
    fn escape_then_tab_cycles_focus() {
        let mut s = state();
        assert_eq!(s.focus, Focus::QueryBar);
        s.handle(AppEvent::Escape);
        assert_eq!(s.focus, Focus::Results);
        s.handle(AppEvent::FocusNext);
        assert_eq!(s.focus, Focus::QueryBar);
    }

    #[test]
    fn question_mark_types_in_query_bar_but_opens_help_elsewhere() {
        let mut s = state();
        s.handle(AppEvent::Char('?'));
        assert!(!s.show_help);
        assert_eq!(s.query.query, "?");

        s.handle(AppEvent::Escape);
        s.handle(AppEvent::Char('?'));
        assert!(s.show_help);
        // Everything but close keys is swallowed
        assert_eq!(s.handle(AppEvent::Enter), None);
        s.handle(AppEvent::Escape);
        assert!(!s.show_help);
    }

    #[test]
    fn command_search_sets_query_and_dispatches() {
        let mut s = state();
        s.handle(AppEvent::Escape);
        s.handle(AppEvent::Char(':'));
        assert_eq!(s.focus, Focus::Command);
        for c in "search alien;genre=-horror".chars() {
            s.handle(AppEvent::Char(c));
        }
        let action = s.handle(AppEvent::Enter);
        assert_eq!(
            action,
            Some(Action::Dispatch {
                endpoint: Endpoint::Search,
                text: "alien;genre=-horror".to_string()
            })
        );
        assert_eq!(s.query.query, "alien;genre=-horror");
        assert_eq!(s.focus, Focus::Results);
    }

    #[test]
    fn bad_command_keeps_bar_open() {
        let mut s = state();
        s.handle(AppEvent::Escape);
        s.handle(AppEvent::Char(':'));
        s.handle(AppEvent::Char('x'));
        s.handle(AppEvent::Enter);
        assert_eq!(s.focus, Focus::Command);
        assert!(s.command_bar.error.is_some());
    }

    #[test]
    fn landed_response_updates_table_and_status() {
        let mut s = state();
        s.status.in_flight = 1;
        s.on_landed(landed(0, Endpoint::Hint, 0, &["Heat", "Heat 2"]));
        assert_eq!(s.results.movies.len(), 2);
        assert_eq!(s.status.in_flight, 0);
        assert_eq!(
            s.status.message,
            Some((StatusKind::Info, "hint: 2 movies".to_string()))
        );
    }

    #[test]
    fn nonzero_code_warns_but_renders() {
        let mut s = state();
        s.on_landed(landed(0, Endpoint::Search, 1, &["Heat"]));
        assert_eq!(s.results.movies.len(), 1);
        let (kind, msg) = s.status.message.clone().unwrap();
        assert_eq!(kind, StatusKind::Warn);
        assert!(msg.contains("code 1"), "{msg}");
    }

    #[test]
    fn failed_request_reports_error() {
        let mut s = state();
        s.on_landed(Landed {
            id: RequestId(0),
            endpoint: Endpoint::Search,
            text: "heat".to_string(),
            outcome: Err(ClientError::Timeout {
                endpoint: Endpoint::Search,
                after: Duration::from_secs(5),
            }),
        });
        assert_eq!(s.status.message.as_ref().map(|m| m.0), Some(StatusKind::Error));
        assert!(s.results.movies.is_empty());
    }

    #[test]
    fn enter_on_result_shows_link() {
        let mut s = state();
        s.on_landed(landed(0, Endpoint::Search, 0, &["Heat", "Ran"]));
        s.handle(AppEvent::Escape);
        s.handle(AppEvent::Nav(Direction::Down));
        s.handle(AppEvent::Enter);
        assert_eq!(
            s.status.message,
            Some((
                StatusKind::Info,
                "Ran → http://127.0.0.1:5000/movie/101".to_string()
            ))
        );
    }

    #[test]
    fn clear_command_empties_everything() {
        let mut s = state();
        type_text(&mut s, "heat");
        s.on_landed(landed(0, Endpoint::Hint, 0, &["Heat"]));
        s.handle(AppEvent::Escape);
        s.handle(AppEvent::Char(':'));
        for c in "clear".chars() {
            s.handle(AppEvent::Char(c));
        }
        s.handle(AppEvent::Enter);
        assert!(s.query.query.is_empty());
        assert!(s.results.movies.is_empty());
        assert!(s.status.message.is_none());
    }
}
