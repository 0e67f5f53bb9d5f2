//! Status bar — the top row: app name, the last request's outcome, and
//! keybinding hints.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Default)]
pub struct StatusState {
    pub message: Option<(StatusKind, String)>,
    /// Requests dispatched but not yet landed.
    pub in_flight: usize,
}

impl StatusState {
    pub fn set(&mut self, kind: StatusKind, message: impl Into<String>) {
        self.message = Some((kind, message.into()));
    }

    pub fn clear(&mut self) {
        self.message = None;
    }
}

pub struct StatusBar<'a> {
    state: &'a StatusState,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a StatusState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(
            " reel ",
            Style::default()
                .bg(ratatui::style::Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )];

        if self.state.in_flight > 0 {
            spans.push(Span::styled(
                format!(" ⟳ {} ", self.state.in_flight),
                Style::default().add_modifier(Modifier::DIM),
            ));
        }

        if let Some((kind, msg)) = &self.state.message {
            let style = match kind {
                StatusKind::Info => self.theme.status_info,
                StatusKind::Warn => self.theme.status_warn,
                StatusKind::Error => self.theme.status_error,
            };
            spans.push(Span::styled(format!(" {msg}"), style));
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);

        // Keybinding hints at the right edge
        let hint = " q:quit  ?:help  :cmd ";
        let hint_x = area.right().saturating_sub(hint.len() as u16);
        buf.set_string(
            hint_x,
            area.y,
            hint,
            Style::default().add_modifier(Modifier::DIM),
        );
    }
}
