//! Help popup — centred floating overlay listing all keybindings.
//!
//! Toggle with `?`; close with `?` or `Escape`.

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};

const BINDINGS: &[(&str, &str)] = &[
    ("q  /  Ctrl+c", "Quit"),
    ("Tab", "Cycle focus: query → results"),
    ("/", "Focus the search box"),
    ("Escape", "Leave the search box"),
    ("typing", "Fetch hints for the current text"),
    ("Enter (search box)", "Run a full search"),
    ("Enter (results)", "Show the movie's page link"),
    ("↑ k  /  ↓ j", "Move through results"),
    ("PageUp / Ctrl+u", "Results: page up"),
    ("PageDown / Ctrl+d", "Results: page down"),
    ("g  /  G", "First / last result"),
    (":", "Command line (search, hint, clear, theme, q)"),
    ("?", "Toggle this help popup"),
];

const SYNTAX: &[&str] = &[
    "bat man          terms, split on spaces",
    "genre=action     metadata filter (repeat a key to add values)",
    "-robin           exclude a term or value",
    "a; b=1; c=2      segments are separated by ';'",
];

pub struct HelpPopup<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPopup<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (BINDINGS.len() + SYNTAX.len() + 5) as u16;
        let popup = centered_rect(80, height, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" reel — keybindings (? to close) ")
            .border_style(self.theme.border_focused);

        let inner = block.inner(popup);
        block.render(popup, buf);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut lines: Vec<Line> = BINDINGS
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(format!("  {:<22}", key), bold),
                    Span::raw(*desc),
                ])
            })
            .collect();

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("  Query syntax", bold)));
        lines.extend(
            SYNTAX
                .iter()
                .map(|s| Line::from(Span::styled(format!("  {s}"), self.theme.query_summary))),
        );

        Paragraph::new(lines).render(inner, buf);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
