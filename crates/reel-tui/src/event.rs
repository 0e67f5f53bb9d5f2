//! Semantic application events — crossterm key events mapped to a
//! widget-agnostic vocabulary so widgets never touch crossterm directly.
//!
//! # Keybindings
//!
//! | Key(s)                  | Event                |
//! |-------------------------|----------------------|
//! | `q`, `Ctrl+c`           | `Quit`               |
//! | `Tab`                   | `FocusNext`          |
//! | `/`                     | `QueryFocus`         |
//! | `PageUp`, `Ctrl+u`      | `ScrollUp`           |
//! | `PageDown`, `Ctrl+d`    | `ScrollDown`         |
//! | `g`                     | `Top`                |
//! | `G`                     | `Bottom`             |
//! | `↑` / `k`               | `Nav(Up)`            |
//! | `↓` / `j`               | `Nav(Down)`          |
//! | `←` / `h`               | `Nav(Left)`          |
//! | `→` / `l`               | `Nav(Right)`         |
//! | printable char          | `Char(c)`            |
//! | `Backspace`             | `Backspace`          |
//! | `Enter`                 | `Enter`              |
//! | terminal resize         | `Resize(w, h)`       |
//!
//! ## Insert mode
//!
//! When a text-input widget (query bar, command bar) is focused, the event
//! loop calls [`to_app_event_insert`] instead. In insert mode every printable
//! key is a `Char`; arrows still navigate; `Ctrl+c`, `Escape`, `Enter`, `Tab`
//! and `Backspace` keep their bindings.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A semantic application event derived from a raw crossterm [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Exit the application.
    Quit,
    /// Move keyboard focus to the next pane.
    FocusNext,
    /// Transfer focus to the query bar.
    QueryFocus,
    /// Scroll the results table up one page.
    ScrollUp,
    /// Scroll the results table down one page.
    ScrollDown,
    /// Jump to the first result.
    Top,
    /// Jump to the last result.
    Bottom,
    /// Move the table cursor or the text cursor.
    Nav(Direction),
    /// A printable character forwarded to the active text input.
    Char(char),
    /// Delete the character before the cursor in the active text input.
    Backspace,
    /// Submit the query, or open the selected result.
    Enter,
    /// The terminal was resized to the given (width, height).
    Resize(u16, u16),
    /// Dismiss the active modal (query bar focus, help popup, command bar).
    Escape,
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] (navigation mode).
///
/// Returns `None` for mouse events, releases and unbound keys.
pub fn to_app_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key(key),
        _ => None,
    }
}

/// Map a raw crossterm [`Event`] to an [`AppEvent`] for text-input mode.
pub fn to_app_event_insert(event: Event) -> Option<AppEvent> {
    match event {
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        Event::Key(key) => map_key_insert(key),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('q') if key.modifiers == Mod::NONE => Some(AppEvent::Quit),
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),
        Char('/') if key.modifiers == Mod::NONE => Some(AppEvent::QueryFocus),

        PageUp => Some(AppEvent::ScrollUp),
        PageDown => Some(AppEvent::ScrollDown),
        Char('u') if key.modifiers == Mod::CONTROL => Some(AppEvent::ScrollUp),
        Char('d') if key.modifiers == Mod::CONTROL => Some(AppEvent::ScrollDown),

        Home => Some(AppEvent::Top),
        End => Some(AppEvent::Bottom),
        Char('g') if key.modifiers == Mod::NONE => Some(AppEvent::Top),
        // Uppercase: SHIFT may or may not be reported, match on the code alone
        Char('G') => Some(AppEvent::Bottom),

        Up | Char('k') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Up)),
        Down | Char('j') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Down)),
        Left | Char('h') if key.modifiers == Mod::NONE => Some(AppEvent::Nav(Direction::Left)),
        Right | Char('l') if key.modifiers == Mod::NONE => {
            Some(AppEvent::Nav(Direction::Right))
        }

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

fn map_key_insert(key: KeyEvent) -> Option<AppEvent> {
    use KeyCode::*;
    use KeyModifiers as Mod;

    match key.code {
        Char('c') if key.modifiers == Mod::CONTROL => Some(AppEvent::Quit),

        Up => Some(AppEvent::Nav(Direction::Up)),
        Down => Some(AppEvent::Nav(Direction::Down)),
        Left => Some(AppEvent::Nav(Direction::Left)),
        Right => Some(AppEvent::Nav(Direction::Right)),

        Tab if key.modifiers == Mod::NONE => Some(AppEvent::FocusNext),

        Char(c) if key.modifiers == Mod::NONE || key.modifiers == Mod::SHIFT => {
            Some(AppEvent::Char(c))
        }

        Backspace if key.modifiers == Mod::NONE => Some(AppEvent::Backspace),
        Enter if key.modifiers == Mod::NONE => Some(AppEvent::Enter),
        Esc => Some(AppEvent::Escape),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn press(code: KeyCode) -> Event {
        key(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> Event {
        key(code, KeyModifiers::CONTROL)
    }

    #[test]
    fn quit_keys() {
        assert_eq!(to_app_event(press(KeyCode::Char('q'))), Some(AppEvent::Quit));
        assert_eq!(to_app_event(ctrl(KeyCode::Char('c'))), Some(AppEvent::Quit));
    }

    #[test]
    fn focus_keys() {
        assert_eq!(to_app_event(press(KeyCode::Tab)), Some(AppEvent::FocusNext));
        assert_eq!(
            to_app_event(press(KeyCode::Char('/'))),
            Some(AppEvent::QueryFocus)
        );
    }

    #[test]
    fn top_and_bottom() {
        assert_eq!(to_app_event(press(KeyCode::Char('g'))), Some(AppEvent::Top));
        assert_eq!(to_app_event(press(KeyCode::Char('G'))), Some(AppEvent::Bottom));
        assert_eq!(
            to_app_event(key(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Some(AppEvent::Bottom)
        );
        assert_eq!(to_app_event(press(KeyCode::Home)), Some(AppEvent::Top));
        assert_eq!(to_app_event(press(KeyCode::End)), Some(AppEvent::Bottom));
    }

    #[test]
    fn nav_arrows_and_vim_keys() {
        for (code, dir) in [
            (KeyCode::Up, Direction::Up),
            (KeyCode::Char('k'), Direction::Up),
            (KeyCode::Down, Direction::Down),
            (KeyCode::Char('j'), Direction::Down),
            (KeyCode::Left, Direction::Left),
            (KeyCode::Char('h'), Direction::Left),
            (KeyCode::Right, Direction::Right),
            (KeyCode::Char('l'), Direction::Right),
        ] {
            assert_eq!(to_app_event(press(code)), Some(AppEvent::Nav(dir)));
        }
    }

    #[test]
    fn page_scroll() {
        assert_eq!(to_app_event(press(KeyCode::PageUp)), Some(AppEvent::ScrollUp));
        assert_eq!(to_app_event(press(KeyCode::PageDown)), Some(AppEvent::ScrollDown));
        assert_eq!(to_app_event(ctrl(KeyCode::Char('u'))), Some(AppEvent::ScrollUp));
        assert_eq!(to_app_event(ctrl(KeyCode::Char('d'))), Some(AppEvent::ScrollDown));
    }

    #[test]
    fn resize_and_unbound() {
        assert_eq!(
            to_app_event(Event::Resize(120, 40)),
            Some(AppEvent::Resize(120, 40))
        );
        assert_eq!(to_app_event(press(KeyCode::F(5))), None);
    }

    #[test]
    fn insert_mode_types_shortcut_letters() {
        for ch in ['h', 'j', 'k', 'l', 'q', 'g', 'G', ';', '='] {
            assert_eq!(
                to_app_event_insert(press(KeyCode::Char(ch))),
                Some(AppEvent::Char(ch)),
                "insert mode: '{ch}' should produce Char"
            );
        }
    }

    #[test]
    fn insert_mode_keeps_specials() {
        assert_eq!(
            to_app_event_insert(ctrl(KeyCode::Char('c'))),
            Some(AppEvent::Quit)
        );
        assert_eq!(
            to_app_event_insert(press(KeyCode::Left)),
            Some(AppEvent::Nav(Direction::Left))
        );
        assert_eq!(to_app_event_insert(press(KeyCode::Enter)), Some(AppEvent::Enter));
        assert_eq!(to_app_event_insert(press(KeyCode::Esc)), Some(AppEvent::Escape));
    }
}
