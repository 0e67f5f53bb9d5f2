//! reel TUI: ratatui application shell.

pub mod app;
pub mod commands;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use reel_client::SearchClient;
use reel_core::config::Config;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Start the TUI against the backend named in `config`.
///
/// Requests are spawned on `handle`; the caller keeps the runtime alive for
/// the duration of the call.
pub fn run(config: Config, handle: Handle) -> anyhow::Result<()> {
    let client = SearchClient::new(&config.server, &config.query)?;
    tracing::info!(base_url = %config.server.base_url, "starting tui");
    let theme = theme::Theme::by_name(&config.ui.theme);
    App::new(Arc::new(client), config, theme, handle).run()
}
