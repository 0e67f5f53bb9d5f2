//! reel: search a movie catalogue from the terminal.
//!
//! The interactive TUI lives in `reel-tui`; this crate holds the binary and
//! the headless subcommands (`parse`, `hint`, `search`) so integration tests
//! can import their renderers directly.
//!
//! # Architecture
//!
//! ```text
//! reel-core (query parser, wire types, config)
//!    │
//!    ├──► reel-client (HTTP client, dispatcher)
//!    │          │
//!    └──────────┴──► reel-tui (widgets, event loop)
//! ```

pub mod headless;
