//! Configuration types for reel.
//!
//! [`Config::load`] reads `~/.config/reel/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::load_from`] reads an
//! explicit file instead. Both layer `REEL_*` environment variables on top,
//! e.g. `REEL_SERVER__BASE_URL=http://media:5000`. [`Config::defaults`]
//! returns the built-in defaults without touching the filesystem (useful in
//! tests).

use crate::query::DEFAULT_LIMIT;
use crate::types::{Endpoint, SearchKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[server]
base_url    = "http://127.0.0.1:5000"
hint_path   = "/api/gethint"
search_path = "/api/search"
timeout_ms  = 5000

[query]
kind         = "movie"
hint_limit   = 20
search_limit = 50

[ui]
theme                = "default"
hint_on_type         = true
drop_stale_responses = false
show_similarity      = false
"#;

const ENV_PREFIX: &str = "REEL";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// `[server]` section — where the search backend lives.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_hint_path")]
    pub hint_path: String,
    #[serde(default = "default_search_path")]
    pub search_path: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String { "http://127.0.0.1:5000".to_string() }
fn default_hint_path() -> String { Endpoint::Hint.default_path().to_string() }
fn default_search_path() -> String { Endpoint::Search.default_path().to_string() }
fn default_timeout_ms() -> u64 { 5000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            hint_path: default_hint_path(),
            search_path: default_search_path(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ServerConfig {
    pub fn path_for(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Hint => &self.hint_path,
            Endpoint::Search => &self.search_path,
        }
    }

    /// Absolute URL of an endpoint. Tolerates a trailing `/` on `base_url`.
    pub fn url_for(&self, endpoint: Endpoint) -> String {
        join(&self.base_url, self.path_for(endpoint))
    }

    /// Link to the movie's detail page on the web frontend.
    pub fn movie_link(&self, movie_id: i64) -> String {
        join(&self.base_url, &format!("/movie/{movie_id}"))
    }
}

fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// `[query]` section — request shaping.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    #[serde(default)]
    pub kind: SearchKind,
    #[serde(default = "default_hint_limit")]
    pub hint_limit: u32,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

fn default_hint_limit() -> u32 { DEFAULT_LIMIT }
fn default_search_limit() -> u32 { 50 }

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            kind: SearchKind::default(),
            hint_limit: default_hint_limit(),
            search_limit: default_search_limit(),
        }
    }
}

impl QueryConfig {
    pub fn limit_for(&self, endpoint: Endpoint) -> u32 {
        match endpoint {
            Endpoint::Hint => self.hint_limit,
            Endpoint::Search => self.search_limit,
        }
    }
}

/// `[ui]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Fire a hint request on every edit of the query bar.
    #[serde(default = "default_hint_on_type")]
    pub hint_on_type: bool,
    /// Ignore responses older than the newest one already shown. Off by
    /// default: whichever response lands last replaces the table.
    #[serde(default)]
    pub drop_stale_responses: bool,
    #[serde(default)]
    pub show_similarity: bool,
}

fn default_theme() -> String { "default".to_string() }
fn default_hint_on_type() -> bool { true }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            hint_on_type: default_hint_on_type(),
            drop_stale_responses: false,
            show_similarity: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/reel/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::layered(&path, false)
    }

    /// Like [`Config::load`], but never writes: a missing user file just
    /// means defaults plus environment.
    pub fn load_existing() -> anyhow::Result<Self> {
        Self::layered(&config_path(), false)
    }

    /// Load from an explicit file, which must exist. The file is read as
    /// TOML whatever its extension.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        Self::layered(path, true)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    fn layered(path: &Path, required: bool) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("reel")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
