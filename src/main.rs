use anyhow::Context;
use clap::{Parser, Subcommand};
use reel::headless;
use reel_client::SearchClient;
use reel_core::{config::Config, Endpoint, DEFAULT_LIMIT, DEFAULT_OFFSET};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "reel", about = "reel — movie search from the terminal")]
struct Cli {
    /// Config file to use instead of ~/.config/reel/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding `server.base_url`.
    #[arg(long, global = true)]
    url: Option<String>,

    /// Write debug logs to /tmp/reel-debug.log (tail -f to inspect).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the request body that would be sent for TEXT.
    Parse {
        text: String,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,
        #[arg(long, default_value_t = DEFAULT_OFFSET)]
        offset: u32,
    },
    /// Fetch hints for TEXT and print them as a table.
    Hint {
        text: String,
        /// Print the raw response as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Search for TEXT and print the results as a table.
    Search {
        text: String,
        #[arg(long)]
        limit: Option<u32>,
        /// Print the raw response as JSON.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug, cli.command.is_some())?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        // `parse` never talks to a server, so it does not create the file.
        None if matches!(cli.command, Some(Cmd::Parse { .. })) => {
            Config::load_existing().context("loading config")?
        }
        None => Config::load().context("loading config")?,
    };
    if let Some(url) = cli.url {
        config.server.base_url = url;
    }

    match cli.command {
        None => {
            let runtime = tokio::runtime::Runtime::new()?;
            reel_tui::run(config, runtime.handle().clone())
        }
        Some(Cmd::Parse {
            text,
            limit,
            offset,
        }) => {
            let request = headless::parse_request(&config.query, &text, limit, offset);
            print!("{}", headless::render_request(&request)?);
            Ok(())
        }
        Some(Cmd::Hint { text, json }) => one_shot(&config, Endpoint::Hint, &text, None, json),
        Some(Cmd::Search { text, limit, json }) => {
            one_shot(&config, Endpoint::Search, &text, limit, json)
        }
    }
}

fn one_shot(
    config: &Config,
    endpoint: Endpoint,
    text: &str,
    limit: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let response = runtime.block_on(async {
        let client = SearchClient::new(&config.server, &config.query)?;
        headless::run_request(&client, &config.query, endpoint, text, limit).await
    });
    let response = response.with_context(|| format!("{endpoint} request failed"))?;
    print!("{}", headless::render_response(&response, json)?);
    Ok(())
}

/// `--debug` sends everything to a file so it does not fight the TUI for the
/// screen. Headless runs log warnings to stderr.
fn init_tracing(debug: bool, headless: bool) -> anyhow::Result<()> {
    let filter = |default: &str| {
        tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default))
    };

    if debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/reel-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(filter("debug"))
            .init();
        tracing::info!("reel debug log started, tail -f /tmp/reel-debug.log");
    } else if headless {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter("warn"))
            .init();
    }
    Ok(())
}
