//! Chroma agent — entry point.
//!
//! ```text
//! chroma-agent                   Run the interactive console
//! chroma-agent --config <path>   Load a custom config TOML
//! chroma-agent --gen-config      Write default config to stdout
//! chroma-agent --list-sources    Print the source catalog and exit
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chroma_agent::app::ChromaApp;
use chroma_agent::config::AgentConfig;
use chroma_agent::console;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "chroma-agent", about = "Dominant-color capture and relay console")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "chroma-agent.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    /// Print the source catalog and exit.
    #[arg(long)]
    list_sources: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        let text = toml::to_string_pretty(&AgentConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    // Load config.
    let config = AgentConfig::load(&cli.config);

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("chroma-agent v{}", env!("CARGO_PKG_VERSION"));
    info!("endpoint: {}{}", config.endpoint.base_url, config.endpoint.path);
    info!("capture period: {}ms", config.capture.period_ms);
    info!("auto period: {}ms", config.auto_mode.period_ms);

    let initial_source = config.capture.source.clone();
    let mut app = ChromaApp::new(config);

    if cli.list_sources {
        for descriptor in app.sources() {
            println!("{descriptor}");
        }
        return Ok(());
    }

    // Start capturing from the configured source. A failure here is
    // recoverable; the console can retry with `use <id>`.
    if let Err(e) = app.select_source(&initial_source) {
        warn!("could not start source {initial_source}: {e}");
    }

    tokio::select! {
        result = console::run(&mut app) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received — shutting down");
        }
    }

    app.shutdown();
    Ok(())
}
