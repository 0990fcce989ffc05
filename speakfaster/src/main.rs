use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use speakfaster::{ClientConfig, Replay, SpeakFasterClient};

/// Replay a keystroke script through the abbreviation input bar.
///
/// Prints every emitted event as one JSON line, then the final view.
#[derive(Parser)]
#[command(name = "speakfaster", version)]
struct Args {
    /// TOML config file (input-bar limits plus service settings)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Service endpoint; overrides the config file and enables the client
    #[arg(long)]
    endpoint: Option<String>,

    /// Script to replay; reads stdin when omitted
    script: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ClientConfig::load_toml(path)?,
        None => ClientConfig::default(),
    };
    if let Some(endpoint) = args.endpoint {
        config.endpoint = Some(endpoint);
        config.enabled = true;
    }

    let script = match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?,
        None => {
            let mut script = String::new();
            io::stdin()
                .read_to_string(&mut script)
                .context("reading script from stdin")?;
            script
        }
    };

    let client = SpeakFasterClient::from_config(&config);
    let mut replay = Replay::new(config.into_base()).with_client(client);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (i, line) in script.lines().enumerate() {
        for event in replay.run_line(i + 1, line)? {
            writeln!(out, "{}", serde_json::to_string(&event)?)?;
        }
    }
    writeln!(out, "{}", serde_json::to_string_pretty(&replay.bar().view())?)?;
    Ok(())
}
