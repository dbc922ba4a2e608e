//! Institute Admin - administrative console

use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use institute_admin::{
    client::RestClient,
    config::Config,
    console::{Console, Flow},
};

fn prompt(screen: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}> ", screen)?;
    stdout.flush()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; stdout belongs to the console
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "institute_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("admin.yml"));
    let config = Config::load_with_env(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    tracing::info!(base_url = %config.api.base_url, "Configuration loaded");

    let client = Arc::new(RestClient::new(&config.api)?);
    let mut console = Console::new(client, config.ui.clone());

    println!("{}", console.start().await);
    println!("Type 'help' for commands.");
    prompt(&console.current().to_string())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match console.execute(&line).await {
            Flow::Continue(output) => print!("{}", output),
            Flow::Quit => break,
        }
        prompt(&console.current().to_string())?;
    }

    tracing::info!("Console closed");
    Ok(())
}
