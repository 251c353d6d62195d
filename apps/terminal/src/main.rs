use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{load_settings, BlogApp};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

mod controller;
mod ui;

use controller::{
    commands::UiCommand,
    orchestration::{apply_command, Flow},
};

#[derive(Parser, Debug)]
#[command(name = "blog", about = "Terminal client for the blog API")]
struct Args {
    /// Base URL of the blog API (overrides BLOG_API_URL and blog_client.toml)
    #[arg(long)]
    api_url: Option<String>,
    /// Directory holding the persisted session token
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let settings = load_settings()
        .with_overrides(args.api_url, args.data_dir)
        .resolve()?;
    tracing::info!(
        api_url = %settings.api_url,
        data_dir = %settings.data_dir.display(),
        "starting blog client"
    );

    let mut app = BlogApp::from_settings(&settings).context("failed to set up api client")?;
    app.start().await;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut status = String::new();

    loop {
        let screen = ui::render(&app, &status);
        stdout.write_all(screen.as_bytes()).await?;
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };
        match UiCommand::parse(&line) {
            Ok(Some(cmd)) => {
                if apply_command(&mut app, cmd, &mut status).await == Flow::Quit {
                    break;
                }
            }
            Ok(None) => status.clear(),
            Err(err) => status = err.to_string(),
        }
    }

    Ok(())
}
