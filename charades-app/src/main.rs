use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use charades_app::{build_session, config::Config, encode_reply, session::Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout carries replies
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting charades...");

    let config = Config::from_env()?;
    let (mut session, mut ticks) = build_session(&config).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    let reply = session.handle(Command::Snapshot).await;
    stdout
        .write_all(format!("{}\n", encode_reply(&reply)).as_bytes())
        .await?;
    stdout.flush().await?;

    loop {
        let reply = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => session.handle_line(&line).await,
                None => {
                    info!("Input closed");
                    break;
                }
            },
            Some(tick) = ticks.recv() => session.clock_tick(tick).await,
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down gracefully...");
                break;
            }
        };
        stdout
            .write_all(format!("{}\n", encode_reply(&reply)).as_bytes())
            .await?;
        stdout.flush().await?;
    }

    // Leaving mid-turn counts as losing focus
    session.focus_lost().await;
    info!("Shutdown complete.");
    Ok(())
}
