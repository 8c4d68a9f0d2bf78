//! services/snapnote/src/bin/snapnote.rs

use futures::StreamExt;
use snapnote_core::domain::NoteFilter;
use snapnote_core::repository::NoteRepository;
use snapnote_lib::{
    adapters::{connect_pool, SimulatedRemoteStore, SqliteNoteStore},
    cli::{execute, list_view, Command},
    config::Config,
    error::AppError,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    // --- 2. Open the Local Store ---
    let pool = connect_pool(&config.database_url).await?;
    let local = Arc::new(SqliteNoteStore::new(pool));
    local.run_migrations().await?;
    info!("Local note database ready.");

    // --- 3. Build the Repository ---
    let remote = Arc::new(SimulatedRemoteStore::new().with_latency(config.remote_latency));
    let repo = NoteRepository::new(local.clone(), remote);

    // --- 4. Run the Command ---
    match command {
        Command::Watch(filter) => watch(&repo, &local, filter, config.watch_interval).await?,
        command => {
            let output = execute(&repo, command).await?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    // The remote mirror only lives as long as this process; let pending pushes land.
    info!(latency_ms = config.remote_latency.as_millis() as u64, "Waiting for remote sync...");
    repo.wait_for_pushes().await;
    repo.shutdown();
    Ok(())
}

/// Prints the filtered list every time the local store changes, until Ctrl-C.
///
/// Other `snapnote` invocations write from their own process, so the database
/// is polled every `interval` and only changed contents are printed.
async fn watch(
    repo: &NoteRepository,
    local: &SqliteNoteStore,
    filter: NoteFilter,
    interval: Duration,
) -> Result<(), AppError> {
    let mut notes = repo.observe_all();
    let mut poll = tokio::time::interval(interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(%filter, interval_ms = interval.as_millis() as u64, "Watching notes. Press Ctrl-C to stop.");

    loop {
        tokio::select! {
            _ = poll.tick() => {
                if let Err(e) = local.reload().await {
                    warn!(error = %e, "Failed to poll the note database.");
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Stopped watching.");
                return Ok(());
            }
            snapshot = notes.next() => match snapshot {
                Some(Ok(snapshot)) => {
                    println!("{}", serde_json::to_string(&list_view(&snapshot, filter))?);
                }
                Some(Err(e)) => warn!(error = %e, "Failed to load notes."),
                None => return Ok(()),
            }
        }
    }
}
