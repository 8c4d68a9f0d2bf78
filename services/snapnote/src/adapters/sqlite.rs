//! services/snapnote/src/adapters/sqlite.rs
//!
//! This module contains the local database adapter, which is the concrete implementation
//! of the `LocalNoteStore` port from the `core` crate. It handles all interactions
//! with the SQLite database using `sqlx`, and publishes a fresh snapshot to
//! observers after every write.

use crate::error::AppError;
use async_trait::async_trait;
use snapnote_core::domain::Note;
use snapnote_core::ports::{LocalNoteStore, NoteStream, PortError, PortResult};
use snapnote_core::stream::{select_note, snapshot_stream};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqliteExecutor, SqlitePool};
use std::str::FromStr;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info};

/// Opens a connection pool for `database_url`.
///
/// An in-memory database lives inside a single connection, so the pool is pinned
/// to exactly one connection that is never recycled.
pub async fn connect_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?;
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    info!(database_url, in_memory, "Connecting to the local note database...");
    pool_options.connect_with(options).await
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A SQLite adapter that implements the `LocalNoteStore` port.
pub struct SqliteNoteStore {
    pool: SqlitePool,
    /// Held across each write and the snapshot that follows it, so observers
    /// see snapshots in the order writes were applied.
    write_lock: Mutex<()>,
    snapshots: watch::Sender<Vec<Note>>,
}

impl SqliteNoteStore {
    /// Creates a new `SqliteNoteStore`. Call `run_migrations` before use.
    pub fn new(pool: SqlitePool) -> Self {
        let (snapshots, _) = watch::channel(Vec::new());
        Self {
            pool,
            write_lock: Mutex::new(()),
            snapshots,
        }
    }

    /// Creates the schema if needed and publishes the initial snapshot.
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        let _guard = self.write_lock.lock().await;
        self.publish_snapshot().await?;
        Ok(())
    }

    /// Re-reads the table and publishes it if it differs from the last snapshot.
    ///
    /// Writes made by another process (or another store on the same file) are
    /// only seen through this. Returns whether a new snapshot was published.
    pub async fn reload(&self) -> PortResult<bool> {
        let _guard = self.write_lock.lock().await;
        let notes = fetch_all(&self.pool).await?;
        let changed = self.snapshots.send_if_modified(|current| {
            if *current == notes {
                return false;
            }
            *current = notes;
            true
        });
        if changed {
            debug!("Picked up outside changes to the local note database.");
        }
        Ok(changed)
    }

    async fn publish_snapshot(&self) -> PortResult<()> {
        let notes = fetch_all(&self.pool).await?;
        debug!(count = notes.len(), "Publishing local note snapshot.");
        self.snapshots.send_replace(notes);
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Struct
//=========================================================================================

#[derive(FromRow)]
struct NoteRecord {
    id: String,
    title: String,
    description: String,
    is_completed: bool,
}
impl NoteRecord {
    fn to_domain(self) -> Note {
        Note {
            id: self.id,
            title: self.title,
            description: self.description,
            is_completed: self.is_completed,
        }
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

// Rows come back in insertion order; an upsert keeps the original rowid.
async fn fetch_all<'e, E: SqliteExecutor<'e>>(executor: E) -> PortResult<Vec<Note>> {
    let records = sqlx::query_as::<_, NoteRecord>(
        "SELECT id, title, description, is_completed FROM note ORDER BY rowid ASC",
    )
    .fetch_all(executor)
    .await
    .map_err(unexpected)?;

    Ok(records.into_iter().map(NoteRecord::to_domain).collect())
}

async fn upsert_note<'e, E: SqliteExecutor<'e>>(executor: E, note: &Note) -> PortResult<()> {
    sqlx::query(
        "INSERT INTO note (id, title, description, is_completed) VALUES ($1, $2, $3, $4) \
         ON CONFLICT (id) DO UPDATE SET \
         title = excluded.title, description = excluded.description, is_completed = excluded.is_completed",
    )
    .bind(&note.id)
    .bind(&note.title)
    .bind(&note.description)
    .bind(note.is_completed)
    .execute(executor)
    .await
    .map_err(unexpected)?;
    Ok(())
}

//=========================================================================================
// `LocalNoteStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl LocalNoteStore for SqliteNoteStore {
    fn observe_all(&self) -> NoteStream<Vec<Note>> {
        snapshot_stream(self.snapshots.subscribe())
    }

    fn observe_by_id(&self, note_id: &str) -> NoteStream<Option<Note>> {
        select_note(self.observe_all(), note_id)
    }

    async fn get_all(&self) -> PortResult<Vec<Note>> {
        fetch_all(&self.pool).await
    }

    async fn get_by_id(&self, note_id: &str) -> PortResult<Option<Note>> {
        let record = sqlx::query_as::<_, NoteRecord>(
            "SELECT id, title, description, is_completed FROM note WHERE id = $1",
        )
        .bind(note_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(record.map(NoteRecord::to_domain))
    }

    async fn upsert(&self, note: Note) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        upsert_note(&self.pool, &note).await?;
        self.publish_snapshot().await
    }

    async fn upsert_all(&self, notes: Vec<Note>) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        for note in &notes {
            upsert_note(&mut *tx, note).await?;
        }
        tx.commit().await.map_err(unexpected)?;
        self.publish_snapshot().await
    }

    async fn set_completed(&self, note_id: &str, completed: bool) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        sqlx::query("UPDATE note SET is_completed = $1 WHERE id = $2")
            .bind(completed)
            .bind(note_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        self.publish_snapshot().await
    }

    async fn delete_by_id(&self, note_id: &str) -> PortResult<usize> {
        let _guard = self.write_lock.lock().await;
        let result = sqlx::query("DELETE FROM note WHERE id = $1")
            .bind(note_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        self.publish_snapshot().await?;
        Ok(result.rows_affected() as usize)
    }

    async fn delete_all(&self) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        sqlx::query("DELETE FROM note")
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        self.publish_snapshot().await
    }

    async fn delete_completed(&self) -> PortResult<usize> {
        let _guard = self.write_lock.lock().await;
        let result = sqlx::query("DELETE FROM note WHERE is_completed = 1")
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        self.publish_snapshot().await?;
        Ok(result.rows_affected() as usize)
    }
}
