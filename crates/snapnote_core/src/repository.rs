//! crates/snapnote_core/src/repository.rs
//!
//! The note repository: the single source of truth handed to presentation code.
//!
//! Reads and writes go to the local store and complete before the call returns.
//! Mutations that change note content then schedule a best-effort push of the
//! whole local collection to the remote store. Pushes run detached on a
//! background context owned by the repository; they are never awaited by the
//! triggering call, never retried, and their failures are logged and dropped.
//! Concurrent pushes are not coalesced, so whichever push takes the remote lock
//! last decides the remote content.
//!
//! Completion toggles (`set_completed` / `set_active`) do not schedule a push;
//! the next content change or delete carries the toggled state to the remote.

use crate::domain::{Note, RemoteNote};
use crate::ports::{LocalNoteStore, NoteStream, PortError, PortResult, RemoteNoteStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};
use uuid::Uuid;

//=========================================================================================
// The Repository
//=========================================================================================

/// Mediates between the local store and the remote mirror.
///
/// Cloning is cheap; clones share the stores and the background context.
#[derive(Clone)]
pub struct NoteRepository {
    local: Arc<dyn LocalNoteStore>,
    remote: Arc<dyn RemoteNoteStore>,
    background: TaskTracker,
    shutdown: CancellationToken,
}

impl NoteRepository {
    /// Creates a repository over explicitly constructed stores.
    pub fn new(local: Arc<dyn LocalNoteStore>, remote: Arc<dyn RemoteNoteStore>) -> Self {
        Self {
            local,
            remote,
            background: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    // --- Observation ---

    /// Every local snapshot, starting with the current one.
    pub fn observe_all(&self) -> NoteStream<Vec<Note>> {
        self.local.observe_all()
    }

    /// The note with `note_id` (or `None`) each time the local store changes.
    pub fn observe_one(&self, note_id: &str) -> NoteStream<Option<Note>> {
        self.local.observe_by_id(note_id)
    }

    // --- Point Reads ---

    pub async fn get_all(&self, force_update: bool) -> PortResult<Vec<Note>> {
        if force_update {
            self.refresh().await?;
        }
        self.local.get_all().await
    }

    pub async fn get_one(&self, note_id: &str, force_update: bool) -> PortResult<Option<Note>> {
        if force_update {
            self.refresh().await?;
        }
        self.local.get_by_id(note_id).await
    }

    /// Replaces the whole local content with the remote content.
    ///
    /// This is a destructive resync, not a merge: local changes that were never
    /// pushed are lost.
    pub async fn refresh(&self) -> PortResult<()> {
        let remote_notes = self.remote.load_all().await?;
        let notes: Vec<Note> = remote_notes.into_iter().map(Note::from).collect();
        info!(count = notes.len(), "Refreshing local notes from the remote store.");

        self.local.delete_all().await?;
        self.local.upsert_all(notes).await
    }

    /// The remote has no per-item addressing, so this refreshes everything.
    pub async fn refresh_note(&self, note_id: &str) -> PortResult<()> {
        debug!(note_id, "Refreshing single note through a full refresh.");
        self.refresh().await
    }

    // --- Mutations ---

    /// Stores a new active note and returns its freshly generated id.
    ///
    /// Returns as soon as the local write completes; the remote push runs later.
    pub async fn create(&self, title: &str, description: &str) -> PortResult<String> {
        let note_id = Uuid::new_v4().to_string();
        let note = Note::new(note_id.clone(), title, description);

        self.local.upsert(note).await?;
        debug!(%note_id, "Created note.");
        self.schedule_push();
        Ok(note_id)
    }

    /// Rewrites the title and description of an existing note.
    ///
    /// Fails with `PortError::NotFound` when no note has `note_id`.
    pub async fn update(&self, note_id: &str, title: &str, description: &str) -> PortResult<()> {
        let mut note = self
            .local
            .get_by_id(note_id)
            .await?
            .ok_or_else(|| PortError::NotFound(format!("Note (id {}) not found", note_id)))?;

        note.title = title.to_string();
        note.description = description.to_string();

        self.local.upsert(note).await?;
        debug!(note_id, "Updated note.");
        self.schedule_push();
        Ok(())
    }

    /// Marks a note completed. Local only; no push is scheduled.
    pub async fn set_completed(&self, note_id: &str) -> PortResult<()> {
        self.local.set_completed(note_id, true).await
    }

    /// Marks a note active again. Local only; no push is scheduled.
    pub async fn set_active(&self, note_id: &str) -> PortResult<()> {
        self.local.set_completed(note_id, false).await
    }

    pub async fn clear_completed(&self) -> PortResult<()> {
        let removed = self.local.delete_completed().await?;
        debug!(removed, "Cleared completed notes.");
        self.schedule_push();
        Ok(())
    }

    pub async fn delete_all(&self) -> PortResult<()> {
        self.local.delete_all().await?;
        debug!("Deleted all notes.");
        self.schedule_push();
        Ok(())
    }

    /// Removes one note. Absent ids are ignored, but a push is still scheduled.
    pub async fn delete_one(&self, note_id: &str) -> PortResult<()> {
        let removed = self.local.delete_by_id(note_id).await?;
        debug!(note_id, removed, "Deleted note.");
        self.schedule_push();
        Ok(())
    }

    // --- Background Context ---

    /// Waits until every push scheduled so far has finished or been abandoned.
    ///
    /// Pushes scheduled while waiting are waited for too.
    pub async fn wait_for_pushes(&self) {
        self.background.close();
        self.background.wait().await;
        self.background.reopen();
    }

    /// Tears down the background context. In-flight pushes are abandoned and
    /// later mutations no longer schedule any.
    pub fn shutdown(&self) {
        info!(pending = self.background.len(), "Shutting down note sync.");
        self.shutdown.cancel();
    }

    /// Spawns a detached push of the current local content to the remote store.
    fn schedule_push(&self) {
        if self.shutdown.is_cancelled() {
            debug!("Sync is shut down; skipping remote push.");
            return;
        }

        let local = Arc::clone(&self.local);
        let remote = Arc::clone(&self.remote);
        let shutdown = self.shutdown.clone();

        self.background.spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Remote push abandoned by shutdown.");
                }
                result = push_local_snapshot(local.as_ref(), remote.as_ref()) => {
                    if let Err(e) = result {
                        // The local store stays authoritative; the mirror is stale until the next push.
                        warn!(error = %e, "Failed to push notes to the remote store.");
                    }
                }
            }
        });
    }
}

/// Reads the whole local collection and replaces the remote collection with it.
async fn push_local_snapshot(
    local: &dyn LocalNoteStore,
    remote: &dyn RemoteNoteStore,
) -> PortResult<()> {
    let notes = local.get_all().await?;
    let remote_notes: Vec<RemoteNote> = notes.into_iter().map(RemoteNote::from).collect();
    debug!(count = remote_notes.len(), "Pushing notes to the remote store.");
    remote.save_all(remote_notes).await
}

//=========================================================================================
// Tests
//=========================================================================================
