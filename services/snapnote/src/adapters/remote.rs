//! services/snapnote/src/adapters/remote.rs
//!
//! An in-process stand-in for a network note service. It implements the
//! `RemoteNoteStore` port from the `core` crate by holding the whole collection
//! in memory behind one lock and sleeping to imitate network latency.

use async_trait::async_trait;
use snapnote_core::domain::{NoteStatus, RemoteNote};
use snapnote_core::ports::{PortResult, RemoteNoteStore};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

pub const DEFAULT_LATENCY: Duration = Duration::from_millis(2000);

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A simulated remote store. Reads and writes never interleave: the lock is held
/// for the whole call, latency included.
pub struct SimulatedRemoteStore {
    notes: Mutex<Vec<RemoteNote>>,
    latency: Duration,
}

impl SimulatedRemoteStore {
    /// Creates a store pre-filled with the demo notes and the default latency.
    pub fn new() -> Self {
        Self::with_notes(seed_notes())
    }

    /// Creates a store holding exactly `notes`, with the default latency.
    pub fn with_notes(notes: Vec<RemoteNote>) -> Self {
        Self {
            notes: Mutex::new(notes),
            latency: DEFAULT_LATENCY,
        }
    }

    /// Replaces the artificial delay applied to every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for SimulatedRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_notes() -> Vec<RemoteNote> {
    vec![
        RemoteNote {
            id: "Jakarta".to_string(),
            title: "Build monument national".to_string(),
            description: "this monument for memorizing independence day".to_string(),
            priority: None,
            status: NoteStatus::Active,
        },
        RemoteNote {
            id: "Madrid".to_string(),
            title: "finish stadium in madrid".to_string(),
            description: "the biggest stadium in spain".to_string(),
            priority: None,
            status: NoteStatus::Active,
        },
    ]
}

//=========================================================================================
// `RemoteNoteStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl RemoteNoteStore for SimulatedRemoteStore {
    async fn load_all(&self) -> PortResult<Vec<RemoteNote>> {
        let notes = self.notes.lock().await;
        tokio::time::sleep(self.latency).await;
        debug!(count = notes.len(), "Remote store loaded notes.");
        Ok(notes.clone())
    }

    async fn save_all(&self, new_notes: Vec<RemoteNote>) -> PortResult<()> {
        let mut notes = self.notes.lock().await;
        tokio::time::sleep(self.latency).await;
        debug!(count = new_notes.len(), "Remote store replaced notes.");
        *notes = new_notes;
        Ok(())
    }
}
