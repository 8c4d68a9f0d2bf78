//! crates/snapnote_core/src/ports.rs
//!
//! Defines the storage contracts (traits) the note repository depends on.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete local database and the remote mirror.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use crate::domain::{Note, RemoteNote};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the underlying stores.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// An unending stream of store snapshots. The latest value is delivered first.
pub type NoteStream<T> = Pin<Box<dyn Stream<Item = PortResult<T>> + Send>>;

//=========================================================================================
// Store Ports (Traits)
//=========================================================================================

/// Durable, keyed, observable storage of notes. This is the source of truth for reads.
///
/// Implementations serialize their own writes and deliver snapshots to observers in
/// the order the writes were applied. Deletes and toggles on absent ids are no-ops.
#[async_trait]
pub trait LocalNoteStore: Send + Sync {
    // --- Observation ---
    fn observe_all(&self) -> NoteStream<Vec<Note>>;

    fn observe_by_id(&self, note_id: &str) -> NoteStream<Option<Note>>;

    // --- Point Reads ---
    async fn get_all(&self) -> PortResult<Vec<Note>>;

    async fn get_by_id(&self, note_id: &str) -> PortResult<Option<Note>>;

    // --- Writes ---
    /// Inserts the note, or replaces the stored note with the same id.
    async fn upsert(&self, note: Note) -> PortResult<()>;

    async fn upsert_all(&self, notes: Vec<Note>) -> PortResult<()>;

    async fn set_completed(&self, note_id: &str, completed: bool) -> PortResult<()>;

    /// Returns the number of removed notes.
    async fn delete_by_id(&self, note_id: &str) -> PortResult<usize>;

    async fn delete_all(&self) -> PortResult<()>;

    /// Removes every completed note and returns how many were removed.
    async fn delete_completed(&self) -> PortResult<usize>;
}

/// The remote mirror of the full note collection. Whole-collection semantics only.
#[async_trait]
pub trait RemoteNoteStore: Send + Sync {
    async fn load_all(&self) -> PortResult<Vec<RemoteNote>>;

    /// Replaces the entire remote collection with `notes`.
    async fn save_all(&self, notes: Vec<RemoteNote>) -> PortResult<()>;
}
