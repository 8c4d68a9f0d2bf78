//! crates/snapnote_core/src/stream.rs
//!
//! Helpers that turn a `watch` channel of store snapshots into the `NoteStream`
//! shape the ports expect. Like a state flow, a new subscriber first receives the
//! latest snapshot; a slow subscriber may skip intermediate snapshots but never
//! sees them out of order.

use crate::domain::Note;
use crate::ports::NoteStream;
use futures::{stream, StreamExt};
use tokio::sync::watch;

/// Streams the current value of `rx`, then every later value.
///
/// The stream ends only when the sending half is dropped.
pub fn snapshot_stream<T>(rx: watch::Receiver<T>) -> NoteStream<T>
where
    T: Clone + Send + Sync + 'static,
{
    Box::pin(stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let value = rx.borrow_and_update().clone();
        Some((Ok(value), (rx, false)))
    }))
}

/// Narrows a stream of full snapshots to the note with `note_id`, or `None`.
pub fn select_note(all: NoteStream<Vec<Note>>, note_id: &str) -> NoteStream<Option<Note>> {
    let note_id = note_id.to_string();
    Box::pin(all.map(move |snapshot| {
        snapshot.map(|notes| notes.into_iter().find(|note| note.id == note_id))
    }))
}
