//! crates/snapnote_core/src/filtering.rs
//!
//! Pure functions over a list of notes: the filtered list view and the
//! active/completed statistics.

use crate::domain::{Note, NoteFilter};

/// Returns the notes matching `filter`, keeping their relative order.
pub fn filter_notes(notes: &[Note], filter: NoteFilter) -> Vec<Note> {
    notes
        .iter()
        .filter(|note| match filter {
            NoteFilter::All => true,
            NoteFilter::Active => note.is_active(),
            NoteFilter::Completed => note.is_completed,
        })
        .cloned()
        .collect()
}

/// Share of active and completed notes, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NoteStats {
    pub active_percent: f32,
    pub completed_percent: f32,
}

/// Computes the active/completed split. An empty list yields `0.0` for both.
///
/// Both percentages derive from the same total and active count, so for a
/// non-empty list they always add up to 100.
pub fn compute_stats(notes: &[Note]) -> NoteStats {
    if notes.is_empty() {
        return NoteStats::default();
    }

    let total = notes.len() as f32;
    let active = notes.iter().filter(|note| note.is_active()).count() as f32;

    NoteStats {
        active_percent: 100.0 * active / total,
        completed_percent: 100.0 * (total - active) / total,
    }
}
