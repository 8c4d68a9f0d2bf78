//! crates/snapnote_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use std::fmt;
use std::str::FromStr;

/// A titled, described, completable note.
///
/// The `id` is assigned once when the note is created and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
}

impl Note {
    /// Creates a new, active note.
    pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            is_completed: false,
        }
    }

    /// The text shown in a list row: the title, or the description when the title is empty.
    pub fn title_for_list(&self) -> &str {
        if self.title.is_empty() {
            &self.description
        } else {
            &self.title
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_completed
    }

    /// True when either the title or the description is empty.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() || self.description.is_empty()
    }
}

/// Completion status as the remote mirror represents it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteStatus {
    #[default]
    Active,
    Complete,
}

/// The representation of a note at the remote store boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteNote {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Carried by the remote format but never used by the app.
    pub priority: Option<i32>,
    pub status: NoteStatus,
}

impl From<Note> for RemoteNote {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            description: note.description,
            priority: None,
            status: if note.is_completed {
                NoteStatus::Complete
            } else {
                NoteStatus::Active
            },
        }
    }
}

impl From<RemoteNote> for Note {
    fn from(remote: RemoteNote) -> Self {
        Self {
            id: remote.id,
            title: remote.title,
            description: remote.description,
            is_completed: remote.status == NoteStatus::Complete,
        }
    }
}

/// Which subset of notes a list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl NoteFilter {
    /// Heading shown above a filtered list.
    pub fn label(&self) -> &'static str {
        match self {
            NoteFilter::All => "All Notes",
            NoteFilter::Active => "Active Notes",
            NoteFilter::Completed => "Completed Notes",
        }
    }

    /// Message shown when the filtered list is empty.
    pub fn empty_message(&self) -> &'static str {
        match self {
            NoteFilter::All => "You have no notes!",
            NoteFilter::Active => "You have no active notes!",
            NoteFilter::Completed => "You have no completed notes!",
        }
    }
}

impl fmt::Display for NoteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NoteFilter::All => "all",
            NoteFilter::Active => "active",
            NoteFilter::Completed => "completed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown note filter: '{0}' (expected all, active or completed)")]
pub struct ParseFilterError(pub String);

impl FromStr for NoteFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(NoteFilter::All),
            "active" => Ok(NoteFilter::Active),
            "completed" => Ok(NoteFilter::Completed),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}
