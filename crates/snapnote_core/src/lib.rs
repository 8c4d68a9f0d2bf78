pub mod domain;
pub mod filtering;
pub mod ports;
pub mod repository;
pub mod stream;

pub use domain::{Note, NoteFilter, NoteStatus, ParseFilterError, RemoteNote};
pub use filtering::{compute_stats, filter_notes, NoteStats};
pub use ports::{LocalNoteStore, NoteStream, PortError, PortResult, RemoteNoteStore};
pub use repository::NoteRepository;
