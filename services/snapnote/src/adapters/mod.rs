pub mod remote;
pub mod sqlite;

pub use remote::SimulatedRemoteStore;
pub use sqlite::{connect_pool, SqliteNoteStore};
