//! services/snapnote/src/cli.rs
//!
//! The command-line front end: parses arguments into a `Command` and runs it
//! against a `NoteRepository`, producing JSON for stdout.

use crate::error::AppError;
use serde::Serialize;
use serde_json::{json, Value};
use snapnote_core::domain::{Note, NoteFilter};
use snapnote_core::filtering::{compute_stats, filter_notes};
use snapnote_core::repository::NoteRepository;

pub const USAGE: &str = "\
Usage: snapnote <command> [arguments]

Commands:
  list [all|active|completed]       List notes, optionally filtered
  show <id>                         Show a single note
  add <title> <description>         Create a note
  edit <id> <title> <description>   Change a note's title and description
  complete <id>                     Mark a note completed
  activate <id>                     Mark a note active
  delete <id>                       Delete a note
  clear-completed                   Delete every completed note
  delete-all                        Delete every note
  refresh                           Replace local notes with the remote copy
                                    (the simulated remote restarts from its demo
                                    notes on every run, so local notes are lost)
  stats                             Show active/completed percentages
  watch [all|active|completed]      Print the list each time it changes";

/// The simulated remote lives only as long as one process.
pub const REFRESH_WARNING: &str =
    "The simulated remote starts from its demo notes on every run; local notes were replaced.";

//=========================================================================================
// Commands
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List(NoteFilter),
    Show(String),
    Add { title: String, description: String },
    Edit { id: String, title: String, description: String },
    Complete(String),
    Activate(String),
    Delete(String),
    ClearCompleted,
    DeleteAll,
    Refresh,
    Stats,
    Watch(NoteFilter),
}

impl Command {
    /// Parses the arguments that follow the program name.
    pub fn parse(args: &[String]) -> Result<Self, AppError> {
        let (name, rest) = args
            .split_first()
            .ok_or_else(|| AppError::Usage(USAGE.to_string()))?;
        let rest: Vec<&str> = rest.iter().map(String::as_str).collect();

        let command = match (name.as_str(), rest.as_slice()) {
            ("list", []) => Command::List(NoteFilter::All),
            ("list", [filter]) => Command::List(parse_filter(filter)?),
            ("show", [id]) => Command::Show(id.to_string()),
            ("add", [title, description]) => {
                validate_draft(title, description)?;
                Command::Add {
                    title: title.to_string(),
                    description: description.to_string(),
                }
            }
            ("edit", [id, title, description]) => {
                validate_draft(title, description)?;
                Command::Edit {
                    id: id.to_string(),
                    title: title.to_string(),
                    description: description.to_string(),
                }
            }
            ("complete", [id]) => Command::Complete(id.to_string()),
            ("activate", [id]) => Command::Activate(id.to_string()),
            ("delete", [id]) => Command::Delete(id.to_string()),
            ("clear-completed", []) => Command::ClearCompleted,
            ("delete-all", []) => Command::DeleteAll,
            ("refresh", []) => Command::Refresh,
            ("stats", []) => Command::Stats,
            ("watch", []) => Command::Watch(NoteFilter::All),
            ("watch", [filter]) => Command::Watch(parse_filter(filter)?),
            _ => return Err(AppError::Usage(USAGE.to_string())),
        };
        Ok(command)
    }
}

fn parse_filter(raw: &str) -> Result<NoteFilter, AppError> {
    raw.parse().map_err(|e| AppError::Usage(format!("{e}")))
}

/// A note needs both a title and a description before it is saved.
fn validate_draft(title: &str, description: &str) -> Result<(), AppError> {
    if title.is_empty() || description.is_empty() {
        return Err(AppError::Validation("Note cannot be empty".to_string()));
    }
    Ok(())
}

//=========================================================================================
// Output Payloads
//=========================================================================================

#[derive(Debug, Serialize)]
pub struct NoteView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_completed: bool,
    pub title_for_list: String,
}

impl From<&Note> for NoteView {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            title: note.title.clone(),
            description: note.description.clone(),
            is_completed: note.is_completed,
            title_for_list: note.title_for_list().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListView {
    pub filter: String,
    pub label: &'static str,
    pub notes: Vec<NoteView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Builds the list payload for one snapshot of the store.
pub fn list_view(notes: &[Note], filter: NoteFilter) -> ListView {
    let shown = filter_notes(notes, filter);
    ListView {
        filter: filter.to_string(),
        label: filter.label(),
        message: shown.is_empty().then(|| filter.empty_message()),
        notes: shown.iter().map(NoteView::from).collect(),
    }
}

//=========================================================================================
// Execution
//=========================================================================================

/// Runs a one-shot command. `Command::Watch` is long-running and handled by the binary.
pub async fn execute(repo: &NoteRepository, command: Command) -> Result<Value, AppError> {
    let output = match command {
        Command::List(filter) => {
            let notes = repo.get_all(false).await?;
            serde_json::to_value(list_view(&notes, filter))?
        }
        Command::Show(id) => match repo.get_one(&id, false).await? {
            Some(note) => serde_json::to_value(NoteView::from(&note))?,
            None => json!({ "id": id, "message": "Note not found!" }),
        },
        Command::Add { title, description } => {
            let id = repo.create(&title, &description).await?;
            json!({ "id": id, "message": "Note added" })
        }
        Command::Edit { id, title, description } => {
            repo.update(&id, &title, &description).await?;
            json!({ "id": id, "message": "Note saved" })
        }
        Command::Complete(id) => {
            repo.set_completed(&id).await?;
            json!({ "id": id, "message": "Note marked as complete" })
        }
        Command::Activate(id) => {
            repo.set_active(&id).await?;
            json!({ "id": id, "message": "Note marked as active" })
        }
        Command::Delete(id) => {
            repo.delete_one(&id).await?;
            json!({ "id": id, "message": "Note deleted" })
        }
        Command::ClearCompleted => {
            repo.clear_completed().await?;
            json!({ "message": "Completed notes cleared" })
        }
        Command::DeleteAll => {
            repo.delete_all().await?;
            json!({ "message": "All notes deleted" })
        }
        Command::Refresh => {
            repo.refresh().await?;
            let count = repo.get_all(false).await?.len();
            json!({ "count": count, "message": "Notes refreshed", "warning": REFRESH_WARNING })
        }
        Command::Stats => {
            let notes = repo.get_all(false).await?;
            let stats = compute_stats(&notes);
            json!({
                "is_empty": notes.is_empty(),
                "active_percent": stats.active_percent,
                "completed_percent": stats.completed_percent,
            })
        }
        Command::Watch(_) => {
            return Err(AppError::Usage("watch cannot run as a one-shot command".to_string()))
        }
    };
    Ok(output)
}
