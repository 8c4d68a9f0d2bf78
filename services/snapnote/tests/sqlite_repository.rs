//! Repository integration tests against an in-memory SQLite database and a
//! zero-latency simulated remote store.

use futures::StreamExt;
use snapnote_core::domain::{Note, NoteFilter, NoteStatus, RemoteNote};
use snapnote_core::filtering::{compute_stats, filter_notes};
use snapnote_core::ports::{LocalNoteStore, PortError, RemoteNoteStore};
use snapnote_core::repository::NoteRepository;
use snapnote_lib::adapters::{connect_pool, SimulatedRemoteStore, SqliteNoteStore};
use snapnote_lib::cli::{execute, Command, REFRESH_WARNING};
use std::sync::Arc;
use std::time::Duration;

async fn setup_store() -> Arc<SqliteNoteStore> {
    let pool = connect_pool("sqlite::memory:").await.expect("Failed to open test DB");
    let store = SqliteNoteStore::new(pool);
    store.run_migrations().await.expect("Failed to migrate test DB");
    Arc::new(store)
}

async fn setup_repo(
    remote_notes: Vec<RemoteNote>,
) -> (NoteRepository, Arc<SqliteNoteStore>, Arc<SimulatedRemoteStore>) {
    let local = setup_store().await;
    let remote = Arc::new(SimulatedRemoteStore::with_notes(remote_notes).with_latency(Duration::ZERO));
    let repo = NoteRepository::new(local.clone(), remote.clone());
    (repo, local, remote)
}

#[tokio::test]
async fn test_store_upsert_keeps_insertion_order() {
    let store = setup_store().await;

    store.upsert(Note::new("b", "second", "2")).await.unwrap();
    store.upsert(Note::new("a", "first", "1")).await.unwrap();
    store.upsert(Note::new("b", "second, edited", "2")).await.unwrap();

    let notes = store.get_all().await.unwrap();
    let ids: Vec<&str> = notes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);
    assert_eq!(notes[0].title, "second, edited");
}

#[tokio::test]
async fn test_store_deletes_are_noops_on_absent_ids() {
    let store = setup_store().await;
    store.upsert(Note::new("a", "t", "d")).await.unwrap();

    assert_eq!(store.delete_by_id("missing").await.unwrap(), 0);
    store.set_completed("missing", true).await.unwrap();
    assert_eq!(store.get_all().await.unwrap().len(), 1);

    assert_eq!(store.delete_by_id("a").await.unwrap(), 1);
    assert!(store.get_by_id("a").await.unwrap().is_none());
}

#[tokio::test]
async fn test_store_delete_completed_counts_rows() {
    let store = setup_store().await;
    store
        .upsert_all(vec![
            Note { is_completed: true, ..Note::new("a", "a", "a") },
            Note::new("b", "b", "b"),
            Note { is_completed: true, ..Note::new("c", "c", "c") },
        ])
        .await
        .unwrap();

    assert_eq!(store.delete_completed().await.unwrap(), 2);
    let remaining = store.get_all().await.unwrap();
    assert_eq!(remaining, vec![Note::new("b", "b", "b")]);
}

#[tokio::test]
async fn test_store_observers_see_writes_in_order() {
    let store = setup_store().await;
    let mut all = store.observe_all();
    let mut one = store.observe_by_id("a");

    assert!(all.next().await.unwrap().unwrap().is_empty());
    assert_eq!(one.next().await.unwrap().unwrap(), None);

    store.upsert(Note::new("a", "t", "d")).await.unwrap();
    assert_eq!(all.next().await.unwrap().unwrap().len(), 1);
    assert_eq!(one.next().await.unwrap().unwrap().unwrap().title, "t");

    store.set_completed("a", true).await.unwrap();
    assert!(all.next().await.unwrap().unwrap()[0].is_completed);
    assert!(one.next().await.unwrap().unwrap().unwrap().is_completed);

    // A late subscriber starts from the latest snapshot.
    let mut late = store.observe_all();
    assert!(late.next().await.unwrap().unwrap()[0].is_completed);
}

#[tokio::test]
async fn test_create_get_and_mirror() {
    let (repo, _, remote) = setup_repo(Vec::new()).await;

    let id = repo.create("A", "B").await.unwrap();
    let note = repo.get_one(&id, false).await.unwrap().unwrap();
    assert_eq!(note, Note::new(id.clone(), "A", "B"));

    repo.wait_for_pushes().await;
    let mirrored = remote.load_all().await.unwrap();
    assert_eq!(mirrored.len(), 1);
    assert_eq!(Note::from(mirrored[0].clone()), note);
}

#[tokio::test]
async fn test_update_missing_note_fails() {
    let (repo, _, _) = setup_repo(Vec::new()).await;
    let err = repo.update("nope", "t", "d").await.unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));
}

#[tokio::test]
async fn test_clear_completed_and_stats() {
    let (repo, _, remote) = setup_repo(Vec::new()).await;
    let first = repo.create("one", "1").await.unwrap();
    let second = repo.create("two", "2").await.unwrap();
    let third = repo.create("three", "3").await.unwrap();
    repo.set_completed(&first).await.unwrap();
    repo.set_completed(&third).await.unwrap();

    let notes = repo.get_all(false).await.unwrap();
    let stats = compute_stats(&notes);
    assert!((stats.completed_percent - 200.0 / 3.0).abs() < 1e-3);
    assert!((stats.active_percent + stats.completed_percent - 100.0).abs() < 1e-3);
    assert_eq!(filter_notes(&notes, NoteFilter::Active).len(), 1);

    repo.clear_completed().await.unwrap();
    repo.wait_for_pushes().await;

    let remaining = repo.get_all(false).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second);
    assert_eq!(remote.load_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_refresh_discards_unsynced_local_state() {
    let remote_notes = vec![RemoteNote {
        id: "server".to_string(),
        title: "from server".to_string(),
        description: "mirrored".to_string(),
        priority: Some(1),
        status: NoteStatus::Complete,
    }];
    let (repo, local, _) = setup_repo(remote_notes).await;
    local.upsert(Note::new("draft", "local only", "never pushed")).await.unwrap();

    repo.refresh().await.unwrap();

    let notes = repo.get_all(false).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, "server");
    assert!(notes[0].is_completed);
}

#[tokio::test]
async fn test_refresh_pulls_seed_notes() {
    let local = setup_store().await;
    let remote = Arc::new(SimulatedRemoteStore::new().with_latency(Duration::ZERO));
    let repo = NoteRepository::new(local, remote);

    let notes = repo.get_all(true).await.unwrap();
    let ids: Vec<&str> = notes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["Jakarta", "Madrid"]);
    assert_eq!(notes[1].title_for_list(), "finish stadium in madrid");
}

#[tokio::test]
async fn test_cli_refresh_warns_about_replaced_notes() {
    let local = setup_store().await;
    let remote = Arc::new(SimulatedRemoteStore::new().with_latency(Duration::ZERO));
    let repo = NoteRepository::new(local, remote);
    repo.create("mine", "added locally").await.unwrap();
    repo.wait_for_pushes().await;

    let refreshed = execute(&repo, Command::Refresh).await.unwrap();

    assert_eq!(refreshed["count"], 1);
    assert_eq!(refreshed["warning"], REFRESH_WARNING);
}

#[tokio::test]
async fn test_reload_picks_up_writes_from_another_store() {
    let path = std::env::temp_dir().join(format!("snapnote-reload-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let url = format!("sqlite://{}?mode=rwc", path.display());

    let writer = SqliteNoteStore::new(connect_pool(&url).await.unwrap());
    writer.run_migrations().await.unwrap();
    let watcher = SqliteNoteStore::new(connect_pool(&url).await.unwrap());
    watcher.run_migrations().await.unwrap();

    let mut notes = watcher.observe_all();
    assert!(notes.next().await.unwrap().unwrap().is_empty());

    writer.upsert(Note::new("x", "from elsewhere", "other process")).await.unwrap();
    assert!(watcher.reload().await.unwrap());

    let seen = tokio::time::timeout(Duration::from_secs(2), notes.next())
        .await
        .expect("watcher stream did not emit")
        .unwrap()
        .unwrap();
    assert_eq!(seen, vec![Note::new("x", "from elsewhere", "other process")]);

    // Nothing changed since, so nothing new is published.
    assert!(!watcher.reload().await.unwrap());

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_cli_commands_drive_the_repository() {
    let (repo, _, _) = setup_repo(Vec::new()).await;

    let added = execute(
        &repo,
        Command::Add { title: "Milk".into(), description: "two litres".into() },
    )
    .await
    .unwrap();
    let id = added["id"].as_str().unwrap().to_string();

    execute(&repo, Command::Complete(id.clone())).await.unwrap();

    let active = execute(&repo, Command::List(NoteFilter::Active)).await.unwrap();
    assert_eq!(active["notes"].as_array().unwrap().len(), 0);
    assert_eq!(active["message"], "You have no active notes!");

    let stats = execute(&repo, Command::Stats).await.unwrap();
    assert_eq!(stats["completed_percent"], 100.0);

    let shown = execute(&repo, Command::Show(id.clone())).await.unwrap();
    assert_eq!(shown["is_completed"], true);

    execute(&repo, Command::Delete(id.clone())).await.unwrap();
    let missing = execute(&repo, Command::Show(id)).await.unwrap();
    assert_eq!(missing["message"], "Note not found!");

    let edit = execute(
        &repo,
        Command::Edit { id: "ghost".into(), title: "t".into(), description: "d".into() },
    )
    .await;
    assert!(edit.is_err());
}
