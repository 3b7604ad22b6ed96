//! File persistence: round trips, corrupt-file policies, durability.

mod common;

use std::sync::Arc;

use common::temp_store_path;
use todo_mcp::domain::models::StoreDocument;
use todo_mcp::{
    CorruptFilePolicy, ErrorKind, JsonFileTodoRepository, ReadOptions, TodoDraft, TodoRepository,
    TodoService,
};

async fn open(path: &std::path::Path) -> TodoService<JsonFileTodoRepository> {
    let repo = JsonFileTodoRepository::open(path, CorruptFilePolicy::Abort)
        .await
        .expect("store opens");
    TodoService::new(Arc::new(repo))
}

#[tokio::test]
async fn test_missing_file_starts_empty_and_is_created_on_first_write() {
    let (_dir, path) = temp_store_path();
    let service = open(&path).await;
    assert_eq!(service.list_sessions().await.total_sessions, 0);
    assert!(!path.exists());

    service.write("s1", &[TodoDraft::new("A")]).await.unwrap();
    assert!(path.exists());
}

#[tokio::test]
async fn test_round_trip_preserves_sessions_todos_and_timestamps() {
    let (_dir, path) = temp_store_path();
    let before: StoreDocument = {
        let service = open(&path).await;
        service
            .write(
                "alpha",
                &[
                    TodoDraft::new("first").with_priority("high"),
                    TodoDraft::new("second").with_status("in_progress"),
                ],
            )
            .await
            .unwrap();
        service.add_item("beta", TodoDraft::new("other")).await.unwrap();
        service
            .update_status("alpha", "todo-1", "completed")
            .await
            .unwrap();
        service.repository().snapshot().await
    };

    let reopened = open(&path).await;
    let after = reopened.repository().snapshot().await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_file_format_has_sessions_and_last_saved() {
    let (_dir, path) = temp_store_path();
    let service = open(&path).await;
    service
        .write("s1", &[TodoDraft::new("A").with_priority("low")])
        .await
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw["last_saved"].is_f64());
    let session = &raw["sessions"]["s1"];
    assert!(session["last_updated"].is_f64());
    assert_eq!(session["todos"][0]["id"], "todo-1");
    assert_eq!(session["todos"][0]["status"], "pending");
    assert_eq!(session["todos"][0]["priority"], "low");
}

#[tokio::test]
async fn test_every_mutation_is_persisted() {
    let (_dir, path) = temp_store_path();
    let service = open(&path).await;

    service.write("s1", &[TodoDraft::new("A")]).await.unwrap();
    service.add_item("s1", TodoDraft::new("B")).await.unwrap();
    service
        .update_status("s1", "todo-2", "in_progress")
        .await
        .unwrap();
    service.add_item("s2", TodoDraft::new("C")).await.unwrap();
    service.delete_session("s2").await.unwrap();

    let reopened = open(&path).await;
    let todos = reopened
        .read("s1", ReadOptions::default())
        .await
        .unwrap()
        .todos;
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[1].status.as_str(), "in_progress");
    assert!(reopened.repository().get_session("s2").await.is_none());
}

#[tokio::test]
async fn test_rejected_mutation_leaves_file_untouched() {
    let (_dir, path) = temp_store_path();
    let service = open(&path).await;
    service.write("s1", &[TodoDraft::new("A")]).await.unwrap();
    let before = std::fs::read(&path).unwrap();

    let err = service
        .update_status("s1", "missing", "completed")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(before, std::fs::read(&path).unwrap());
}

#[tokio::test]
async fn test_corrupt_file_aborts_by_default_and_is_left_alone() {
    let (_dir, path) = temp_store_path();
    std::fs::write(&path, "{ this is not json").unwrap();

    let err = JsonFileTodoRepository::open(&path, CorruptFilePolicy::Abort)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageCorrupt);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ this is not json");
}

#[tokio::test]
async fn test_corrupt_file_quarantine_moves_it_aside() {
    let (dir, path) = temp_store_path();
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let repo = JsonFileTodoRepository::open(&path, CorruptFilePolicy::Quarantine)
        .await
        .unwrap();
    assert_eq!(repo.list_sessions().await.len(), 0);
    assert!(!path.exists());

    let quarantined: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("todos.json.corrupt-"))
        .collect();
    assert_eq!(quarantined.len(), 1);
    assert_eq!(
        std::fs::read_to_string(dir.path().join(&quarantined[0])).unwrap(),
        "[1, 2, 3]"
    );
}

#[tokio::test]
async fn test_storage_stats_report_file() {
    let (_dir, path) = temp_store_path();
    let service = open(&path).await;
    service.write("s1", &[TodoDraft::new("A")]).await.unwrap();

    let stats = service.list_sessions().await.storage;
    assert!(stats.has_file_persistence);
    assert_eq!(
        stats.storage_file.as_deref(),
        Some(path.display().to_string().as_str())
    );
    assert_eq!(stats.total_todos, 1);
}

#[tokio::test]
async fn test_failed_write_reports_persistence_and_keeps_memory_state() {
    let dir = common::temp_dir();
    let parent = dir.path().join("state");
    let path = parent.join("todos.json");
    let service = open(&path).await;
    service
        .write("s1", &[TodoDraft::new("A"), TodoDraft::new("B")])
        .await
        .unwrap();

    // A regular file where the store directory used to be.
    std::fs::remove_dir_all(&parent).unwrap();
    std::fs::write(&parent, "").unwrap();

    let err = service.write("s1", &[TodoDraft::new("C")]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persistence);

    let result = service.read("s1", ReadOptions::default()).await.unwrap();
    assert_eq!(result.count, 1);
    assert_eq!(result.todos[0].content, "C");
}
