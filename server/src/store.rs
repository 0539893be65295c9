//! The todo document collection.
//!
//! # Design
//! `TodoStore` is a cheap, cloneable handle over one in-memory collection
//! kept newest-first. Every operation touches a single document and is
//! applied under the write lock, so each one is atomic on its own; nothing
//! spans documents.
//!
//! When a snapshot path is configured the whole collection is written to it
//! as JSON after each mutation (temp file + rename) and read back by
//! [`TodoStore::open`]. A mutation whose snapshot write fails is not applied.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A stored todo, exactly as it is served.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields to change on an existing todo. `None` keeps the current value.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TodoPatch {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("todo {0} not found")]
    NotFound(Uuid),

    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Default)]
pub struct TodoStore {
    docs: Arc<RwLock<Vec<Todo>>>,
    snapshot: Option<Arc<PathBuf>>,
}

impl TodoStore {
    /// An empty, memory-only collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a collection backed by the snapshot at `path`. A missing file
    /// starts an empty collection; the file is created on the first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut docs: Vec<Todo> = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        sort_newest_first(&mut docs);
        tracing::info!(path = %path.display(), count = docs.len(), "loaded todo snapshot");

        Ok(Self {
            docs: Arc::new(RwLock::new(docs)),
            snapshot: Some(Arc::new(path)),
        })
    }

    /// All todos, newest first.
    pub async fn list(&self) -> Vec<Todo> {
        let mut todos = self.docs.read().await.clone();
        sort_newest_first(&mut todos);
        todos
    }

    pub async fn create(&self, text: Option<String>) -> Result<Todo, StoreError> {
        let text = match text {
            Some(text) if !text.is_empty() => text,
            _ => return Err(StoreError::Validation("Todo text is required")),
        };
        let todo = Todo {
            id: Uuid::new_v4(),
            text,
            completed: false,
            created_at: Utc::now(),
        };

        let mut docs = self.docs.write().await;
        let mut next = docs.clone();
        next.insert(0, todo.clone());
        self.persist(&next).await?;
        *docs = next;
        Ok(todo)
    }

    pub async fn update(&self, id: Uuid, patch: TodoPatch) -> Result<Todo, StoreError> {
        let mut docs = self.docs.write().await;
        let pos = position(&docs, id)?;
        if patch.text.as_deref() == Some("") {
            return Err(StoreError::Validation("Todo text cannot be empty"));
        }

        let mut next = docs.clone();
        let todo = &mut next[pos];
        if let Some(text) = patch.text {
            todo.text = text;
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        let updated = todo.clone();
        self.persist(&next).await?;
        *docs = next;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Todo, StoreError> {
        let mut docs = self.docs.write().await;
        let pos = position(&docs, id)?;
        let mut next = docs.clone();
        let removed = next.remove(pos);
        self.persist(&next).await?;
        *docs = next;
        Ok(removed)
    }

    async fn persist(&self, docs: &[Todo]) -> Result<(), StoreError> {
        let Some(path) = self.snapshot.as_deref() else {
            return Ok(());
        };
        write_snapshot(path, docs).await
    }
}

fn position(docs: &[Todo], id: Uuid) -> Result<usize, StoreError> {
    docs.iter()
        .position(|todo| todo.id == id)
        .ok_or(StoreError::NotFound(id))
}

/// Stable, so todos created in the same instant keep newest-insert-first.
fn sort_newest_first(docs: &mut [Todo]) {
    docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

async fn write_snapshot(path: &Path, docs: &[Todo]) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(docs)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_id_and_defaults() {
        let store = TodoStore::new();
        let todo = store.create(Some("Buy milk".to_string())).await.unwrap();
        assert_eq!(todo.text, "Buy milk");
        assert!(!todo.completed);
        assert_eq!(store.list().await, vec![todo]);
    }

    #[tokio::test]
    async fn create_requires_text() {
        let store = TodoStore::new();
        for text in [None, Some(String::new())] {
            let err = store.create(text).await.unwrap_err();
            assert!(matches!(err, StoreError::Validation("Todo text is required")));
        }
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = TodoStore::new();
        let a = store.create(Some("A".to_string())).await.unwrap();
        let b = store.create(Some("B".to_string())).await.unwrap();
        let c = store.create(Some("C".to_string())).await.unwrap();
        let ids: Vec<Uuid> = store.list().await.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let store = TodoStore::new();
        let todo = store.create(Some("Walk dog".to_string())).await.unwrap();

        let updated = store
            .update(
                todo.id,
                TodoPatch {
                    completed: Some(true),
                    ..TodoPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.text, "Walk dog");
        assert!(updated.completed);
        assert_eq!(updated.created_at, todo.created_at);

        let updated = store
            .update(
                todo.id,
                TodoPatch {
                    text: Some("Walk cat".to_string()),
                    ..TodoPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.text, "Walk cat");
        assert!(updated.completed);
    }

    #[tokio::test]
    async fn update_rejects_empty_text() {
        let store = TodoStore::new();
        let todo = store.create(Some("Keep me".to_string())).await.unwrap();
        let patch = TodoPatch {
            text: Some(String::new()),
            completed: None,
        };
        assert!(matches!(
            store.update(todo.id, patch).await,
            Err(StoreError::Validation(_))
        ));
        assert_eq!(store.list().await[0].text, "Keep me");
    }

    #[tokio::test]
    async fn update_and_delete_unknown_id() {
        let store = TodoStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.update(id, TodoPatch::default()).await,
            Err(StoreError::NotFound(missing)) if missing == id
        ));
        let empty = TodoPatch {
            text: Some(String::new()),
            completed: None,
        };
        assert!(matches!(
            store.update(id, empty).await,
            Err(StoreError::NotFound(missing)) if missing == id
        ));
        assert!(matches!(
            store.delete(id).await,
            Err(StoreError::NotFound(missing)) if missing == id
        ));
    }

    #[tokio::test]
    async fn delete_removes_permanently() {
        let store = TodoStore::new();
        let keep = store.create(Some("keep".to_string())).await.unwrap();
        let gone = store.create(Some("gone".to_string())).await.unwrap();
        assert_eq!(store.delete(gone.id).await.unwrap().id, gone.id);
        assert_eq!(store.list().await, vec![keep]);
        assert!(store.delete(gone.id).await.is_err());
    }

    #[tokio::test]
    async fn snapshot_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");

        let store = TodoStore::open(&path).await.unwrap();
        assert!(store.list().await.is_empty());
        let first = store.create(Some("first".to_string())).await.unwrap();
        let second = store.create(Some("second".to_string())).await.unwrap();
        store
            .update(
                first.id,
                TodoPatch {
                    completed: Some(true),
                    ..TodoPatch::default()
                },
            )
            .await
            .unwrap();

        let reopened = TodoStore::open(&path).await.unwrap();
        let todos = reopened.list().await;
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].id, second.id);
        assert_eq!(todos[1].id, first.id);
        assert!(todos[1].completed);
    }

    #[tokio::test]
    async fn corrupt_snapshot_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            TodoStore::open(&path).await,
            Err(StoreError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn failed_snapshot_write_leaves_collection_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("todos.json");
        let store = TodoStore::open(&path).await.unwrap();

        let err = store.create(Some("lost".to_string())).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
        assert!(store.list().await.is_empty());
    }
}
