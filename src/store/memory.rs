use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, ToDo, TodoStore};

/// In-memory store used when no database is configured, and by the test
/// suite. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryTodoStore {
    todos: Arc<RwLock<Vec<ToDo>>>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn insert(&self, mut document: Map<String, Value>) -> Result<Uuid, StoreError> {
        document.remove("id");
        let id = Uuid::new_v4();
        self.todos.write().await.push(ToDo {
            id,
            fields: document,
        });

        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<ToDo>, StoreError> {
        Ok(self.todos.read().await.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        self.todos.write().await.retain(|todo| todo.id != id);
        Ok(())
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        mut document: Map<String, Value>,
    ) -> Result<(), StoreError> {
        document.remove("id");
        let mut todos = self.todos.write().await;
        if let Some(todo) = todos.iter_mut().find(|todo| todo.id == id) {
            for (key, value) in document {
                todo.fields.insert(key, value);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = MemoryTodoStore::new();

        let first = store.insert(doc(json!({"title": "one"}))).await.unwrap();
        let second = store.insert(doc(json!({"title": "two"}))).await.unwrap();

        assert_ne!(first, second);
        let todos = store.list_all().await.unwrap();
        assert_eq!(todos.len(), 2);
        assert!(todos
            .iter()
            .any(|todo| todo.id == first && todo.fields["title"] == "one"));
    }

    #[tokio::test]
    async fn insert_discards_a_client_supplied_id() {
        let store = MemoryTodoStore::new();
        let forged = Uuid::new_v4();

        let id = store
            .insert(doc(json!({"id": forged, "title": "sneaky"})))
            .await
            .unwrap();

        let todos = store.list_all().await.unwrap();
        assert_ne!(id, forged);
        assert_eq!(todos[0].id, id);
        assert!(todos[0].fields.get("id").is_none());
    }

    #[tokio::test]
    async fn update_merges_and_preserves_missing_fields() {
        let store = MemoryTodoStore::new();
        let id = store.insert(doc(json!({"a": 1, "b": 2}))).await.unwrap();

        store.update_by_id(id, doc(json!({"b": 3}))).await.unwrap();

        let todos = store.list_all().await.unwrap();
        assert_eq!(todos[0].fields["a"], 1);
        assert_eq!(todos[0].fields["b"], 3);
    }

    #[tokio::test]
    async fn update_never_rewrites_the_id() {
        let store = MemoryTodoStore::new();
        let id = store.insert(doc(json!({"title": "stable"}))).await.unwrap();

        store
            .update_by_id(id, doc(json!({"id": Uuid::new_v4(), "title": "renamed"})))
            .await
            .unwrap();

        let todos = store.list_all().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, id);
        assert_eq!(todos[0].fields["title"], "renamed");
        assert!(todos[0].fields.get("id").is_none());
    }

    #[tokio::test]
    async fn update_of_an_unknown_id_changes_nothing() {
        let store = MemoryTodoStore::new();
        let id = store.insert(doc(json!({"title": "keep"}))).await.unwrap();

        store
            .update_by_id(Uuid::new_v4(), doc(json!({"title": "other"})))
            .await
            .unwrap();

        let todos = store.list_all().await.unwrap();
        assert_eq!(
            todos,
            vec![ToDo {
                id,
                fields: doc(json!({"title": "keep"})),
            }]
        );
    }

    #[tokio::test]
    async fn delete_removes_only_the_matched_document() {
        let store = MemoryTodoStore::new();
        let keep = store.insert(doc(json!({"title": "keep"}))).await.unwrap();
        let drop = store.insert(doc(json!({"title": "drop"}))).await.unwrap();

        store.delete_by_id(drop).await.unwrap();

        let todos = store.list_all().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].id, keep);
    }

    #[tokio::test]
    async fn delete_of_an_unknown_id_changes_nothing() {
        let store = MemoryTodoStore::new();
        store.insert(doc(json!({"title": "keep"}))).await.unwrap();

        store.delete_by_id(Uuid::new_v4()).await.unwrap();

        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }
}
