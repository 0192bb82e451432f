//! Persistence for the to-do collection.
//!
//! [`TodoStore`] is the seam between the HTTP layer and storage: four
//! operations, each mapping onto one statement of the backing store. The
//! Postgres backend is used when `DATABASE_URL` is configured; the in-memory
//! backend otherwise, and throughout the test suite.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

pub use memory::MemoryTodoStore;
pub use postgres::PgTodoStore;

/// Errors from the storage layer. There is no finer taxonomy; any failure
/// here surfaces as a server error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// A stored to-do: whatever object the client supplied, plus the identifier
/// assigned on insert. Serializes flat, so `{"id": ..., "title": ...}` rather
/// than a nested document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToDo {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Handle to the to-do collection shared by the handlers.
pub type DynTodoStore = Arc<dyn TodoStore>;

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Persist a new document and return the identifier assigned to it. An
    /// `id` key in the document is discarded; identifiers are only ever
    /// assigned here.
    async fn insert(&self, document: Map<String, Value>) -> Result<Uuid, StoreError>;

    /// Every stored document, fully materialized.
    async fn list_all(&self) -> Result<Vec<ToDo>, StoreError>;

    /// Remove the document with this identifier. Removing an unknown
    /// identifier is a no-op.
    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError>;

    /// Shallow-merge `document` into the stored document with this
    /// identifier: supplied fields replace, absent fields are preserved. An
    /// `id` key in the document is discarded, and an unknown identifier is a
    /// no-op.
    async fn update_by_id(
        &self,
        id: Uuid,
        document: Map<String, Value>,
    ) -> Result<(), StoreError>;
}
