//! Handlers for the to-do collection. Authentication and scope checks happen
//! in the middleware stack; by the time these run, the caller is allowed in.

use axum::extract::{Extension, Path};
use axum::response::Json;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::store::{DynTodoStore, ToDo};

/// GET / - every stored to-do document.
pub async fn list(
    Extension(store): Extension<DynTodoStore>,
) -> Result<Json<Vec<ToDo>>, ApiError> {
    let todos = store.list_all().await?;
    Ok(Json(todos))
}

/// POST / - store the request body as a new to-do document.
pub async fn create(
    Extension(store): Extension<DynTodoStore>,
    Json(document): Json<Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    let id = store.insert(document).await?;
    tracing::debug!("inserted to-do {}", id);

    Ok(Json(json!({ "message": "New to-do item inserted." })))
}

/// PUT /:id - merge the request body into one to-do. Unknown identifiers are
/// accepted silently.
pub async fn update(
    Path(id): Path<Uuid>,
    Extension(store): Extension<DynTodoStore>,
    Json(document): Json<Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    store.update_by_id(id, document).await?;

    Ok(Json(json!({ "message": "To-do item updated." })))
}

/// DELETE /:id - remove one to-do. Unknown identifiers are accepted silently.
pub async fn delete(
    Path(id): Path<Uuid>,
    Extension(store): Extension<DynTodoStore>,
) -> Result<Json<Value>, ApiError> {
    store.delete_by_id(id).await?;

    Ok(Json(json!({ "message": "To-do item removed." })))
}
