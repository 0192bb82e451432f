//! Scope names accepted by this API, one per operation on the collection.

pub const READ_TODOS: &str = "read:to-dos";
pub const CREATE_TODOS: &str = "create:to-dos";
pub const UPDATE_TODOS: &str = "update:to-dos";
pub const DELETE_TODOS: &str = "delete:to-dos";
