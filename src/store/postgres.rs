use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{StoreError, ToDo, TodoStore};

/// Postgres-backed store. The collection is a single table of
/// `(id uuid, doc jsonb)` rows and every trait operation is one statement.
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    /// Connect and make sure the collection table exists. Bootstrap awaits
    /// this before the listener starts accepting traffic.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new().connect(database_url).await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS to_dos (id UUID PRIMARY KEY, doc JSONB NOT NULL)",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn insert(&self, mut document: Map<String, Value>) -> Result<Uuid, StoreError> {
        document.remove("id");
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO to_dos (id, doc) VALUES ($1, $2)")
            .bind(id)
            .bind(Value::Object(document))
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<ToDo>, StoreError> {
        let rows = sqlx::query("SELECT id, doc FROM to_dos")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let id: Uuid = row.try_get("id")?;
                let doc: Value = row.try_get("doc")?;
                let fields = match doc {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };

                Ok(ToDo { id, fields })
            })
            .collect()
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM to_dos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        mut document: Map<String, Value>,
    ) -> Result<(), StoreError> {
        document.remove("id");
        // jsonb `||` replaces top-level fields in one atomic statement;
        // fields absent from the payload are preserved.
        sqlx::query("UPDATE to_dos SET doc = doc || $2 WHERE id = $1")
            .bind(id)
            .bind(Value::Object(document))
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
