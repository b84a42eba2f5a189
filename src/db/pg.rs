use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{
    postgres::{PgArguments, PgPoolOptions},
    query::Query,
    types::Json,
    Executor, Pool, Postgres, Row,
};
use uuid::Uuid;

use super::{Collection, Condition, DocumentStore, Filter, Page};
use crate::error::Error;

type Database = Postgres;

/// Document collections stored as JSONB rows in Postgres.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: Pool<Database>,
}

impl PgStore {
    #[tracing::instrument(name = "PgStore::new", skip(db_uri))]
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: Pool<Database>) -> Result<Self, Error> {
        for collection in Collection::ALL {
            let table = collection.name();

            pool.execute(
                format!(
                    "CREATE TABLE IF NOT EXISTS {} (id UUID PRIMARY KEY, seq BIGSERIAL, created_at TIMESTAMPTZ NOT NULL, data JSONB NOT NULL)",
                    table
                )
                .as_str(),
            )
            .await?;

            pool.execute(
                format!(
                    "CREATE INDEX IF NOT EXISTS {0}_created_at_idx ON {0} (created_at DESC, seq DESC)",
                    table
                )
                .as_str(),
            )
            .await?;

            if let Some(field) = collection.unique_field() {
                pool.execute(
                    format!(
                        "CREATE UNIQUE INDEX IF NOT EXISTS {0}_{1}_key ON {0} ((data->>'{1}'))",
                        table, field
                    )
                    .as_str(),
                )
                .await?;
            }

            tracing::info!("collection {} ready", table);
        }

        Ok(Self { pool })
    }
}

/// Renders the WHERE clause with placeholders starting at `$1`.
fn where_clause(filter: &Filter) -> String {
    if filter.conditions().is_empty() {
        return "TRUE".into();
    }

    filter
        .conditions()
        .iter()
        .enumerate()
        .map(|(i, (field, condition))| {
            debug_assert!(field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));

            match condition {
                Condition::Eq(_) => format!("data->>'{}' = ${}", field, i + 1),
                Condition::In(_) => format!("data->>'{}' = ANY(${})", field, i + 1),
            }
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn bind_filter<'q>(
    mut query: Query<'q, Database, PgArguments>,
    filter: &Filter,
) -> Query<'q, Database, PgArguments> {
    for (_, condition) in filter.conditions() {
        query = match condition {
            Condition::Eq(value) => query.bind(value.clone()),
            Condition::In(values) => query.bind(values.clone()),
        };
    }

    query
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn ping(&self) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        conn.execute("SELECT 1").await?;

        Ok(())
    }

    #[tracing::instrument(skip(self, data))]
    async fn insert(
        &self,
        collection: Collection,
        id: Uuid,
        created_at: DateTime<Utc>,
        data: Value,
    ) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;

        let sql = format!(
            "INSERT INTO {} (id, created_at, data) VALUES ($1, $2, $3)",
            collection.name()
        );

        conn.execute(
            sqlx::query(&sql)
                .bind(&id)
                .bind(&created_at)
                .bind(Json(&data)),
        )
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        page: Page,
    ) -> Result<Vec<Value>, Error> {
        let mut conn = self.pool.acquire().await?;

        let n = filter.conditions().len();
        let mut sql = format!(
            "SELECT data FROM {} WHERE {} ORDER BY created_at DESC, seq DESC OFFSET ${}",
            collection.name(),
            where_clause(filter),
            n + 1
        );

        if page.limit.is_some() {
            sql.push_str(&format!(" LIMIT ${}", n + 2));
        }

        let mut query = bind_filter(sqlx::query(&sql), filter).bind(page.skip as i64);

        if let Some(limit) = page.limit {
            query = query.bind(limit as i64);
        }

        let rows = conn.fetch_all(query).await?;

        rows.iter()
            .map(|row| -> Result<Value, Error> {
                let Json(data): Json<Value> = row.try_get("data")?;
                Ok(data)
            })
            .collect()
    }

    #[tracing::instrument(skip(self))]
    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, Error> {
        let mut conn = self.pool.acquire().await?;

        let sql = format!(
            "SELECT COUNT(*) AS count FROM {} WHERE {}",
            collection.name(),
            where_clause(filter)
        );

        let count: i64 = conn
            .fetch_one(bind_filter(sqlx::query(&sql), filter))
            .await?
            .try_get("count")?;

        Ok(count as u64)
    }

    #[tracing::instrument(skip(self, data))]
    async fn replace(&self, collection: Collection, id: Uuid, data: Value) -> Result<bool, Error> {
        let mut conn = self.pool.acquire().await?;

        let sql = format!("UPDATE {} SET data = $2 WHERE id = $1", collection.name());

        let result = conn
            .execute(sqlx::query(&sql).bind(&id).bind(Json(&data)))
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, Error> {
        let mut conn = self.pool.acquire().await?;

        let sql = format!("DELETE FROM {} WHERE id = $1", collection.name());

        let result = conn.execute(sqlx::query(&sql).bind(&id)).await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn where_clause_test() {
        assert_eq!(where_clause(&Filter::new()), "TRUE");

        let filter = Filter::new()
            .eq("customerEmail", "a@b.com")
            .any_of("status", ["confirmed", "assigned"]);

        assert_eq!(
            where_clause(&filter),
            "data->>'customerEmail' = $1 AND data->>'status' = ANY($2)"
        );
    }
}
