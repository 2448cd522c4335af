//! SQLite-backed [`KeyValueStore`] implementation.
//!
//! Each persisted record (filters, leads, opportunities) is one row of
//! the `kv_records` table, holding the JSON text the persistence adapter
//! produced.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;

use leads_console_core::persist::KeyValueStore;

/// SQLite implementation of the [`KeyValueStore`] trait.
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_records WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_records (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(chrono::Utc::now().timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_records WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::{db, migrate};
    use tempfile::TempDir;

    async fn open(tmp: &TempDir) -> SqliteKeyValueStore {
        let mut config = Config::minimal();
        config.db.path = tmp.path().join("data/leads.sqlite");
        let pool = db::connect(&config).await.unwrap();
        migrate::ensure_schema(&pool).await.unwrap();
        SqliteKeyValueStore::new(pool)
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let tmp = TempDir::new().unwrap();
        let store = open(&tmp).await;

        assert_eq!(store.get("k").await.unwrap(), None);
        store.set("k", "[1]").await.unwrap();
        store.set("k", "[1,2]").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("[1,2]"));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_schema_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::minimal();
        config.db.path = tmp.path().join("bare.sqlite");
        let store = SqliteKeyValueStore::new(db::connect(&config).await.unwrap());
        assert!(store.get("k").await.is_err());
        assert!(store.set("k", "v").await.is_err());
    }
}
