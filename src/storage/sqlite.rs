//! SQLite Document Store
//!
//! `DocumentStore` backed by SQLite with r2d2 connection pooling and WAL
//! mode. The table is a plain upsert store: one row per (user, repository)
//! with the rendered Markdown and the structured document as JSON.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::types::{DocuError, ProjectDocumentation, Result, ResultExt};

use super::{DocumentStore, SavedDocument};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id          TEXT PRIMARY KEY,
    user        TEXT NOT NULL,
    repository  TEXT NOT NULL,
    title       TEXT NOT NULL,
    markdown    TEXT NOT NULL,
    structured  TEXT NOT NULL,
    file_count  INTEGER NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    UNIQUE (user, repository)
);

CREATE INDEX IF NOT EXISTS idx_documents_user ON documents (user, updated_at);
"#;

/// SQLite-backed document store
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    /// Open (and initialize) the store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let manager =
            SqliteConnectionManager::file(path.as_ref()).with_init(Self::configure_connection);
        Self::build(manager, 8)
    }

    /// In-memory store for tests
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory().with_init(Self::configure_connection);
        // Single connection: every pool handle must see the same memory db
        Self::build(manager, 1)
    }

    fn build(manager: SqliteConnectionManager, max_size: u32) -> Result<Self> {
        let pool = Pool::builder()
            .max_size(max_size)
            .build(manager)
            .map_err(|e| DocuError::Storage(format!("Failed to create connection pool: {}", e)))?;

        let store = Self { pool };
        store
            .conn()?
            .execute_batch(SCHEMA)
            .with_context("Failed to initialize document schema")?;
        Ok(store)
    }

    fn configure_connection(conn: &mut Connection) -> std::result::Result<(), rusqlite::Error> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            "#,
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| DocuError::Storage(format!("Failed to acquire connection: {}", e)))
    }

    fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<(SavedDocument, String)> {
        let structured_json: String = row.get(5)?;
        let created_at: String = row.get(7)?;
        let updated_at: String = row.get(8)?;

        Ok((
            SavedDocument {
                id: row.get(0)?,
                user: row.get(1)?,
                repository: row.get(2)?,
                title: row.get(3)?,
                markdown: row.get(4)?,
                structured: ProjectDocumentation::default(),
                file_count: row.get::<_, i64>(6)? as usize,
                created_at: parse_timestamp(&created_at),
                updated_at: parse_timestamp(&updated_at),
            },
            structured_json,
        ))
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn save(
        &self,
        user: &str,
        repository: &str,
        title: &str,
        markdown: &str,
        structured: &ProjectDocumentation,
        file_count: usize,
    ) -> Result<String> {
        let conn = self.conn()?;
        let structured_json = serde_json::to_string(structured)?;
        let now = Utc::now().to_rfc3339();

        let existing: Option<String> = conn
            .query_row(
                "SELECT id FROM documents WHERE user = ?1 AND repository = ?2",
                params![user, repository],
                |row| row.get(0),
            )
            .optional()?;

        let id = existing.unwrap_or_else(|| Uuid::new_v4().to_string());

        conn.execute(
            r#"
            INSERT INTO documents
                (id, user, repository, title, markdown, structured, file_count, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            ON CONFLICT (user, repository) DO UPDATE SET
                title = excluded.title,
                markdown = excluded.markdown,
                structured = excluded.structured,
                file_count = excluded.file_count,
                updated_at = excluded.updated_at
            "#,
            params![
                id,
                user,
                repository,
                title,
                markdown,
                structured_json,
                file_count as i64,
                now
            ],
        )?;

        Ok(id)
    }

    async fn list(&self, user: &str) -> Result<Vec<SavedDocument>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user, repository, title, markdown, structured, file_count,
                   created_at, updated_at
            FROM documents
            WHERE user = ?1
            ORDER BY updated_at DESC
            "#,
        )?;

        let rows = stmt.query_map([user], Self::row_to_document)?;

        let mut documents = Vec::new();
        for row in rows {
            let (mut document, structured_json) = row?;
            document.structured = serde_json::from_str(&structured_json)?;
            documents.push(document);
        }

        Ok(documents)
    }

    async fn delete(&self, id: &str, user: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM documents WHERE id = ?1 AND user = ?2",
            params![id, user],
        )?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc() -> ProjectDocumentation {
        ProjectDocumentation {
            overview: "An overview".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_save_and_list_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store
            .save("alice", "alice/app", "App Docs", "# Docs", &sample_doc(), 3)
            .await
            .unwrap();

        let listed = store.list("alice").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].title, "App Docs");
        assert_eq!(listed[0].structured.overview, "An overview");
        assert_eq!(listed[0].file_count, 3);
    }

    #[tokio::test]
    async fn test_upsert_replaces_in_place() {
        let store = SqliteStore::open_in_memory().unwrap();
        let first = store
            .save("alice", "alice/app", "v1", "# v1", &sample_doc(), 2)
            .await
            .unwrap();
        let second = store
            .save("alice", "alice/app", "v2", "# v2", &sample_doc(), 4)
            .await
            .unwrap();

        assert_eq!(first, second);
        let listed = store.list("alice").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "v2");
        assert_eq!(listed[0].markdown, "# v2");
    }

    #[tokio::test]
    async fn test_delete_scoped_to_owner() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store
            .save("alice", "alice/app", "A", "a", &sample_doc(), 1)
            .await
            .unwrap();

        assert!(!store.delete(&id, "bob").await.unwrap());
        assert!(store.delete(&id, "alice").await.unwrap());
        assert!(store.list("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.db");
        let store = SqliteStore::open(&path).unwrap();
        store
            .save("alice", "alice/app", "A", "a", &sample_doc(), 1)
            .await
            .unwrap();
        assert_eq!(store.list("alice").await.unwrap().len(), 1);
    }
}
