//! Persistence Sink
//!
//! The generated documentation is persisted through the `DocumentStore`
//! capability: an upsert store keyed by user + repository. The shipped
//! implementation is SQLite (`SqliteStore`); tests use `MemoryStore`.

mod sqlite;

pub use sqlite::SqliteStore;

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{ProjectDocumentation, Result};

/// One persisted documentation record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedDocument {
    pub id: String,
    pub user: String,
    pub repository: String,
    pub title: String,
    pub markdown: String,
    pub structured: ProjectDocumentation,
    pub file_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert/read/delete store keyed by user + repository
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert or replace the document for (user, repository); returns its id
    async fn save(
        &self,
        user: &str,
        repository: &str,
        title: &str,
        markdown: &str,
        structured: &ProjectDocumentation,
        file_count: usize,
    ) -> Result<String>;

    /// All documents belonging to a user, most recently updated first
    async fn list(&self, user: &str) -> Result<Vec<SavedDocument>>;

    /// Delete a document by id, scoped to its owner; false when absent
    async fn delete(&self, id: &str, user: &str) -> Result<bool>;
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// HashMap-backed store for tests and ephemeral runs
#[derive(Default)]
pub struct MemoryStore {
    // keyed by (user, repository)
    documents: Mutex<HashMap<(String, String), SavedDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn save(
        &self,
        user: &str,
        repository: &str,
        title: &str,
        markdown: &str,
        structured: &ProjectDocumentation,
        file_count: usize,
    ) -> Result<String> {
        let mut documents = self
            .documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let key = (user.to_string(), repository.to_string());
        let now = Utc::now();

        let id = documents
            .get(&key)
            .map(|existing| existing.id.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let created_at = documents.get(&key).map(|d| d.created_at).unwrap_or(now);

        documents.insert(
            key,
            SavedDocument {
                id: id.clone(),
                user: user.to_string(),
                repository: repository.to_string(),
                title: title.to_string(),
                markdown: markdown.to_string(),
                structured: structured.clone(),
                file_count,
                created_at,
                updated_at: now,
            },
        );

        Ok(id)
    }

    async fn list(&self, user: &str) -> Result<Vec<SavedDocument>> {
        let documents = self
            .documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut owned: Vec<SavedDocument> = documents
            .values()
            .filter(|d| d.user == user)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(owned)
    }

    async fn delete(&self, id: &str, user: &str) -> Result<bool> {
        let mut documents = self
            .documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let key = documents
            .iter()
            .find(|(_, d)| d.id == id && d.user == user)
            .map(|(k, _)| k.clone());

        Ok(match key {
            Some(key) => documents.remove(&key).is_some(),
            None => false,
        })
    }
}
