//! Source Enumerator Abstraction
//!
//! The pipeline consumes repository files through this capability; the
//! transport behind it is a collaborator's concern. The shipped
//! implementation is a GitHub contents-API client, but tests and other
//! hosts plug in by implementing `SourceEnumerator`.

mod client;

pub use client::{GithubClient, GithubClientConfig};

use async_trait::async_trait;

use crate::types::{RepositoryInfo, Result, SourceFile};

/// Reference to one repository at an optional ref
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    /// Branch/tag/commit; the host's default branch when None
    pub git_ref: Option<String>,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            git_ref: None,
        }
    }

    /// Parse "owner/name" as typed on a CLI
    pub fn parse(spec: &str) -> Result<Self> {
        let (owner, name) = spec.split_once('/').ok_or_else(|| {
            crate::types::DocuError::Config(format!(
                "Invalid repository '{}': expected owner/name",
                spec
            ))
        })?;
        if owner.is_empty() || name.is_empty() {
            return Err(crate::types::DocuError::Config(format!(
                "Invalid repository '{}': expected owner/name",
                spec
            )));
        }
        Ok(Self::new(owner, name))
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Enumerates a repository's files and metadata
#[async_trait]
pub trait SourceEnumerator: Send + Sync {
    /// Fetch the documentable files of a repository
    async fn list_files(&self, repo: &RepoRef) -> Result<Vec<SourceFile>>;

    /// Fetch repository metadata
    async fn repo_metadata(&self, repo: &RepoRef) -> Result<RepositoryInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_ref_parse() {
        let repo = RepoRef::parse("rust-lang/cargo").unwrap();
        assert_eq!(repo.owner, "rust-lang");
        assert_eq!(repo.name, "cargo");
        assert_eq!(repo.full_name(), "rust-lang/cargo");
    }

    #[test]
    fn test_repo_ref_parse_rejects_bad_specs() {
        assert!(RepoRef::parse("no-slash").is_err());
        assert!(RepoRef::parse("/name").is_err());
        assert!(RepoRef::parse("owner/").is_err());
    }
}
