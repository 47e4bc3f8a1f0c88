//! Repository Source Types
//!
//! Inputs to the documentation pipeline: one `SourceFile` per repository
//! file plus the repository metadata supplied by the caller. Both are
//! immutable for the duration of a pipeline run.

use serde::{Deserialize, Serialize};

/// One repository file as fetched by a source enumerator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path relative to the repository root
    pub path: String,

    /// File name (last path segment)
    pub name: String,

    /// Raw text content
    pub content: String,

    /// Detected language tag ("rust", "typescript", ...)
    #[serde(default)]
    pub language: Option<String>,

    /// Size in bytes as reported by the enumerator
    #[serde(default)]
    pub size: u64,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let content = content.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        let size = content.len() as u64;
        Self {
            path,
            name,
            content,
            language: None,
            size,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Repository metadata supplied by the caller (or a source enumerator)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryInfo {
    /// Repository name
    pub name: String,

    /// Repository description, if any
    #[serde(default)]
    pub description: Option<String>,

    /// Primary language as reported by the host
    #[serde(default)]
    pub language: Option<String>,

    /// Repository topics/tags
    #[serde(default)]
    pub topics: Vec<String>,
}

impl RepositoryInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_file_name_from_path() {
        let file = SourceFile::new("src/api/users/route.ts", "export {}");
        assert_eq!(file.name, "route.ts");
        assert_eq!(file.size, 9);
    }

    #[test]
    fn test_source_file_flat_path() {
        let file = SourceFile::new("README.md", "# Hi");
        assert_eq!(file.name, "README.md");
    }
}
