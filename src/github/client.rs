//! GitHub Contents-API Client
//!
//! `SourceEnumerator` backed by the GitHub REST API: one tree listing per
//! repository, then raw content fetches for the paths that survive
//! filtering. Transient failures (rate limits, 5xx, network) retry with
//! exponential backoff; everything else fails fast.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::constants::network;
use crate::types::{DocuError, ErrorClassifier, RepositoryInfo, Result, SourceFile};

use super::{RepoRef, SourceEnumerator};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("docugenius/", env!("CARGO_PKG_VERSION"));

/// Path fragments that never contain documentable sources
const SKIPPED_PATH_FRAGMENTS: &[&str] = &[
    "node_modules/",
    "dist/",
    "build/",
    "vendor/",
    "target/",
    ".git/",
    ".next/",
];

/// Exact file names excluded from analysis
const SKIPPED_FILE_NAMES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Cargo.lock",
    "go.sum",
];

/// Client configuration
#[derive(Debug, Clone)]
pub struct GithubClientConfig {
    /// API base URL; override for GitHub Enterprise
    pub api_base: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Largest file fetched, in bytes
    pub max_file_bytes: u64,
    /// Most files fetched per repository
    pub max_files: usize,
}

impl Default for GithubClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            max_file_bytes: network::GITHUB_MAX_FILE_BYTES,
            max_files: 100,
        }
    }
}

/// GitHub REST client with optional token auth
pub struct GithubClient {
    client: reqwest::Client,
    api_base: String,
    token: Option<SecretString>,
    max_file_bytes: u64,
    max_files: usize,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("max_file_bytes", &self.max_file_bytes)
            .field("max_files", &self.max_files)
            .finish()
    }
}

impl GithubClient {
    pub fn new(config: GithubClientConfig, token: Option<String>) -> Result<Self> {
        url::Url::parse(&config.api_base).map_err(|e| {
            DocuError::Config(format!("Invalid github.api_base '{}': {}", config.api_base, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DocuError::Github(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base,
            token: token
                .or_else(|| std::env::var("GITHUB_TOKEN").ok())
                .map(SecretString::from),
            max_file_bytes: config.max_file_bytes,
            max_files: config.max_files,
        })
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(network::GITHUB_RETRY_BASE_MS))
            .with_max_times(network::GITHUB_MAX_RETRIES)
    }

    async fn get(&self, url: &str, accept: &str) -> Result<reqwest::Response> {
        let mut request = self.client.get(url).header("Accept", accept);
        if let Some(ref token) = self.token {
            request = request.header(
                "Authorization",
                format!("Bearer {}", token.expose_secret()),
            );
        }

        let response = request
            .send()
            .await
            .map_err(|e| DocuError::Llm(ErrorClassifier::classify(&e.to_string(), "github")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DocuError::Llm(ErrorClassifier::classify_http_status(
                status, &body, "github",
            )));
        }

        Ok(response)
    }

    /// GET with retry on transient categories
    async fn get_with_retry(&self, url: &str, accept: &str) -> Result<reqwest::Response> {
        (|| async { self.get(url, accept).await })
            .retry(self.backoff())
            .when(|e: &DocuError| matches!(e, DocuError::Llm(le) if le.is_retryable()))
            .notify(|e, delay| {
                warn!(error = %e, delay_ms = delay.as_millis() as u64, "Retrying GitHub request");
            })
            .await
    }

    async fn fetch_tree(&self, repo: &RepoRef, git_ref: &str) -> Result<Vec<TreeEntry>> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, repo.owner, repo.name, git_ref
        );
        let response = self
            .get_with_retry(&url, "application/vnd.github+json")
            .await?;
        let tree: TreeResponse = response
            .json()
            .await
            .map_err(|e| DocuError::Github(format!("Failed to parse tree response: {}", e)))?;

        if tree.truncated {
            warn!(repo = %repo, "Tree listing truncated by the API");
        }

        Ok(tree.tree)
    }

    async fn fetch_content(&self, repo: &RepoRef, path: &str) -> Result<String> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, repo.owner, repo.name, path
        );
        let response = self
            .get_with_retry(&url, "application/vnd.github.raw+json")
            .await?;
        response
            .text()
            .await
            .map_err(|e| DocuError::Github(format!("Failed to read {}: {}", path, e)))
    }

    fn should_fetch(&self, entry: &TreeEntry) -> bool {
        if entry.entry_type != "blob" {
            return false;
        }
        if entry.size.unwrap_or(0) > self.max_file_bytes {
            return false;
        }
        if SKIPPED_PATH_FRAGMENTS
            .iter()
            .any(|fragment| entry.path.contains(fragment))
        {
            return false;
        }
        let name = entry.path.rsplit('/').next().unwrap_or(&entry.path);
        if SKIPPED_FILE_NAMES.contains(&name) {
            return false;
        }
        detect_language(&entry.path).is_some()
    }
}

#[async_trait]
impl SourceEnumerator for GithubClient {
    async fn list_files(&self, repo: &RepoRef) -> Result<Vec<SourceFile>> {
        let git_ref = match repo.git_ref.clone() {
            Some(r) => r,
            None => {
                let metadata = self.fetch_repo(repo).await?;
                metadata.default_branch.unwrap_or_else(|| "main".to_string())
            }
        };

        let tree = self.fetch_tree(repo, &git_ref).await?;
        let selected: Vec<TreeEntry> = tree
            .into_iter()
            .filter(|entry| self.should_fetch(entry))
            .take(self.max_files)
            .collect();

        info!(repo = %repo, count = selected.len(), "Fetching repository files");

        let mut files = Vec::with_capacity(selected.len());
        for entry in selected {
            match self.fetch_content(repo, &entry.path).await {
                Ok(content) => {
                    let mut file = SourceFile::new(entry.path.clone(), content);
                    if let Some(language) = detect_language(&entry.path) {
                        file = file.with_language(language);
                    }
                    file.size = entry.size.unwrap_or(file.size);
                    files.push(file);
                }
                Err(e) => {
                    // One unfetchable file does not fail the enumeration
                    debug!(path = %entry.path, error = %e, "Skipping unfetchable file");
                }
            }
        }

        Ok(files)
    }

    async fn repo_metadata(&self, repo: &RepoRef) -> Result<RepositoryInfo> {
        let metadata = self.fetch_repo(repo).await?;
        Ok(RepositoryInfo {
            name: metadata.name,
            description: metadata.description,
            language: metadata.language,
            topics: metadata.topics,
        })
    }
}

impl GithubClient {
    async fn fetch_repo(&self, repo: &RepoRef) -> Result<RepoResponse> {
        let url = format!("{}/repos/{}/{}", self.api_base, repo.owner, repo.name);
        let response = self
            .get_with_retry(&url, "application/vnd.github+json")
            .await?;
        response
            .json()
            .await
            .map_err(|e| DocuError::Github(format!("Failed to parse repo response: {}", e)))
    }
}

/// Language tag from a file extension; None means "not documentable"
pub fn detect_language(path: &str) -> Option<&'static str> {
    let extension = path.rsplit('.').next()?;
    let language = match extension.to_lowercase().as_str() {
        "rs" => "rust",
        "ts" | "tsx" => "typescript",
        "js" | "jsx" | "mjs" => "javascript",
        "py" => "python",
        "go" => "go",
        "java" => "java",
        "kt" => "kotlin",
        "rb" => "ruby",
        "c" | "h" => "c",
        "cpp" | "cc" | "hpp" => "cpp",
        "cs" => "csharp",
        "php" => "php",
        "swift" => "swift",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "md" => "markdown",
        "sh" | "bash" => "bash",
        "sql" => "sql",
        _ => return None,
    };
    Some(language)
}

// API response types

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
    #[serde(default)]
    size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    default_branch: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(path: &str, size: u64) -> TreeEntry {
        TreeEntry {
            path: path.to_string(),
            entry_type: "blob".to_string(),
            size: Some(size),
        }
    }

    fn client() -> GithubClient {
        GithubClient::new(GithubClientConfig::default(), Some("ghp_test".to_string()))
            .expect("default config is valid")
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("src/main.rs"), Some("rust"));
        assert_eq!(detect_language("app/page.tsx"), Some("typescript"));
        assert_eq!(detect_language("a/b/c.py"), Some("python"));
        assert_eq!(detect_language("image.png"), None);
        assert_eq!(detect_language("LICENSE"), None);
    }

    #[test]
    fn test_should_fetch_filters_paths() {
        let c = client();
        assert!(c.should_fetch(&blob("src/main.ts", 1000)));
        assert!(!c.should_fetch(&blob("node_modules/react/index.js", 1000)));
        assert!(!c.should_fetch(&blob("dist/bundle.js", 1000)));
        assert!(!c.should_fetch(&blob("package-lock.json", 1000)));
        assert!(!c.should_fetch(&blob("logo.png", 1000)));
    }

    #[test]
    fn test_should_fetch_filters_oversized() {
        let c = client();
        assert!(!c.should_fetch(&blob("src/huge.ts", network::GITHUB_MAX_FILE_BYTES + 1)));
    }

    #[test]
    fn test_should_fetch_filters_non_blobs() {
        let c = client();
        let dir = TreeEntry {
            path: "src".to_string(),
            entry_type: "tree".to_string(),
            size: None,
        };
        assert!(!c.should_fetch(&dir));
    }

    #[test]
    fn test_invalid_api_base_rejected() {
        let result = GithubClient::new(
            GithubClientConfig {
                api_base: "nonsense".to_string(),
                ..Default::default()
            },
            None,
        );
        assert!(matches!(result, Err(DocuError::Config(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", client());
        assert!(!debug.contains("ghp_test"));
        assert!(debug.contains("[REDACTED]"));
    }
}
