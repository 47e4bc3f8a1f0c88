//! Generate Command
//!
//! Fetches a repository through the GitHub enumerator, runs the
//! documentation pipeline, renders Markdown, and persists the result.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::ai::create_service;
use crate::cli::output::Output;
use crate::config::{Config, ConfigLoader};
use crate::github::{GithubClient, RepoRef, SourceEnumerator};
use crate::pipeline::{DocumentationPipeline, ProgressKind};
use crate::render::to_markdown;
use crate::storage::{DocumentStore, SqliteStore};
use crate::types::{DocuError, ProjectContext, Result};

/// Options collected from the CLI
pub struct GenerateOptions {
    /// "owner/name" repository spec
    pub repository: String,
    /// Branch/tag override
    pub git_ref: Option<String>,
    /// Model override
    pub model: Option<String>,
    /// Write the rendered Markdown here instead of the store only
    pub output: Option<PathBuf>,
    /// Owner key used for persistence
    pub user: String,
    /// Skip persistence entirely
    pub no_save: bool,
}

pub async fn run(options: GenerateOptions) -> Result<()> {
    let output = Output::new();
    let mut config = ConfigLoader::load()?;
    if let Some(model) = options.model {
        config.llm.model = Some(model);
    }

    let mut repo = RepoRef::parse(&options.repository)?;
    repo.git_ref = options.git_ref;

    output.section(&format!("Generating documentation for {}", repo));

    // Fetch
    let enumerator = GithubClient::new((&config.github).into(), config.github.token.clone())?;
    let repository = enumerator.repo_metadata(&repo).await?;
    let files = enumerator.list_files(&repo).await?;
    output.info(&format!("Fetched {} files", files.len()));

    // Same derivation the pipeline performs internally; kept for rendering
    let context = ProjectContext::derive(&repository, &files);

    // Generate
    let service = create_service(&(&config.llm).into())?;
    let pipeline = DocumentationPipeline::new(service, (&config.pipeline).into());

    let progress_output = Output::new();
    let documentation = pipeline
        .generate(files, &repository, move |event| {
            match event.kind {
                ProgressKind::Error => progress_output.error(&event.message),
                _ => progress_output.progress(event.progress, &event.message),
            };
        })
        .await
        .map_err(|e| match e {
            // Actionable user error, not an internal failure
            DocuError::NoFiles => DocuError::Config(format!(
                "{} has no documentable files - nothing to generate",
                repo
            )),
            other => other,
        })?;

    // Render & persist
    let markdown = to_markdown(&documentation, &context);
    let file_count = documentation.file_docs.len();

    if let Some(path) = options.output {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &markdown)?;
        output.success(&format!("Wrote {}", path.display()));
    }

    if !options.no_save {
        let store = open_store(&config)?;
        let title = format!("{} Documentation", repository.name);
        let id = store
            .save(
                &options.user,
                &repo.full_name(),
                &title,
                &markdown,
                &documentation,
                file_count,
            )
            .await?;
        info!(id = %id, "Documentation persisted");
        output.success(&format!("Saved document {} ({} files)", id, file_count));
    }

    Ok(())
}

/// List persisted documents for a user
pub async fn list(user: &str) -> Result<()> {
    let output = Output::new();
    let config = ConfigLoader::load()?;
    let store = open_store(&config)?;

    let documents = store.list(user).await?;
    if documents.is_empty() {
        output.info(&format!("No saved documents for {}", user));
        return Ok(());
    }

    output.section(&format!("Documents for {}", user));
    for document in documents {
        println!(
            "  {}  {}  ({} files, updated {})",
            document.id,
            document.repository,
            document.file_count,
            document.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

/// Delete a persisted document
pub async fn delete(id: &str, user: &str) -> Result<()> {
    let output = Output::new();
    let config = ConfigLoader::load()?;
    let store = open_store(&config)?;

    if store.delete(id, user).await? {
        output.success(&format!("Deleted document {}", id));
    } else {
        output.warning(&format!("No document {} owned by {}", id, user));
    }
    Ok(())
}

fn open_store(config: &Config) -> Result<Arc<dyn DocumentStore>> {
    if let Some(parent) = config.storage.db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Arc::new(SqliteStore::open(&config.storage.db_path)?))
}
