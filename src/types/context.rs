//! Project Context
//!
//! Shared, read-only description of the project under analysis. Derived
//! once per pipeline run from the file set and repository metadata, then
//! passed by reference to every analyzer and compiler call.

use serde::{Deserialize, Serialize};

use super::source::{RepositoryInfo, SourceFile};

/// Read-only project description shared across one pipeline run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectContext {
    /// Project name
    pub name: String,

    /// Project description, if known
    #[serde(default)]
    pub description: Option<String>,

    /// Detected framework label ("Next.js", "Express", ...)
    #[serde(default)]
    pub framework: Option<String>,

    /// Primary language
    pub language: String,

    /// Detected architectural patterns (extensible; empty by default)
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl ProjectContext {
    /// Derive the context from the repository metadata and file set.
    ///
    /// Framework detection looks at manifest content first (package.json
    /// dependency names), then falls back to well-known config/manifest
    /// filenames. First match wins.
    pub fn derive(repository: &RepositoryInfo, files: &[SourceFile]) -> Self {
        Self {
            name: repository.name.clone(),
            description: repository.description.clone(),
            framework: detect_framework(files),
            language: repository
                .language
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            patterns: Vec::new(),
        }
    }

    /// Framework label or a neutral placeholder for prompt text
    pub fn framework_label(&self) -> &str {
        self.framework.as_deref().unwrap_or("this project")
    }
}

/// Sniff the framework from manifest content or config filenames
fn detect_framework(files: &[SourceFile]) -> Option<String> {
    // Manifest dependencies are the strongest signal
    if let Some(manifest) = files.iter().find(|f| f.name == "package.json") {
        for (needle, label) in [
            ("\"next\"", "Next.js"),
            ("\"nuxt\"", "Nuxt"),
            ("\"@angular/core\"", "Angular"),
            ("\"vue\"", "Vue"),
            ("\"svelte\"", "Svelte"),
            ("\"express\"", "Express"),
            ("\"react\"", "React"),
        ] {
            if manifest.content.contains(needle) {
                return Some(label.to_string());
            }
        }
        return Some("Node.js".to_string());
    }

    // Config/manifest filenames as fallback
    for file in files {
        let label = match file.name.as_str() {
            "next.config.js" | "next.config.ts" | "next.config.mjs" => "Next.js",
            "vue.config.js" | "vite.config.ts" => "Vue",
            "angular.json" => "Angular",
            "Cargo.toml" => "Rust",
            "go.mod" => "Go",
            "requirements.txt" | "pyproject.toml" => "Python",
            "pom.xml" | "build.gradle" => "Java",
            "Gemfile" => "Ruby",
            _ => continue,
        };
        return Some(label.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepositoryInfo {
        RepositoryInfo {
            name: "demo".to_string(),
            description: Some("A demo".to_string()),
            language: Some("TypeScript".to_string()),
            topics: vec![],
        }
    }

    #[test]
    fn test_detect_framework_from_manifest() {
        let files = vec![SourceFile::new(
            "package.json",
            r#"{"dependencies": {"next": "14.0.0", "react": "18.0.0"}}"#,
        )];
        let ctx = ProjectContext::derive(&repo(), &files);
        // "next" wins over "react" - manifest needles are checked in order
        assert_eq!(ctx.framework.as_deref(), Some("Next.js"));
        assert_eq!(ctx.language, "TypeScript");
    }

    #[test]
    fn test_detect_framework_from_config_filename() {
        let files = vec![
            SourceFile::new("src/main.rs", "fn main() {}"),
            SourceFile::new("Cargo.toml", "[package]\nname = \"demo\""),
        ];
        let ctx = ProjectContext::derive(&repo(), &files);
        assert_eq!(ctx.framework.as_deref(), Some("Rust"));
    }

    #[test]
    fn test_unknown_framework() {
        let files = vec![SourceFile::new("notes.txt", "hello")];
        let ctx = ProjectContext::derive(&repo(), &files);
        assert!(ctx.framework.is_none());
        assert_eq!(ctx.framework_label(), "this project");
    }

    #[test]
    fn test_missing_language_placeholder() {
        let mut r = repo();
        r.language = None;
        let ctx = ProjectContext::derive(&r, &[]);
        assert_eq!(ctx.language, "Unknown");
    }
}
