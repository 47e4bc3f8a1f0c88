//! Prompt Builders
//!
//! Prompt construction for the per-file analysis call and the two
//! document-level synthesis calls. File content is always bounded before
//! it reaches a prompt; the ceiling is configuration, not a hidden
//! constant.

use crate::constants::pipeline::TRUNCATION_MARKER;
use crate::types::{FileAnalysis, ProjectContext, SourceFile};

/// Cut content at the configured ceiling, appending the truncation marker
pub fn bounded_content(content: &str, max_chars: usize) -> String {
    if content.len() <= max_chars {
        return content.to_string();
    }

    // Cut on a char boundary at or below the ceiling
    let mut cut = max_chars;
    while cut > 0 && !content.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{}", &content[..cut], TRUNCATION_MARKER)
}

/// Build the per-file analysis prompt
pub fn build_file_analysis_prompt(
    file: &SourceFile,
    context: &ProjectContext,
    max_chars: usize,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Analyze the following source file and return a JSON object describing it.\n\n",
    );

    prompt.push_str("# Project Context\n\n");
    prompt.push_str(&format!("Project: {}\n", context.name));
    if let Some(ref description) = context.description {
        prompt.push_str(&format!("Description: {}\n", description));
    }
    if let Some(ref framework) = context.framework {
        prompt.push_str(&format!("Framework: {}\n", framework));
    }
    prompt.push_str(&format!("Primary language: {}\n\n", context.language));

    prompt.push_str(&format!("# File: `{}`\n\n", file.path));
    let language = file.language.as_deref().unwrap_or("text");
    prompt.push_str(&format!("```{}\n", language));
    prompt.push_str(&bounded_content(&file.content, max_chars));
    prompt.push_str("\n```\n\n");

    prompt.push_str(
        r#"Return ONLY a JSON object with exactly this shape:
{
  "summary": "2-3 sentence description of what this file does",
  "importance": "critical|high|medium|low",
  "complexity": 1-10,
  "functions": [
    {
      "name": "functionName",
      "description": "what it does",
      "parameters": [{"name": "p", "param_type": "string", "description": "..."}],
      "complexity": "simple|moderate|complex",
      "returns": {"return_type": "...", "description": "..."}
    }
  ],
  "classes": [
    {"name": "ClassName", "description": "...", "methods": []}
  ],
  "constants": ["CONSTANT_NAME"],
  "dependencies": ["imported-module-names"]
}

Base every statement on the code shown. Do not invent functions or
dependencies that are not visible."#,
    );

    prompt
}

/// Build the project-overview synthesis prompt from top-tier analyses
pub fn build_overview_prompt(context: &ProjectContext, analyses: &[&FileAnalysis]) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Write a concise project overview (3-5 paragraphs) for `{}`",
        context.name
    ));
    if let Some(ref framework) = context.framework {
        prompt.push_str(&format!(", a {} project", framework));
    }
    prompt.push_str(".\n\n");

    if let Some(ref description) = context.description {
        prompt.push_str(&format!("Stated description: {}\n\n", description));
    }

    prompt.push_str("# Most important files\n\n");
    push_analysis_digest(&mut prompt, analyses);

    prompt.push_str(
        "\nDescribe what the project does, who it is for, and how its main \
         pieces fit together. Plain prose, no markdown headers.",
    );

    prompt
}

/// Build the architecture-narrative synthesis prompt
pub fn build_architecture_prompt(context: &ProjectContext, analyses: &[&FileAnalysis]) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Describe the architecture of `{}` ({}) in 3-5 paragraphs.\n\n",
        context.name, context.language
    ));

    prompt.push_str("# Architecturally significant files\n\n");
    push_analysis_digest(&mut prompt, analyses);

    prompt.push_str(
        "\nCover the main layers, how data flows between them, and the key \
         design decisions visible in these files. Plain prose, no markdown \
         headers.",
    );

    prompt
}

fn push_analysis_digest(prompt: &mut String, analyses: &[&FileAnalysis]) {
    for analysis in analyses {
        prompt.push_str(&format!(
            "- `{}` ({}, complexity {}): {}\n",
            analysis.file_path,
            analysis.importance.as_str(),
            analysis.complexity,
            analysis.summary
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Importance;

    #[test]
    fn test_bounded_content_no_truncation() {
        assert_eq!(bounded_content("short", 100), "short");
    }

    #[test]
    fn test_bounded_content_truncates_with_marker() {
        let long = "x".repeat(500);
        let bounded = bounded_content(&long, 100);
        assert!(bounded.starts_with(&"x".repeat(100)));
        assert!(bounded.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_bounded_content_char_boundary() {
        // Multi-byte chars must not split mid-codepoint
        let content = "héllo wörld ".repeat(50);
        let bounded = bounded_content(&content, 99);
        assert!(bounded.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_analysis_prompt_contains_file_and_context() {
        let file = SourceFile::new("src/main.ts", "console.log('hi')").with_language("typescript");
        let context = ProjectContext {
            name: "demo".to_string(),
            framework: Some("Next.js".to_string()),
            language: "TypeScript".to_string(),
            ..Default::default()
        };

        let prompt = build_file_analysis_prompt(&file, &context, 8000);
        assert!(prompt.contains("src/main.ts"));
        assert!(prompt.contains("console.log"));
        assert!(prompt.contains("Next.js"));
        assert!(prompt.contains("\"importance\""));
    }

    #[test]
    fn test_analysis_prompt_truncates_large_file() {
        let file = SourceFile::new("big.ts", "a".repeat(20_000));
        let context = ProjectContext::default();

        let prompt = build_file_analysis_prompt(&file, &context, 8000);
        assert!(prompt.contains(TRUNCATION_MARKER));
        assert!(prompt.len() < 20_000);
    }

    #[test]
    fn test_overview_prompt_lists_analyses() {
        let analysis = FileAnalysis {
            file_path: "src/main.ts".to_string(),
            summary: "Entry point".to_string(),
            importance: Importance::Critical,
            complexity: 6,
            ..Default::default()
        };
        let context = ProjectContext {
            name: "demo".to_string(),
            ..Default::default()
        };

        let prompt = build_overview_prompt(&context, &[&analysis]);
        assert!(prompt.contains("src/main.ts"));
        assert!(prompt.contains("critical"));
        assert!(prompt.contains("Entry point"));
    }
}
