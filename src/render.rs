//! Markdown Rendering
//!
//! Deterministic Markdown projection of a `ProjectDocumentation`, consumed
//! by the CLI and stored alongside the structured document. Pure string
//! assembly; section order is fixed and `file_docs` iterates in path order,
//! so identical input renders identical output.

use crate::types::{ProjectContext, ProjectDocumentation};

/// Render the aggregate document as one Markdown string
pub fn to_markdown(documentation: &ProjectDocumentation, context: &ProjectContext) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {} Documentation\n\n", context.name));
    if let Some(ref description) = context.description {
        out.push_str(&format!("> {}\n\n", description));
    }

    out.push_str("## Overview\n\n");
    out.push_str(&documentation.overview);
    out.push_str("\n\n## Architecture\n\n");
    out.push_str(&documentation.architecture);

    out.push_str("\n\n## Getting Started\n\n");
    out.push_str(&documentation.getting_started);

    out.push_str("\n\n## Project Structure\n\n```\n");
    out.push_str(&documentation.project_structure);
    out.push_str("\n```\n\n## Key Components\n\n");
    out.push_str(&documentation.key_components);

    out.push_str("\n\n## API Reference\n\n");
    out.push_str(&documentation.api_reference);

    out.push_str("\n\n## Usage Examples\n\n");
    out.push_str(&documentation.usage_examples);

    if let Some(ref metrics) = documentation.metrics {
        out.push_str("\n\n## Quality Metrics\n\n");
        out.push_str(&format!("- Complexity: {}\n", metrics.complexity));
        out.push_str(&format!("- Maintainability: {}\n", metrics.maintainability));
        out.push_str(&format!("- Test coverage: {}\n", metrics.test_coverage));
        out.push_str(&format!("- Performance: {}\n", metrics.performance));
    }

    if let Some(ref highlights) = documentation.highlights {
        if !highlights.technologies.is_empty() {
            out.push_str("\n## Technologies\n\n");
            for technology in &highlights.technologies {
                out.push_str(&format!("- {}\n", technology));
            }
        }
    }

    out.push_str("\n## Files\n");
    for (path, file_doc) in &documentation.file_docs {
        out.push_str(&format!("\n### `{}`\n\n", path));
        out.push_str(&format!(
            "_{}, readability {}/10_\n\n",
            file_doc.importance.as_str(),
            file_doc.quality.readability
        ));
        out.push_str(&file_doc.summary);
        out.push('\n');

        if !file_doc.functions.is_empty() {
            out.push_str("\n**Functions**\n\n");
            for function in &file_doc.functions {
                let params: Vec<&str> = function
                    .parameters
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect();
                out.push_str(&format!(
                    "- `{}({})` - {}\n",
                    function.name,
                    params.join(", "),
                    function.description
                ));
            }
        }

        if !file_doc.classes.is_empty() {
            out.push_str("\n**Classes**\n\n");
            for class in &file_doc.classes {
                out.push_str(&format!("- `{}` - {}\n", class.name, class.description));
            }
        }

        if !file_doc.dependencies.is_empty() {
            out.push_str(&format!(
                "\n**Dependencies**: {}\n",
                file_doc.dependencies.join(", ")
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CodeQualityScores, FileDocumentation, Importance, QualityMetrics,
    };

    fn sample() -> (ProjectDocumentation, ProjectContext) {
        let mut documentation = ProjectDocumentation {
            overview: "What it does.".to_string(),
            architecture: "How it is built.".to_string(),
            getting_started: "npm install".to_string(),
            api_reference: "### `/api/users`".to_string(),
            project_structure: "src/\n  main.ts".to_string(),
            key_components: "- main.ts".to_string(),
            usage_examples: "call foo()".to_string(),
            metrics: Some(QualityMetrics {
                complexity: "Medium".to_string(),
                maintainability: "Good".to_string(),
                test_coverage: "No test files detected".to_string(),
                performance: "0 of 1 files".to_string(),
            }),
            ..Default::default()
        };
        documentation.file_docs.insert(
            "src/main.ts".to_string(),
            FileDocumentation {
                summary: "Entry point".to_string(),
                purpose: "Entry point".to_string(),
                importance: Importance::Critical,
                quality: CodeQualityScores::from_complexity(6),
                dependencies: vec!["react".to_string()],
                ..Default::default()
            },
        );

        let context = ProjectContext {
            name: "demo".to_string(),
            description: Some("A demo app".to_string()),
            language: "TypeScript".to_string(),
            ..Default::default()
        };
        (documentation, context)
    }

    #[test]
    fn test_render_contains_all_sections() {
        let (documentation, context) = sample();
        let markdown = to_markdown(&documentation, &context);

        assert!(markdown.contains("# demo Documentation"));
        assert!(markdown.contains("## Overview"));
        assert!(markdown.contains("## Architecture"));
        assert!(markdown.contains("## Getting Started"));
        assert!(markdown.contains("## Project Structure"));
        assert!(markdown.contains("## Quality Metrics"));
        assert!(markdown.contains("### `src/main.ts`"));
        assert!(markdown.contains("**Dependencies**: react"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let (documentation, context) = sample();
        assert_eq!(
            to_markdown(&documentation, &context),
            to_markdown(&documentation, &context)
        );
    }
}
