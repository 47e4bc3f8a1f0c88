//! Documentation Compiler
//!
//! Turns the collected per-file analyses into one `ProjectDocumentation`.
//! Only two completion calls happen here - the overview and architecture
//! syntheses, run concurrently - everything else is derived
//! deterministically from the analyses. This is the cost-reduction core:
//! per-file prompts already ran, so document sections reuse their output
//! instead of re-reading the codebase.
//!
//! A failed synthesis call never aborts compilation; a templated sentence
//! built from the project context takes its place.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::{debug, warn};

use crate::ai::{CompletionOptions, SharedCompletionService, with_timeout};
use crate::constants::completion;
use crate::types::{
    CodeQualityScores, DocumentationHighlights, FileAnalysis, FileDocumentation, FunctionComplexity,
    Importance, ProjectContext, ProjectDocumentation, QualityMetrics,
};

use super::progress::{ProgressKind, ProgressReporter};
use super::prompts::{build_architecture_prompt, build_overview_prompt};
use super::scheduler::ProgressBand;

/// Files listed in the key-components section
const KEY_COMPONENTS_LIMIT: usize = 5;

/// Functions listed in the usage-examples section
const USAGE_EXAMPLES_LIMIT: usize = 4;

/// Compiler tuning knobs
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Output token ceiling per synthesis call
    pub synthesis_max_tokens: usize,
    /// Analyses fed into one synthesis prompt at most
    pub synthesis_max_analyses: usize,
    /// Deadline for one synthesis call
    pub call_timeout: Duration,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            synthesis_max_tokens: completion::SYNTHESIS_MAX_TOKENS,
            synthesis_max_analyses: completion::SYNTHESIS_MAX_ANALYSES,
            call_timeout: Duration::from_secs(completion::CALL_TIMEOUT_SECS),
        }
    }
}

/// Compiles analyses into the aggregate document
pub struct DocumentationCompiler {
    service: SharedCompletionService,
    options: CompilerOptions,
}

impl DocumentationCompiler {
    pub fn new(service: SharedCompletionService, options: CompilerOptions) -> Self {
        Self { service, options }
    }

    /// Compile the aggregate document. Infallible: synthesis failures fall
    /// back to templated text, derived sections are pure functions.
    pub async fn compile(
        &self,
        analyses: &[FileAnalysis],
        context: &ProjectContext,
        reporter: &ProgressReporter,
        band: ProgressBand,
    ) -> ProjectDocumentation {
        reporter.emit(
            ProgressKind::Compiling,
            band.start,
            "Compiling documentation sections",
        );

        let overview_input = self.tier_digest(analyses, Importance::Critical);
        let architecture_input = self.tier_digest(analyses, Importance::High);

        // The two synthesis calls run concurrently with each other
        let (overview, architecture) = tokio::join!(
            self.synthesize_overview(context, &overview_input),
            self.synthesize_architecture(context, &architecture_input),
        );

        reporter.emit(
            ProgressKind::Compiling,
            band.at(2, 3),
            "Deriving structural sections",
        );

        let doc = ProjectDocumentation {
            overview,
            architecture,
            getting_started: getting_started(context),
            api_reference: api_reference(analyses),
            project_structure: project_structure(analyses),
            key_components: key_components(analyses),
            usage_examples: usage_examples(analyses),
            highlights: Some(derive_highlights(context, analyses)),
            metrics: Some(derive_metrics(analyses)),
            file_docs: file_docs(analyses),
        };

        reporter.emit(
            ProgressKind::Compiling,
            band.end,
            "Documentation sections compiled",
        );

        doc
    }

    /// Analyses of the given tier, falling back to the highest tiers
    /// present when the requested one is empty
    fn tier_digest<'a>(
        &self,
        analyses: &'a [FileAnalysis],
        tier: Importance,
    ) -> Vec<&'a FileAnalysis> {
        let mut selected: Vec<&FileAnalysis> =
            analyses.iter().filter(|a| a.importance == tier).collect();

        if selected.is_empty() {
            selected = analyses.iter().collect();
            selected.sort_by_key(|a| std::cmp::Reverse(a.importance));
        }

        selected.truncate(self.options.synthesis_max_analyses);
        selected
    }

    async fn synthesize_overview(
        &self,
        context: &ProjectContext,
        analyses: &[&FileAnalysis],
    ) -> String {
        let prompt = build_overview_prompt(context, analyses);
        match self.synthesize(&prompt, "overview synthesis").await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Overview synthesis failed, using fallback");
                format!(
                    "{} is a {} codebase in {}. This documentation was generated \
                     from an automated analysis of its {} most significant files.",
                    context.name,
                    context.framework_label(),
                    context.language,
                    analyses.len()
                )
            }
        }
    }

    async fn synthesize_architecture(
        &self,
        context: &ProjectContext,
        analyses: &[&FileAnalysis],
    ) -> String {
        let prompt = build_architecture_prompt(context, analyses);
        match self.synthesize(&prompt, "architecture synthesis").await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Architecture synthesis failed, using fallback");
                format!(
                    "{} follows the conventions of a typical {} project. See the \
                     per-file documentation below for the role of each module.",
                    context.name,
                    context.framework_label()
                )
            }
        }
    }

    async fn synthesize(&self, prompt: &str, operation: &str) -> crate::types::Result<String> {
        let options = CompletionOptions::prose(self.options.synthesis_max_tokens);
        let text = with_timeout(
            self.options.call_timeout,
            self.service.complete(prompt, &options),
            operation,
        )
        .await?;
        debug!(operation, chars = text.len(), "Synthesis complete");
        Ok(text.trim().to_string())
    }
}

// =============================================================================
// Derived Sections (no completion calls)
// =============================================================================

/// API-file predicate shared by grouping and the API reference
fn is_api_path(path: &str) -> bool {
    let path = path.to_lowercase();
    path.contains("/api/") || path.contains("route.")
}

/// Setup commands from a fixed framework lookup table
fn getting_started(context: &ProjectContext) -> String {
    let commands = match context.framework.as_deref() {
        Some("Next.js") => "npm install\nnpm run dev",
        Some("React") | Some("Vue") | Some("Svelte") | Some("Angular") | Some("Nuxt") => {
            "npm install\nnpm start"
        }
        Some("Express") | Some("Node.js") => "npm install\nnode index.js",
        Some("Rust") => "cargo build\ncargo run",
        Some("Go") => "go mod download\ngo run .",
        Some("Python") => "pip install -r requirements.txt\npython main.py",
        Some("Java") => "mvn install\nmvn exec:java",
        Some("Ruby") => "bundle install\nbundle exec ruby main.rb",
        _ => "# Check the repository README for setup instructions",
    };

    format!(
        "Clone the repository, then from the project root:\n\n```\n{}\n```",
        commands
    )
}

/// API reference concatenated from API-tagged file analyses
fn api_reference(analyses: &[FileAnalysis]) -> String {
    let api_files: Vec<&FileAnalysis> = analyses
        .iter()
        .filter(|a| is_api_path(&a.file_path))
        .collect();

    if api_files.is_empty() {
        return "No API route files were detected in the analyzed set.".to_string();
    }

    let mut section = String::new();
    for analysis in api_files {
        section.push_str(&format!("### `{}`\n\n{}\n", analysis.file_path, analysis.summary));
        for function in &analysis.functions {
            let params: Vec<&str> = function
                .parameters
                .iter()
                .map(|p| p.name.as_str())
                .collect();
            section.push_str(&format!(
                "- `{}({})` - {}\n",
                function.name,
                params.join(", "),
                function.description
            ));
        }
        section.push('\n');
    }
    section.trim_end().to_string()
}

/// Directory tree rendering of the analyzed file paths
fn project_structure(analyses: &[FileAnalysis]) -> String {
    let mut by_dir: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for analysis in analyses {
        let (dir, name) = match analysis.file_path.rsplit_once('/') {
            Some((dir, name)) => (dir.to_string(), name.to_string()),
            None => (".".to_string(), analysis.file_path.clone()),
        };
        by_dir.entry(dir).or_default().push(name);
    }

    let mut tree = String::new();
    for (dir, mut names) in by_dir {
        names.sort();
        tree.push_str(&format!("{}/\n", dir));
        for name in names {
            tree.push_str(&format!("  {}\n", name));
        }
    }
    tree.trim_end().to_string()
}

/// Top critical/high files with their summaries
fn key_components(analyses: &[FileAnalysis]) -> String {
    let mut ranked: Vec<&FileAnalysis> = analyses.iter().collect();
    ranked.sort_by_key(|a| std::cmp::Reverse((a.importance, a.complexity)));

    let mut section = String::new();
    for analysis in ranked.into_iter().take(KEY_COMPONENTS_LIMIT) {
        section.push_str(&format!(
            "- **`{}`** ({}) - {}\n",
            analysis.file_path,
            analysis.importance.as_str(),
            analysis.summary
        ));
    }

    if section.is_empty() {
        section.push_str("No components were analyzed.");
    }
    section.trim_end().to_string()
}

/// Examples pulled from simple-complexity functions across all files
fn usage_examples(analyses: &[FileAnalysis]) -> String {
    let mut section = String::new();
    let mut shown = 0usize;

    for analysis in analyses {
        for function in &analysis.functions {
            if function.complexity != FunctionComplexity::Simple {
                continue;
            }
            let params: Vec<String> = function
                .parameters
                .iter()
                .map(|p| {
                    if p.param_type.is_empty() {
                        p.name.clone()
                    } else {
                        format!("{}: {}", p.name, p.param_type)
                    }
                })
                .collect();
            section.push_str(&format!(
                "### `{}({})`\n\nFrom `{}`. {}\n\n",
                function.name,
                params.join(", "),
                analysis.file_path,
                function.description
            ));
            shown += 1;
            if shown >= USAGE_EXAMPLES_LIMIT {
                return section.trim_end().to_string();
            }
        }
    }

    if section.is_empty() {
        return "No simple entry-point functions were identified for examples.".to_string();
    }
    section.trim_end().to_string()
}

/// Highlights derived from context plus aggregated analyses
fn derive_highlights(
    context: &ProjectContext,
    analyses: &[FileAnalysis],
) -> DocumentationHighlights {
    let mut ranked: Vec<&FileAnalysis> = analyses
        .iter()
        .filter(|a| a.importance >= Importance::High)
        .collect();
    ranked.sort_by_key(|a| std::cmp::Reverse(a.importance));

    let key_features: Vec<String> = ranked
        .iter()
        .take(4)
        .map(|a| a.summary.clone())
        .collect();

    let mut technologies: Vec<String> = Vec::new();
    technologies.push(context.language.clone());
    if let Some(ref framework) = context.framework {
        technologies.push(framework.clone());
    }
    for analysis in analyses {
        for dep in &analysis.dependencies {
            if technologies.len() >= 10 {
                break;
            }
            if !technologies.contains(dep) {
                technologies.push(dep.clone());
            }
        }
    }

    DocumentationHighlights {
        key_features,
        technologies,
        use_cases: vec![format!(
            "Understanding and onboarding onto the {} codebase",
            context.name
        )],
        benefits: vec![
            "Per-file documentation with importance and complexity ratings".to_string(),
            "Derived quality metrics across the analyzed set".to_string(),
        ],
    }
}

/// Aggregate metrics derived purely from the analyses
fn derive_metrics(analyses: &[FileAnalysis]) -> QualityMetrics {
    let total = analyses.len().max(1);
    let mean_complexity =
        analyses.iter().map(|a| a.complexity as f64).sum::<f64>() / total as f64;

    let complexity = if mean_complexity <= 4.0 {
        "Low"
    } else if mean_complexity <= 7.0 {
        "Medium"
    } else {
        "High"
    };

    // Maintainability from critical-tier files only; overall mean when none
    let critical: Vec<&FileAnalysis> = analyses
        .iter()
        .filter(|a| a.importance == Importance::Critical)
        .collect();
    let critical_mean = if critical.is_empty() {
        mean_complexity
    } else {
        critical.iter().map(|a| a.complexity as f64).sum::<f64>() / critical.len() as f64
    };
    let maintainability = if critical_mean <= 3.0 {
        "Excellent"
    } else if critical_mean <= 5.0 {
        "Good"
    } else if critical_mean <= 7.0 {
        "Fair"
    } else {
        "Needs Improvement"
    };

    let has_tests = analyses.iter().any(|a| {
        let path = a.file_path.to_lowercase();
        path.contains("test") || path.contains("spec") || path.contains("__tests__")
    });
    let test_coverage = if has_tests {
        "Test files detected in the analyzed set".to_string()
    } else {
        "No test files detected in the analyzed set".to_string()
    };

    let high_complexity = analyses.iter().filter(|a| a.complexity > 7).count();
    let performance = format!(
        "{} of {} analyzed files have high complexity (>7)",
        high_complexity,
        analyses.len()
    );

    QualityMetrics {
        complexity: complexity.to_string(),
        maintainability: maintainability.to_string(),
        test_coverage,
        performance,
    }
}

/// Direct projection of each analysis into the presentation shape
fn file_docs(analyses: &[FileAnalysis]) -> BTreeMap<String, FileDocumentation> {
    analyses
        .iter()
        .map(|analysis| {
            (
                analysis.file_path.clone(),
                FileDocumentation {
                    summary: analysis.summary.clone(),
                    purpose: analysis.summary.clone(),
                    importance: analysis.importance,
                    functions: analysis.functions.clone(),
                    classes: analysis.classes.clone(),
                    constants: analysis.constants.clone(),
                    dependencies: analysis.dependencies.clone(),
                    quality: CodeQualityScores::from_complexity(analysis.complexity),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::CompletionService;
    use crate::types::{FunctionInfo, ParameterInfo, Result};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct ProseService {
        fail: bool,
    }

    #[async_trait]
    impl CompletionService for ProseService {
        async fn complete(&self, prompt: &str, _options: &CompletionOptions) -> Result<String> {
            if self.fail {
                return Err(crate::types::DocuError::LlmApi("synthesis down".to_string()));
            }
            // Echo enough of the prompt to tell the two syntheses apart
            if prompt.contains("architecture") {
                Ok("Layered architecture narrative.".to_string())
            } else {
                Ok("Project overview prose.".to_string())
            }
        }

        fn name(&self) -> &str {
            "prose"
        }

        fn model(&self) -> &str {
            "prose"
        }
    }

    fn analysis(path: &str, importance: Importance, complexity: u8) -> FileAnalysis {
        FileAnalysis {
            file_path: path.to_string(),
            summary: format!("Summary of {}", path),
            importance,
            complexity,
            cache_key: "k".to_string(),
            ..Default::default()
        }
    }

    fn sample_analyses() -> Vec<FileAnalysis> {
        vec![
            analysis("src/main.ts", Importance::Critical, 7),
            analysis("src/api/users/route.ts", Importance::High, 5),
            analysis("src/utils/format.ts", Importance::Low, 2),
        ]
    }

    fn compiler(fail: bool) -> DocumentationCompiler {
        DocumentationCompiler::new(
            Arc::new(ProseService { fail }),
            CompilerOptions::default(),
        )
    }

    fn context() -> ProjectContext {
        ProjectContext {
            name: "demo".to_string(),
            framework: Some("Next.js".to_string()),
            language: "TypeScript".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_compile_full_document() {
        let doc = compiler(false)
            .compile(
                &sample_analyses(),
                &context(),
                &ProgressReporter::noop(),
                ProgressBand::new(70, 100),
            )
            .await;

        assert_eq!(doc.overview, "Project overview prose.");
        assert_eq!(doc.architecture, "Layered architecture narrative.");
        assert!(doc.getting_started.contains("npm run dev"));
        assert_eq!(doc.file_docs.len(), 3);
        assert!(doc.metrics.is_some());
        assert!(doc.highlights.is_some());
    }

    #[tokio::test]
    async fn test_synthesis_failure_uses_fallback() {
        let doc = compiler(true)
            .compile(
                &sample_analyses(),
                &context(),
                &ProgressReporter::noop(),
                ProgressBand::new(70, 100),
            )
            .await;

        // Complete document shape, degraded prose
        assert!(doc.overview.contains("demo"));
        assert!(doc.overview.contains("Next.js"));
        assert!(doc.architecture.contains("demo"));
        assert_eq!(doc.file_docs.len(), 3);
    }

    #[test]
    fn test_api_reference_filters_api_paths() {
        let reference = api_reference(&sample_analyses());
        assert!(reference.contains("src/api/users/route.ts"));
        assert!(!reference.contains("src/utils/format.ts"));
    }

    #[test]
    fn test_api_reference_empty_set() {
        let analyses = vec![analysis("src/utils/a.ts", Importance::Low, 2)];
        assert!(api_reference(&analyses).contains("No API route files"));
    }

    #[test]
    fn test_project_structure_groups_directories() {
        let tree = project_structure(&sample_analyses());
        assert!(tree.contains("src/\n  main.ts"));
        assert!(tree.contains("src/api/users/\n  route.ts"));
    }

    #[test]
    fn test_key_components_ranked_by_importance() {
        let section = key_components(&sample_analyses());
        let main_pos = section.find("src/main.ts").expect("main listed");
        let utils_pos = section.find("src/utils/format.ts").expect("utils listed");
        assert!(main_pos < utils_pos);
    }

    #[test]
    fn test_usage_examples_picks_simple_functions() {
        let mut analyses = sample_analyses();
        analyses[2].functions.push(FunctionInfo {
            name: "formatDate".to_string(),
            description: "Formats a date".to_string(),
            parameters: vec![ParameterInfo {
                name: "date".to_string(),
                param_type: "Date".to_string(),
                description: String::new(),
            }],
            complexity: FunctionComplexity::Simple,
            returns: None,
        });
        analyses[0].functions.push(FunctionInfo {
            name: "bootstrap".to_string(),
            complexity: FunctionComplexity::Complex,
            ..Default::default()
        });

        let section = usage_examples(&analyses);
        assert!(section.contains("formatDate(date: Date)"));
        assert!(!section.contains("bootstrap"));
    }

    #[test]
    fn test_metrics_buckets() {
        let metrics = derive_metrics(&sample_analyses());
        // mean = (7+5+2)/3 = 4.67 -> Medium
        assert_eq!(metrics.complexity, "Medium");
        // critical mean = 7 -> Fair
        assert_eq!(metrics.maintainability, "Fair");
        assert!(metrics.test_coverage.contains("No test files"));
        assert!(metrics.performance.contains("0 of 3"));
    }

    #[test]
    fn test_metrics_detects_tests() {
        let analyses = vec![analysis("src/__tests__/app.test.ts", Importance::Low, 2)];
        let metrics = derive_metrics(&analyses);
        assert!(metrics.test_coverage.contains("detected in the analyzed set"));
        assert!(!metrics.test_coverage.contains("No test"));
    }

    #[test]
    fn test_file_docs_projection() {
        let docs = file_docs(&sample_analyses());
        assert_eq!(docs.len(), 3);
        let main = &docs["src/main.ts"];
        assert_eq!(main.importance, Importance::Critical);
        // complexity 7 -> readability 7, maintainability 7
        assert_eq!(main.quality.readability, 7);
        assert_eq!(main.quality.maintainability, 7);
    }

    #[test]
    fn test_getting_started_lookup() {
        assert!(getting_started(&context()).contains("npm run dev"));

        let rust_ctx = ProjectContext {
            framework: Some("Rust".to_string()),
            ..Default::default()
        };
        assert!(getting_started(&rust_ctx).contains("cargo run"));

        let unknown_ctx = ProjectContext::default();
        assert!(getting_started(&unknown_ctx).contains("README"));
    }
}
