//! File Classifier
//!
//! Assigns a category to each source file from path patterns alone.
//! Pure and total: every path maps to exactly one category, no I/O, no
//! failure mode. Categories drive analysis priority through a fixed
//! weight table.

use serde::{Deserialize, Serialize};

/// Classification label driving analysis priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// Entry points and application shells
    Core,
    /// Route handlers and API surface
    Api,
    /// UI components
    Components,
    /// Configuration and manifests
    Config,
    /// Utilities, helpers, shared libraries
    Utils,
    /// Everything else
    Other,
}

impl FileCategory {
    /// Fixed priority weight; higher analyzes earlier
    pub fn weight(&self) -> u32 {
        match self {
            FileCategory::Core => 100,
            FileCategory::Api => 80,
            FileCategory::Components => 60,
            FileCategory::Utils => 40,
            FileCategory::Config => 20,
            FileCategory::Other => 10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Core => "core",
            FileCategory::Api => "api",
            FileCategory::Components => "components",
            FileCategory::Config => "config",
            FileCategory::Utils => "utils",
            FileCategory::Other => "other",
        }
    }
}

/// Classify a file by its repository path.
///
/// Case-insensitive substring matching; first match wins, evaluated
/// core → api → components → config → utils.
pub fn classify(path: &str) -> FileCategory {
    let path = path.to_lowercase();

    if path.contains("main.") || path.contains("index.") || path.contains("app.") {
        return FileCategory::Core;
    }
    if path.contains("/api/") || path.contains("/routes/") || path.contains("route.") {
        return FileCategory::Api;
    }
    if path.contains("/components/") || path.contains("/ui/") {
        return FileCategory::Components;
    }
    if path.contains("config") || path.contains(".json") || path.contains(".yaml") {
        return FileCategory::Config;
    }
    if path.contains("/utils/") || path.contains("/lib/") || path.contains("/helpers/") {
        return FileCategory::Utils;
    }

    FileCategory::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_patterns() {
        assert_eq!(classify("src/main.rs"), FileCategory::Core);
        assert_eq!(classify("src/index.ts"), FileCategory::Core);
        assert_eq!(classify("src/app.tsx"), FileCategory::Core);
        assert_eq!(classify("SRC/MAIN.RS"), FileCategory::Core);
    }

    #[test]
    fn test_api_patterns() {
        assert_eq!(classify("src/api/users.ts"), FileCategory::Api);
        assert_eq!(classify("server/routes/auth.js"), FileCategory::Api);
        assert_eq!(classify("pages/users/route.ts"), FileCategory::Api);
    }

    #[test]
    fn test_components_patterns() {
        assert_eq!(classify("src/components/Button.tsx"), FileCategory::Components);
        assert_eq!(classify("src/ui/Modal.tsx"), FileCategory::Components);
    }

    #[test]
    fn test_config_patterns() {
        assert_eq!(classify("tsconfig.json"), FileCategory::Config);
        assert_eq!(classify("deploy/settings.yaml"), FileCategory::Config);
        assert_eq!(classify("src/config/db.ts"), FileCategory::Config);
    }

    #[test]
    fn test_utils_patterns() {
        assert_eq!(classify("src/utils/format.ts"), FileCategory::Utils);
        assert_eq!(classify("src/lib/fetch.ts"), FileCategory::Utils);
        assert_eq!(classify("src/helpers/date.ts"), FileCategory::Utils);
    }

    #[test]
    fn test_other_fallback() {
        assert_eq!(classify("README.md"), FileCategory::Other);
        assert_eq!(classify("src/server.ts"), FileCategory::Other);
    }

    #[test]
    fn test_precedence_core_over_api() {
        // "index." matches before "/api/"
        assert_eq!(classify("src/api/index.ts"), FileCategory::Core);
    }

    #[test]
    fn test_precedence_api_over_config() {
        // "/api/" matches before ".json"
        assert_eq!(classify("src/api/schema.json"), FileCategory::Api);
    }

    #[test]
    fn test_weight_table() {
        assert_eq!(FileCategory::Core.weight(), 100);
        assert_eq!(FileCategory::Api.weight(), 80);
        assert_eq!(FileCategory::Components.weight(), 60);
        assert_eq!(FileCategory::Utils.weight(), 40);
        assert_eq!(FileCategory::Config.weight(), 20);
        assert_eq!(FileCategory::Other.weight(), 10);
    }
}
