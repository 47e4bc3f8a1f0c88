//! File Prioritizer
//!
//! Orders files descending by category weight so the most informative
//! files are analyzed first (and survive the file cap). The sort is
//! stable by contract: ties keep relative input order, which keeps
//! documentation reproducible across repeated runs on unchanged input.

use std::cmp::Reverse;

use crate::types::SourceFile;

use super::classifier::classify;

/// Stable sort descending by the fixed category weight table
pub fn prioritize(mut files: Vec<SourceFile>) -> Vec<SourceFile> {
    // sort_by_key is a stable sort; Reverse flips to descending
    files.sort_by_key(|file| Reverse(classify(&file.path).weight()));
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(files: &[SourceFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_weight_ordering() {
        let files = vec![
            SourceFile::new("notes.md", ""),
            SourceFile::new("src/utils/format.ts", ""),
            SourceFile::new("src/api/users.ts", ""),
            SourceFile::new("src/main.ts", ""),
            SourceFile::new("src/components/Button.tsx", ""),
        ];

        let ordered = prioritize(files);
        assert_eq!(
            paths(&ordered),
            vec![
                "src/main.ts",
                "src/api/users.ts",
                "src/components/Button.tsx",
                "src/utils/format.ts",
                "notes.md",
            ]
        );
    }

    #[test]
    fn test_stability_within_category() {
        let files = vec![
            SourceFile::new("src/api/zebra.ts", ""),
            SourceFile::new("src/api/alpha.ts", ""),
            SourceFile::new("src/api/middle.ts", ""),
        ];

        let ordered = prioritize(files);
        // Equal weights keep input order, not alphabetical order
        assert_eq!(
            paths(&ordered),
            vec!["src/api/zebra.ts", "src/api/alpha.ts", "src/api/middle.ts"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(prioritize(Vec::new()).is_empty());
    }
}
