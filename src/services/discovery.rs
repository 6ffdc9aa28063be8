// File Discovery Service
// Recursively enumerates analyzable files under a root folder

use crate::models::DocumentSource;
use crate::services::document_reader::extension_of;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["txt", "docx", "pdf"];

/// Files under `root` whose extension is in `extensions`. Within a directory,
/// files come first in name order, then each subdirectory in name order, so
/// repeated runs enumerate identically.
///
/// Unreadable directory entries are skipped. A missing root yields nothing.
pub fn discover_files(root: &Path, extensions: &[String]) -> Vec<DocumentSource> {
    let wanted: Vec<String> = extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect();

    WalkDir::new(root)
        .follow_links(false)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let ext = extension_of(e.path());
            !ext.is_empty() && wanted.contains(&ext)
        })
        .map(|e| {
            debug!(path = %e.path().display(), "discovery.match");
            DocumentSource::new(e.into_path())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_discovers_files_before_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b_sub")).unwrap();
        fs::write(root.join("c.txt"), "c").unwrap();
        fs::write(root.join("a.TXT"), "a").unwrap();
        fs::write(root.join("b_sub").join("inner.docx"), "x").unwrap();
        fs::write(root.join("ignored.md"), "m").unwrap();

        let found = discover_files(root, &exts(&["txt", ".docx"]));
        let names: Vec<&str> = found.iter().map(|s| s.display_name.as_str()).collect();
        assert_eq!(names, vec!["a.TXT", "c.txt", "inner.docx"]);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let found = discover_files(&dir.path().join("absent"), &exts(&["txt"]));
        assert!(found.is_empty());
    }
}
