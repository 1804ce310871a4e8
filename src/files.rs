use std::collections::BTreeMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::warn;

use crate::error::RoproError;

/// Extensions Prokka must have produced for a report to be possible.
pub const REQUIRED_EXTENSIONS: [&str; 3] = ["txt", "tsv", "ffn"];

/// Regular files directly under the input directory, grouped by extension.
/// Built once per run; keys are lowercase extensions without the leading dot.
/// A filename with no dot groups under the empty-string pseudo-extension.
#[derive(Debug, Clone)]
pub struct AnnotationFiles {
    by_ext: BTreeMap<String, Vec<Utf8PathBuf>>,
}

impl AnnotationFiles {
    /// Pure query over the directory listing; subdirectories are ignored.
    pub fn scan(dir: &Utf8Path) -> Result<Self, RoproError> {
        let entries = fs::read_dir(dir.as_std_path())
            .map_err(|_| RoproError::NotADirectory(dir.to_path_buf()))?;

        let mut by_ext: BTreeMap<String, Vec<Utf8PathBuf>> = BTreeMap::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Ok(path) = Utf8PathBuf::from_path_buf(path) else {
                warn!("skipping non-utf8 path in input directory");
                continue;
            };
            let ext = path
                .file_name()
                .and_then(|name| name.rsplit_once('.'))
                .map(|(_, ext)| ext.to_ascii_lowercase())
                .unwrap_or_default();
            by_ext.entry(ext).or_default().push(path);
        }
        // read_dir order is platform-dependent; sort for deterministic output
        for paths in by_ext.values_mut() {
            paths.sort();
        }

        Ok(Self { by_ext })
    }

    /// First file recorded for `ext`, if any. Multiple files with the same
    /// extension are not merged; only the first is ever consumed.
    pub fn first(&self, ext: &str) -> Option<&Utf8Path> {
        self.by_ext
            .get(ext)
            .and_then(|paths| paths.first())
            .map(Utf8PathBuf::as_path)
    }

    /// Required extensions with no file present, in declaration order.
    pub fn missing(&self) -> Vec<&'static str> {
        REQUIRED_EXTENSIONS
            .into_iter()
            .filter(|ext| !self.by_ext.contains_key(*ext))
            .collect()
    }

    pub fn is_satisfied(&self) -> bool {
        self.missing().is_empty()
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.by_ext.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &std::path::Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    fn scan(temp: &tempfile::TempDir) -> AnnotationFiles {
        let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        AnnotationFiles::scan(&dir).unwrap()
    }

    #[test]
    fn groups_by_lowercase_extension() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "sample.txt");
        touch(temp.path(), "sample.TSV");
        touch(temp.path(), "sample.ffn");

        let files = scan(&temp);
        assert!(files.is_satisfied());
        assert!(files.first("tsv").unwrap().ends_with("sample.TSV"));
    }

    #[test]
    fn reports_missing_required_extensions() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "sample.txt");
        touch(temp.path(), "sample.tsv");

        let files = scan(&temp);
        assert!(!files.is_satisfied());
        assert_eq!(files.missing(), vec!["ffn"]);
    }

    #[test]
    fn first_is_deterministic_for_duplicate_extensions() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "b.txt");
        touch(temp.path(), "a.txt");

        let files = scan(&temp);
        assert!(files.first("txt").unwrap().ends_with("a.txt"));
    }

    #[test]
    fn no_dot_filename_is_a_pseudo_extension() {
        let temp = tempfile::tempdir().unwrap();
        touch(temp.path(), "README");

        let files = scan(&temp);
        assert!(files.first("").unwrap().ends_with("README"));
        assert!(files.first("readme").is_none());
    }

    #[test]
    fn subdirectories_are_ignored() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("nested.txt")).unwrap();

        let files = scan(&temp);
        assert!(files.first("txt").is_none());
    }
}
