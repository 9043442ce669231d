//! Locating the PDF files that belong to a hymn number
//!
//! A hymn is stored either as a single `N.pdf` or as one or more
//! `N_<anything>.pdf` files. Multi-part scans carry a `_PAGE<n>` marker in
//! the file stem, which decides their order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use glob::{glob_with, MatchOptions, Pattern};
use regex::Regex;
use tracing::{debug, warn};

use crate::numbers::ItemNumber;

static PAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)_PAGE([0-9]+)").expect("page marker pattern is valid"));

const CASE_INSENSITIVE: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A PDF file on disk that belongs to a hymn number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Hymn number this file was resolved for
    pub number: ItemNumber,
    /// Full path to the file
    pub path: PathBuf,
    /// Page index from a `_PAGE<n>` marker, 0 when the name has none
    pub page: u64,
}

impl CandidateFile {
    fn new(number: ItemNumber, path: PathBuf) -> Self {
        let page = path
            .file_stem()
            .map(|stem| page_index(&stem.to_string_lossy()))
            .unwrap_or(0);
        Self { number, path, page }
    }

    /// File name component, lossily converted for display
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn sort_key(&self) -> (u64, String, String) {
        let name = self.file_name();
        (self.page, name.to_lowercase(), name)
    }
}

/// Extract the page index from a file stem, e.g. `12_PAGE3` → 3
///
/// Returns 0 when there is no marker. An index too large to represent sorts last.
pub fn page_index(stem: &str) -> u64 {
    PAGE_MARKER
        .captures(stem)
        .map(|caps| caps[1].parse().unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Find all PDF files for a hymn number in `dir`
///
/// Matches `N.pdf` and `N_*.pdf` (extension case-insensitive), validated
/// against `^N(?:\.|_).+\.pdf$` so that `1` never picks up `12_intro.pdf`.
/// Results are ordered by page marker, then by lowercased file name.
///
/// A missing directory yields an empty list, as does a number with no files.
///
/// # Example
///
/// ```no_run
/// use hymn_combiner::resolve::resolve_item;
/// use std::path::Path;
///
/// for file in resolve_item(Path::new("pdf"), 7) {
///     println!("{}", file.path.display());
/// }
/// ```
pub fn resolve_item(dir: &Path, number: ItemNumber) -> Vec<CandidateFile> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "source directory does not exist");
        return Vec::new();
    }

    let name_rule = match Regex::new(&format!(r"(?i)^{number}(?:\.|_).+\.pdf$")) {
        Ok(re) => re,
        Err(e) => {
            warn!(number, error = %e, "could not build file name pattern");
            return Vec::new();
        }
    };

    let base = Pattern::escape(&dir.to_string_lossy());
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut matches: Vec<CandidateFile> = Vec::new();

    // Bracket classes keep the extension a pattern, so glob lists the
    // directory instead of probing one exact-case path.
    for path in glob_paths(&format!("{base}/{number}.[p][d][f]")) {
        if seen.insert(path.clone()) {
            matches.push(CandidateFile::new(number, path));
        }
    }

    for path in glob_paths(&format!("{base}/{number}_*.pdf")) {
        let accepted = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name_rule.is_match(name));

        if accepted && seen.insert(path.clone()) {
            matches.push(CandidateFile::new(number, path));
        }
    }

    matches.sort_by_cached_key(CandidateFile::sort_key);

    debug!(number, found = matches.len(), "resolved hymn files");
    matches
}

/// Expand a glob pattern case-insensitively, keeping only regular files
fn glob_paths(pattern: &str) -> Vec<PathBuf> {
    let entries = match glob_with(pattern, CASE_INSENSITIVE) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(pattern, error = %e, "invalid glob pattern");
            return Vec::new();
        }
    };

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => warn!(pattern, error = %e, "skipping unreadable entry"),
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, names: &[&str]) {
        for name in names {
            fs::write(dir.path().join(name), b"%PDF-1.5\n").expect("Failed to write file");
        }
    }

    fn names(files: &[CandidateFile]) -> Vec<String> {
        files.iter().map(CandidateFile::file_name).collect()
    }

    #[test]
    fn test_page_index() {
        assert_eq!(page_index("7_PAGE2"), 2);
        assert_eq!(page_index("7_page10_alto"), 10);
        assert_eq!(page_index("7_intro"), 0);
        assert_eq!(page_index("7"), 0);
        assert_eq!(page_index("7_PAGE"), 0);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let files = resolve_item(Path::new("definitely/not/here"), 1);
        assert!(files.is_empty());
    }

    #[test]
    fn test_exact_match() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        touch(&dir, &["5.pdf", "6.pdf"]);

        let files = resolve_item(dir.path(), 5);
        assert_eq!(names(&files), vec!["5.pdf"]);
        assert_eq!(files[0].number, 5);
        assert_eq!(files[0].page, 0);
    }

    #[test]
    fn test_excludes_prefix_collisions() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        touch(&dir, &["1.pdf", "12_intro.pdf", "12.pdf", "1x.pdf"]);

        let files = resolve_item(dir.path(), 1);
        assert_eq!(names(&files), vec!["1.pdf"]);
    }

    #[test]
    fn test_page_ordering() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        touch(&dir, &["7_PAGE2.pdf", "7_PAGE1.pdf", "7_PAGE10.pdf"]);

        let files = resolve_item(dir.path(), 7);
        assert_eq!(
            names(&files),
            vec!["7_PAGE1.pdf", "7_PAGE2.pdf", "7_PAGE10.pdf"]
        );
    }

    #[test]
    fn test_alphabetical_fallback() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        touch(&dir, &["7_b.pdf", "7_A.pdf"]);

        let files = resolve_item(dir.path(), 7);
        assert_eq!(names(&files), vec!["7_A.pdf", "7_b.pdf"]);
    }

    #[test]
    fn test_unmarked_files_come_before_paged_files() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        touch(&dir, &["3_PAGE1.pdf", "3.pdf", "3_cover.pdf"]);

        let files = resolve_item(dir.path(), 3);
        assert_eq!(names(&files), vec!["3.pdf", "3_cover.pdf", "3_PAGE1.pdf"]);
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        touch(&dir, &["9.PDF", "9_PAGE2.Pdf", "9_notes.txt"]);

        let files = resolve_item(dir.path(), 9);
        assert_eq!(names(&files), vec!["9.PDF", "9_PAGE2.Pdf"]);
    }

    #[test]
    fn test_separator_needs_trailing_text() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        touch(&dir, &["4_.pdf"]);

        assert!(resolve_item(dir.path(), 4).is_empty());
    }

    #[test]
    fn test_directories_are_ignored() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(dir.path().join("8_old.pdf")).expect("Failed to create dir");

        assert!(resolve_item(dir.path(), 8).is_empty());
    }
}
