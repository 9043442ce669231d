//! Building the ordered list of files to merge
//!
//! A plan is computed fresh on every call: the input text is parsed once,
//! each number is resolved against the source directory in input order,
//! and the hits are flattened into one list.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::numbers::{parse_item_numbers_verbose, ItemNumber};
use crate::resolve::{resolve_item, CandidateFile};

/// Progress notification sent after each number is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Numbers resolved so far, including this one
    pub done: usize,
    /// Total numbers to resolve
    pub total: usize,
    /// The number that was just resolved
    pub number: ItemNumber,
    /// How many files were found for it
    pub files_found: usize,
}

/// The ordered files to merge plus the numbers that had no files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Parsed numbers in input order
    pub numbers: Vec<ItemNumber>,
    /// Files in merge order
    pub files: Vec<CandidateFile>,
    /// Numbers for which no file was found, in input order
    pub missing: Vec<ItemNumber>,
}

impl MergePlan {
    /// Paths of all files in merge order
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }

    /// True when some numbers were missing but files were still found
    pub fn is_partial(&self) -> bool {
        !self.missing.is_empty()
    }

    /// The missing numbers, if this is a partial success
    pub fn partial_miss(&self) -> Option<&[ItemNumber]> {
        if self.is_partial() {
            Some(self.missing.as_slice())
        } else {
            None
        }
    }
}

/// Parse `raw` and resolve every number against `dir`
///
/// # Errors
///
/// - [`Error::NoValidNumbers`] if the text contains no numbers or ranges
/// - [`Error::NoFilesFound`] if none of the numbers has a file
///
/// # Example
///
/// ```no_run
/// use hymn_combiner::plan::plan;
/// use std::path::Path;
///
/// let plan = plan(Path::new("pdf"), "1-3, 8").expect("nothing to merge");
/// if let Some(missing) = plan.partial_miss() {
///     eprintln!("Missing: {:?}", missing);
/// }
/// ```
pub fn plan(dir: &Path, raw: &str) -> Result<MergePlan> {
    plan_with_progress(dir, raw, |_| {})
}

/// Same as [`plan`], calling `on_progress` after each number is resolved
pub fn plan_with_progress<F>(dir: &Path, raw: &str, mut on_progress: F) -> Result<MergePlan>
where
    F: FnMut(&Progress),
{
    let parsed = parse_item_numbers_verbose(raw);
    for token in &parsed.rejected {
        warn!(token = %token, "ignoring token that is not a number or range");
    }

    let numbers = parsed.numbers;
    if numbers.is_empty() {
        return Err(Error::NoValidNumbers);
    }

    let total = numbers.len();
    let mut files = Vec::new();
    let mut missing = Vec::new();

    for (i, &number) in numbers.iter().enumerate() {
        let found = resolve_item(dir, number);
        let files_found = found.len();

        if found.is_empty() {
            missing.push(number);
        } else {
            files.extend(found);
        }

        on_progress(&Progress {
            done: i + 1,
            total,
            number,
            files_found,
        });
    }

    if files.is_empty() {
        return Err(Error::NoFilesFound { missing });
    }

    debug!(
        numbers = total,
        files = files.len(),
        missing = missing.len(),
        "merge plan ready"
    );

    Ok(MergePlan {
        numbers,
        files,
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn source_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp directory");
        for name in names {
            fs::write(dir.path().join(name), b"%PDF-1.5\n").expect("Failed to write file");
        }
        dir
    }

    fn file_names(plan: &MergePlan) -> Vec<String> {
        plan.files.iter().map(CandidateFile::file_name).collect()
    }

    #[test]
    fn test_no_valid_numbers() {
        let dir = source_dir(&["1.pdf"]);
        let err = plan(dir.path(), "abc, -").unwrap_err();
        assert!(matches!(err, Error::NoValidNumbers));
    }

    #[test]
    fn test_partial_success() {
        let dir = source_dir(&["1.pdf", "3_PAGE2.pdf", "3_PAGE1.pdf"]);

        let plan = plan(dir.path(), "1-3").expect("plan should succeed");
        assert_eq!(plan.numbers, vec![1, 2, 3]);
        assert_eq!(file_names(&plan), vec!["1.pdf", "3_PAGE1.pdf", "3_PAGE2.pdf"]);
        assert_eq!(plan.missing, vec![2]);
        assert!(plan.is_partial());
        assert_eq!(plan.partial_miss(), Some(&[2][..]));
    }

    #[test]
    fn test_all_missing() {
        let dir = source_dir(&[]);
        let err = plan(dir.path(), "9 10").unwrap_err();
        match err {
            Error::NoFilesFound { missing } => assert_eq!(missing, vec![9, 10]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_directory_reports_all_missing() {
        let err = plan(Path::new("no/such/source"), "4").unwrap_err();
        assert_eq!(err.missing(), Some(&[4][..]));
    }

    #[test]
    fn test_duplicates_resolved_independently() {
        let dir = source_dir(&["2.pdf", "5.pdf"]);

        let plan = plan(dir.path(), "5 2 5").expect("plan should succeed");
        assert_eq!(file_names(&plan), vec!["5.pdf", "2.pdf", "5.pdf"]);
        assert!(!plan.is_partial());
        assert_eq!(plan.partial_miss(), None);
    }

    #[test]
    fn test_follows_descending_order() {
        let dir = source_dir(&["1.pdf", "2.pdf", "3.pdf"]);

        let plan = plan(dir.path(), "3-1").expect("plan should succeed");
        assert_eq!(file_names(&plan), vec!["3.pdf", "2.pdf", "1.pdf"]);
    }

    #[test]
    fn test_progress_reported_per_number() {
        let dir = source_dir(&["1.pdf", "1_PAGE2.pdf"]);
        let mut seen = Vec::new();

        plan_with_progress(dir.path(), "1 2", |p| seen.push(*p)).expect("plan should succeed");

        assert_eq!(
            seen,
            vec![
                Progress { done: 1, total: 2, number: 1, files_found: 2 },
                Progress { done: 2, total: 2, number: 2, files_found: 0 },
            ]
        );
    }

    #[test]
    fn test_idempotent() {
        let dir = source_dir(&["1.pdf", "3_a.pdf", "3_b.pdf"]);

        let first = plan(dir.path(), "1-3").expect("plan should succeed");
        let second = plan(dir.path(), "1-3").expect("plan should succeed");
        assert_eq!(first, second);
    }
}
