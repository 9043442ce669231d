//! End-to-end pipeline: parse, resolve, merge, report

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::config::CombinerConfig;
use crate::error::Result;
use crate::numbers::ItemNumber;
use crate::output::{ensure_parent_dir, resolve_output_path};
use crate::pdf::Merger;
use crate::plan::{plan_with_progress, MergePlan, Progress};

/// Everything needed for one combine run
#[derive(Debug, Clone)]
pub struct CombineRequest {
    /// Source and output directories
    pub config: CombinerConfig,
    /// Raw hymn number text, e.g. `"1-3, 8"`
    pub numbers: String,
    /// Output file name or absolute path
    pub output_name: String,
}

/// Whether every requested number made it into the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every number had at least one file
    Complete,
    /// Merged, but these numbers had no files
    PartialMiss(Vec<ItemNumber>),
}

/// Summary of a finished combine run
#[derive(Debug, Clone)]
pub struct CombineReport {
    /// Where the merged PDF was written
    pub output_path: PathBuf,
    /// Numbers parsed from the input, duplicates included
    pub numbers_processed: usize,
    /// Files appended to the output
    pub files_merged: usize,
    /// Numbers with no files, in input order
    pub missing: Vec<ItemNumber>,
    /// Size of the written file
    pub output_bytes: u64,
}

impl CombineReport {
    /// Complete, or a partial miss carrying the numbers with no files
    pub fn outcome(&self) -> Outcome {
        if self.missing.is_empty() {
            Outcome::Complete
        } else {
            Outcome::PartialMiss(self.missing.clone())
        }
    }
}

/// Resolve the request's numbers and merge the files into one PDF
///
/// Nothing is written unless at least one file was found. A run with some
/// missing numbers still merges and reports them through
/// [`CombineReport::outcome`].
pub fn combine<F>(request: &CombineRequest, merger: &dyn Merger, on_progress: F) -> Result<CombineReport>
where
    F: FnMut(&Progress),
{
    let MergePlan {
        numbers,
        files,
        missing,
    } = plan_with_progress(&request.config.pdf_dir, &request.numbers, on_progress)?;

    let output_path = resolve_output_path(&request.config.output_dir, &request.output_name)?;

    let inputs: Vec<PathBuf> = files.into_iter().map(|f| f.path).collect();

    ensure_parent_dir(&output_path)?;
    merger.merge(&inputs, &output_path)?;

    let output_bytes = fs::metadata(&output_path)?.len();

    info!(
        output = %output_path.display(),
        files = inputs.len(),
        missing = missing.len(),
        "combined hymn PDFs"
    );

    Ok(CombineReport {
        output_path,
        numbers_processed: numbers.len(),
        files_merged: inputs.len(),
        missing,
        output_bytes,
    })
}
