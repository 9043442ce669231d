//! Hymn Combiner Library
//!
//! Combines per-hymn PDF files into one document. This library provides
//! functionality to:
//! - Parse flexible hymn number input (`1 2 3`, `1-5`, `1-3,8,10-12`)
//! - Find the PDF files for each number (`N.pdf`, `N_*.pdf`, `_PAGE<n>` ordering)
//! - Build an ordered merge plan and report missing numbers
//! - Merge the files into a single PDF
//!
//! # Example
//!
//! ```no_run
//! use hymn_combiner::combine::{combine, CombineRequest};
//! use hymn_combiner::config::CombinerConfig;
//! use hymn_combiner::pdf::LopdfMerger;
//!
//! let request = CombineRequest {
//!     config: CombinerConfig::default(),
//!     numbers: "1-3, 8".to_string(),
//!     output_name: "sunday".to_string(),
//! };
//!
//! let report = combine(&request, &LopdfMerger, |_| {}).expect("Failed to combine");
//! println!("Saved to {}", report.output_path.display());
//! ```

pub mod combine;
pub mod config;
pub mod error;
pub mod numbers;
pub mod output;
pub mod pdf;
pub mod plan;
pub mod resolve;

// Re-export commonly used items
pub use error::{Error, ErrorKind, Result};
pub use numbers::{parse_item_numbers, ItemNumber};
pub use plan::{plan, MergePlan};
pub use resolve::{resolve_item, CandidateFile};
