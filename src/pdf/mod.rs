//! PDF manipulation module

pub mod merge;
pub mod metadata;

// Re-export commonly used items
pub use merge::{merge_pdfs, LopdfMerger, Merger};
pub use metadata::count_pages;
