//! Error types for the hymn combiner library

use std::path::PathBuf;
use thiserror::Error;

use crate::numbers::ItemNumber;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the hymn combiner library
#[derive(Error, Debug)]
pub enum Error {
    /// The input text contained no usable hymn numbers
    #[error("No valid hymn numbers found. Enter numbers like: 1 2 3, 1-5, or 1-3,8,10-12")]
    NoValidNumbers,

    /// Every requested number failed to resolve to a file
    #[error("No PDF files found for the provided hymn numbers. Missing: {}", format_numbers(.missing))]
    NoFilesFound { missing: Vec<ItemNumber> },

    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An input PDF could not be parsed
    #[error("Unreadable PDF {}: {source}", .path.display())]
    UnreadablePdf {
        path: PathBuf,
        source: lopdf::Error,
    },

    /// The merged document could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// Output filename was blank
    #[error("Please enter an output filename")]
    EmptyOutputName,

    /// A merge backend is not available on this system
    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    /// General error
    #[error("{0}")]
    General(String),
}

/// Coarse error categories a caller can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoValidNumbers,
    NoFilesFound,
    MergeFailure,
    MissingDependency,
    InvalidOutput,
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoValidNumbers => ErrorKind::NoValidNumbers,
            Error::NoFilesFound { .. } => ErrorKind::NoFilesFound,
            Error::MissingDependency(_) => ErrorKind::MissingDependency,
            Error::EmptyOutputName => ErrorKind::InvalidOutput,
            Error::Pdf(_)
            | Error::Io(_)
            | Error::UnreadablePdf { .. }
            | Error::OutputWrite { .. }
            | Error::FileNotFound(_)
            | Error::EmptyPdf(_)
            | Error::General(_) => ErrorKind::MergeFailure,
        }
    }

    /// Numbers that could not be resolved, if this error carries them
    pub fn missing(&self) -> Option<&[ItemNumber]> {
        match self {
            Error::NoFilesFound { missing } => Some(missing.as_slice()),
            _ => None,
        }
    }
}

/// Render numbers as a comma separated list, e.g. `2, 5, 9`
pub fn format_numbers(numbers: &[ItemNumber]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
