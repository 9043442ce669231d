//! Directory and naming defaults

use std::path::PathBuf;

/// Environment variable that overrides the PDF source directory
pub const PDF_DIR_ENV: &str = "HYMN_PDF_DIR";

/// Environment variable that overrides the output directory
pub const OUTPUT_DIR_ENV: &str = "HYMN_OUTPUT_DIR";

/// Default name for the merged document
pub const DEFAULT_OUTPUT_NAME: &str = "combined.pdf";

/// Where hymn PDFs are read from and where merged output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinerConfig {
    /// Directory holding `N.pdf` / `N_*.pdf` files
    pub pdf_dir: PathBuf,
    /// Directory relative output names are written into
    pub output_dir: PathBuf,
}

impl Default for CombinerConfig {
    fn default() -> Self {
        Self {
            pdf_dir: PathBuf::from("pdf"),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl CombinerConfig {
    /// Build a config, falling back to the defaults for anything not given
    pub fn new(pdf_dir: Option<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        let defaults = Self::default();
        Self {
            pdf_dir: pdf_dir.unwrap_or(defaults.pdf_dir),
            output_dir: output_dir.unwrap_or(defaults.output_dir),
        }
    }
}
