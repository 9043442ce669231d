//! Hymn Combiner CLI tool
//!
//! A command-line tool for combining numbered hymn PDFs into one document.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use hymn_combiner::combine::{combine, CombineRequest, Outcome};
use hymn_combiner::config::{CombinerConfig, DEFAULT_OUTPUT_NAME, OUTPUT_DIR_ENV, PDF_DIR_ENV};
use hymn_combiner::error::format_numbers;
use hymn_combiner::pdf::{count_pages, LopdfMerger};
use hymn_combiner::plan::{plan, Progress};

/// Hymn Combiner - Merge hymn PDFs by number
#[derive(Parser)]
#[command(name = "hymn-combiner")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Merge hymns 1, 2 and 3 into output/combined.pdf
    hymn-combiner combine 1 2 3

    # Ranges, descending ranges and mixed separators
    hymn-combiner combine \"1-3,8;12-10\" -o sunday

    # See which files would be merged without writing anything
    hymn-combiner list 1-5 --pdf-dir ~/hymns

FILE NAMES:
    Each hymn is N.pdf or N_<anything>.pdf. Multi-page scans use a
    _PAGE<n> marker (e.g. 12_PAGE1.pdf, 12_PAGE2.pdf) to set their order.")]
struct Cli {
    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Directory containing the hymn PDFs
    #[arg(long, env = PDF_DIR_ENV)]
    pdf_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the PDFs for the given hymn numbers into one file
    Combine {
        /// Hymn numbers: "1 2 3", "1-5", "1-3,8,10-12"
        #[arg(required = true)]
        numbers: Vec<String>,

        /// Output file name (placed in the output directory) or absolute path
        #[arg(short, long, default_value = DEFAULT_OUTPUT_NAME)]
        output: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Directory for merged output
        #[arg(long, env = OUTPUT_DIR_ENV)]
        output_dir: Option<PathBuf>,

        /// Open the output folder after creation
        #[arg(long)]
        open: bool,

        /// Don't print per-hymn progress
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show which files would be merged, without writing anything
    List {
        /// Hymn numbers: "1 2 3", "1-5", "1-3,8,10-12"
        #[arg(required = true)]
        numbers: Vec<String>,

        #[command(flatten)]
        source: SourceArgs,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Combine {
            numbers,
            output,
            source,
            output_dir,
            open,
            quiet,
        } => {
            let config = CombinerConfig::new(source.pdf_dir, output_dir);
            cmd_combine(config, numbers.join(" "), output, open, quiet)
        }
        Commands::List { numbers, source } => {
            let config = CombinerConfig::new(source.pdf_dir, None);
            cmd_list(&config, &numbers.join(" "))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "hymn_combiner=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Open a folder with the system file browser
fn open_folder(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("explorer").arg(path).spawn()?;
    }
    Ok(())
}

/// Try to open `folder`, printing a note instead of failing
fn reveal_folder<F>(folder: &Path, opener: F) -> bool
where
    F: FnOnce(&Path) -> Result<()>,
{
    match opener(folder) {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "could not open output folder");
            eprintln!(
                "Note: Could not open folder automatically. Please check: {}",
                folder.display()
            );
            false
        }
    }
}

/// Format a byte count with thousands separators, e.g. `1,234,567`
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn print_progress(progress: &Progress) {
    let status = match progress.files_found {
        0 => "missing".to_string(),
        1 => "1 file".to_string(),
        n => format!("{} files", n),
    };
    eprintln!(
        "[{}/{}] Hymn {}: {}",
        progress.done, progress.total, progress.number, status
    );
}

/// Merge the PDFs for the given numbers
fn cmd_combine(
    config: CombinerConfig,
    numbers: String,
    output: String,
    open: bool,
    quiet: bool,
) -> Result<()> {
    eprintln!("Looking for hymn PDFs in {}", config.pdf_dir.display());

    let request = CombineRequest {
        config,
        numbers,
        output_name: output,
    };

    let report = combine(&request, &LopdfMerger, |progress| {
        if !quiet {
            print_progress(progress);
        }
    })?;

    let saved_to = fs::canonicalize(&report.output_path).unwrap_or_else(|_| report.output_path.clone());

    eprintln!();
    eprintln!("PDF merged successfully!");
    eprintln!("Total hymns processed: {}", report.numbers_processed);
    eprintln!("Total PDF files merged: {}", report.files_merged);
    if let Ok(pages) = count_pages(&report.output_path) {
        eprintln!("Total pages: {}", pages);
    }
    eprintln!("Saved to: {}", saved_to.display());
    eprintln!("File size: {} bytes", group_thousands(report.output_bytes));

    if let Outcome::PartialMiss(missing) = report.outcome() {
        eprintln!();
        eprintln!("Note: Missing hymn PDFs: {}", format_numbers(&missing));
    }

    if open {
        if let Some(folder) = saved_to.parent() {
            reveal_folder(folder, open_folder);
        }
    }

    Ok(())
}

/// Print the merge order for the given numbers
fn cmd_list(config: &CombinerConfig, numbers: &str) -> Result<()> {
    let plan = plan(&config.pdf_dir, numbers)?;

    for file in &plan.files {
        println!("{:>4}  {}", file.number, file.path.display());
    }

    eprintln!(
        "{} file(s) for {} hymn number(s)",
        plan.files.len(),
        plan.numbers.len()
    );
    if let Some(missing) = plan.partial_miss() {
        eprintln!("Missing: {}", format_numbers(missing));
    }

    Ok(())
}
