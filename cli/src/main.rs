//! ntfs2xattr - Command-line interface for the creation-time copy engine.
//!
//! Copies a directory tree off an NTFS mount, preserving each file's NTFS
//! creation time in extended attributes, with progress reporting, an
//! optional narrative log, and post-copy verification.

use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};

use engine::{
    create_job, plan_job, run_job, verify_destination, CopyJob, CopyOutcome, ProgressCallback,
    ResultTable, RunLog,
};

/// Narrative log file, appended in the working directory unless disabled.
const LOG_FILE_NAME: &str = "ntfs2xattr.INFO.log";

/// ntfs2xattr - copy NTFS trees, preserving creation times in xattrs
#[derive(Parser, Debug)]
#[command(name = "ntfs2xattr")]
#[command(version = "0.1.0")]
#[command(about = "Copy a directory tree, preserving NTFS creation times in extended attributes")]
struct Args {
    /// Source directory on an NTFS mount
    #[arg(long, value_name = "PATH")]
    src: PathBuf,

    /// Destination directory (must not exist yet)
    #[arg(long, value_name = "PATH")]
    dest: PathBuf,

    /// Disable the narrative log file
    #[arg(long)]
    no_log: bool,

    /// Disable post-copy verification of the destination file count
    #[arg(long)]
    no_verify: bool,
}

/// Truncate a relative path so it fits next to a timestamp on one line.
///
/// Pure function of (text, terminal width, timestamp length); keeps the
/// tail of the path behind a "..." prefix, since the file name is the
/// interesting end.
fn truncate_filename(rel_path: &str, term_width: usize, ts_len: usize) -> String {
    let max_line_width = term_width.saturating_sub(20).max(20);
    let max_name_chars = max_line_width.saturating_sub(ts_len + 4);
    if max_name_chars == 0 {
        return "...".to_string();
    }
    let chars: Vec<char> = rel_path.chars().collect();
    if chars.len() <= max_name_chars {
        return rel_path.to_string();
    }
    if max_name_chars <= 3 {
        return ".".repeat(max_name_chars);
    }
    let tail_len = max_name_chars - 3;
    let tail: String = chars[chars.len() - tail_len..].iter().collect();
    format!("...{}", tail)
}

/// Render a `#`-bar with a trailing percentage, sized to the terminal.
fn render_bar(done: usize, total: usize, term_width: usize) -> String {
    let bar_width = term_width.saturating_sub(10).max(10);
    let progress = if total == 0 {
        1.0
    } else {
        (done as f64 / total as f64).min(1.0)
    };
    let filled = (bar_width as f64 * progress) as usize;
    let percent = (progress * 100.0) as usize;
    format!(
        "[{}{}] {:3}%",
        "#".repeat(filled),
        " ".repeat(bar_width - filled),
        percent
    )
}

/// Terminal implementation of ProgressCallback.
struct CliProgress;

impl CliProgress {
    fn terminal_width() -> usize {
        term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
    }

    fn rewrite_line(text: &str) {
        print!("\r\x1b[2K{}", text);
        let _ = std::io::stdout().flush();
    }
}

impl ProgressCallback for CliProgress {
    fn on_enumeration_progress(&self, files_found: usize) {
        Self::rewrite_line(&format!("Building file list... {}", files_found));
    }

    fn on_job_started(&self, job: &CopyJob) {
        println!();
        if job.files.is_empty() {
            println!("No files found.");
        } else {
            println!("Extracting NTFS creation times");
        }
    }

    fn on_file_completed(&self, index: usize, total: usize, outcome: &CopyOutcome) {
        let width = Self::terminal_width();
        let rel = outcome.relative_path.to_string_lossy();
        print!("\r\x1b[2K");
        if outcome.copy_successful {
            let ts = if outcome.timestamp.is_some() {
                outcome.timestamp_str()
            } else {
                "N/A"
            };
            println!("'{}'  {}", truncate_filename(&rel, width, ts.len()), ts);
        } else {
            let reason = outcome.error.as_deref().unwrap_or("unknown error");
            println!("'{}' failed to copy: {}", rel, reason);
        }
        print!("{}", render_bar(index + 1, total, width));
        let _ = std::io::stdout().flush();
    }

    fn on_verification_progress(&self, files_counted: usize) {
        Self::rewrite_line(&format!(
            "Verifying target directory file count... {}",
            files_counted
        ));
    }

    fn on_job_completed(&self, job: &CopyJob) {
        if !job.files.is_empty() {
            println!();
        }
    }
}

/// Parse and validate command-line arguments, then run the job
fn main() {
    let args = Args::parse();

    let exit_code = match run_cli(&args) {
        Ok(()) => 0,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            2
        }
    };

    std::process::exit(exit_code);
}

/// Main CLI logic - separated for testability
fn run_cli(args: &Args) -> Result<(), String> {
    // Precondition checks happen here, before any filesystem writes
    let mut job = create_job(&args.src, &args.dest).map_err(|e| e.to_string())?;

    let mut log = if args.no_log {
        RunLog::disabled()
    } else {
        let command_line = std::env::args().collect::<Vec<_>>().join(" ");
        RunLog::create(Path::new(LOG_FILE_NAME), &command_line).map_err(|e| e.to_string())?
    };

    let progress = CliProgress;
    plan_job(&mut job, Some(&progress)).map_err(|e| e.to_string())?;

    let mut table = ResultTable::new();
    run_job(&mut job, &mut table, &mut log, Some(&progress)).map_err(|e| e.to_string())?;

    if !args.no_verify {
        match verify_destination(&job, &mut log, Some(&progress)) {
            Ok(summary) => {
                println!();
                if summary.matches {
                    println!(
                        "Verified {} files in '{}' (matches source)",
                        summary.destination_count,
                        job.destination_root.display()
                    );
                } else {
                    println!(
                        "Destination has {} files; source had {} (mismatch)",
                        summary.destination_count, summary.source_count
                    );
                }
            }
            // Verification problems are reported, never fatal: the copy
            // itself has already completed.
            Err(e) => eprintln!("Warning: verification failed: {}", e),
        }
    }

    // Finalized after verification so the recount never includes the table
    if let Err(e) = table.finalize(&job.destination_root) {
        eprintln!("Warning: {}", e);
    }

    // Per-file copy failures are visible in the table and progress output
    // but do not affect the exit status.
    Ok(())
}
