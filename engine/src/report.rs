//! Run reporting: the structured result table and the narrative log.
//!
//! The two sinks are independent. The result table is always produced: one
//! row per processed file, accumulated in enumeration order and flushed to
//! `timestamps.csv` in the destination root by an explicit finalize step.
//! The narrative log is optional: an explicit handle that either appends
//! leveled lines to a file or does nothing, selected at construction. There
//! is no process-global logging state.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;

use crate::error::EngineError;
use crate::model::CopyOutcome;

/// File name of the structured result table, under the destination root.
pub const TABLE_FILE_NAME: &str = "timestamps.csv";

/// Fixed column order of the result table.
pub const TABLE_HEADER: [&str; 5] = [
    "file",
    "timestamp",
    "timestamp_str",
    "copy_successful",
    "xattr_successful",
];

#[derive(Debug, Serialize)]
struct TableRow<'a> {
    file: &'a str,
    timestamp: &'a str,
    timestamp_str: &'a str,
    copy_successful: bool,
    xattr_successful: bool,
}

/// Accumulator for per-file outcomes, flushed to CSV once per run.
///
/// Append order is enumeration order; finalize happens after verification
/// so the destination recount never sees the table file itself.
#[derive(Debug, Default)]
pub struct ResultTable {
    outcomes: Vec<CopyOutcome>,
}

impl ResultTable {
    pub fn new() -> Self {
        ResultTable {
            outcomes: Vec::new(),
        }
    }

    /// Append one outcome. Called exactly once per FileTask.
    pub fn append(&mut self, outcome: CopyOutcome) {
        self.outcomes.push(outcome);
    }

    /// The accumulated outcomes, in enumeration order.
    pub fn outcomes(&self) -> &[CopyOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Write the table to `timestamps.csv` under the destination root.
    ///
    /// The header row is always written, even for an empty run.
    ///
    /// # Errors
    /// Returns EngineError if the CSV file cannot be created or written.
    pub fn finalize(&self, destination_root: &Path) -> Result<PathBuf, EngineError> {
        let path = destination_root.join(TABLE_FILE_NAME);
        let report_err = |e: csv::Error| EngineError::ReportWriteFailed {
            path: path.clone(),
            message: e.to_string(),
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .map_err(report_err)?;

        writer.write_record(TABLE_HEADER).map_err(report_err)?;
        for outcome in &self.outcomes {
            let file = outcome.relative_path.to_string_lossy();
            writer
                .serialize(TableRow {
                    file: file.as_ref(),
                    timestamp: outcome.timestamp_hex(),
                    timestamp_str: outcome.timestamp_str(),
                    copy_successful: outcome.copy_successful,
                    xattr_successful: outcome.xattr_successful,
                })
                .map_err(report_err)?;
        }
        writer.flush().map_err(|e| EngineError::ReportWriteFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(path)
    }
}

/// Narrative log handle: either appends to a file or is a no-op.
///
/// Constructed once at startup and passed by reference into the run loop
/// and the verifier. Entry format: `[<local time> - LEVEL] message`.
#[derive(Debug)]
pub struct RunLog {
    sink: Option<BufWriter<File>>,
}

impl RunLog {
    /// A log handle that discards every entry.
    pub fn disabled() -> Self {
        RunLog { sink: None }
    }

    /// Open (appending) a log file and write the two header entries:
    /// the invoked command line and the start time.
    ///
    /// # Errors
    /// Returns EngineError if the log file cannot be opened.
    pub fn create(path: &Path, command_line: &str) -> Result<Self, EngineError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| EngineError::ReportWriteFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let mut log = RunLog {
            sink: Some(BufWriter::new(file)),
        };
        log.info(&format!("Command: {}", command_line));
        let now = Local::now();
        log.info(&format!(
            "Run at {} on {}",
            now.format("%H:%M:%S"),
            now.format("%Y/%m/%d")
        ));
        Ok(log)
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn info(&mut self, message: &str) {
        self.write("INFO", message);
    }

    pub fn warning(&mut self, message: &str) {
        self.write("WARNING", message);
    }

    pub fn error(&mut self, message: &str) {
        self.write("ERROR", message);
    }

    fn write(&mut self, level: &str, message: &str) {
        if let Some(writer) = &mut self.sink {
            let _ = writeln!(
                writer,
                "[{} - {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                level,
                message
            );
            let _ = writer.flush();
        }
    }
}
