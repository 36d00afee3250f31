//! Core data model for creation-time copy jobs.
//!
//! This module defines the main data structures for representing a run:
//! - CopyJob: one whole copy operation
//! - FileTask: a single enumerated file within a job
//! - CopyOutcome: the per-file result record
//! - RunSummary: the verifier's aggregate result
//! - JobState: lifecycle enum

use std::path::PathBuf;
use std::time::SystemTime;
use uuid::Uuid;

use crate::crtime::TimestampRecord;

/// Represents a single creation-time copy job.
///
/// A CopyJob holds the source and destination roots, the enumerated file
/// list, and lifecycle state. The per-file outcomes live in the result
/// table, not here: each FileTask is consumed exactly once by the run loop.
#[derive(Debug)]
pub struct CopyJob {
    /// Unique identifier for this job
    pub id: Uuid,

    /// Root source directory
    pub source_root: PathBuf,

    /// Root destination directory (must not exist before the run)
    pub destination_root: PathBuf,

    /// All regular files enumerated under the source root
    pub files: Vec<FileTask>,

    /// Current job state (Pending, Running, Completed)
    pub state: JobState,

    /// When the job was created
    pub created_at: SystemTime,

    /// When job execution started
    pub start_time: Option<SystemTime>,

    /// When job execution completed
    pub end_time: Option<SystemTime>,
}

/// A single enumerated file: where it is, and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    /// Absolute source path
    pub source_path: PathBuf,

    /// Path relative to the source root
    pub relative_path: PathBuf,

    /// Mirrored absolute destination path
    pub destination_path: PathBuf,
}

/// The result of processing one FileTask.
///
/// Owned by the result table in enumeration order once emitted.
#[derive(Debug, Clone)]
pub struct CopyOutcome {
    /// Path relative to the source root
    pub relative_path: PathBuf,

    /// Decoded creation time, or `None` when the attribute was missing or
    /// unparsable
    pub timestamp: Option<TimestampRecord>,

    /// Whether the content/metadata copy succeeded
    pub copy_successful: bool,

    /// Whether both destination attributes were written
    pub xattr_successful: bool,

    /// Captured error text for a failed copy
    pub error: Option<String>,
}

impl CopyOutcome {
    /// Canonical hex timestamp for reports, empty when absent.
    pub fn timestamp_hex(&self) -> &str {
        self.timestamp.as_ref().map(|t| t.hex.as_str()).unwrap_or("")
    }

    /// Long-format timestamp for reports, empty when absent.
    pub fn timestamp_str(&self) -> &str {
        self.timestamp
            .as_ref()
            .map(|t| t.readable.as_str())
            .unwrap_or("")
    }
}

/// Aggregate result of the post-copy verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of regular files enumerated under the source root
    pub source_count: usize,

    /// Number of regular files recounted under the destination root
    pub destination_count: usize,

    /// Whether the two counts are equal
    pub matches: bool,
}

/// The state of an entire copy job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Created, not yet started
    Pending,
    /// Currently executing
    Running,
    /// All files processed (some may have failed)
    Completed,
}
