//! # ntfs2xattr Engine - Creation-Time Copy Library
//!
//! A headless engine for copying a directory tree off an NTFS mount while
//! preserving each file's NTFS creation time in extended attributes.
//! Designed as the foundation for multiple front ends (CLI, automation).
//!
//! ## Overview
//!
//! NTFS drivers on Linux expose the creation time as the `system.ntfs_crtime`
//! extended attribute, either as a raw 8-byte little-endian FILETIME or as
//! ASCII hex text. The engine decodes both encodings, copies every regular
//! file to a mirrored destination path, and attaches two attributes to each
//! copy: the canonical binary tick count (`user.ntfs_crtime`) and a
//! human-readable rendering (`user.ntfs_crtime_readable`). File-manager
//! plugins read those two attributes back, readable string first.
//!
//! It features:
//! - Recursive source enumeration with relative-path tracking
//! - Per-file error isolation (one failure never aborts the run)
//! - A structured per-file result table (CSV) and an optional narrative log
//! - Post-copy cardinality verification of the destination tree
//! - Progress reporting via callbacks (decoupled from UI technology)
//!
//! ## Basic Usage
//!
//! ```no_run
//! use engine::{create_job, plan_job, run_job, verify_destination, ResultTable, RunLog};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut job = create_job("/mnt/ntfs/data", "/srv/archive/data")?;
//! plan_job(&mut job, None)?;
//!
//! let mut table = ResultTable::new();
//! let mut log = RunLog::disabled();
//! run_job(&mut job, &mut table, &mut log, None)?;
//!
//! let summary = verify_destination(&job, &mut log, None)?;
//! println!("{}/{} files, match: {}",
//!     summary.destination_count, summary.source_count, summary.matches);
//!
//! // Written last, so the recount above never sees the table file
//! table.finalize(&job.destination_root)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - **model**: Core data structures (CopyJob, FileTask, CopyOutcome, ...)
//! - **error**: Error types and handling
//! - **crtime**: FILETIME codec and calendar formatting
//! - **xattrs**: Extended-attribute read/write
//! - **fs_ops**: Low-level filesystem operations
//! - **job**: Job orchestration (create, plan, run)
//! - **report**: Result table and narrative log
//! - **verify**: Post-copy cardinality verification
//! - **progress**: Progress callback trait

pub mod crtime;
pub mod error;
pub mod fs_ops;
pub mod job;
pub mod model;
pub mod progress;
pub mod report;
pub mod verify;
pub mod xattrs;

// Re-export main types and functions
pub use crtime::TimestampRecord;
pub use error::EngineError;
pub use job::{create_job, plan_job, run_job};
pub use model::{CopyJob, CopyOutcome, FileTask, JobState, RunSummary};
pub use progress::ProgressCallback;
pub use report::{ResultTable, RunLog, TABLE_FILE_NAME};
pub use verify::verify_destination;
