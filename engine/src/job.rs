//! Job orchestration module.
//!
//! This module provides the main job lifecycle functions:
//! - Creating a job from source/destination paths (precondition checks)
//! - Planning a job (enumerating the source tree)
//! - Running a job (copying files and propagating creation-time attributes)
//!
//! Individual file errors are isolated: they are recorded in that file's
//! outcome and the run continues with the next file.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use uuid::Uuid;

use crate::crtime;
use crate::error::EngineError;
use crate::fs_ops;
use crate::model::{CopyJob, CopyOutcome, JobState};
use crate::progress::ProgressCallback;
use crate::report::{ResultTable, RunLog};
use crate::xattrs;

/// Create a new copy job, checking preconditions before any I/O.
///
/// The source must exist and be a directory. The destination must not exist
/// at all: the pipeline refuses to overwrite or merge into a previous run's
/// output, so a partial run is restarted against a fresh destination.
///
/// # Errors
/// Returns EngineError if either precondition fails.
pub fn create_job<P: AsRef<Path>>(source: P, destination: P) -> Result<CopyJob, EngineError> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    match fs::metadata(source) {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(EngineError::SourceNotDirectory {
                    path: source.to_path_buf(),
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(EngineError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(EngineError::SourceAccessDenied {
                path: source.to_path_buf(),
                source: e,
            });
        }
    }

    // symlink_metadata so a dangling symlink also counts as "exists"
    if fs::symlink_metadata(destination).is_ok() {
        return Err(EngineError::DestinationExists {
            path: destination.to_path_buf(),
        });
    }

    Ok(CopyJob {
        id: Uuid::new_v4(),
        source_root: source.to_path_buf(),
        destination_root: destination.to_path_buf(),
        files: Vec::new(),
        state: JobState::Pending,
        created_at: SystemTime::now(),
        start_time: None,
        end_time: None,
    })
}

/// Plan a job by enumerating the source tree.
///
/// Populates `job.files` with one task per regular file. Enumeration
/// progress is reported per file found.
///
/// # Errors
/// Returns EngineError if enumeration fails or the job is not Pending.
pub fn plan_job(
    job: &mut CopyJob,
    progress: Option<&dyn ProgressCallback>,
) -> Result<(), EngineError> {
    if job.state != JobState::Pending {
        return Err(EngineError::InvalidState {
            reason: format!(
                "Job must be Pending to plan; current state: {:?}",
                job.state
            ),
        });
    }
    job.files = fs_ops::enumerate_tree(&job.source_root, &job.destination_root, progress)?;
    Ok(())
}

/// Run a job: copy every planned file and propagate its creation time.
///
/// For each task, in enumeration order, single-threaded:
/// 1. read and decode the source creation-time attribute;
/// 2. ensure the destination parent directory exists;
/// 3. copy content and standard metadata (permission bits, mtime);
/// 4. on success, write the two destination attributes if a timestamp
///    was decoded;
/// 5. append one outcome to the result table and one narrative-log entry;
/// 6. emit one progress update.
///
/// A failure at steps 2-3 marks that file's outcome as failed and the run
/// continues. An attribute-write failure alone is a warning: the content
/// is already committed.
///
/// # Errors
/// Returns EngineError only for job-level problems (wrong state, the
/// destination root cannot be created).
pub fn run_job(
    job: &mut CopyJob,
    table: &mut ResultTable,
    log: &mut RunLog,
    progress: Option<&dyn ProgressCallback>,
) -> Result<(), EngineError> {
    if job.state != JobState::Pending {
        return Err(EngineError::InvalidState {
            reason: format!("Job must be Pending to run; current state: {:?}", job.state),
        });
    }
    job.state = JobState::Running;
    job.start_time = Some(SystemTime::now());

    // create_job guaranteed the root did not exist; an empty source still
    // produces an (empty) destination tree.
    fs::create_dir_all(&job.destination_root).map_err(|e| EngineError::DirectoryCreationFailed {
        path: job.destination_root.clone(),
        source: e,
    })?;

    log.info(&format!(
        "{} files found in source '{}'",
        job.files.len(),
        job.source_root.display()
    ));

    if let Some(callback) = progress {
        callback.on_job_started(job);
    }

    let total = job.files.len();
    for index in 0..total {
        let task = &job.files[index];

        let record = xattrs::read_source_timestamp(&task.source_path)
            .and_then(|raw| crtime::decode_raw_attribute(&raw));

        let copy_result = fs_ops::ensure_parent_dir_exists(&task.destination_path).and_then(
            |_| fs_ops::copy_file_with_metadata(&task.source_path, &task.destination_path),
        );

        let outcome = match copy_result {
            Ok(()) => {
                let mut xattr_successful = false;
                if let Some(rec) = &record {
                    xattr_successful =
                        xattrs::write_destination_attributes(&task.destination_path, rec);
                    if !xattr_successful {
                        log.warning(&format!(
                            "'{}': failed to set xattr",
                            task.destination_path.display()
                        ));
                    }
                }
                let hex = record.as_ref().map(|r| r.hex.as_str()).unwrap_or("N/A");
                let readable = record.as_ref().map(|r| r.readable.as_str()).unwrap_or("N/A");
                log.info(&format!(
                    "'{}' --> '{}'  with timestamp {} ({})",
                    task.source_path.display(),
                    task.destination_path.display(),
                    hex,
                    readable
                ));
                CopyOutcome {
                    relative_path: task.relative_path.clone(),
                    timestamp: record,
                    copy_successful: true,
                    xattr_successful,
                    error: None,
                }
            }
            Err(e) => {
                log.error(&format!(
                    "'{}' failed to copy: {}",
                    task.source_path.display(),
                    e
                ));
                CopyOutcome {
                    relative_path: task.relative_path.clone(),
                    timestamp: record,
                    copy_successful: false,
                    xattr_successful: false,
                    error: Some(e.to_string()),
                }
            }
        };

        if let Some(callback) = progress {
            callback.on_file_completed(index, total, &outcome);
        }
        table.append(outcome);
    }

    job.state = JobState::Completed;
    job.end_time = Some(SystemTime::now());

    if let Some(callback) = progress {
        callback.on_job_completed(job);
    }

    Ok(())
}
