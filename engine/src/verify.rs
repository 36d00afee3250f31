//! Post-copy verification.
//!
//! After all tasks are processed, the destination root is re-walked
//! independently and its regular-file count compared against the number of
//! tasks enumerated from the source. This is a cardinality check only: it
//! cannot detect content corruption, wrong-file substitution, or attribute
//! loss. A mismatch is reported, never fatal.

use std::fs;
use std::path::Path;

use crate::error::EngineError;
use crate::model::{CopyJob, JobState, RunSummary};
use crate::progress::ProgressCallback;
use crate::report::RunLog;

/// Count regular files under `root`, recursively.
///
/// Uses the same classification rule as enumeration: entries are inspected
/// without following symbolic links, so symlinks are neither descended into
/// nor counted.
///
/// # Errors
/// Returns EngineError if any directory in the tree cannot be read.
pub fn count_regular_files(
    root: &Path,
    progress: Option<&dyn ProgressCallback>,
) -> Result<usize, EngineError> {
    fn recurse(
        path: &Path,
        count: &mut usize,
        progress: Option<&dyn ProgressCallback>,
    ) -> Result<(), EngineError> {
        let entries = fs::read_dir(path).map_err(|e| EngineError::EnumerationFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| EngineError::EnumerationFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
            let file_type = entry.file_type().map_err(|e| EngineError::EnumerationFailed {
                path: entry.path(),
                source: e,
            })?;
            if file_type.is_dir() {
                recurse(&entry.path(), count, progress)?;
            } else if file_type.is_file() {
                *count += 1;
                if let Some(callback) = progress {
                    callback.on_verification_progress(*count);
                }
            }
        }
        Ok(())
    }

    let mut count = 0;
    recurse(root, &mut count, progress)?;
    Ok(count)
}

/// Recount the destination tree and compare against the planned file count.
///
/// Must run before the result table is finalized, so the recount never sees
/// the table file. The outcome is logged (info on match, warning on
/// mismatch) and returned; a mismatch does not fail the run.
///
/// # Errors
/// Returns EngineError if the job has not completed or the destination
/// tree cannot be walked.
pub fn verify_destination(
    job: &CopyJob,
    log: &mut RunLog,
    progress: Option<&dyn ProgressCallback>,
) -> Result<RunSummary, EngineError> {
    if job.state != JobState::Completed {
        return Err(EngineError::InvalidState {
            reason: format!(
                "Job must be Completed to verify; current state: {:?}",
                job.state
            ),
        });
    }

    let source_count = job.files.len();
    let destination_count = count_regular_files(&job.destination_root, progress)?;
    let matches = destination_count == source_count;

    if matches {
        log.info(&format!(
            "Counted {} files in the target directory (matches source directory)",
            destination_count
        ));
    } else {
        log.warning(&format!(
            "Counted {} files in the target directory (does not match source directory count of {})",
            destination_count, source_count
        ));
    }

    Ok(RunSummary {
        source_count,
        destination_count,
        matches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{create_job, plan_job, run_job};
    use crate::model::FileTask;
    use crate::report::ResultTable;
    use std::path::PathBuf;

    #[test]
    fn test_count_regular_files_nested() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a/b")).expect("Failed to create dirs");
        fs::write(root.join("one.txt"), b"1").expect("write");
        fs::write(root.join("a/two.txt"), b"2").expect("write");
        fs::write(root.join("a/b/three.txt"), b"3").expect("write");

        let count = count_regular_files(root, None).expect("Failed to count");
        assert_eq!(count, 3);
    }

    #[test]
    fn test_count_missing_root_fails() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("nope");
        assert!(count_regular_files(&missing, None).is_err());
    }

    #[test]
    fn test_verify_matching_run() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        fs::create_dir(&src).expect("Failed to create src");
        fs::write(src.join("a.txt"), b"a").expect("write");
        fs::write(src.join("b.txt"), b"b").expect("write");
        let dst = temp_dir.path().join("dst");

        let mut job = create_job(&src, &dst).expect("Failed to create job");
        plan_job(&mut job, None).expect("Failed to plan job");
        let mut table = ResultTable::new();
        let mut log = RunLog::disabled();
        run_job(&mut job, &mut table, &mut log, None).expect("Failed to run job");

        let summary = verify_destination(&job, &mut log, None).expect("Failed to verify");
        assert_eq!(summary.source_count, 2);
        assert_eq!(summary.destination_count, 2);
        assert!(summary.matches);

        // Finalizing the table after verification adds a file the recount
        // never saw; a fresh recount now reports one more.
        table.finalize(&dst).expect("Failed to finalize");
        assert_eq!(count_regular_files(&dst, None).unwrap(), 3);
    }

    #[test]
    fn test_verify_reports_mismatch_after_one_failed_copy() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        fs::create_dir(&src).expect("Failed to create src");
        fs::write(src.join("a.txt"), b"a").expect("write");
        fs::write(src.join("b.txt"), b"b").expect("write");
        let dst = temp_dir.path().join("dst");

        let mut job = create_job(&src, &dst).expect("Failed to create job");
        plan_job(&mut job, None).expect("Failed to plan job");
        job.files.push(FileTask {
            source_path: src.join("missing.txt"),
            relative_path: PathBuf::from("missing.txt"),
            destination_path: dst.join("missing.txt"),
        });

        let mut table = ResultTable::new();
        let mut log = RunLog::disabled();
        run_job(&mut job, &mut table, &mut log, None).expect("Run must complete");

        let summary = verify_destination(&job, &mut log, None).expect("Failed to verify");
        assert_eq!(summary.source_count, 3);
        assert_eq!(summary.destination_count, 2);
        assert!(!summary.matches);
    }

    #[test]
    fn test_verify_requires_completed_job() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        fs::create_dir(&src).expect("Failed to create src");
        let dst = temp_dir.path().join("dst");

        let job = create_job(&src, &dst).expect("Failed to create job");
        let mut log = RunLog::disabled();
        let result = verify_destination(&job, &mut log, None);
        assert!(matches!(result, Err(EngineError::InvalidState { .. })));
    }
}
