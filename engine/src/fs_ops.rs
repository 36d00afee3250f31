//! Filesystem operations module.
//!
//! This module provides low-level operations for:
//! - Enumerating directory trees into file tasks
//! - Copying files with metadata preservation
//! - Creating directories recursively

use std::fs;
use std::io;
use std::path::Path;

use crate::error::EngineError;
use crate::model::FileTask;
use crate::progress::ProgressCallback;

/// Enumerate the source directory tree and return a task per regular file.
///
/// Performs a full recursive descent, visiting every regular file exactly
/// once and computing its path relative to `source` and its mirrored path
/// under `destination_root`. Entry order within a directory is whatever the
/// filesystem returns.
///
/// Entries are classified without following symbolic links: symlinks are
/// neither descended into nor counted as regular files. The destination
/// recount in the verifier applies the same rule, keeping the post-copy
/// cardinality check consistent.
///
/// # Errors
/// Returns EngineError if any directory in the tree cannot be read.
pub fn enumerate_tree(
    source: &Path,
    destination_root: &Path,
    progress: Option<&dyn ProgressCallback>,
) -> Result<Vec<FileTask>, EngineError> {
    let mut tasks = Vec::new();

    fn recurse(
        path: &Path,
        rel_path: &Path,
        destination_root: &Path,
        tasks: &mut Vec<FileTask>,
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

            let rel_full_path = rel_path.join(entry.file_name());

            if file_type.is_dir() {
                recurse(&entry.path(), &rel_full_path, destination_root, tasks, progress)?;
            } else if file_type.is_file() {
                tasks.push(FileTask {
                    source_path: entry.path(),
                    destination_path: destination_root.join(&rel_full_path),
                    relative_path: rel_full_path,
                });
                if let Some(callback) = progress {
                    callback.on_enumeration_progress(tasks.len());
                }
            }
            // Symlinks and special files are skipped.
        }
        Ok(())
    }

    recurse(source, Path::new(""), destination_root, &mut tasks, progress)?;
    Ok(tasks)
}

/// Copy a file from source to destination, preserving standard metadata.
///
/// Content is streamed, then the permission bits and modification time of
/// the source are applied to the destination. Creation-time attributes are
/// not handled here; the orchestrator attaches those separately.
///
/// # Errors
/// Returns EngineError if the copy fails. Metadata application failures
/// after a committed content copy are ignored.
pub fn copy_file_with_metadata(src: &Path, dst: &Path) -> Result<(), EngineError> {
    let mut src_file = fs::File::open(src).map_err(|e| EngineError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;

    let src_metadata = src_file.metadata().map_err(|e| EngineError::ReadError {
        path: src.to_path_buf(),
        source: e,
    })?;

    let mut dst_file = fs::File::create(dst).map_err(|e| EngineError::WriteError {
        path: dst.to_path_buf(),
        source: e,
    })?;

    io::copy(&mut src_file, &mut dst_file).map_err(|e| {
        if e.kind() == io::ErrorKind::PermissionDenied {
            EngineError::WriteError {
                path: dst.to_path_buf(),
                source: e,
            }
        } else {
            EngineError::ReadError {
                path: src.to_path_buf(),
                source: e,
            }
        }
    })?;
    drop(dst_file);

    let _ = fs::set_permissions(dst, src_metadata.permissions());
    if let Ok(mtime) = src_metadata.modified() {
        let _ = filetime::set_file_mtime(dst, filetime::FileTime::from_system_time(mtime));
    }

    Ok(())
}

/// Ensure the parent directory of a path exists, creating it if necessary.
///
/// # Errors
/// Returns EngineError if directory creation fails.
pub fn ensure_parent_dir_exists(path: &Path) -> Result<(), EngineError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreationFailed {
        path: parent.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_enumerate_flat_directory() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        fs::create_dir(&src).expect("Failed to create src dir");

        fs::write(src.join("file1.txt"), b"test data 1").expect("Failed to write file1");
        fs::write(src.join("file2.txt"), b"test data 2").expect("Failed to write file2");

        let dst = temp_dir.path().join("dst");
        let tasks = enumerate_tree(&src, &dst, None).expect("Failed to enumerate");

        assert_eq!(tasks.len(), 2);
        for task in &tasks {
            assert!(task.source_path.starts_with(&src));
            assert!(task.destination_path.starts_with(&dst));
            assert_eq!(task.relative_path.components().count(), 1);
        }
    }

    #[test]
    fn test_enumerate_nested_directory_relative_paths() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        let deep = src.join("a").join("b").join("c");
        fs::create_dir_all(&deep).expect("Failed to create nested dirs");

        fs::write(src.join("top.txt"), b"1").expect("Failed to write top.txt");
        fs::write(src.join("a").join("mid.txt"), b"2").expect("Failed to write mid.txt");
        fs::write(deep.join("leaf.txt"), b"3").expect("Failed to write leaf.txt");

        let dst = temp_dir.path().join("dst");
        let tasks = enumerate_tree(&src, &dst, None).expect("Failed to enumerate");

        assert_eq!(tasks.len(), 3);

        let rels: Vec<_> = tasks
            .iter()
            .map(|t| t.relative_path.to_string_lossy().into_owned())
            .collect();
        assert!(rels.contains(&"top.txt".to_string()));
        assert!(rels.iter().any(|r| r.ends_with("mid.txt") && r.starts_with("a")));

        let leaf = tasks
            .iter()
            .find(|t| t.relative_path.ends_with("leaf.txt"))
            .expect("leaf.txt not enumerated");
        assert_eq!(leaf.destination_path, dst.join("a").join("b").join("c").join("leaf.txt"));
    }

    #[test]
    fn test_enumerate_reports_progress() {
        use std::sync::Mutex;

        struct Counting {
            seen: Mutex<Vec<usize>>,
        }
        impl ProgressCallback for Counting {
            fn on_enumeration_progress(&self, files_found: usize) {
                self.seen.lock().unwrap().push(files_found);
            }
            fn on_job_started(&self, _job: &crate::model::CopyJob) {}
            fn on_file_completed(
                &self,
                _index: usize,
                _total: usize,
                _outcome: &crate::model::CopyOutcome,
            ) {
            }
            fn on_verification_progress(&self, _files_counted: usize) {}
            fn on_job_completed(&self, _job: &crate::model::CopyJob) {}
        }

        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("src");
        fs::create_dir(&src).expect("Failed to create src dir");
        fs::write(src.join("one"), b"1").expect("write");
        fs::write(src.join("two"), b"2").expect("write");

        let counting = Counting {
            seen: Mutex::new(Vec::new()),
        };
        let dst = temp_dir.path().join("dst");
        enumerate_tree(&src, &dst, Some(&counting)).expect("Failed to enumerate");

        assert_eq!(*counting.seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_enumerate_nonexistent_source() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src = temp_dir.path().join("nonexistent");
        let dst = temp_dir.path().join("dst");
        assert!(enumerate_tree(&src, &dst, None).is_err());
    }

    #[test]
    fn test_copy_file_preserves_content_and_mtime() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src_file = temp_dir.path().join("source.txt");
        let dst_file = temp_dir.path().join("dest.txt");

        let mut file = fs::File::create(&src_file).expect("Failed to create source");
        file.write_all(b"test content").expect("Failed to write source");
        drop(file);

        // Backdate the source so mtime preservation is observable
        let old = filetime::FileTime::from_unix_time(1_000_000_000, 0);
        filetime::set_file_mtime(&src_file, old).expect("Failed to set mtime");

        copy_file_with_metadata(&src_file, &dst_file).expect("Failed to copy");

        let content = fs::read_to_string(&dst_file).expect("Failed to read dest");
        assert_eq!(content, "test content");

        let dst_mtime =
            filetime::FileTime::from_last_modification_time(&fs::metadata(&dst_file).unwrap());
        assert_eq!(dst_mtime.unix_seconds(), 1_000_000_000);
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let src_file = temp_dir.path().join("missing.txt");
        let dst_file = temp_dir.path().join("dest.txt");
        assert!(copy_file_with_metadata(&src_file, &dst_file).is_err());
    }

    #[test]
    fn test_ensure_parent_dir_exists() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("subdir").join("nested").join("file.txt");

        ensure_parent_dir_exists(&path).expect("Failed to create parent");
        assert!(path.parent().unwrap().exists());

        // Idempotent
        ensure_parent_dir_exists(&path).expect("Second call must succeed");
    }
}
