//! Progress reporting trait.
//!
//! This module defines the ProgressCallback trait, which decouples the copy
//! engine from any specific UI technology. The CLI provides a terminal
//! implementation; other front ends can subscribe to the same events.
//!
//! All methods are called synchronously: the engine processes one file at a
//! time, so events arrive in enumeration order.

use crate::model::{CopyJob, CopyOutcome};

/// Trait for receiving progress updates from a copy job.
pub trait ProgressCallback: Send {
    /// Called once per file discovered during source enumeration.
    fn on_enumeration_progress(&self, files_found: usize);

    /// Called when job execution starts (after planning).
    fn on_job_started(&self, job: &CopyJob);

    /// Called after each file is processed (copied or failed).
    fn on_file_completed(&self, index: usize, total: usize, outcome: &CopyOutcome);

    /// Called once per file recounted during destination verification.
    fn on_verification_progress(&self, files_counted: usize);

    /// Called when job execution is complete (all files processed).
    fn on_job_completed(&self, job: &CopyJob);
}
