//! Ctrl-C handling.
//!
//! `TempDir` cleanup runs on drop, which SIGINT skips. The converter records
//! the files of the job in flight in an [`ActiveJob`]; the handler installed
//! by [`install_handler`] removes them before the process exits.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Exit status of a run stopped by SIGINT (128 + 2).
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, Default)]
struct JobFiles {
    scratch: Option<PathBuf>,
    partial_output: Option<PathBuf>,
}

/// Files owned by the job currently running. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ActiveJob {
    files: Arc<Mutex<JobFiles>>,
}

impl ActiveJob {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, JobFiles> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start tracking a job that works in `scratch`. The returned guard
    /// stops tracking when dropped.
    pub fn track(&self, scratch: &Path) -> JobGuard<'_> {
        *self.lock() = JobFiles {
            scratch: Some(scratch.to_path_buf()),
            partial_output: None,
        };
        JobGuard { job: self }
    }

    pub fn is_idle(&self) -> bool {
        let files = self.lock();
        files.scratch.is_none() && files.partial_output.is_none()
    }

    /// Delete the tracked scratch directory and partial output, returning
    /// the paths that were removed. Tracking is reset either way.
    pub fn clean_up(&self) -> Vec<PathBuf> {
        let files = std::mem::take(&mut *self.lock());
        let mut removed = Vec::new();

        if let Some(partial) = files.partial_output {
            match fs::remove_file(&partial) {
                Ok(()) => removed.push(partial),
                Err(e) => log_removal_error(&partial, &e),
            }
        }
        if let Some(scratch) = files.scratch {
            match fs::remove_dir_all(&scratch) {
                Ok(()) => removed.push(scratch),
                Err(e) => log_removal_error(&scratch, &e),
            }
        }

        removed
    }
}

/// Tracking handle for one job, see [`ActiveJob::track`].
#[derive(Debug)]
pub struct JobGuard<'a> {
    job: &'a ActiveJob,
}

impl JobGuard<'_> {
    /// The encoder is about to write `partial`.
    pub fn writing(&self, partial: &Path) {
        self.job.lock().partial_output = Some(partial.to_path_buf());
    }

    /// `partial` has been moved into place and is no longer ours to delete.
    pub fn committed(&self) {
        self.job.lock().partial_output = None;
    }
}

impl Drop for JobGuard<'_> {
    fn drop(&mut self) {
        *self.job.lock() = JobFiles::default();
    }
}

fn log_removal_error(path: &Path, e: &io::Error) {
    if e.kind() != io::ErrorKind::NotFound {
        log::debug!("Could not remove {}: {e}", path.display());
    }
}

/// Install the SIGINT handler. It may only be installed once per process.
pub fn install_handler(job: ActiveJob) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        for path in job.clean_up() {
            log::debug!("Removed {}", path.display());
        }
        crate::utils::report::warn("Interrupted");
        std::process::exit(INTERRUPTED_EXIT_CODE);
    })
}
