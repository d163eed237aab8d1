use crate::baseline_file::{Baseline, BaselineFileError, BaselineStore};
use crate::checksum::{ChecksumError, checksum_file};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("{0}")]
    BaselineFile(#[from] BaselineFileError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusType {
    Unchanged,
    Modified,
    Missing,
    /// Checksumming failed for a reason other than the path not existing.
    Unreadable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub path: String,
    pub status_type: StatusType,
    /// Why checksumming failed. Only set for `Unreadable`.
    pub error: Option<String>,
}

impl Status {
    fn new(path: &str, status_type: StatusType) -> Self {
        Status {
            path: path.to_string(),
            status_type,
            error: None,
        }
    }

    fn unreadable(path: &str, err: &ChecksumError) -> Self {
        Status {
            path: path.to_string(),
            status_type: StatusType::Unreadable,
            error: Some(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusResult {
    /// One entry per tracked path, in baseline order.
    pub statuses: Vec<Status>,
}

impl StatusResult {
    pub fn is_clean(&self) -> bool {
        self.statuses
            .iter()
            .all(|s| s.status_type == StatusType::Unchanged)
    }

    pub fn count(&self, status_type: StatusType) -> usize {
        self.statuses
            .iter()
            .filter(|s| s.status_type == status_type)
            .count()
    }
}

/// Compare every baseline entry against the file currently on disk.
///
/// # Change Detection
///
/// * `Missing` - Opening the path reports that it does not exist
/// * `Modified` - The content checksum differs from the recorded one
/// * `Unreadable` - Any other checksum failure, including permission errors
///   on the file or a parent directory; evaluation of
///   the remaining entries continues
/// * `Unchanged` - The content checksum matches
///
/// Results follow baseline order. The baseline is never modified.
pub fn compute_status(baseline: &Baseline) -> StatusResult {
    let statuses = baseline
        .iter()
        .map(|(path, recorded)| status_of(path, recorded))
        .collect();

    StatusResult { statuses }
}

fn status_of(path: &str, recorded: &str) -> Status {
    // Existence is decided by the open itself. A failed stat (for example
    // EACCES on a parent directory) must not read as a deleted file.
    match checksum_file(Path::new(path)) {
        Err(ChecksumError::NotFound(_)) => Status::new(path, StatusType::Missing),
        Err(e) => {
            debug!("Failed to checksum {}: {}", path, e);
            Status::unreadable(path, &e)
        }
        Ok(actual) if actual != recorded => Status::new(path, StatusType::Modified),
        Ok(_) => Status::new(path, StatusType::Unchanged),
    }
}

/// Load a fresh baseline from `store` and diff it against disk.
///
/// A corrupt baseline is an error; an absent one yields an empty result.
pub fn check(store: &BaselineStore) -> Result<StatusResult, StatusError> {
    let baseline = store.load()?;
    Ok(compute_status(&baseline))
}
