use crate::baseline_file::{Baseline, BaselineFileError, BaselineStore};
use crate::checksum::{ChecksumError, checksum_file};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    #[error("{0}")]
    BaselineFile(#[from] BaselineFileError),
    #[error("Checksum error: {0}")]
    Checksum(#[from] ChecksumError),
    #[error("Refusing to update baseline, {} path(s) would be skipped: {}", .0.len(), .0.join(", "))]
    Skipped(Vec<String>),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Compute the report without writing the baseline.
    pub dry_run: bool,
    /// Fail instead of skipping paths that cannot be applied.
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    DoesNotExist,
    NotTracked,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DoesNotExist => f.write_str("does not exist"),
            SkipReason::NotTracked => f.write_str("not tracked"),
        }
    }
}

/// What happened to one input path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateEvent {
    Hashed {
        path: String,
        sha256: String,
        /// The path was already in the baseline and has been re-baselined.
        previously_tracked: bool,
    },
    Removed {
        path: String,
    },
    Skipped {
        path: String,
        reason: SkipReason,
    },
}

#[derive(Debug, Default)]
pub struct UpdateReport {
    pub events: Vec<UpdateEvent>,
    /// Number of entries in the baseline after the update.
    pub tracked: usize,
}

impl UpdateReport {
    pub fn skipped(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                UpdateEvent::Skipped { path, .. } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn hashed_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, UpdateEvent::Hashed { .. }))
            .count()
    }

    pub fn removed_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, UpdateEvent::Removed { .. }))
            .count()
    }
}

/// Replace the baseline with checksums of `paths`.
///
/// Any existing baseline is discarded, so a corrupt baseline file does not
/// prevent re-initialization. Paths that do not exist are skipped and
/// reported. Repeated paths are checksummed once.
pub fn init_baseline(
    store: &BaselineStore,
    paths: &[String],
    options: UpdateOptions,
) -> Result<UpdateReport, UpdateError> {
    let mut baseline = Baseline::new();
    let events = hash_into(&mut baseline, paths)?;
    finish(store, baseline, events, options)
}

/// Insert or re-baseline entries for `paths`.
///
/// New paths are appended; tracked paths are re-checksummed in place. Paths
/// that do not exist are skipped and reported.
pub fn add_to_baseline(
    store: &BaselineStore,
    paths: &[String],
    options: UpdateOptions,
) -> Result<UpdateReport, UpdateError> {
    let mut baseline = store.load()?;
    let events = hash_into(&mut baseline, paths)?;
    finish(store, baseline, events, options)
}

/// Delete entries for `paths`. Untracked paths are skipped and reported.
pub fn remove_from_baseline(
    store: &BaselineStore,
    paths: &[String],
    options: UpdateOptions,
) -> Result<UpdateReport, UpdateError> {
    let mut baseline = store.load()?;

    let events = paths
        .iter()
        .map(|path| {
            if baseline.remove(path).is_some() {
                UpdateEvent::Removed { path: path.clone() }
            } else {
                UpdateEvent::Skipped {
                    path: path.clone(),
                    reason: SkipReason::NotTracked,
                }
            }
        })
        .collect();

    finish(store, baseline, events, options)
}

/// Checksum each existing path into `baseline`.
///
/// Only a `NotFound` from the hasher counts as "does not exist". Any other
/// checksum failure, including permission errors on a parent directory,
/// aborts the whole operation; nothing has been persisted at that point.
/// Later occurrences of a repeated path produce no event.
fn hash_into(baseline: &mut Baseline, paths: &[String]) -> Result<Vec<UpdateEvent>, UpdateError> {
    let mut events = Vec::with_capacity(paths.len());
    let mut seen = HashSet::new();

    for path in paths {
        if !seen.insert(path.as_str()) {
            continue;
        }

        let sha256 = match checksum_file(Path::new(path)) {
            Ok(sha256) => sha256,
            Err(ChecksumError::NotFound(_)) => {
                events.push(UpdateEvent::Skipped {
                    path: path.clone(),
                    reason: SkipReason::DoesNotExist,
                });
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let previous = baseline.insert(path.clone(), sha256.clone());

        events.push(UpdateEvent::Hashed {
            path: path.clone(),
            sha256,
            previously_tracked: previous.is_some(),
        });
    }

    Ok(events)
}

fn finish(
    store: &BaselineStore,
    baseline: Baseline,
    events: Vec<UpdateEvent>,
    options: UpdateOptions,
) -> Result<UpdateReport, UpdateError> {
    let report = UpdateReport {
        events,
        tracked: baseline.len(),
    };

    if options.strict {
        let skipped = report.skipped();
        if !skipped.is_empty() {
            return Err(UpdateError::Skipped(skipped));
        }
    }

    for event in &report.events {
        log_event(event);
    }

    if !options.dry_run {
        store.save(&baseline)?;
    }

    Ok(report)
}

fn log_event(event: &UpdateEvent) {
    match event {
        UpdateEvent::Hashed {
            path,
            sha256,
            previously_tracked: false,
        } => info!("Tracking {} ({})", path, sha256),
        UpdateEvent::Hashed {
            path,
            sha256,
            previously_tracked: true,
        } => info!("Re-baselined {} ({})", path, sha256),
        UpdateEvent::Removed { path } => info!("Stopped tracking {}", path),
        UpdateEvent::Skipped { path, reason } => warn!("Skipped {} ({})", path, reason),
    }
}
