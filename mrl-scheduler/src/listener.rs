use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::{JobId, JobState};
use tracing::{debug, info, warn};

use crate::job::JobRef;
use crate::registry::JobRegistry;

/// What changed about a job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobChangeKind {
    RunStateChanged { from: JobState, to: JobState },

    /// Fraction of map and reduce tasks completed, each in `0.0..=1.0`.
    ProgressChanged { map_progress: f32, reduce_progress: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobChangeEvent {
    pub job_id: JobId,
    pub kind: JobChangeKind,
}

impl JobChangeEvent {
    pub fn run_state_changed(job_id: JobId, from: JobState, to: JobState) -> Self {
        Self {
            job_id,
            kind: JobChangeKind::RunStateChanged { from, to },
        }
    }

    pub fn progress_changed(job_id: JobId, map_progress: f32, reduce_progress: f32) -> Self {
        Self {
            job_id,
            kind: JobChangeKind::ProgressChanged {
                map_progress,
                reduce_progress,
            },
        }
    }
}

/// Job lifecycle notifications delivered by the job tracker.
pub trait JobListener: Send + Sync {
    /// A job was submitted. `None` is tolerated and ignored.
    fn job_added(&self, job: Option<JobRef>);

    /// A job was retired.
    fn job_removed(&self, job: &JobRef);

    /// Something about a job changed.
    fn job_updated(&self, event: &JobChangeEvent);
}

/// Keeps a [`JobRegistry`] in sync with lifecycle notifications.
///
/// Updates need no registry change: the run state is read from the job
/// itself when it is considered for a slot.
///
/// Additions are only applied while `attached` is set. A notifier may still
/// hold a clone of the listener after it was detached, and such late
/// additions must not repopulate the registry.
#[derive(Debug, Clone)]
pub struct RegistryListener {
    registry: Arc<JobRegistry>,
    attached: Arc<AtomicBool>,
}

impl RegistryListener {
    pub fn new(registry: Arc<JobRegistry>, attached: Arc<AtomicBool>) -> Self {
        Self { registry, attached }
    }
}

impl JobListener for RegistryListener {
    fn job_added(&self, job: Option<JobRef>) {
        match job {
            Some(job) if !self.attached.load(Ordering::Acquire) => {
                debug!(job_id = %job.id(), "Ignoring job added while detached");
            }
            Some(job) => {
                info!(job_id = %job.id(), "Add job");
                self.registry.register(job);
            }
            None => warn!("Ignoring job added notification without a job"),
        }
    }

    fn job_removed(&self, job: &JobRef) {
        info!(job_id = %job.id(), "Remove job");
        self.registry.deregister(job.id());
    }

    fn job_updated(&self, event: &JobChangeEvent) {
        debug!(job_id = %event.job_id, change = ?event.kind, "Job updated");
    }
}
