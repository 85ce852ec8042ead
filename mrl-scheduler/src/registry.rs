//! Registry of the jobs the scheduler may hand tasks from.
//!
//! Mutated by lifecycle notifications and read by every heartbeat, from any
//! number of threads at once. Backed by a sharded map so that readers and
//! writers only contend on a single shard for the duration of one insert,
//! remove or shard scan.

use std::sync::atomic::{AtomicU64, Ordering};

use common::JobId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::job::JobRef;

struct Registration {
    /// Position in the round-robin order. Assigned once, on first insertion.
    seq: u64,
    job: JobRef,
}

/// Concurrent set of registered jobs, keyed by [`JobId`].
///
/// Snapshots enumerate jobs in registration order, which stays the same from
/// one snapshot to the next while membership is unchanged.
pub struct JobRegistry {
    jobs: DashMap<JobId, Registration>,
    next_seq: AtomicU64,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Insert or replace a job.
    ///
    /// Replacing keeps the job's original position in the iteration order.
    /// Returns true if the id was not registered before.
    pub fn register(&self, job: JobRef) -> bool {
        let job_id = job.id();
        match self.jobs.entry(job_id) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().job = job;
                debug!(job_id = %job_id, "Job already registered, handle replaced");
                false
            }
            Entry::Vacant(entry) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                entry.insert(Registration { seq, job });
                debug!(job_id = %job_id, seq, "Job registered");
                true
            }
        }
    }

    /// Remove a job. Removing an unknown id is a no-op.
    pub fn deregister(&self, job_id: JobId) -> Option<JobRef> {
        let removed = self.jobs.remove(&job_id).map(|(_, reg)| reg.job);
        if removed.is_some() {
            debug!(job_id = %job_id, "Job deregistered");
        }
        removed
    }

    /// Current membership in registration order.
    ///
    /// Each call builds a new list from the start of the membership. Jobs
    /// registered or removed while the snapshot is being taken may or may
    /// not appear in it. No shard lock is held once this returns, so callers
    /// can call into the jobs freely.
    pub fn snapshot(&self) -> Vec<JobRef> {
        let mut entries: Vec<(u64, JobRef)> = self
            .jobs
            .iter()
            .map(|entry| (entry.seq, entry.job.clone()))
            .collect();
        entries.sort_unstable_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, job)| job).collect()
    }

    pub fn get(&self, job_id: JobId) -> Option<JobRef> {
        self.jobs.get(&job_id).map(|entry| entry.job.clone())
    }

    pub fn contains(&self, job_id: JobId) -> bool {
        self.jobs.contains_key(&job_id)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Drop every registration.
    pub fn clear(&self) {
        self.jobs.clear();
    }
}

impl std::fmt::Debug for JobRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<JobId> = self.snapshot().iter().map(|job| job.id()).collect();
        f.debug_struct("JobRegistry").field("jobs", &ids).finish()
    }
}
