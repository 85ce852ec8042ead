use std::sync::Arc;

use common::{ClusterSize, JobId, JobState, NodeStatus, Task, TaskKind};
use tracing::{debug, info};

use crate::error::AssignError;
use crate::registry::JobRegistry;

/// A job's obtain call failed part-way through a phase.
struct ObtainFailure {
    job_id: JobId,
    source: anyhow::Error,
}

/// Hands out tasks to a tracker one slot at a time, cycling through the
/// registered jobs.
#[derive(Debug, Clone)]
pub struct RoundRobinAssigner {
    registry: Arc<JobRegistry>,
}

impl RoundRobinAssigner {
    pub fn new(registry: Arc<JobRegistry>) -> Self {
        Self { registry }
    }

    /// Fill the free map slots of the tracker, then its free reduce slots.
    ///
    /// The returned tasks are in grant order, so every map task comes before
    /// every reduce task. The first failing obtain call aborts both phases;
    /// see [`AssignError`] for what happens to the tasks granted before it.
    pub fn assign(
        &self,
        status: &NodeStatus,
        cluster: ClusterSize,
    ) -> Result<Vec<Task>, AssignError> {
        debug!(
            tracker = %status.tracker,
            free_maps = status.free_slots(TaskKind::Map),
            free_reduces = status.free_slots(TaskKind::Reduce),
            "Assigning tasks"
        );

        let mut assigned = Vec::new();
        for kind in TaskKind::ALL {
            match self.fill_slots(kind, status, cluster, &mut assigned) {
                Ok(granted) => {
                    debug!(tracker = %status.tracker, %kind, granted, "Phase complete");
                }
                Err(failure) => {
                    return Err(AssignError::new(
                        failure.job_id,
                        kind,
                        assigned,
                        failure.source,
                    ));
                }
            }
        }

        info!(tracker = %status.tracker, count = assigned.len(), "Assigned tasks");
        Ok(assigned)
    }

    /// One phase. Every walk starts from a fresh snapshot; a walk that grants
    /// nothing ends the phase even if slots are left.
    fn fill_slots(
        &self,
        kind: TaskKind,
        status: &NodeStatus,
        cluster: ClusterSize,
        assigned: &mut Vec<Task>,
    ) -> Result<usize, ObtainFailure> {
        let mut capacity = status.free_slots(kind);
        let mut granted = 0;

        while capacity > 0 {
            let mut granted_this_walk = 0;

            for job in self.registry.snapshot() {
                if job.run_state() != JobState::Running {
                    continue;
                }

                let task = job
                    .obtain_task(kind, status, cluster)
                    .map_err(|source| ObtainFailure {
                        job_id: job.id(),
                        source,
                    })?;

                if let Some(task) = task {
                    assigned.push(task);
                    granted_this_walk += 1;
                    capacity -= 1;
                    if capacity == 0 {
                        break;
                    }
                }
            }

            if granted_this_walk == 0 {
                debug!(tracker = %status.tracker, %kind, capacity, "No job has work, slots left idle");
                break;
            }
            granted += granted_this_walk;
        }

        Ok(granted)
    }
}
