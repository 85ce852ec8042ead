use std::fmt;
use std::sync::Arc;

use common::{ClusterSize, JobId, JobState, NodeStatus, Task, TaskKind};

/// A job as seen by the scheduler.
///
/// The scheduler only reads the run state and asks for tasks. How a job picks
/// the split or partition it hands out is its own business, and so is making
/// sure that two trackers asking at the same time never get the same unit of
/// work.
pub trait Job: Send + Sync + fmt::Debug {
    /// Registry key. Must not change while the job is registered.
    fn id(&self) -> JobId;

    /// Current run state. Read on every selection attempt.
    fn run_state(&self) -> JobState;

    /// Hand out one map task for the tracker in `status`, or `None` if the
    /// job has no map work ready right now.
    fn obtain_map_task(
        &self,
        status: &NodeStatus,
        cluster: ClusterSize,
    ) -> anyhow::Result<Option<Task>>;

    /// Hand out one reduce task for the tracker in `status`, or `None` if the
    /// job has no reduce work ready right now.
    fn obtain_reduce_task(
        &self,
        status: &NodeStatus,
        cluster: ClusterSize,
    ) -> anyhow::Result<Option<Task>>;

    fn obtain_task(
        &self,
        kind: TaskKind,
        status: &NodeStatus,
        cluster: ClusterSize,
    ) -> anyhow::Result<Option<Task>> {
        match kind {
            TaskKind::Map => self.obtain_map_task(status, cluster),
            TaskKind::Reduce => self.obtain_reduce_task(status, cluster),
        }
    }
}

/// Shared handle to a job owned by the job tracker.
pub type JobRef = Arc<dyn Job>;
