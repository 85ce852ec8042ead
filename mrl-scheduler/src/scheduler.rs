use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use common::{ClusterSize, NodeStatus, Task};
use tracing::info;

use crate::assigner::RoundRobinAssigner;
use crate::error::{AssignError, Result, SchedulerError};
use crate::job::JobRef;
use crate::listener::{JobListener, RegistryListener};
use crate::registry::JobRegistry;

/// The job tracker side the scheduler plugs into.
pub trait TaskTrackerManager: Send + Sync {
    /// Live tracker count and distinct host count.
    fn cluster_size(&self) -> ClusterSize;

    fn add_job_listener(&self, listener: Arc<dyn JobListener>);

    /// Detach a listener previously passed to `add_job_listener`.
    fn remove_job_listener(&self, listener: &Arc<dyn JobListener>);
}

/// Round-robin scheduler owned by the job tracker.
///
/// Jobs are tracked between [`start`](Self::start) and [`stop`](Self::stop).
/// [`assign_tasks`](Self::assign_tasks) may be called from any number of
/// heartbeat handlers at once.
pub struct RoundRobinScheduler {
    manager: Arc<dyn TaskTrackerManager>,
    registry: Arc<JobRegistry>,
    assigner: RoundRobinAssigner,
    listener: Arc<dyn JobListener>,
    started: Arc<AtomicBool>,
}

impl RoundRobinScheduler {
    pub fn new(manager: Arc<dyn TaskTrackerManager>) -> Self {
        let registry = Arc::new(JobRegistry::new());
        let started = Arc::new(AtomicBool::new(false));
        let listener: Arc<dyn JobListener> =
            Arc::new(RegistryListener::new(registry.clone(), started.clone()));
        Self {
            manager,
            assigner: RoundRobinAssigner::new(registry.clone()),
            registry,
            listener,
            started,
        }
    }

    /// Start receiving job lifecycle notifications.
    pub fn start(&self) -> Result<()> {
        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SchedulerError::AlreadyStarted);
        }

        // Drop anything a late notification slipped in while stopped.
        self.registry.clear();
        info!("Start round robin scheduler");
        self.manager.add_job_listener(self.listener.clone());
        Ok(())
    }

    /// Stop receiving notifications and forget every registered job.
    ///
    /// Additions delivered afterwards through a listener clone the manager
    /// still holds are ignored.
    pub fn stop(&self) -> Result<()> {
        if self
            .started
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SchedulerError::NotStarted);
        }

        self.manager.remove_job_listener(&self.listener);
        let dropped = self.registry.len();
        self.registry.clear();
        info!(dropped, "Stop round robin scheduler");
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Tasks for the tracker that sent `status`, map tasks first.
    pub fn assign_tasks(&self, status: &NodeStatus) -> std::result::Result<Vec<Task>, AssignError> {
        let cluster = self.manager.cluster_size();
        self.assigner.assign(status, cluster)
    }

    /// Jobs currently registered, in round-robin order.
    pub fn list_jobs(&self) -> Vec<JobRef> {
        self.registry.snapshot()
    }

    pub fn registry(&self) -> &Arc<JobRegistry> {
        &self.registry
    }

    /// The listener attached to the manager while started.
    pub fn listener(&self) -> &Arc<dyn JobListener> {
        &self.listener
    }
}

impl std::fmt::Debug for RoundRobinScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundRobinScheduler")
            .field("registry", &self.registry)
            .field("started", &self.is_started())
            .finish()
    }
}
