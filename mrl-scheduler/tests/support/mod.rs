#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use common::{ClusterSize, JobId, JobState, NodeStatus, Task, TaskKind};
use mrl_scheduler::{Job, JobListener, JobRef, TaskTrackerManager};

/// How a fake job answers obtain calls for one task kind.
#[derive(Debug, Clone)]
pub enum Supply {
    /// Always has a task.
    Always,
    /// Has this many tasks, then none.
    Limited(u32),
    /// Never has a task.
    Never,
    /// Task, none, task, none, ... starting with a task.
    Alternate,
    /// Grants this many tasks, then every call fails.
    FailAfter(u32),
}

#[derive(Debug)]
struct Side {
    supply: Supply,
    calls: u32,
    granted: u32,
}

impl Side {
    fn new(supply: Supply) -> Self {
        Self {
            supply,
            calls: 0,
            granted: 0,
        }
    }
}

#[derive(Debug)]
pub struct FakeJob {
    id: JobId,
    state: Mutex<JobState>,
    map: Mutex<Side>,
    reduce: Mutex<Side>,
    map_calls: AtomicUsize,
    reduce_calls: AtomicUsize,
    clusters_seen: Mutex<Vec<ClusterSize>>,
}

impl FakeJob {
    pub fn new(id: u64, state: JobState, map: Supply, reduce: Supply) -> Arc<Self> {
        Arc::new(Self {
            id: JobId::new(id),
            state: Mutex::new(state),
            map: Mutex::new(Side::new(map)),
            reduce: Mutex::new(Side::new(reduce)),
            map_calls: AtomicUsize::new(0),
            reduce_calls: AtomicUsize::new(0),
            clusters_seen: Mutex::new(Vec::new()),
        })
    }

    pub fn running(id: u64, map: Supply, reduce: Supply) -> Arc<Self> {
        Self::new(id, JobState::Running, map, reduce)
    }

    pub fn handle(self: &Arc<Self>) -> JobRef {
        self.clone()
    }

    pub fn set_state(&self, state: JobState) {
        *self.state.lock().unwrap() = state;
    }

    pub fn map_calls(&self) -> usize {
        self.map_calls.load(Ordering::SeqCst)
    }

    pub fn reduce_calls(&self) -> usize {
        self.reduce_calls.load(Ordering::SeqCst)
    }

    pub fn clusters_seen(&self) -> Vec<ClusterSize> {
        self.clusters_seen.lock().unwrap().clone()
    }

    fn obtain(
        &self,
        side: &Mutex<Side>,
        kind: TaskKind,
        status: &NodeStatus,
        cluster: ClusterSize,
    ) -> anyhow::Result<Option<Task>> {
        self.clusters_seen.lock().unwrap().push(cluster);

        let mut side = side.lock().unwrap();
        side.calls += 1;
        let grant = match side.supply {
            Supply::Always => true,
            Supply::Limited(n) => side.granted < n,
            Supply::Never => false,
            Supply::Alternate => side.calls % 2 == 1,
            Supply::FailAfter(n) => {
                if side.granted >= n {
                    return Err(anyhow!("{} lost its input split", self.id));
                }
                true
            }
        };

        if !grant {
            return Ok(None);
        }
        let index = side.granted;
        side.granted += 1;
        Ok(Some(Task::new(self.id, kind, index, status.tracker.clone())))
    }
}

impl Job for FakeJob {
    fn id(&self) -> JobId {
        self.id
    }

    fn run_state(&self) -> JobState {
        *self.state.lock().unwrap()
    }

    fn obtain_map_task(
        &self,
        status: &NodeStatus,
        cluster: ClusterSize,
    ) -> anyhow::Result<Option<Task>> {
        self.map_calls.fetch_add(1, Ordering::SeqCst);
        self.obtain(&self.map, TaskKind::Map, status, cluster)
    }

    fn obtain_reduce_task(
        &self,
        status: &NodeStatus,
        cluster: ClusterSize,
    ) -> anyhow::Result<Option<Task>> {
        self.reduce_calls.fetch_add(1, Ordering::SeqCst);
        self.obtain(&self.reduce, TaskKind::Reduce, status, cluster)
    }
}

/// Job tracker stand-in that records listeners and fans out notifications.
#[derive(Default)]
pub struct TestManager {
    cluster: Mutex<ClusterSize>,
    listeners: Mutex<Vec<Arc<dyn JobListener>>>,
}

impl TestManager {
    pub fn new(cluster: ClusterSize) -> Arc<Self> {
        Arc::new(Self {
            cluster: Mutex::new(cluster),
            listeners: Mutex::new(Vec::new()),
        })
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    fn listeners(&self) -> Vec<Arc<dyn JobListener>> {
        self.listeners.lock().unwrap().clone()
    }

    pub fn add_job(&self, job: Option<JobRef>) {
        for listener in self.listeners() {
            listener.job_added(job.clone());
        }
    }

    pub fn remove_job(&self, job: &JobRef) {
        for listener in self.listeners() {
            listener.job_removed(job);
        }
    }

    pub fn update_job(&self, event: &mrl_scheduler::JobChangeEvent) {
        for listener in self.listeners() {
            listener.job_updated(event);
        }
    }
}

impl TaskTrackerManager for TestManager {
    fn cluster_size(&self) -> ClusterSize {
        *self.cluster.lock().unwrap()
    }

    fn add_job_listener(&self, listener: Arc<dyn JobListener>) {
        self.listeners.lock().unwrap().push(listener);
    }

    fn remove_job_listener(&self, listener: &Arc<dyn JobListener>) {
        self.listeners
            .lock()
            .unwrap()
            .retain(|l| !std::ptr::addr_eq(Arc::as_ptr(l), Arc::as_ptr(listener)));
    }
}

pub fn tracker(map_slots: i32, reduce_slots: i32) -> NodeStatus {
    NodeStatus::new("tracker_host1:50060", "host1", map_slots, reduce_slots)
}

pub fn job_ids(tasks: &[Task]) -> Vec<u64> {
    tasks.iter().map(|t| t.job_id.as_u64()).collect()
}

pub fn count_kind(tasks: &[Task], kind: TaskKind) -> usize {
    tasks.iter().filter(|t| t.kind == kind).count()
}
