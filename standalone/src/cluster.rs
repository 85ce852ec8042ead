use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use common::{ClusterSize, JobId, NodeStatus, Task, TaskKind};
use dashmap::DashMap;
use mrl_scheduler::{Job, JobChangeEvent, JobChangeKind, JobListener, JobRef, TaskTrackerManager};
use tracing::{info, warn};

use crate::job::SimJob;

/// Static description of a simulated task tracker.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub tracker: String,
    pub host: String,
    pub map_slots: i32,
    pub reduce_slots: i32,
}

impl NodeSpec {
    /// `nodes` trackers spread round-robin over `hosts` hosts.
    pub fn layout(nodes: u32, hosts: u32, map_slots: i32, reduce_slots: i32) -> Vec<NodeSpec> {
        (0..nodes)
            .map(|i| {
                let host = format!("host{}", i % hosts.max(1));
                NodeSpec {
                    tracker: format!("tracker_{}:{}", host, 50060 + i),
                    host,
                    map_slots,
                    reduce_slots,
                }
            })
            .collect()
    }

    /// Heartbeat report with `running` occupying slots.
    pub fn status(&self, running: &[Task]) -> NodeStatus {
        let occupied = |kind: TaskKind| running.iter().filter(|t| t.kind == kind).count() as i32;
        NodeStatus::new(&self.tracker, &self.host, self.map_slots, self.reduce_slots)
            .with_occupied(occupied(TaskKind::Map), occupied(TaskKind::Reduce))
    }
}

/// In-process job tracker: owns the submitted jobs and delivers their
/// lifecycle notifications to the attached listeners.
pub struct SimCluster {
    nodes: Vec<NodeSpec>,
    jobs: DashMap<JobId, Arc<SimJob>>,
    listeners: RwLock<Vec<Arc<dyn JobListener>>>,
}

impl SimCluster {
    pub fn new(nodes: Vec<NodeSpec>) -> Self {
        Self {
            nodes,
            jobs: DashMap::new(),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn nodes(&self) -> &[NodeSpec] {
        &self.nodes
    }

    fn listeners(&self) -> Vec<Arc<dyn JobListener>> {
        self.listeners
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn notify_updated(&self, event: &JobChangeEvent) {
        for listener in self.listeners() {
            listener.job_updated(event);
        }
    }

    /// Accept a job and start it.
    pub fn submit(&self, job: Arc<SimJob>) {
        let handle: JobRef = job.clone();
        info!(job_id = %handle.id(), "Job submitted");
        self.jobs.insert(handle.id(), job.clone());

        for listener in self.listeners() {
            listener.job_added(Some(handle.clone()));
        }
        if let Some(event) = job.start() {
            self.notify_updated(&event);
        }
    }

    /// A tracker reports `task` as done. Retires the job after its last task.
    pub fn complete(&self, task: &Task) {
        let Some(job) = self.jobs.get(&task.job_id).map(|entry| entry.value().clone()) else {
            warn!(task = %task.attempt_name(), "Completion for unknown job");
            return;
        };

        let events = job.complete(task);
        for event in &events {
            self.notify_updated(event);
        }

        let finished = events.iter().any(|event| {
            matches!(event.kind, JobChangeKind::RunStateChanged { to, .. } if to.is_terminal())
        });
        if finished {
            let handle: JobRef = job;
            info!(job_id = %handle.id(), "Job finished");
            for listener in self.listeners() {
                listener.job_removed(&handle);
            }
        }
    }

    pub fn all_jobs_finished(&self) -> bool {
        self.jobs
            .iter()
            .all(|entry| entry.value().run_state().is_terminal())
    }

    /// Every submitted job, by id.
    pub fn jobs(&self) -> Vec<Arc<SimJob>> {
        let mut jobs: Vec<(JobId, Arc<SimJob>)> = self
            .jobs
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        jobs.sort_by_key(|(id, _)| *id);
        jobs.into_iter().map(|(_, job)| job).collect()
    }
}

impl TaskTrackerManager for SimCluster {
    fn cluster_size(&self) -> ClusterSize {
        let hosts: HashSet<&str> = self.nodes.iter().map(|n| n.host.as_str()).collect();
        ClusterSize::new(self.nodes.len(), hosts.len())
    }

    fn add_job_listener(&self, listener: Arc<dyn JobListener>) {
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(listener);
    }

    fn remove_job_listener(&self, listener: &Arc<dyn JobListener>) {
        self.listeners
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|l| !std::ptr::addr_eq(Arc::as_ptr(l), Arc::as_ptr(listener)));
    }
}
