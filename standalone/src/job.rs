//! A job that hands out a fixed number of map and reduce partitions.

use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::bail;
use common::{ClusterSize, JobId, JobState, NodeStatus, Task, TaskKind};
use mrl_scheduler::{Job, JobChangeEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

#[derive(Debug)]
struct Progress {
    state: JobState,
    next_map: u32,
    next_reduce: u32,
    maps_done: u32,
    reduces_done: u32,
}

/// Counts shown in the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub job_id: String,
    pub state: JobState,
    pub maps: u32,
    pub reduces: u32,
    pub maps_completed: u32,
    pub reduces_completed: u32,
}

#[derive(Debug)]
pub struct SimJob {
    id: JobId,
    maps: u32,
    reduces: u32,

    /// Chance that an obtain call fails instead of handing out a task.
    failure_rate: f64,

    progress: Mutex<Progress>,
    rng: Mutex<StdRng>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn fraction(done: u32, total: u32) -> f32 {
    if total == 0 {
        1.0
    } else {
        done as f32 / total as f32
    }
}

impl SimJob {
    pub fn new(id: JobId, maps: u32, reduces: u32, failure_rate: f64, seed: u64) -> Self {
        Self {
            id,
            maps,
            reduces,
            failure_rate,
            progress: Mutex::new(Progress {
                state: JobState::Prep,
                next_map: 0,
                next_reduce: 0,
                maps_done: 0,
                reduces_done: 0,
            }),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Move from `Prep` to `Running`.
    pub fn start(&self) -> Option<JobChangeEvent> {
        let mut progress = lock(&self.progress);
        if progress.state != JobState::Prep {
            return None;
        }
        progress.state = JobState::Running;
        Some(JobChangeEvent::run_state_changed(
            self.id,
            JobState::Prep,
            JobState::Running,
        ))
    }

    /// Record a finished task. Returns the resulting change events, ending
    /// with a run-state change once the last task is done.
    pub fn complete(&self, task: &Task) -> Vec<JobChangeEvent> {
        let mut progress = lock(&self.progress);
        if progress.state != JobState::Running {
            return Vec::new();
        }

        match task.kind {
            TaskKind::Map => progress.maps_done = (progress.maps_done + 1).min(self.maps),
            TaskKind::Reduce => {
                progress.reduces_done = (progress.reduces_done + 1).min(self.reduces)
            }
        }

        let mut events = vec![JobChangeEvent::progress_changed(
            self.id,
            fraction(progress.maps_done, self.maps),
            fraction(progress.reduces_done, self.reduces),
        )];

        if progress.maps_done == self.maps && progress.reduces_done == self.reduces {
            progress.state = JobState::Succeeded;
            events.push(JobChangeEvent::run_state_changed(
                self.id,
                JobState::Running,
                JobState::Succeeded,
            ));
        }
        events
    }

    pub fn summary(&self) -> JobSummary {
        let progress = lock(&self.progress);
        JobSummary {
            job_id: self.id.to_string(),
            state: progress.state,
            maps: self.maps,
            reduces: self.reduces,
            maps_completed: progress.maps_done,
            reduces_completed: progress.reduces_done,
        }
    }

    fn roll_failure(&self) -> bool {
        self.failure_rate > 0.0 && lock(&self.rng).gen_bool(self.failure_rate)
    }
}

impl Job for SimJob {
    fn id(&self) -> JobId {
        self.id
    }

    fn run_state(&self) -> JobState {
        lock(&self.progress).state
    }

    fn obtain_map_task(
        &self,
        status: &NodeStatus,
        _cluster: ClusterSize,
    ) -> anyhow::Result<Option<Task>> {
        let mut progress = lock(&self.progress);
        if progress.state != JobState::Running || progress.next_map >= self.maps {
            return Ok(None);
        }
        if self.roll_failure() {
            bail!("{}: map split {} unavailable", self.id, progress.next_map);
        }

        let task = Task::new(self.id, TaskKind::Map, progress.next_map, status.tracker.clone());
        progress.next_map += 1;
        Ok(Some(task))
    }

    /// Reduces are released once every map has completed.
    fn obtain_reduce_task(
        &self,
        status: &NodeStatus,
        _cluster: ClusterSize,
    ) -> anyhow::Result<Option<Task>> {
        let mut progress = lock(&self.progress);
        if progress.state != JobState::Running
            || progress.maps_done < self.maps
            || progress.next_reduce >= self.reduces
        {
            return Ok(None);
        }
        if self.roll_failure() {
            bail!("{}: reduce partition {} unavailable", self.id, progress.next_reduce);
        }

        let task = Task::new(
            self.id,
            TaskKind::Reduce,
            progress.next_reduce,
            status.tracker.clone(),
        );
        progress.next_reduce += 1;
        Ok(Some(task))
    }
}
