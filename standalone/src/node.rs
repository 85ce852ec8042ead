use std::sync::Arc;
use std::time::Duration;

use common::{Task, TaskKind};
use mrl_scheduler::RoundRobinScheduler;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, warn};

use crate::cluster::{NodeSpec, SimCluster};

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub heartbeat: Duration,
    pub rounds: u32,

    /// Chance that a running task finishes before the next heartbeat.
    pub completion_rate: f64,
}

/// What one tracker did during the run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NodeReport {
    pub tracker: String,
    pub heartbeats: u32,
    pub map_tasks: u32,
    pub reduce_tasks: u32,
    pub completed: u32,
    pub failed_assigns: u32,
}

/// Heartbeat loop of one simulated tracker.
///
/// Each heartbeat finishes some running tasks, reports the free slots and
/// launches whatever the scheduler grants. Stops after `config.rounds`
/// heartbeats or once every job is finished and the tracker is idle.
pub async fn run_node(
    spec: NodeSpec,
    scheduler: Arc<RoundRobinScheduler>,
    cluster: Arc<SimCluster>,
    config: NodeConfig,
    seed: u64,
) -> NodeReport {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut running: Vec<Task> = Vec::new();
    let mut report = NodeReport {
        tracker: spec.tracker.clone(),
        ..Default::default()
    };
    let mut ticker = tokio::time::interval(config.heartbeat);

    for _ in 0..config.rounds {
        ticker.tick().await;
        report.heartbeats += 1;

        running.retain(|task| {
            if rng.gen_bool(config.completion_rate) {
                cluster.complete(task);
                report.completed += 1;
                false
            } else {
                true
            }
        });

        let status = spec.status(&running);
        let tasks = match scheduler.assign_tasks(&status) {
            Ok(tasks) => tasks,
            Err(err) => {
                report.failed_assigns += 1;
                warn!(tracker = %spec.tracker, error = %err, cause = %err.source, "Assign failed");
                // Already committed by their jobs, so launch them anyway.
                err.into_granted()
            }
        };

        for task in &tasks {
            debug!(tracker = %spec.tracker, task = %task.attempt_name(), "Launch task");
            match task.kind {
                TaskKind::Map => report.map_tasks += 1,
                TaskKind::Reduce => report.reduce_tasks += 1,
            }
        }
        running.extend(tasks);

        if running.is_empty() && cluster.all_jobs_finished() {
            break;
        }
    }

    report
}
