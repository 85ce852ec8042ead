//! Local MapReduce cluster simulation driving the round-robin scheduler.
//!
//! Jobs are submitted up front, then every simulated tracker heartbeats on
//! its own tokio task until all jobs are done or the round limit is hit.

mod args;
mod cluster;
mod job;
mod node;
mod summary;

use std::sync::Arc;
use std::time::Duration;

use args::Args;
use clap::Parser;
use cluster::{NodeSpec, SimCluster};
use common::JobId;
use job::SimJob;
use mrl_scheduler::RoundRobinScheduler;
use node::{run_node, NodeConfig};
use summary::Summary;
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn simulate(args: &Args) -> anyhow::Result<Summary> {
    let nodes = NodeSpec::layout(args.nodes, args.hosts, args.map_slots, args.reduce_slots);
    let cluster = Arc::new(SimCluster::new(nodes));
    let scheduler = Arc::new(RoundRobinScheduler::new(cluster.clone()));
    scheduler.start()?;

    for i in 0..args.jobs {
        let id = JobId::new(i + 1);
        cluster.submit(Arc::new(SimJob::new(
            id,
            args.maps,
            args.reduces,
            args.obtain_failure_rate,
            args.seed.wrapping_add(id.as_u64()),
        )));
    }

    let config = NodeConfig {
        heartbeat: Duration::from_millis(args.heartbeat_ms),
        rounds: args.rounds,
        completion_rate: args.completion_rate,
    };

    let handles: Vec<_> = cluster
        .nodes()
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, spec)| {
            let seed = args.seed ^ ((i as u64 + 1) << 32);
            tokio::spawn(run_node(
                spec,
                scheduler.clone(),
                cluster.clone(),
                config.clone(),
                seed,
            ))
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(handle.await?);
    }

    scheduler.stop()?;
    Ok(Summary::collect(&cluster, reports))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&args.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        jobs = args.jobs,
        nodes = args.nodes,
        hosts = args.hosts,
        "Starting simulation"
    );

    let summary = simulate(&args).await?;
    info!(
        granted = summary.tasks_granted(),
        all_jobs_finished = summary.all_jobs_finished,
        "Simulation finished"
    );
    summary.write(args.summary.as_deref())?;

    Ok(())
}
