use std::fs;
use std::path::Path;

use anyhow::Context;
use common::ClusterSize;
use mrl_scheduler::TaskTrackerManager;
use serde::Serialize;
use tracing::info;

use crate::cluster::SimCluster;
use crate::job::JobSummary;
use crate::node::NodeReport;

#[derive(Debug, Serialize)]
pub struct Summary {
    pub cluster: ClusterSize,
    pub all_jobs_finished: bool,
    pub jobs: Vec<JobSummary>,
    pub nodes: Vec<NodeReport>,
}

impl Summary {
    pub fn collect(cluster: &SimCluster, nodes: Vec<NodeReport>) -> Self {
        Self {
            cluster: cluster.cluster_size(),
            all_jobs_finished: cluster.all_jobs_finished(),
            jobs: cluster.jobs().iter().map(|job| job.summary()).collect(),
            nodes,
        }
    }

    pub fn tasks_granted(&self) -> u32 {
        self.nodes
            .iter()
            .map(|node| node.map_tasks + node.reduce_tasks)
            .sum()
    }

    /// Print as JSON, or write to `path` when given.
    pub fn write(&self, path: Option<&Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        match path {
            Some(path) => {
                fs::write(path, json)
                    .with_context(|| format!("writing summary to {}", path.display()))?;
                info!("Summary written to {}", path.display());
            }
            None => println!("{}", json),
        }
        Ok(())
    }
}
