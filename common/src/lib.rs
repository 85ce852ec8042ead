//! Shared types for the round-robin MapReduce scheduler.
//!
//! Worker nodes (task trackers) report their free map and reduce slots on
//! every heartbeat. The scheduler hands out tasks from the jobs that are
//! currently running, one slot at a time, cycling through the jobs.

pub mod job;
pub mod node;
pub mod task;

pub use job::{JobId, JobState};
pub use node::{ClusterSize, NodeStatus};
pub use task::{Task, TaskKind};
