use std::fmt;

use serde::{Deserialize, Serialize};

use crate::task::TaskKind;

/// Slot report sent by a task tracker on each heartbeat.
///
/// Counters are signed so that a broken report (negative or inverted
/// counts) can still be represented; [`NodeStatus::free_slots`] clamps
/// such reports to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
    /// Unique tracker name, e.g. `tracker_host1:50060`.
    pub tracker: String,

    /// Host the tracker runs on. Several trackers may share a host.
    pub host: String,

    pub max_map_slots: i32,
    pub occupied_map_slots: i32,
    pub max_reduce_slots: i32,
    pub occupied_reduce_slots: i32,
}

impl NodeStatus {
    /// An idle tracker with the given slot counts.
    pub fn new(
        tracker: impl Into<String>,
        host: impl Into<String>,
        max_map_slots: i32,
        max_reduce_slots: i32,
    ) -> Self {
        Self {
            tracker: tracker.into(),
            host: host.into(),
            max_map_slots,
            occupied_map_slots: 0,
            max_reduce_slots,
            occupied_reduce_slots: 0,
        }
    }

    pub fn with_occupied(mut self, map: i32, reduce: i32) -> Self {
        self.occupied_map_slots = map;
        self.occupied_reduce_slots = reduce;
        self
    }

    pub fn max_slots(&self, kind: TaskKind) -> i32 {
        match kind {
            TaskKind::Map => self.max_map_slots,
            TaskKind::Reduce => self.max_reduce_slots,
        }
    }

    pub fn occupied_slots(&self, kind: TaskKind) -> i32 {
        match kind {
            TaskKind::Map => self.occupied_map_slots,
            TaskKind::Reduce => self.occupied_reduce_slots,
        }
    }

    /// Number of slots of `kind` that can take a new task.
    ///
    /// Negative counters or more occupied than maximum slots yield zero.
    pub fn free_slots(&self, kind: TaskKind) -> usize {
        let max = i64::from(self.max_slots(kind)).max(0);
        let occupied = i64::from(self.occupied_slots(kind)).max(0);
        usize::try_from(max - occupied).unwrap_or(0)
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (map {}/{}, reduce {}/{})",
            self.tracker,
            self.occupied_map_slots,
            self.max_map_slots,
            self.occupied_reduce_slots,
            self.max_reduce_slots
        )
    }
}

/// Cluster-wide counts handed through to every job's obtain-task call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSize {
    /// Number of live task trackers.
    pub total_nodes: usize,

    /// Number of distinct hosts among those trackers.
    pub unique_hosts: usize,
}

impl ClusterSize {
    pub fn new(total_nodes: usize, unique_hosts: usize) -> Self {
        Self {
            total_nodes,
            unique_hosts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_slots_per_kind() {
        let status = NodeStatus::new("t1", "h1", 4, 2).with_occupied(1, 2);
        assert_eq!(status.free_slots(TaskKind::Map), 3);
        assert_eq!(status.free_slots(TaskKind::Reduce), 0);
    }

    #[test]
    fn invalid_counters_clamp_to_zero() {
        let status = NodeStatus::new("t1", "h1", -3, 2).with_occupied(0, 5);
        assert_eq!(status.free_slots(TaskKind::Map), 0);
        assert_eq!(status.free_slots(TaskKind::Reduce), 0);

        // A negative occupied count is not extra capacity.
        let status = NodeStatus::new("t1", "h1", 2, 2).with_occupied(-4, 0);
        assert_eq!(status.free_slots(TaskKind::Map), 2);
    }

    #[test]
    fn extreme_counters_do_not_overflow() {
        let status = NodeStatus::new("t1", "h1", i32::MAX, 0).with_occupied(i32::MIN, 0);
        assert_eq!(status.free_slots(TaskKind::Map), i32::MAX as usize);
    }
}
