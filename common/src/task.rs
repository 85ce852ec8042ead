use std::fmt;

use serde::{Deserialize, Serialize};

use crate::job::JobId;

/// The two kinds of work a job produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    Map,
    Reduce,
}

impl TaskKind {
    /// Phases in the order the scheduler fills them.
    pub const ALL: [TaskKind; 2] = [TaskKind::Map, TaskKind::Reduce];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Map => "map",
            TaskKind::Reduce => "reduce",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A unit of work granted to a task tracker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    /// The job the task belongs to.
    pub job_id: JobId,

    /// Map or reduce.
    pub kind: TaskKind,

    /// Partition index inside the job (input split for maps, reduce id for reduces).
    pub index: u32,

    /// Attempt number for this partition, starting at 0.
    pub attempt: u32,

    /// Name of the tracker the task was granted to.
    pub tracker: String,
}

impl Task {
    pub fn new(job_id: JobId, kind: TaskKind, index: u32, tracker: impl Into<String>) -> Self {
        Self {
            job_id,
            kind,
            index,
            attempt: 0,
            tracker: tracker.into(),
        }
    }

    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = attempt;
        self
    }

    /// Hadoop-style attempt name, e.g. `attempt_0003_m_000012_0`.
    pub fn attempt_name(&self) -> String {
        let kind = match self.kind {
            TaskKind::Map => 'm',
            TaskKind::Reduce => 'r',
        };
        format!(
            "attempt_{:04}_{}_{:06}_{}",
            self.job_id.as_u64(),
            kind,
            self.index,
            self.attempt
        )
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.attempt_name(), self.tracker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_name_encodes_kind_and_partition() {
        let task = Task::new(JobId::new(3), TaskKind::Map, 12, "tracker_a").with_attempt(1);
        assert_eq!(task.attempt_name(), "attempt_0003_m_000012_1");

        let task = Task::new(JobId::new(3), TaskKind::Reduce, 0, "tracker_a");
        assert_eq!(task.to_string(), "attempt_0003_r_000000_0 on tracker_a");
    }
}
