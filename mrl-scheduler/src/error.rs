use common::{JobId, Task, TaskKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Scheduler is already started")]
    AlreadyStarted,

    #[error("Scheduler is not started")]
    NotStarted,
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

/// A job failed while handing out a task.
///
/// Assignment stops at the first failure. The tasks granted before it are
/// kept in `granted`: their jobs have already marked them as scheduled, so
/// the caller must either dispatch them or let them time out.
#[derive(Error, Debug)]
#[error(
    "Failed to obtain {kind} task from {job_id}: {} task(s) granted before failure",
    .granted.len()
)]
pub struct AssignError {
    /// Job whose obtain call failed.
    pub job_id: JobId,

    /// Phase that was being filled.
    pub kind: TaskKind,

    /// Tasks granted before the failure, in grant order.
    pub granted: Vec<Task>,

    #[source]
    pub source: anyhow::Error,
}

impl AssignError {
    pub fn new(job_id: JobId, kind: TaskKind, granted: Vec<Task>, source: anyhow::Error) -> Self {
        Self {
            job_id,
            kind,
            granted,
            source,
        }
    }

    /// Consumes the error and returns the tasks that were granted anyway.
    pub fn into_granted(self) -> Vec<Task> {
        self.granted
    }
}
