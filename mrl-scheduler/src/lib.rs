//! Round-robin task scheduler for a MapReduce job tracker.
//!
//! Jobs enter and leave the [`JobRegistry`] through lifecycle notifications
//! ([`JobListener`]). When a task tracker heartbeats with free slots, the
//! [`RoundRobinAssigner`] walks the registered jobs in registration order and
//! asks each running job for one task at a time, first for map slots and then
//! for reduce slots, until the tracker is full or no job has anything left.
//!
//! [`RoundRobinScheduler`] ties these together for the surrounding service.

pub mod assigner;
pub mod error;
pub mod job;
pub mod listener;
pub mod registry;
pub mod scheduler;

pub use assigner::RoundRobinAssigner;
pub use error::{AssignError, Result, SchedulerError};
pub use job::{Job, JobRef};
pub use listener::{JobChangeEvent, JobChangeKind, JobListener, RegistryListener};
pub use registry::JobRegistry;
pub use scheduler::{RoundRobinScheduler, TaskTrackerManager};
