use std::path::PathBuf;

use clap::Parser;

/// Run a simulated cluster against the round-robin scheduler.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Number of jobs submitted at startup.
    #[arg(short, long, default_value = "4")]
    pub jobs: u64,

    /// Map tasks per job.
    #[arg(short, long, default_value = "12", value_parser = clap::value_parser!(u32).range(1..))]
    pub maps: u32,

    /// Reduce tasks per job.
    #[arg(short, long, default_value = "3")]
    pub reduces: u32,

    /// Number of task trackers.
    #[arg(short, long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..))]
    pub nodes: u32,

    /// Number of hosts the trackers are spread over.
    #[arg(long, default_value = "2", value_parser = clap::value_parser!(u32).range(1..))]
    pub hosts: u32,

    /// Map slots per tracker.
    #[arg(long, default_value = "2")]
    pub map_slots: i32,

    /// Reduce slots per tracker.
    #[arg(long, default_value = "1")]
    pub reduce_slots: i32,

    /// Milliseconds between heartbeats of one tracker.
    #[arg(long, default_value = "50")]
    pub heartbeat_ms: u64,

    /// Maximum number of heartbeats per tracker.
    #[arg(long, default_value = "200")]
    pub rounds: u32,

    /// Chance that a running task finishes between two heartbeats.
    #[arg(long, default_value = "0.5", value_parser = parse_probability)]
    pub completion_rate: f64,

    /// Chance that a job fails to hand out a task it has.
    #[arg(long, default_value = "0.0", value_parser = parse_probability)]
    pub obtain_failure_rate: f64,

    /// Seed for every random choice in the run.
    #[arg(long, default_value = "1234")]
    pub seed: u64,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Write the JSON summary here instead of stdout.
    #[arg(short, long)]
    pub summary: Option<PathBuf>,
}

fn parse_probability(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not between 0 and 1"))
    }
}
