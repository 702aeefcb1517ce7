pub mod config;
pub mod core;
pub mod scheduler;
pub mod sim;

pub use crate::config::{PreemptionGuard, SimConfig};
pub use crate::core::{Event, EventKind, Process, ProcessId, SchedCore, SimError};
pub use scheduler::{Policy, Scheduler};
pub use sim::{Job, Sim, SimOutcome, Workload, run_policy};
