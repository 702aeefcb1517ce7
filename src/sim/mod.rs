pub mod driver;
pub mod job;
pub mod report;

pub use driver::{Sim, SimOutcome, run_policy};
pub use job::{GeneratorConfig, Job, JobId, Workload, WorkloadError, WorkloadSource};
pub use report::{PolicySummary, ProcessMetrics};
