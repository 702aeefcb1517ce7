use std::{fs, path::Path, path::PathBuf};

use log::debug;
use rand::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::core::Ticks;

pub type JobId = u64;

#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("workload has no processes")]
    Empty,

    #[error("process ids must be 0..{count} without gaps; expected {expected}, found {found}")]
    NonContiguousId {
        count: usize,
        expected: JobId,
        found: JobId,
    },

    #[error("process {0} needs no CPU time")]
    ZeroServiceTime(JobId),

    #[error("simulated time would overflow: process {0} cannot finish before the clock wraps")]
    TimeOverflow(JobId),

    #[error("{name} must be a positive, finite rate (got {value})")]
    InvalidRate { name: &'static str, value: f64 },

    #[error("failed to read workload: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed workload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Process descriptor as handed over by whoever builds the workload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
}

fn default_arrival_rate() -> f64 {
    0.5
}

fn default_service_rate() -> f64 {
    0.2
}

/// Poisson arrivals with exponentially distributed service times.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratorConfig {
    pub count: usize,
    // Mean arrivals per tick
    #[serde(default = "default_arrival_rate")]
    pub arrival_rate: f64,
    // Inverse of the mean service time
    #[serde(default = "default_service_rate")]
    pub service_rate: f64,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadSource {
    Processes(Vec<Job>),
    Generate(GeneratorConfig),
    File(PathBuf),
}

impl WorkloadSource {
    /// Anchor a relative `File` path at `base`; other sources are untouched.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        if let WorkloadSource::File(path) = self {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    // Sorted by id, which is also the index
    jobs: Vec<Job>,
}

impl Workload {
    pub fn new(mut jobs: Vec<Job>) -> Result<Self, WorkloadError> {
        if jobs.is_empty() {
            return Err(WorkloadError::Empty);
        }

        jobs.sort_by_key(|job| job.id);
        let count = jobs.len();
        for (expected, job) in jobs.iter().enumerate() {
            if job.id != expected as JobId {
                return Err(WorkloadError::NonContiguousId {
                    count,
                    expected: expected as JobId,
                    found: job.id,
                });
            }
            if job.service_time == 0 {
                return Err(WorkloadError::ZeroServiceTime(job.id));
            }
        }

        // Latest arrival plus all service bounds every clock value of a run
        let mut horizon = jobs.iter().map(|job| job.arrival_time).max().unwrap_or(0);
        for job in &jobs {
            horizon = horizon
                .checked_add(job.service_time)
                .ok_or(WorkloadError::TimeOverflow(job.id))?;
        }

        Ok(Self { jobs })
    }

    /// Parse a JSON array of `{id, arrival_time, service_time}` objects.
    pub fn from_json_str(json: &str) -> Result<Self, WorkloadError> {
        let jobs: Vec<Job> = serde_json::from_str(json)?;
        Self::new(jobs)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorkloadError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn from_source(source: &WorkloadSource) -> Result<Self, WorkloadError> {
        match source {
            WorkloadSource::Processes(jobs) => Self::new(jobs.clone()),
            WorkloadSource::Generate(config) => Self::generate(config),
            WorkloadSource::File(path) => Self::load(path),
        }
    }

    pub fn generate(config: &GeneratorConfig) -> Result<Self, WorkloadError> {
        for (name, value) in [
            ("arrival_rate", config.arrival_rate),
            ("service_rate", config.service_rate),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(WorkloadError::InvalidRate { name, value });
            }
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut clock = 0.0_f64;
        let mut jobs = Vec::with_capacity(config.count);

        for id in 0..config.count {
            clock += exponential(&mut rng, config.arrival_rate);
            let service = exponential(&mut rng, config.service_rate).ceil().max(1.0);
            jobs.push(Job {
                id: id as JobId,
                arrival_time: clock.round() as Ticks,
                service_time: service as Ticks,
            });
        }

        debug!(
            "generated {} jobs (seed {}, arrival rate {}, service rate {})",
            jobs.len(),
            config.seed,
            config.arrival_rate,
            config.service_rate
        );
        Self::new(jobs)
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Jobs by arrival time, lower id first among simultaneous arrivals.
    pub fn arrival_order(&self) -> Vec<&Job> {
        let mut order: Vec<&Job> = self.jobs.iter().collect();
        order.sort_by(|a, b| {
            a.arrival_time
                .cmp(&b.arrival_time)
                .then_with(|| a.id.cmp(&b.id))
        });
        order
    }
}

// Inverse transform sampling; 1 - u keeps ln() away from zero
fn exponential(rng: &mut StdRng, rate: f64) -> f64 {
    -(1.0 - rng.random::<f64>()).ln() / rate
}
