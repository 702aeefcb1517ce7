//! Engine-wide knobs and the JSON run file that bundles them with a workload.

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::{core::Ticks, scheduler::Policy, sim::WorkloadSource};

pub const DEFAULT_QUANTUM: Ticks = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("quantum must be positive")]
    ZeroQuantum,

    #[error("run file lists no policies")]
    NoPolicies,

    #[error("failed to read run file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed run file: {0}")]
    Json(#[from] serde_json::Error),
}

/// How SRTF decides whether a shorter job may displace the current candidate.
///
/// The candidate is whichever eligible process the scan met first: the lowest
/// id by default, or the last dispatched process when
/// [`SimConfig::sticky_incumbent`] is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreemptionGuard {
    /// Keep the current candidate once its own remaining time is at most
    /// `context_switch_time`. With the default id-order scan this is the
    /// observed SRTF behavior.
    #[default]
    Incumbent,
    /// Ignore challengers whose remaining time is at most
    /// `context_switch_time`.
    Challenger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub quantum: Ticks,
    pub context_switch_time: Ticks,
    pub preemption_guard: PreemptionGuard,
    // SRTF starts its scan from the last dispatched process, so equal
    // remaining times keep it on the CPU instead of going to the lowest id
    pub sticky_incumbent: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
            context_switch_time: 0,
            preemption_guard: PreemptionGuard::default(),
            sticky_incumbent: false,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quantum == 0 {
            return Err(ConfigError::ZeroQuantum);
        }
        Ok(())
    }
}

fn all_policies() -> Vec<Policy> {
    Policy::ALL.to_vec()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunFile {
    #[serde(default = "all_policies")]
    pub policies: Vec<Policy>,
    #[serde(flatten)]
    pub config: SimConfig,
    pub workload: WorkloadSource,
}

impl RunFile {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let run: RunFile = serde_json::from_str(json)?;
        run.config.validate()?;
        if run.policies.is_empty() {
            return Err(ConfigError::NoPolicies);
        }
        Ok(run)
    }

    /// Load a run file. A relative workload `file` is taken relative to the
    /// run file's own directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let mut run = Self::from_json_str(&json)?;
        if let Some(base) = path.parent() {
            run.workload.resolve_relative_to(base);
        }
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Workload;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: SimConfig = serde_json::from_str(r#"{ "quantum": 4 }"#).unwrap();
        assert_eq!(config.quantum, 4);
        assert_eq!(config.context_switch_time, 0);
        assert_eq!(config.preemption_guard, PreemptionGuard::Incumbent);
        assert!(!config.sticky_incumbent);
    }

    #[test]
    fn workload_file_is_relative_to_run_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("jobs.json"),
            r#"[{ "id": 0, "arrival_time": 0, "service_time": 2 }]"#,
        )
        .unwrap();
        let run_path = dir.path().join("run.json");
        fs::write(&run_path, r#"{ "workload": { "file": "jobs.json" } }"#).unwrap();

        let run = RunFile::load(&run_path).unwrap();
        match &run.workload {
            WorkloadSource::File(path) => assert_eq!(path, &dir.path().join("jobs.json")),
            other => panic!("expected a file source, got {other:?}"),
        }
        let workload = Workload::from_source(&run.workload).unwrap();
        assert_eq!(workload.len(), 1);
    }

    #[test]
    fn zero_quantum_is_rejected() {
        let config = SimConfig {
            quantum: 0,
            ..SimConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroQuantum)));
    }

    #[test]
    fn run_file_parses_flattened_config() {
        let run = RunFile::from_json_str(
            r#"{
                "policies": ["sjf", "srtf"],
                "quantum": 3,
                "context_switch_time": 1,
                "preemption_guard": "challenger",
                "workload": { "processes": [
                    { "id": 0, "arrival_time": 0, "service_time": 5 }
                ] }
            }"#,
        )
        .unwrap();

        assert_eq!(run.policies, vec![Policy::Sjf, Policy::Srtf]);
        assert_eq!(run.config.quantum, 3);
        assert_eq!(run.config.context_switch_time, 1);
        assert_eq!(run.config.preemption_guard, PreemptionGuard::Challenger);
    }

    #[test]
    fn run_file_defaults_to_every_policy() {
        let run = RunFile::from_json_str(
            r#"{ "workload": { "generate": { "count": 4, "seed": 9 } } }"#,
        )
        .unwrap();
        assert_eq!(run.policies, Policy::ALL.to_vec());
    }

    #[test]
    fn empty_policy_list_is_rejected() {
        let err = RunFile::from_json_str(
            r#"{ "policies": [], "workload": { "generate": { "count": 1 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NoPolicies));
    }
}
