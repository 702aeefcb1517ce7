use log::{info, warn};

use super::job::Workload;
use crate::{
    config::SimConfig,
    core::{Observer, Process, ProcessId, ProcessState, SchedCore, SimError, Ticks},
    scheduler::{
        FcfsScheduler, Policy, RoundRobinScheduler, Scheduler, SjfScheduler, SrtfScheduler,
    },
};

/// Final state of one simulation run.
#[derive(Debug, Clone)]
pub struct SimOutcome {
    pub policy: &'static str,
    pub processes: Vec<Process>,
    pub observer: Observer,
    pub end_time: Ticks,
}

impl SimOutcome {
    pub fn all_terminated(&self) -> bool {
        self.processes
            .iter()
            .all(|p| p.state == ProcessState::Terminated)
    }

    pub fn departure(&self, id: ProcessId) -> Option<Ticks> {
        self.processes.get(id.0).and_then(|p| p.departure_time())
    }
}

pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
}

impl<S: Scheduler> Sim<S> {
    /// Build a fresh process table for `workload` and seed one CPU request
    /// per job at its arrival time.
    pub fn new(workload: &Workload, config: SimConfig) -> Result<Self, SimError> {
        let mut core = SchedCore::<S>::new(config);

        for job in workload.jobs() {
            let id = core
                .ctx
                .processes
                .create_process(job.arrival_time, job.service_time);
            debug_assert_eq!(id.0 as u64, job.id, "ProcessId must match job id");
        }

        // Simultaneous arrivals queue up in id order
        for job in workload.arrival_order() {
            core.submit(ProcessId(job.id as usize))?;
        }

        Ok(Self { core })
    }

    pub fn run(mut self) -> Result<SimOutcome, SimError> {
        self.core.run()?;
        let end_time = self.core.now();
        let steps = self.core.observer().steps();
        let config = *self.core.config();
        let (table, observer) = self.core.into_parts();

        if !table.all_terminated() {
            warn!("{} drained its event queue with unfinished processes", S::NAME);
        }
        info!(
            "{} finished {} processes at t={end_time} after {steps} events (quantum {}, context switch {})",
            S::NAME,
            table.len(),
            config.quantum,
            config.context_switch_time
        );

        Ok(SimOutcome {
            policy: S::NAME,
            processes: table.into_processes(),
            observer,
            end_time,
        })
    }
}

/// Run `policy` over its own copy of `workload`.
pub fn run_policy(
    policy: Policy,
    workload: &Workload,
    config: SimConfig,
) -> Result<SimOutcome, SimError> {
    match policy {
        Policy::Fcfs => Sim::<FcfsScheduler>::new(workload, config)?.run(),
        Policy::Sjf => Sim::<SjfScheduler>::new(workload, config)?.run(),
        Policy::Rr => Sim::<RoundRobinScheduler>::new(workload, config)?.run(),
        Policy::Srtf => Sim::<SrtfScheduler>::new(workload, config)?.run(),
    }
}
