pub mod fcfs;
pub mod rr;
pub mod sjf;
pub mod srtf;

use std::fmt;

use serde::Deserialize;

use crate::{
    config::SimConfig,
    core::{Event, ProcessId, SimCtx, SimError, Ticks},
};
pub use fcfs::FcfsScheduler;
pub use rr::RoundRobinScheduler;
pub use sjf::SjfScheduler;
pub use srtf::SrtfScheduler;

/// A scheduling policy as seen by the engine.
///
/// `select` picks the process that gets the CPU in response to a
/// `CpuRequest`; `dispatch` runs it and returns the follow-up event, if any.
pub trait Scheduler {
    const NAME: &'static str;

    fn init(config: &SimConfig) -> Self;

    fn select(&mut self, ctx: &SimCtx, event: &Event) -> Option<ProcessId>;

    fn dispatch(
        &mut self,
        ctx: &mut SimCtx,
        process: ProcessId,
    ) -> Result<Option<Event>, SimError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    Fcfs,
    Sjf,
    #[serde(alias = "round_robin")]
    Rr,
    Srtf,
}

impl Policy {
    pub const ALL: [Policy; 4] = [Policy::Fcfs, Policy::Sjf, Policy::Rr, Policy::Srtf];

    pub fn name(self) -> &'static str {
        match self {
            Policy::Fcfs => FcfsScheduler::NAME,
            Policy::Sjf => SjfScheduler::NAME,
            Policy::Rr => RoundRobinScheduler::NAME,
            Policy::Srtf => SrtfScheduler::NAME,
        }
    }

    pub fn is_preemptive(self) -> bool {
        matches!(self, Policy::Rr | Policy::Srtf)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Run `process` for `slice` ticks starting now. If work is left it goes back
// to Ready and asks for the CPU again at `now + requeue_after`; otherwise it
// terminates and a CpuDone is emitted at its departure time.
pub(crate) fn run_slice(
    ctx: &mut SimCtx,
    process: ProcessId,
    slice: Ticks,
    requeue_after: Ticks,
) -> Result<Event, SimError> {
    let now = ctx.now();
    ctx.processes.set_running(process)?;
    let task = ctx.processes.process_mut(process)?;
    task.run_for(slice, now)?;

    match task.departure_time() {
        Some(departure) => {
            ctx.processes.mark_terminated(process)?;
            Ok(Event::cpu_done(process, departure))
        }
        None => {
            ctx.processes.mark_ready(process)?;
            let due = now
                .checked_add(requeue_after)
                .ok_or(SimError::ClockOverflow {
                    process,
                    now,
                    duration: requeue_after,
                })?;
            Ok(Event::cpu_request(process, due))
        }
    }
}

// The process named by the event, if it may run now
pub(crate) fn select_named(ctx: &SimCtx, event: &Event) -> Option<ProcessId> {
    ctx.processes
        .get(event.process)
        .filter(|p| p.is_eligible(ctx.now()))
        .map(|p| p.id)
}
