use super::{Scheduler, run_slice};
use crate::{
    config::{PreemptionGuard, SimConfig},
    core::{Event, Process, ProcessId, SimCtx, SimError, Ticks},
};

/// Shortest-Remaining-Time-First.
///
/// A process runs only until the next pending event, since that is the
/// earliest moment a shorter job could show up. At each request the eligible
/// processes are scanned in id order and the first one seen is the candidate,
/// so equal remaining times go to the lowest id. With `sticky_incumbent` the
/// scan starts from the last process to run instead. A strictly shorter
/// challenger displaces the current candidate unless the [`PreemptionGuard`]
/// says the switch is not worth `context_switch_time`.
pub struct SrtfScheduler {
    context_switch_time: Ticks,
    guard: PreemptionGuard,
    sticky_incumbent: bool,
}

impl SrtfScheduler {
    fn may_switch(&self, current: &Process, challenger: &Process) -> bool {
        match self.guard {
            PreemptionGuard::Incumbent => current.remaining_time() > self.context_switch_time,
            PreemptionGuard::Challenger => challenger.remaining_time() > self.context_switch_time,
        }
    }
}

impl Scheduler for SrtfScheduler {
    const NAME: &'static str = "SRTF";

    fn init(config: &SimConfig) -> Self {
        Self {
            context_switch_time: config.context_switch_time,
            guard: config.preemption_guard,
            sticky_incumbent: config.sticky_incumbent,
        }
    }

    fn select(&mut self, ctx: &SimCtx, _event: &Event) -> Option<ProcessId> {
        let now = ctx.now();
        let mut chosen = if self.sticky_incumbent {
            ctx.last_dispatched
                .and_then(|id| ctx.processes.get(id))
                .filter(|p| p.is_eligible(now))
        } else {
            None
        };

        for process in ctx.processes.eligible(now) {
            chosen = match chosen {
                None => Some(process),
                Some(current)
                    if process.remaining_time() < current.remaining_time()
                        && self.may_switch(current, process) =>
                {
                    Some(process)
                }
                keep => keep,
            };
        }

        chosen.map(|p| p.id)
    }

    fn dispatch(
        &mut self,
        ctx: &mut SimCtx,
        process: ProcessId,
    ) -> Result<Option<Event>, SimError> {
        let now = ctx.now();
        let remaining = ctx.processes.process(process)?.remaining_time();
        // Nothing else pending means nothing can preempt: run to completion
        let slice = match ctx.events.next_time_after(now) {
            Some(next) => (next - now).min(remaining),
            None => remaining,
        };
        run_slice(ctx, process, slice, slice).map(Some)
    }
}
