use super::{Scheduler, run_slice, select_named};
use crate::{
    config::SimConfig,
    core::{Event, ProcessId, SimCtx, SimError, Ticks},
};

/// Round-Robin with a fixed quantum.
///
/// There is no ready list: the rotation is the order in which CPU requests
/// are re-queued, one quantum after the slice started.
pub struct RoundRobinScheduler {
    quantum: Ticks,
}

impl Scheduler for RoundRobinScheduler {
    const NAME: &'static str = "RR";

    fn init(config: &SimConfig) -> Self {
        Self {
            quantum: config.quantum,
        }
    }

    fn select(&mut self, ctx: &SimCtx, event: &Event) -> Option<ProcessId> {
        select_named(ctx, event)
    }

    fn dispatch(
        &mut self,
        ctx: &mut SimCtx,
        process: ProcessId,
    ) -> Result<Option<Event>, SimError> {
        let remaining = ctx.processes.process(process)?.remaining_time();
        let slice = self.quantum.min(remaining);
        run_slice(ctx, process, slice, self.quantum).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProcessState;

    fn rr(quantum: Ticks) -> RoundRobinScheduler {
        RoundRobinScheduler::init(&SimConfig {
            quantum,
            ..SimConfig::default()
        })
    }

    #[test]
    fn long_job_is_sliced_and_requeued() {
        let mut ctx = SimCtx::default();
        let id = ctx.processes.create_process(0, 5);
        let mut sched = rr(2);

        let next = sched.dispatch(&mut ctx, id).unwrap();
        assert_eq!(next, Some(Event::cpu_request(id, 2)));
        let p = ctx.processes.get(id).unwrap();
        assert_eq!(p.remaining_time(), 3);
        assert_eq!(p.state, ProcessState::Ready);
    }

    #[test]
    fn short_tail_finishes_inside_the_quantum() {
        let mut ctx = SimCtx::default();
        let id = ctx.processes.create_process(0, 1);
        ctx.clock.advance_to(6);
        let mut sched = rr(2);

        let next = sched.dispatch(&mut ctx, id).unwrap();
        assert_eq!(next, Some(Event::cpu_done(id, 7)));
    }
}
