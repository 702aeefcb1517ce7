use super::{Scheduler, run_slice, select_named};
use crate::{
    config::SimConfig,
    core::{Event, ProcessId, SimCtx, SimError},
};

/// First-Come-First-Serve. Turn order is whatever order the requests were
/// queued in; a process keeps the CPU until it is done.
pub struct FcfsScheduler;

impl Scheduler for FcfsScheduler {
    const NAME: &'static str = "FCFS";

    fn init(_config: &SimConfig) -> Self {
        Self
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
        run_slice(ctx, process, remaining, remaining).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EventKind, ProcessState};

    #[test]
    fn runs_named_process_to_completion() {
        let mut ctx = SimCtx::default();
        let a = ctx.processes.create_process(0, 5);
        let b = ctx.processes.create_process(0, 3);
        let mut fcfs = FcfsScheduler::init(&SimConfig::default());

        let chosen = fcfs
            .select(&ctx, &Event::cpu_request(a, 0))
            .unwrap();
        assert_eq!(chosen, a);

        let done = fcfs.dispatch(&mut ctx, chosen).unwrap().unwrap();
        assert_eq!(done, Event::cpu_done(a, 5));
        assert_eq!(done.kind, EventKind::CpuDone);
        assert_eq!(
            ctx.processes.get(a).unwrap().state,
            ProcessState::Terminated
        );
        assert_eq!(ctx.processes.get(b).unwrap().state, ProcessState::Ready);
    }

    #[test]
    fn ignores_processes_that_have_not_arrived() {
        let mut ctx = SimCtx::default();
        let late = ctx.processes.create_process(4, 1);
        let mut fcfs = FcfsScheduler::init(&SimConfig::default());
        assert_eq!(fcfs.select(&ctx, &Event::cpu_request(late, 0)), None);

        ctx.clock.advance_to(4);
        assert_eq!(fcfs.select(&ctx, &Event::cpu_request(late, 4)), Some(late));
    }
}
