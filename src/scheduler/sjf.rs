use super::{Scheduler, run_slice};
use crate::{
    config::SimConfig,
    core::{Event, ProcessId, SimCtx, SimError},
};

/// Shortest-Job-First, non-preemptive.
///
/// Every request is a selection point: the eligible process with the
/// smallest service time wins, lowest id on ties. Whoever is picked runs to
/// completion.
pub struct SjfScheduler;

impl Scheduler for SjfScheduler {
    const NAME: &'static str = "SJF";

    fn init(_config: &SimConfig) -> Self {
        Self
    }

    fn select(&mut self, ctx: &SimCtx, _event: &Event) -> Option<ProcessId> {
        // min_by_key keeps the first minimum, and eligible() walks in id order
        ctx.processes
            .eligible(ctx.now())
            .min_by_key(|p| p.service_time)
            .map(|p| p.id)
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
