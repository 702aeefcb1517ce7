use log::{debug, trace};

use super::{
    error::SimError,
    event::{Event, EventKind},
    observer::Observer,
    queue::EventQueue,
    state::{ProcessId, ProcessTable, Ticks},
};
use crate::{config::SimConfig, scheduler::Scheduler};

/// Simulated "now". Only ever moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationClock {
    now: Ticks,
}

impl SimulationClock {
    pub fn now(&self) -> Ticks {
        self.now
    }

    // An event that fell due while the CPU was busy does not rewind time
    pub fn advance_to(&mut self, time: Ticks) {
        self.now = self.now.max(time);
    }
}

/// Everything a policy may look at or touch during one run.
#[derive(Debug, Default)]
pub struct SimCtx {
    pub clock: SimulationClock,
    pub processes: ProcessTable,
    pub events: EventQueue,
    // Last process handed the CPU; SRTF treats it as the incumbent
    pub last_dispatched: Option<ProcessId>,
}

impl SimCtx {
    pub fn now(&self) -> Ticks {
        self.clock.now()
    }
}

pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    config: SimConfig,
    observer: Observer,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(config: SimConfig) -> Self {
        let scheduler = S::init(&config);
        Self {
            ctx: SimCtx::default(),
            scheduler,
            config,
            observer: Observer::new(),
        }
    }

    /// Seed the initial CPU request for a process at its arrival time.
    pub fn submit(&mut self, process: ProcessId) -> Result<(), SimError> {
        let arrival = self.ctx.processes.process(process)?.arrival_time;
        self.ctx.events.push(Event::cpu_request(process, arrival));
        Ok(())
    }

    /// Handle one event. Returns `Ok(false)` once the queue has drained.
    pub fn step(&mut self) -> Result<bool, SimError> {
        let event = match self.ctx.events.pop_earliest() {
            Ok(event) => event,
            Err(SimError::EmptyQueue) => return Ok(false),
            Err(err) => return Err(err),
        };

        self.ctx.clock.advance_to(event.time);
        let now = self.ctx.now();
        trace!(
            "{} t={now} {:?} {} (due {})",
            S::NAME,
            event.kind,
            event.process,
            event.time
        );
        self.observer.record_event(now, &event);

        if event.kind == EventKind::CpuRequest {
            self.handle_request(event)?;
        }

        self.observer.observe(&self.ctx);
        Ok(true)
    }

    fn handle_request(&mut self, event: Event) -> Result<(), SimError> {
        let now = self.ctx.now();
        let process = self
            .scheduler
            .select(&self.ctx, &event)
            .ok_or(SimError::NoEligibleProcess { time: now, event })?;

        let before = self.ctx.processes.process(process)?.remaining_time();
        let follow_up = self.scheduler.dispatch(&mut self.ctx, process)?;
        let after = self.ctx.processes.process(process)?.remaining_time();
        let ran = before - after;

        debug!(
            "{} t={now} ran {process} for {ran} (remaining {after})",
            S::NAME
        );
        // run_for already refused slices that would pass Ticks::MAX
        let end = now.saturating_add(ran);
        self.observer.record_run(process, now, end);
        self.ctx.last_dispatched = Some(process);
        // The CPU is busy until the slice ends
        self.ctx.clock.advance_to(end);

        if let Some(follow_up) = follow_up {
            self.ctx.events.push(follow_up);
        }
        Ok(())
    }

    /// Drive the simulation until no events remain.
    pub fn run(&mut self) -> Result<(), SimError> {
        while self.step()? {}
        Ok(())
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn into_parts(self) -> (ProcessTable, Observer) {
        (self.ctx.processes, self.observer)
    }
}
