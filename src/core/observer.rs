use rustc_hash::FxHashMap;

use super::{
    driver::SimCtx,
    event::{Event, EventKind},
    state::{ProcessId, ProcessState, Ticks},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    Request,
    Dispatch,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEntry {
    // Engine time when the entry was recorded
    pub time: Ticks,
    // Timestamp the event carried; equals `time` unless the CPU was busy
    pub due: Ticks,
    pub kind: TraceKind,
    pub process: ProcessId,
}

/// One contiguous stretch of CPU time given to a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunInterval {
    pub process: ProcessId,
    pub start: Ticks,
    pub end: Ticks,
}

impl RunInterval {
    pub fn len(&self) -> Ticks {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Default)]
pub struct Observer {
    step: u64,
    trace: Vec<TraceEntry>,
    runs: Vec<RunInterval>,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self, now: Ticks, event: &Event) {
        let kind = match event.kind {
            EventKind::CpuRequest => TraceKind::Request,
            EventKind::CpuDone => TraceKind::Done,
        };
        self.trace.push(TraceEntry {
            time: now,
            due: event.time,
            kind,
            process: event.process,
        });
    }

    pub fn record_run(&mut self, process: ProcessId, start: Ticks, end: Ticks) {
        if let Some(last) = self.runs.last() {
            debug_assert!(
                last.end <= start,
                "Run of {process} at t={start} overlaps previous run ending at t={}",
                last.end
            );
        }
        self.trace.push(TraceEntry {
            time: start,
            due: start,
            kind: TraceKind::Dispatch,
            process,
        });
        self.runs.push(RunInterval {
            process,
            start,
            end,
        });
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub fn runs(&self) -> &[RunInterval] {
        &self.runs
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    /// CPU time handed to each process, summed over all its runs.
    pub fn service_by_process(&self) -> FxHashMap<ProcessId, Ticks> {
        let mut totals = FxHashMap::default();
        for run in &self.runs {
            *totals.entry(run.process).or_insert(0) += run.len();
        }
        totals
    }

    /// Start of the first non-empty run of `process`.
    pub fn first_run_start(&self, process: ProcessId) -> Option<Ticks> {
        self.runs
            .iter()
            .find(|run| run.process == process && !run.is_empty())
            .map(|run| run.start)
    }

    /// Order in which processes terminated.
    pub fn completion_order(&self) -> Vec<ProcessId> {
        self.trace
            .iter()
            .filter(|entry| entry.kind == TraceKind::Done)
            .map(|entry| entry.process)
            .collect()
    }

    // Called between events, when no process holds the CPU
    pub fn observe(&mut self, ctx: &SimCtx) {
        self.step += 1;

        for process in ctx.processes.iter() {
            debug_assert_ne!(
                process.state,
                ProcessState::Running,
                "Process {} still Running after its dispatch returned",
                process.id
            );
            debug_assert!(
                process.remaining_time() <= process.service_time,
                "Process {} owes more than its service time",
                process.id
            );
            let terminated = process.state == ProcessState::Terminated;
            debug_assert_eq!(
                terminated,
                process.remaining_time() == 0 && process.departure_time().is_some(),
                "Process {} termination does not match its counters",
                process.id
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_runs_per_process() {
        let mut observer = Observer::new();
        observer.record_run(ProcessId(0), 0, 2);
        observer.record_run(ProcessId(1), 2, 4);
        observer.record_run(ProcessId(0), 4, 5);

        let totals = observer.service_by_process();
        assert_eq!(totals[&ProcessId(0)], 3);
        assert_eq!(totals[&ProcessId(1)], 2);
        assert_eq!(observer.first_run_start(ProcessId(1)), Some(2));
        assert_eq!(observer.trace().len(), 3);
    }

    #[test]
    fn completion_order_follows_done_events() {
        let mut observer = Observer::new();
        observer.record_event(3, &Event::cpu_done(ProcessId(1), 3));
        observer.record_event(8, &Event::cpu_request(ProcessId(0), 0));
        observer.record_event(8, &Event::cpu_done(ProcessId(0), 8));
        assert_eq!(
            observer.completion_order(),
            vec![ProcessId(1), ProcessId(0)]
        );
    }
}
