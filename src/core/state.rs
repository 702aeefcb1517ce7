use std::fmt;

use super::error::SimError;

pub type Ticks = u64;

// Index into the ProcessTable Vec
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(pub usize);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Ready,
    Running,
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub id: ProcessId,
    pub state: ProcessState,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
    remaining_time: Ticks,
    departure_time: Option<Ticks>,
}

impl Process {
    pub fn new(id: ProcessId, arrival_time: Ticks, service_time: Ticks) -> Self {
        Self {
            id,
            state: ProcessState::Ready,
            arrival_time,
            service_time,
            remaining_time: service_time,
            departure_time: None,
        }
    }

    pub fn remaining_time(&self) -> Ticks {
        self.remaining_time
    }

    pub fn departure_time(&self) -> Option<Ticks> {
        self.departure_time
    }

    /// Ready and already arrived at `now`.
    pub fn is_eligible(&self, now: Ticks) -> bool {
        self.state == ProcessState::Ready && self.arrival_time <= now
    }

    /// Consume `duration` ticks of owed CPU time starting at `now`.
    ///
    /// This is the only place `remaining_time` changes. Asking for more than
    /// is owed means a policy broke its contract with the engine.
    pub fn run_for(&mut self, duration: Ticks, now: Ticks) -> Result<(), SimError> {
        if duration > self.remaining_time {
            return Err(SimError::InvalidDuration {
                process: self.id,
                requested: duration,
                remaining: self.remaining_time,
            });
        }

        let end = now.checked_add(duration).ok_or(SimError::ClockOverflow {
            process: self.id,
            now,
            duration,
        })?;

        self.remaining_time -= duration;
        if self.remaining_time == 0 {
            debug_assert!(
                self.departure_time.is_none(),
                "Process {} departed twice",
                self.id
            );
            self.departure_time = Some(end);
        }
        Ok(())
    }
}

/// Arena owning every process of one simulation run.
#[derive(Debug, Clone, Default)]
pub struct ProcessTable {
    processes: Vec<Process>,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_process(&mut self, arrival_time: Ticks, service_time: Ticks) -> ProcessId {
        let id = ProcessId(self.processes.len());
        self.processes
            .push(Process::new(id, arrival_time, service_time));
        id
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn get(&self, id: ProcessId) -> Option<&Process> {
        self.processes.get(id.0)
    }

    pub fn process(&self, id: ProcessId) -> Result<&Process, SimError> {
        self.processes.get(id.0).ok_or(SimError::UnknownProcess(id))
    }

    pub fn process_mut(&mut self, id: ProcessId) -> Result<&mut Process, SimError> {
        self.processes
            .get_mut(id.0)
            .ok_or(SimError::UnknownProcess(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter()
    }

    /// Processes that could take the CPU at `now`, in id order.
    pub fn eligible(&self, now: Ticks) -> impl Iterator<Item = &Process> {
        self.processes.iter().filter(move |p| p.is_eligible(now))
    }

    pub fn running(&self) -> Option<ProcessId> {
        self.processes
            .iter()
            .find(|p| p.state == ProcessState::Running)
            .map(|p| p.id)
    }

    pub fn all_terminated(&self) -> bool {
        self.processes
            .iter()
            .all(|p| p.state == ProcessState::Terminated)
    }

    pub fn into_processes(self) -> Vec<Process> {
        self.processes
    }

    pub fn set_running(&mut self, id: ProcessId) -> Result<(), SimError> {
        debug_assert!(
            self.running().is_none_or(|running| running == id),
            "Process {id} cannot run while another process holds the CPU"
        );
        let process = self.process_mut(id)?;
        debug_assert_eq!(
            process.state,
            ProcessState::Ready,
            "Process {id} must be Ready before it runs"
        );
        process.state = ProcessState::Running;
        Ok(())
    }

    pub fn mark_ready(&mut self, id: ProcessId) -> Result<(), SimError> {
        let process = self.process_mut(id)?;
        debug_assert!(
            process.state != ProcessState::Terminated,
            "Terminated process {id} cannot become Ready"
        );
        debug_assert!(
            process.remaining_time > 0,
            "Process {id} has no work left but was marked Ready"
        );
        process.state = ProcessState::Ready;
        Ok(())
    }

    pub fn mark_terminated(&mut self, id: ProcessId) -> Result<(), SimError> {
        let process = self.process_mut(id)?;
        debug_assert_eq!(
            process.state,
            ProcessState::Running,
            "Process {id} must have been Running before termination"
        );
        debug_assert!(
            process.remaining_time == 0 && process.departure_time.is_some(),
            "Process {id} terminated with work left"
        );
        process.state = ProcessState::Terminated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_for_sets_departure_once_work_is_done() {
        let mut p = Process::new(ProcessId(0), 0, 5);
        p.run_for(2, 0).unwrap();
        assert_eq!(p.remaining_time(), 3);
        assert_eq!(p.departure_time(), None);

        p.run_for(3, 4).unwrap();
        assert_eq!(p.remaining_time(), 0);
        assert_eq!(p.departure_time(), Some(7));
    }

    #[test]
    fn run_for_rejects_more_than_owed() {
        let mut p = Process::new(ProcessId(3), 0, 2);
        let err = p.run_for(3, 0).unwrap_err();
        assert_eq!(
            err,
            SimError::InvalidDuration {
                process: ProcessId(3),
                requested: 3,
                remaining: 2,
            }
        );
        assert_eq!(p.remaining_time(), 2);
    }

    #[test]
    fn run_past_the_end_of_time_fails_untouched() {
        let mut p = Process::new(ProcessId(1), 0, 5);
        let err = p.run_for(5, Ticks::MAX - 2).unwrap_err();
        assert_eq!(
            err,
            SimError::ClockOverflow {
                process: ProcessId(1),
                now: Ticks::MAX - 2,
                duration: 5,
            }
        );
        assert_eq!(p.remaining_time(), 5);
        assert_eq!(p.departure_time(), None);
    }

    #[test]
    fn zero_length_run_is_allowed() {
        let mut p = Process::new(ProcessId(0), 0, 2);
        p.run_for(0, 10).unwrap();
        assert_eq!(p.remaining_time(), 2);
        assert_eq!(p.departure_time(), None);
    }

    #[test]
    fn eligibility_respects_arrival() {
        let mut table = ProcessTable::new();
        let early = table.create_process(0, 3);
        let late = table.create_process(10, 3);

        let ids: Vec<_> = table.eligible(5).map(|p| p.id).collect();
        assert_eq!(ids, vec![early]);

        let ids: Vec<_> = table.eligible(10).map(|p| p.id).collect();
        assert_eq!(ids, vec![early, late]);
    }

    #[test]
    fn lifecycle_transitions() {
        let mut table = ProcessTable::new();
        let id = table.create_process(0, 1);

        table.set_running(id).unwrap();
        assert_eq!(table.running(), Some(id));
        table.process_mut(id).unwrap().run_for(1, 0).unwrap();
        table.mark_terminated(id).unwrap();

        assert_eq!(table.running(), None);
        assert!(table.all_terminated());
        assert_eq!(
            table.process(ProcessId(9)).unwrap_err(),
            SimError::UnknownProcess(ProcessId(9))
        );
    }
}
