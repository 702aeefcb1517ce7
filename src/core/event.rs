use crate::core::{ProcessId, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // Process wants (or keeps wanting) the CPU
    CpuRequest,
    // Process has fully finished
    CpuDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    pub process: ProcessId,
    pub kind: EventKind,
    pub time: Ticks,
}

impl Event {
    pub fn cpu_request(process: ProcessId, time: Ticks) -> Self {
        Self {
            process,
            kind: EventKind::CpuRequest,
            time,
        }
    }

    pub fn cpu_done(process: ProcessId, time: Ticks) -> Self {
        Self {
            process,
            kind: EventKind::CpuDone,
            time,
        }
    }
}
