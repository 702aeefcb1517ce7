use thiserror::Error;

use super::{event::Event, state::ProcessId, state::Ticks};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("event queue is empty")]
    EmptyQueue,

    #[error("process {process} asked to run for {requested} ticks but only {remaining} remain")]
    InvalidDuration {
        process: ProcessId,
        requested: Ticks,
        remaining: Ticks,
    },

    #[error("no eligible process at t={time} while handling {event:?}")]
    NoEligibleProcess { time: Ticks, event: Event },

    #[error("clock overflow: process {process} cannot run {duration} ticks from t={now}")]
    ClockOverflow {
        process: ProcessId,
        now: Ticks,
        duration: Ticks,
    },

    #[error("unknown process {0}")]
    UnknownProcess(ProcessId),
}
