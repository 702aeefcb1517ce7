pub mod driver;
pub mod error;
pub mod event;
pub mod observer;
pub mod queue;
pub mod state;

pub use driver::{SchedCore, SimCtx, SimulationClock};
pub use error::SimError;
pub use event::{Event, EventKind};
pub use observer::{Observer, RunInterval, TraceEntry, TraceKind};
pub use queue::EventQueue;
pub use state::{Process, ProcessId, ProcessState, ProcessTable, Ticks};
