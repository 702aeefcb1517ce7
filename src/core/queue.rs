use std::cmp::Ordering;

use keyed_priority_queue::KeyedPriorityQueue;

use super::{error::SimError, event::Event, state::Ticks};

// Insertion sequence number; doubles as the heap key
type Seq = u64;

#[derive(Debug, Clone, Copy)]
struct Pending {
    time: Ticks,
    seq: Seq,
    event: Event,
}

// KeyedPriorityQueue is a max-heap, so flip the ordering: earliest time first,
// then earliest insertion among equal times.
impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Pending events of one simulation run, earliest first.
///
/// Events with equal timestamps come out in the order they were pushed.
#[derive(Debug)]
pub struct EventQueue {
    pending: KeyedPriorityQueue<Seq, Pending>,
    next_seq: Seq,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            pending: KeyedPriorityQueue::new(),
            next_seq: 0,
        }
    }

    pub fn push(&mut self, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(
            seq,
            Pending {
                time: event.time,
                seq,
                event,
            },
        );
    }

    pub fn pop_earliest(&mut self) -> Result<Event, SimError> {
        self.pending
            .pop()
            .map(|(_, pending)| pending.event)
            .ok_or(SimError::EmptyQueue)
    }

    pub fn peek_earliest_time(&self) -> Result<Ticks, SimError> {
        self.pending
            .peek()
            .map(|(_, pending)| pending.time)
            .ok_or(SimError::EmptyQueue)
    }

    /// Earliest pending timestamp strictly later than `now`.
    ///
    /// Requests that fell due while the CPU was busy sit in the queue with
    /// timestamps at or before `now`; they cannot change a decision taken at
    /// `now`, so they are skipped.
    pub fn next_time_after(&self, now: Ticks) -> Option<Ticks> {
        if let Ok(earliest) = self.peek_earliest_time() {
            if earliest > now {
                return Some(earliest);
            }
        }
        self.pending
            .iter()
            .map(|(_, pending)| pending.time)
            .filter(|&time| time > now)
            .min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
