//! Interrupt-driven event system.
//!
//! Events are produced by:
//! - GPIO ISRs (switch falling edges)
//! - The IR decoder callback (decoded frames and decoder errors)
//! - Timer callbacks (switch poll tick, climate read tick)
//!
//! Events are consumed by the main control loop, which processes them one
//! at a time in FIFO order. Producers never block: when the queue is full
//! the event is dropped and counted. Losing a poll tick only delays
//! classification by one interval; losing an IR repeat only shortens a
//! ramp.
//!
//! Switch edges are coalesced: at most one `SwitchEdge` sits in the queue
//! at a time, since handling it samples every line anyway. A bouncing
//! contact therefore cannot crowd IR frames out of the queue.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Switch ISR  │────▶│              │     │              │
//! │ IR callback │────▶│  Event Queue │────▶│  Main Loop   │
//! │ Timer ISR   │────▶│  (channel)   │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::drivers::button::SwitchLine;

/// Maximum number of pending events.
const EVENT_QUEUE_CAP: usize = 32;

/// System event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Falling edge on a switch line.
    SwitchEdge(SwitchLine),
    /// Raw value from the IR decoder (code, repeat marker, or error).
    IrRaw(i32),
    /// Switch poll timer fired.
    PollTick,
    /// Climate read timer fired.
    ClimateTick,
}

pub type EventQueue = Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_CAP>;

static EVENTS: EventQueue = Channel::new();
static DROPPED: AtomicU32 = AtomicU32::new(0);
/// Set while a `SwitchEdge` is queued and not yet popped.
static EDGE_PENDING: AtomicBool = AtomicBool::new(false);

/// Push an event into the global queue.
/// Safe to call from ISR context (non-blocking).
/// Returns `false` if the queue is full (event dropped).
pub fn push_event(event: Event) -> bool {
    push_into(&EVENTS, event)
}

/// Switch ISR hook. Folds into an already-queued edge when there is one.
pub fn push_switch_edge(line: SwitchLine) -> bool {
    push_edge_into(&EVENTS, &EDGE_PENDING, line)
}

/// IR decoder callback hook.
pub fn push_ir_raw(raw: i32) -> bool {
    push_event(Event::IrRaw(raw))
}

/// Pop the next event from the global queue.
pub fn pop_event() -> Option<Event> {
    pop_from(&EVENTS, &EDGE_PENDING)
}

/// Drain all pending events into a callback, in FIFO order.
pub fn drain_events(mut handler: impl FnMut(Event)) {
    while let Some(event) = pop_event() {
        handler(event);
    }
}

/// Events dropped because the queue was full, since boot.
pub fn dropped_events() -> u32 {
    DROPPED.load(Ordering::Relaxed)
}

fn push_into(queue: &EventQueue, event: Event) -> bool {
    if queue.try_send(event).is_ok() {
        true
    } else {
        DROPPED.fetch_add(1, Ordering::Relaxed);
        false
    }
}

fn push_edge_into(queue: &EventQueue, pending: &AtomicBool, line: SwitchLine) -> bool {
    if pending.swap(true, Ordering::AcqRel) {
        return true;
    }
    let queued = push_into(queue, Event::SwitchEdge(line));
    if !queued {
        pending.store(false, Ordering::Release);
    }
    queued
}

fn pop_from(queue: &EventQueue, pending: &AtomicBool) -> Option<Event> {
    let event = queue.try_receive().ok()?;
    if matches!(event, Event::SwitchEdge(_)) {
        pending.store(false, Ordering::Release);
    }
    Some(event)
}
