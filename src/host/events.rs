//! Event sink collaborator
//!
//! Audio, VFX and UI subscribe to named events. Emission is fire-and-forget
//! and never feeds back into the simulation.

use serde::Serialize;

use crate::concealment::ConcealmentEvent;
use crate::perception::PerceptionEvent;

/// Any event the stealth core can emit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum StealthEvent {
    Concealment(ConcealmentEvent),
    Perception(PerceptionEvent),
}

impl StealthEvent {
    /// Stable event name for subscribers keyed by string
    pub fn name(&self) -> &'static str {
        match self {
            StealthEvent::Concealment(e) => e.name(),
            StealthEvent::Perception(e) => e.name(),
        }
    }
}

impl From<ConcealmentEvent> for StealthEvent {
    fn from(event: ConcealmentEvent) -> Self {
        StealthEvent::Concealment(event)
    }
}

impl From<PerceptionEvent> for StealthEvent {
    fn from(event: PerceptionEvent) -> Self {
        StealthEvent::Perception(event)
    }
}

pub trait EventSink {
    fn emit(&mut self, event: StealthEvent);
}

impl EventSink for Vec<StealthEvent> {
    fn emit(&mut self, event: StealthEvent) {
        self.push(event);
    }
}

/// Sink that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: StealthEvent) {
        tracing::debug!(event = event.name(), "{:?}", event);
    }
}
