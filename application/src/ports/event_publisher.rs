//! Port for publishing domain events.
//!
//! Defines the [`EventPublisher`] trait used to hand [`DomainEvent`]s to the
//! notification and activity-log collaborators.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port carries the machine-readable
//! record of what changed.

use governance_domain::DomainEvent;
use std::sync::{Arc, Mutex};

/// Port for publishing domain events.
///
/// Publishing is fire-and-forget: `publish` is synchronous and non-fallible
/// so that a slow or broken collaborator can never fail a mutation that has
/// already been stored.
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    fn publish(&self, event: DomainEvent);
}

/// No-op publisher for tests and when no collaborator is attached.
pub struct NoEvents;

impl EventPublisher for NoEvents {
    fn publish(&self, _event: DomainEvent) {}
}

/// A publisher that delegates to several inner publishers.
///
/// ```text
/// GovernanceCoordinator ──publish──▶ FanoutPublisher
///                                      ├─▶ JsonlEventLog      (activity log)
///                                      └─▶ TracingEventPublisher (diagnostics)
/// ```
#[derive(Default)]
pub struct FanoutPublisher {
    delegates: Vec<Arc<dyn EventPublisher>>,
}

impl FanoutPublisher {
    pub fn new(delegates: Vec<Arc<dyn EventPublisher>>) -> Self {
        Self { delegates }
    }

    pub fn with(mut self, delegate: Arc<dyn EventPublisher>) -> Self {
        self.delegates.push(delegate);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl EventPublisher for FanoutPublisher {
    fn publish(&self, event: DomainEvent) {
        for d in &self.delegates {
            d.publish(event.clone());
        }
    }
}

/// Keeps every published event in memory.
///
/// Useful for tests and for callers that want to inspect what a batch of
/// operations emitted.
#[derive(Default)]
pub struct EventRecorder {
    events: Mutex<Vec<DomainEvent>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, oldest first.
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Event type identifiers, oldest first.
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events().iter().map(|e| e.event_type()).collect()
    }

    /// Remove and return the recorded events.
    pub fn drain(&self) -> Vec<DomainEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl EventPublisher for EventRecorder {
    fn publish(&self, event: DomainEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
