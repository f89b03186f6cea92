//! Domain events as `tracing` records.

use governance_application::EventPublisher;
use governance_domain::{DomainEvent, GovernanceEvent};
use tracing::{debug, info};

/// Emits every event under the `governance::events` target.
pub struct TracingEventPublisher;

impl EventPublisher for TracingEventPublisher {
    fn publish(&self, event: DomainEvent) {
        match &event.event {
            GovernanceEvent::VoteCast { .. } => {
                debug!(target: "governance::events", "{} at {}", event.event_type(), event.occurred_at)
            }
            GovernanceEvent::SessionClosed {
                session_id,
                status,
                result,
                ..
            } => info!(
                target: "governance::events",
                "session_closed {} -> {} ({} of {} voted)",
                session_id,
                status,
                result.total_voters,
                result.eligible_voter_count
            ),
            _ => info!(target: "governance::events", "{} at {}", event.event_type(), event.occurred_at),
        }
    }
}
