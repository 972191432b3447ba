//! Core aggregate and domain event traits.

use chrono::{DateTime, Utc};

use crate::change_tracker::ChangeTracker;

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and named in past tense.
pub trait DomainEvent: Send + Sync + Clone {
    /// Returns the event type name, as written to the outbox.
    fn event_type(&self) -> &'static str;

    /// Returns the identifier of the aggregate that emitted the event.
    fn aggregate_id(&self) -> &str;

    /// Returns when the event happened, as supplied by the caller.
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// Trait for aggregates persisted as current state plus an outbox of events.
///
/// Aggregates are mutated only through their own methods. Every successful
/// mutation marks the fields it touched in the aggregate's [`ChangeTracker`]
/// and queues at most one event. Both are cleared by the caller once the
/// resulting write plan has committed.
pub trait AggregateRoot: Send + Sync {
    /// The type of events this aggregate produces.
    type Event: DomainEvent;

    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Returns the aggregate's unique identifier.
    fn id(&self) -> &str;

    /// Returns the fields modified since load.
    fn changes(&self) -> &ChangeTracker;

    /// Returns the events queued since load.
    fn pending_events(&self) -> &[Self::Event];

    /// Clears dirty fields and pending events after a successful commit.
    fn mark_committed(&mut self);
}
