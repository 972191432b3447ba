//! Outbox rows: events committed atomically with the state they describe.

use chrono::{DateTime, Utc};
use common::EventId;
use domain::{DomainEvent, ProductEvent, ProductEventKind};
use serde_json::json;
use store::{Mutation, OutboxStatus, Row, Value, schema::outbox_events};

use crate::{CatalogError, Result};

/// An outbox row.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboxEvent {
    pub event_id: EventId,
    pub event_type: String,
    pub aggregate_id: String,
    pub payload: serde_json::Value,
    pub status: OutboxStatus,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl OutboxEvent {
    /// Builds a pending outbox row for a domain event.
    ///
    /// The row is stamped with the event's occurrence time.
    pub fn from_domain_event(event: &ProductEvent) -> Self {
        Self {
            event_id: EventId::new(),
            event_type: event.event_type().to_string(),
            aggregate_id: event.aggregate_id().to_string(),
            payload: event_payload(event),
            status: OutboxStatus::Pending,
            created_at: event.occurred_at(),
            processed_at: None,
        }
    }

    /// Reads an outbox row.
    pub fn from_row(row: &Row) -> Result<Self> {
        let missing =
            |column: &str| CatalogError::CorruptRecord(format!("outbox row missing {column}"));

        let status: OutboxStatus = row
            .text(outbox_events::STATUS)
            .ok_or_else(|| missing(outbox_events::STATUS))?
            .parse()
            .map_err(CatalogError::CorruptRecord)?;

        Ok(Self {
            event_id: EventId::from_uuid(
                row.uuid(outbox_events::EVENT_ID)
                    .ok_or_else(|| missing(outbox_events::EVENT_ID))?,
            ),
            event_type: row
                .text(outbox_events::EVENT_TYPE)
                .ok_or_else(|| missing(outbox_events::EVENT_TYPE))?
                .to_string(),
            aggregate_id: row
                .text(outbox_events::AGGREGATE_ID)
                .ok_or_else(|| missing(outbox_events::AGGREGATE_ID))?
                .to_string(),
            payload: row
                .json(outbox_events::PAYLOAD)
                .ok_or_else(|| missing(outbox_events::PAYLOAD))?
                .clone(),
            status,
            created_at: row
                .timestamp(outbox_events::CREATED_AT)
                .ok_or_else(|| missing(outbox_events::CREATED_AT))?,
            processed_at: row.timestamp(outbox_events::PROCESSED_AT),
        })
    }
}

/// Serializes an event into its outbox payload.
pub fn event_payload(event: &ProductEvent) -> serde_json::Value {
    let mut payload = json!({
        "event_type": event.event_type(),
        "aggregate_id": event.aggregate_id(),
        "occurred_at": event.occurred_at().to_rfc3339(),
    });

    let fields = match &event.kind {
        ProductEventKind::Created(data) => json!({
            "name": data.name,
            "description": data.description,
            "category": data.category,
            "base_price_numerator": data.base_price.numerator(),
            "base_price_denominator": data.base_price.denominator(),
        }),
        ProductEventKind::Updated(data) => json!({
            "name": data.name,
            "description": data.description,
            "category": data.category,
        }),
        ProductEventKind::DiscountApplied(data) => json!({
            "discount_percentage": data.percentage.to_string(),
            "start_date": data.start.to_rfc3339(),
            "end_date": data.end.to_rfc3339(),
        }),
        ProductEventKind::Activated
        | ProductEventKind::Deactivated
        | ProductEventKind::Archived
        | ProductEventKind::DiscountRemoved => json!({}),
    };

    if let (Some(target), serde_json::Value::Object(extra)) = (payload.as_object_mut(), fields) {
        target.extend(extra);
    }
    payload
}

/// Translates outbox rows and status changes into mutations.
pub trait OutboxRepository: Send + Sync {
    /// Returns the insert for an outbox row.
    fn insert_mut(&self, event: &OutboxEvent) -> Mutation;

    /// Returns the insert of a pending row for a domain event.
    fn insert_domain_event_mut(&self, event: &ProductEvent) -> Mutation {
        self.insert_mut(&OutboxEvent::from_domain_event(event))
    }

    /// Returns the update marking a row as delivered at `at`.
    fn mark_processed_mut(&self, event_id: EventId, at: DateTime<Utc>) -> Mutation;

    /// Returns the update marking a row as failed.
    fn mark_failed_mut(&self, event_id: EventId) -> Mutation;
}

/// The outbox translator.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutboxRepo;

impl OutboxRepo {
    pub fn new() -> Self {
        Self
    }
}

impl OutboxRepository for OutboxRepo {
    fn insert_mut(&self, event: &OutboxEvent) -> Mutation {
        Mutation::insert(
            outbox_events::TABLE,
            outbox_events::EVENT_ID,
            event.event_id.as_uuid(),
            vec![
                (outbox_events::EVENT_TYPE, Value::from(event.event_type.as_str())),
                (
                    outbox_events::AGGREGATE_ID,
                    Value::from(event.aggregate_id.as_str()),
                ),
                (outbox_events::PAYLOAD, Value::from(event.payload.clone())),
                (outbox_events::STATUS, Value::from(event.status.as_str())),
                (outbox_events::CREATED_AT, Value::from(event.created_at)),
                (
                    outbox_events::PROCESSED_AT,
                    Value::Timestamp(event.processed_at),
                ),
            ],
        )
    }

    fn mark_processed_mut(&self, event_id: EventId, at: DateTime<Utc>) -> Mutation {
        Mutation::update(
            outbox_events::TABLE,
            outbox_events::EVENT_ID,
            event_id.as_uuid(),
            vec![
                (
                    outbox_events::STATUS,
                    Value::from(OutboxStatus::Processed.as_str()),
                ),
                (outbox_events::PROCESSED_AT, Value::from(at)),
            ],
        )
    }

    fn mark_failed_mut(&self, event_id: EventId) -> Mutation {
        Mutation::update(
            outbox_events::TABLE,
            outbox_events::EVENT_ID,
            event_id.as_uuid(),
            vec![(
                outbox_events::STATUS,
                Value::from(OutboxStatus::Failed.as_str()),
            )],
        )
    }
}
