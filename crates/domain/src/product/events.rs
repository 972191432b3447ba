//! Product domain events.

use chrono::{DateTime, Utc};
use common::ProductId;
use num_rational::BigRational;

use crate::aggregate::DomainEvent;
use crate::money::Money;

/// An event emitted by the product aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductEvent {
    /// The product that emitted the event.
    pub product_id: ProductId,

    /// When the event happened.
    pub occurred_at: DateTime<Utc>,

    /// What happened.
    pub kind: ProductEventKind,
}

/// The closed set of things that can happen to a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductEventKind {
    /// Product was created.
    Created(ProductCreatedData),

    /// Name, description or category changed.
    Updated(ProductUpdatedData),

    Activated,

    Deactivated,

    Archived,

    /// A discount was applied, replacing any previous one.
    DiscountApplied(DiscountAppliedData),

    DiscountRemoved,
}

/// Data for the Created event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCreatedData {
    pub name: String,
    pub description: String,
    pub category: String,
    pub base_price: Money,
}

/// Data for the Updated event. Holds the values after the update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdatedData {
    pub name: String,
    pub description: String,
    pub category: String,
}

/// Data for the DiscountApplied event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountAppliedData {
    pub percentage: BigRational,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DomainEvent for ProductEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn aggregate_id(&self) -> &str {
        self.product_id.as_str()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

impl ProductEventKind {
    /// Returns the outbox event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            ProductEventKind::Created(_) => "product.created",
            ProductEventKind::Updated(_) => "product.updated",
            ProductEventKind::Activated => "product.activated",
            ProductEventKind::Deactivated => "product.deactivated",
            ProductEventKind::Archived => "product.archived",
            ProductEventKind::DiscountApplied(_) => "product.discount_applied",
            ProductEventKind::DiscountRemoved => "product.discount_removed",
        }
    }
}

// Factory methods for creating events
impl ProductEvent {
    fn new(product_id: ProductId, occurred_at: DateTime<Utc>, kind: ProductEventKind) -> Self {
        Self {
            product_id,
            occurred_at,
            kind,
        }
    }

    /// Creates a Created event.
    pub fn created(
        product_id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        base_price: Money,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            product_id,
            occurred_at,
            ProductEventKind::Created(ProductCreatedData {
                name: name.into(),
                description: description.into(),
                category: category.into(),
                base_price,
            }),
        )
    }

    /// Creates an Updated event.
    pub fn updated(
        product_id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            product_id,
            occurred_at,
            ProductEventKind::Updated(ProductUpdatedData {
                name: name.into(),
                description: description.into(),
                category: category.into(),
            }),
        )
    }

    pub fn activated(product_id: ProductId, occurred_at: DateTime<Utc>) -> Self {
        Self::new(product_id, occurred_at, ProductEventKind::Activated)
    }

    pub fn deactivated(product_id: ProductId, occurred_at: DateTime<Utc>) -> Self {
        Self::new(product_id, occurred_at, ProductEventKind::Deactivated)
    }

    pub fn archived(product_id: ProductId, occurred_at: DateTime<Utc>) -> Self {
        Self::new(product_id, occurred_at, ProductEventKind::Archived)
    }

    /// Creates a DiscountApplied event.
    pub fn discount_applied(
        product_id: ProductId,
        percentage: BigRational,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self::new(
            product_id,
            occurred_at,
            ProductEventKind::DiscountApplied(DiscountAppliedData {
                percentage,
                start,
                end,
            }),
        )
    }

    pub fn discount_removed(product_id: ProductId, occurred_at: DateTime<Utc>) -> Self {
        Self::new(product_id, occurred_at, ProductEventKind::DiscountRemoved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::rational;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_event_types() {
        let id = ProductId::new("p-1");
        let events = [
            ProductEvent::created(id.clone(), "n", "d", "c", Money::new(1, 1), now()),
            ProductEvent::updated(id.clone(), "n", "d", "c", now()),
            ProductEvent::activated(id.clone(), now()),
            ProductEvent::deactivated(id.clone(), now()),
            ProductEvent::archived(id.clone(), now()),
            ProductEvent::discount_applied(
                id.clone(),
                rational(10, 1),
                now(),
                now() + Duration::days(1),
                now(),
            ),
            ProductEvent::discount_removed(id.clone(), now()),
        ];

        let types: Vec<_> = events.iter().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec![
                "product.created",
                "product.updated",
                "product.activated",
                "product.deactivated",
                "product.archived",
                "product.discount_applied",
                "product.discount_removed",
            ]
        );
    }

    #[test]
    fn test_event_carries_aggregate_and_time() {
        let event = ProductEvent::activated(ProductId::new("p-9"), now());
        assert_eq!(event.aggregate_id(), "p-9");
        assert_eq!(event.occurred_at(), now());
    }
}
