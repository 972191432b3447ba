//! Product aggregate implementation.

use chrono::{DateTime, Utc};
use common::ProductId;

use crate::aggregate::AggregateRoot;
use crate::change_tracker::{ChangeTracker, Field};
use crate::discount::Discount;
use crate::error::ProductError;
use crate::money::Money;

use super::{ProductEvent, ProductStatus};

/// Product aggregate root.
///
/// Owns the lifecycle state machine of a catalog item. Every command method
/// either fails without touching the aggregate, or updates the fields it
/// changes, marks exactly those dirty, and queues at most one event.
#[derive(Debug, Clone)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    category: String,
    base_price: Money,
    discount: Option<Discount>,
    status: ProductStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    archived_at: Option<DateTime<Utc>>,
    changes: ChangeTracker,
    events: Vec<ProductEvent>,
}

/// Persisted product state, as loaded by a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub base_price: Money,
    pub discount: Option<Discount>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
}

impl AggregateRoot for Product {
    type Event = ProductEvent;

    fn aggregate_type() -> &'static str {
        "Product"
    }

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn changes(&self) -> &ChangeTracker {
        &self.changes
    }

    fn pending_events(&self) -> &[ProductEvent] {
        &self.events
    }

    fn mark_committed(&mut self) {
        self.changes.reset();
        self.events.clear();
    }
}

// Construction
impl Product {
    /// Creates a new draft product.
    ///
    /// Text inputs are trimmed. Marks every written field dirty and queues a
    /// Created event.
    pub fn new(
        id: ProductId,
        name: &str,
        description: &str,
        category: &str,
        base_price: Money,
        now: DateTime<Utc>,
    ) -> Result<Self, ProductError> {
        if id.is_blank() {
            return Err(ProductError::InvalidId);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(ProductError::InvalidProductName);
        }
        let category = category.trim();
        if category.is_empty() {
            return Err(ProductError::InvalidProductCategory);
        }
        // Storage keeps the price as two 64-bit integers.
        if !base_price.is_positive() || base_price.parts().is_none() {
            return Err(ProductError::InvalidBasePrice);
        }
        let description = description.trim();

        let mut changes = ChangeTracker::new();
        changes.mark_all_dirty([
            Field::Name,
            Field::Description,
            Field::Category,
            Field::BasePrice,
            Field::Status,
        ]);

        let created = ProductEvent::created(
            id.clone(),
            name,
            description,
            category,
            base_price.clone(),
            now,
        );

        Ok(Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            base_price,
            discount: None,
            status: ProductStatus::Draft,
            created_at: now,
            updated_at: now,
            archived_at: None,
            changes,
            events: vec![created],
        })
    }

    /// Rebuilds a product from storage with no dirty fields and no events.
    pub fn reconstruct(stored: StoredProduct) -> Self {
        Self {
            id: stored.id,
            name: stored.name,
            description: stored.description,
            category: stored.category,
            base_price: stored.base_price,
            discount: stored.discount,
            status: stored.status,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
            archived_at: stored.archived_at,
            changes: ChangeTracker::new(),
            events: Vec::new(),
        }
    }
}

// Query methods
impl Product {
    pub fn product_id(&self) -> &ProductId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn base_price(&self) -> &Money {
        &self.base_price
    }

    pub fn discount(&self) -> Option<&Discount> {
        self.discount.as_ref()
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
    }

    /// Returns the base price after any discount valid at `now`.
    ///
    /// Computed on every call, never cached.
    pub fn effective_price(&self, now: DateTime<Utc>) -> Money {
        match &self.discount {
            Some(discount) if discount.is_valid_at(now) => discount.apply_to(&self.base_price),
            _ => self.base_price.clone(),
        }
    }

    /// Returns true if a discount is present and valid at `now`.
    pub fn has_active_discount(&self, now: DateTime<Utc>) -> bool {
        self.discount
            .as_ref()
            .is_some_and(|discount| discount.is_valid_at(now))
    }

    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    pub fn is_archived(&self) -> bool {
        self.status == ProductStatus::Archived
    }

    /// Drops queued events without touching dirty fields.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

// Command methods
impl Product {
    /// Updates name, description and category.
    ///
    /// Only fields whose trimmed value differs are written. Queues an Updated
    /// event only when at least one field changed.
    pub fn update(
        &mut self,
        name: &str,
        description: &str,
        category: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ProductError> {
        if self.is_archived() {
            return Err(ProductError::ProductArchived);
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(ProductError::InvalidProductName);
        }
        let category = category.trim();
        if category.is_empty() {
            return Err(ProductError::InvalidProductCategory);
        }
        let description = description.trim();

        let mut changed = false;
        if self.name != name {
            self.name = name.to_string();
            self.changes.mark_dirty(Field::Name);
            changed = true;
        }
        if self.description != description {
            self.description = description.to_string();
            self.changes.mark_dirty(Field::Description);
            changed = true;
        }
        if self.category != category {
            self.category = category.to_string();
            self.changes.mark_dirty(Field::Category);
            changed = true;
        }

        if changed {
            self.updated_at = now;
            self.events.push(ProductEvent::updated(
                self.id.clone(),
                &self.name,
                &self.description,
                &self.category,
                now,
            ));
        }
        Ok(())
    }

    /// Makes the product available for sale.
    pub fn activate(&mut self, now: DateTime<Utc>) -> Result<(), ProductError> {
        match self.status {
            ProductStatus::Archived => return Err(ProductError::ProductArchived),
            ProductStatus::Active => return Err(ProductError::ProductAlreadyActive),
            status if !status.can_activate() => return Err(ProductError::ProductNotActive),
            _ => {}
        }

        self.transition(ProductStatus::Active, now);
        self.events.push(ProductEvent::activated(self.id.clone(), now));
        Ok(())
    }

    /// Withdraws an active product from sale.
    pub fn deactivate(&mut self, now: DateTime<Utc>) -> Result<(), ProductError> {
        match self.status {
            ProductStatus::Archived => return Err(ProductError::ProductArchived),
            ProductStatus::Inactive => return Err(ProductError::ProductAlreadyInactive),
            status if !status.can_deactivate() => return Err(ProductError::ProductNotActive),
            _ => {}
        }

        self.transition(ProductStatus::Inactive, now);
        self.events.push(ProductEvent::deactivated(self.id.clone(), now));
        Ok(())
    }

    /// Soft-deletes the product. No further changes are accepted afterwards.
    pub fn archive(&mut self, now: DateTime<Utc>) -> Result<(), ProductError> {
        if !self.status.can_archive() {
            return Err(ProductError::ProductArchived);
        }

        self.transition(ProductStatus::Archived, now);
        self.archived_at = Some(now);
        self.events.push(ProductEvent::archived(self.id.clone(), now));
        Ok(())
    }

    /// Applies `discount`, replacing any existing one.
    ///
    /// The product must be active and the discount must not have expired at
    /// `now`. A discount starting in the future is accepted.
    pub fn apply_discount(
        &mut self,
        discount: Discount,
        now: DateTime<Utc>,
    ) -> Result<(), ProductError> {
        if self.is_archived() {
            return Err(ProductError::ProductArchived);
        }
        if !self.status.can_apply_discount() {
            return Err(ProductError::ProductNotActive);
        }
        if discount.is_expired(now) {
            return Err(ProductError::InvalidDiscountPeriod);
        }

        let event = ProductEvent::discount_applied(
            self.id.clone(),
            discount.percentage().clone(),
            discount.start(),
            discount.end(),
            now,
        );
        self.discount = Some(discount);
        self.updated_at = now;
        self.changes.mark_dirty(Field::Discount);
        self.events.push(event);
        Ok(())
    }

    /// Clears the current discount.
    pub fn remove_discount(&mut self, now: DateTime<Utc>) -> Result<(), ProductError> {
        if self.is_archived() {
            return Err(ProductError::ProductArchived);
        }
        if self.discount.is_none() {
            return Err(ProductError::NoDiscountToRemove);
        }

        self.discount = None;
        self.updated_at = now;
        self.changes.mark_dirty(Field::Discount);
        self.events.push(ProductEvent::discount_removed(self.id.clone(), now));
        Ok(())
    }

    fn transition(&mut self, status: ProductStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
        self.changes.mark_dirty(Field::Status);
    }
}
