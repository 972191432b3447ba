//! Dirty-field bookkeeping for partial updates.

use bitflags::bitflags;

/// A product field that can be written independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Description,
    Category,
    BasePrice,
    Discount,
    Status,
}

impl Field {
    /// Every field, in declaration order.
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Description,
        Field::Category,
        Field::BasePrice,
        Field::Discount,
        Field::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::Category => "category",
            Field::BasePrice => "base_price",
            Field::Discount => "discount",
            Field::Status => "status",
        }
    }

    /// Returns the bit representing this field.
    pub fn flag(self) -> FieldSet {
        match self {
            Field::Name => FieldSet::NAME,
            Field::Description => FieldSet::DESCRIPTION,
            Field::Category => FieldSet::CATEGORY,
            Field::BasePrice => FieldSet::BASE_PRICE,
            Field::Discount => FieldSet::DISCOUNT,
            Field::Status => FieldSet::STATUS,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

bitflags! {
    /// Bitset over [`Field`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldSet: u8 {
        const NAME = 1 << 0;
        const DESCRIPTION = 1 << 1;
        const CATEGORY = 1 << 2;
        const BASE_PRICE = 1 << 3;
        const DISCOUNT = 1 << 4;
        const STATUS = 1 << 5;
    }
}

/// Records which fields changed since the aggregate was loaded.
///
/// Never persisted. Lives for a single load-mutate-save cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeTracker {
    dirty: FieldSet,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&mut self, field: Field) {
        self.dirty.insert(field.flag());
    }

    pub fn mark_all_dirty(&mut self, fields: impl IntoIterator<Item = Field>) {
        for field in fields {
            self.mark_dirty(field);
        }
    }

    pub fn is_dirty(&self, field: Field) -> bool {
        self.dirty.contains(field.flag())
    }

    /// Returns the dirty fields in declaration order.
    pub fn dirty_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.is_dirty(*field))
            .collect()
    }

    /// Returns the raw bitset.
    pub fn as_set(&self) -> FieldSet {
        self.dirty
    }

    pub fn has_changes(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Clears a single field.
    pub fn clear(&mut self, field: Field) {
        self.dirty.remove(field.flag());
    }

    /// Clears every field.
    pub fn reset(&mut self) {
        self.dirty = FieldSet::empty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_is_clean() {
        let tracker = ChangeTracker::new();
        assert!(!tracker.has_changes());
        assert!(tracker.dirty_fields().is_empty());
    }

    #[test]
    fn test_mark_all_dirty() {
        let mut tracker = ChangeTracker::new();
        tracker.mark_all_dirty([Field::Status, Field::Name]);

        assert!(tracker.has_changes());
        assert_eq!(tracker.dirty_fields(), vec![Field::Name, Field::Status]);
        assert_eq!(tracker.as_set(), FieldSet::NAME | FieldSet::STATUS);
    }

    #[test]
    fn test_marking_twice_is_idempotent() {
        let mut tracker = ChangeTracker::new();
        tracker.mark_dirty(Field::Discount);
        tracker.mark_dirty(Field::Discount);
        assert_eq!(tracker.dirty_fields(), vec![Field::Discount]);
    }

    #[test]
    fn test_clear_and_reset() {
        let mut tracker = ChangeTracker::new();
        tracker.mark_all_dirty(Field::ALL);

        tracker.clear(Field::Category);
        assert!(!tracker.is_dirty(Field::Category));
        assert!(tracker.is_dirty(Field::BasePrice));
        assert_eq!(tracker.dirty_fields().len(), 5);

        tracker.reset();
        assert!(!tracker.has_changes());
    }

    #[test]
    fn test_field_names() {
        assert_eq!(Field::BasePrice.as_str(), "base_price");
        assert_eq!(Field::Status.to_string(), "status");
    }
}
