//! Table and column names of the persisted layout.
//!
//! Mirrors the SQL in `migrations/`.

use std::str::FromStr;

/// The `products` table: current product state.
pub mod products {
    pub const TABLE: &str = "products";

    pub const PRODUCT_ID: &str = "product_id";
    pub const NAME: &str = "name";
    pub const DESCRIPTION: &str = "description";
    pub const CATEGORY: &str = "category";
    pub const BASE_PRICE_NUMERATOR: &str = "base_price_numerator";
    pub const BASE_PRICE_DENOMINATOR: &str = "base_price_denominator";
    pub const DISCOUNT_PERCENT: &str = "discount_percent";
    pub const DISCOUNT_START: &str = "discount_start";
    pub const DISCOUNT_END: &str = "discount_end";
    pub const STATUS: &str = "status";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
    pub const ARCHIVED_AT: &str = "archived_at";

    /// Every column, key first.
    pub const COLUMNS: [&str; 13] = [
        PRODUCT_ID,
        NAME,
        DESCRIPTION,
        CATEGORY,
        BASE_PRICE_NUMERATOR,
        BASE_PRICE_DENOMINATOR,
        DISCOUNT_PERCENT,
        DISCOUNT_START,
        DISCOUNT_END,
        STATUS,
        CREATED_AT,
        UPDATED_AT,
        ARCHIVED_AT,
    ];
}

/// The `outbox_events` table: events awaiting relay.
pub mod outbox_events {
    pub const TABLE: &str = "outbox_events";

    pub const EVENT_ID: &str = "event_id";
    pub const EVENT_TYPE: &str = "event_type";
    pub const AGGREGATE_ID: &str = "aggregate_id";
    pub const PAYLOAD: &str = "payload";
    pub const STATUS: &str = "status";
    pub const CREATED_AT: &str = "created_at";
    pub const PROCESSED_AT: &str = "processed_at";
}

/// Delivery status of an outbox row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutboxStatus {
    #[default]
    Pending,
    Processed,
    Failed,
}

impl OutboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutboxStatus::Pending => "pending",
            OutboxStatus::Processed => "processed",
            OutboxStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for OutboxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutboxStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OutboxStatus::Pending),
            "processed" => Ok(OutboxStatus::Processed),
            "failed" => Ok(OutboxStatus::Failed),
            other => Err(format!("unknown outbox status: {other}")),
        }
    }
}
