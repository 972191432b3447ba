pub mod clock;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock, to_stored_precision};
pub use types::{EventId, ProductId};
