/// Reader generating fake user events.
pub mod event_reader;

/// Mask expansion for SKU codes.
pub mod mask;

/// Event time generation and clocks.
pub mod timestamp;

pub use event_reader::{EventReader, EventReaderBuilder, EventSchema, EventType, Record};
pub use mask::SkuMask;
pub use timestamp::{Clock, FixedClock, SystemClock, TimestampMode};
