#![allow(dead_code, unused_imports)]

mod mocks;

pub use mocks::MockStreamWriter;

use stream_faker::item::fake::{EventSchema, FixedClock};
use time::macros::datetime;

/// Default schema with "now" pinned, so generated records are reproducible.
pub fn fixed_schema() -> EventSchema {
    EventSchema::default().clock(FixedClock(datetime!(2024-05-17 13:45:30)))
}
