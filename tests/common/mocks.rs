//! Mock version of a stream writer.
use mockall::mock;

use stream_faker::{BatchError, core::item::ItemWriter, item::partition::EventEntry};

mock! {
    pub StreamWriter {}
    impl ItemWriter<EventEntry> for StreamWriter {
        fn write(&self, items: &[EventEntry]) -> Result<(), BatchError>;
        fn destination(&self) -> String;
    }
}
