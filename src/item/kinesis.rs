use aws_sdk_kinesis::{
    Client,
    error::DisplayErrorContext,
    primitives::Blob,
    types::PutRecordsRequestEntry,
};
use log::{debug, warn};

use crate::{
    BatchError,
    core::item::{ItemWriter, ItemWriterResult},
    item::{aws::AwsContext, partition::EventEntry},
};

/// Sends each chunk to a Kinesis data stream with a single `PutRecords` call.
///
/// A response that reports failed records is still accepted; the failures
/// are only logged.
pub struct KinesisItemWriter<'a> {
    aws: &'a AwsContext,
    client: Client,
    stream_name: String,
}

impl<'a> KinesisItemWriter<'a> {
    pub fn new(aws: &'a AwsContext, stream_name: &str) -> Self {
        Self {
            aws,
            client: Client::new(aws.config()),
            stream_name: stream_name.to_owned(),
        }
    }
}

fn to_request_entry(entry: &EventEntry) -> Result<PutRecordsRequestEntry, BatchError> {
    PutRecordsRequestEntry::builder()
        .data(Blob::new(entry.data.to_bytes()?))
        .partition_key(&entry.partition_key)
        .build()
        .map_err(|err| BatchError::ItemWriter(err.to_string()))
}

impl ItemWriter<EventEntry> for KinesisItemWriter<'_> {
    fn write(&self, items: &[EventEntry]) -> ItemWriterResult {
        let records = items
            .iter()
            .map(to_request_entry)
            .collect::<Result<Vec<_>, _>>()?;

        let output = self
            .aws
            .block_on(
                self.client
                    .put_records()
                    .stream_name(&self.stream_name)
                    .set_records(Some(records))
                    .send(),
            )
            .map_err(|err| BatchError::ItemWriter(DisplayErrorContext(&err).to_string()))?;

        debug!("[KINESIS] {:?}", output);

        if let Some(failed) = output.failed_record_count().filter(|count| *count > 0) {
            warn!(
                "{} of {} record(s) were rejected by stream {}",
                failed,
                items.len(),
                self.stream_name
            );
        }
        Ok(())
    }

    fn destination(&self) -> String {
        format!("kinesis stream {}", self.stream_name)
    }
}

#[cfg(test)]
mod tests {
    use crate::item::{
        fake::{EventType, Record},
        partition::{EventEntry, Framing, Payload, partition_key},
    };

    use super::to_request_entry;

    #[test]
    fn request_entry_carries_payload_and_key() {
        let record = Record {
            user_id: "user-190".to_string(),
            site_id: 283,
            event: EventType::View,
            sku: "QQ9999WWWW".to_string(),
            amount: 1,
            event_time: "2024-02-02 02:02:02".to_string(),
        };
        let entry = EventEntry {
            data: Payload::frame(&record, Framing::JsonLine).unwrap(),
            partition_key: partition_key(99),
        };

        let request = to_request_entry(&entry).unwrap();

        assert_eq!(request.partition_key(), Some("part-00099"));
        let data: &[u8] = request.data().as_ref();
        assert_eq!(data.last(), Some(&b'\n'));
        let parsed: Record = serde_json::from_slice(data).unwrap();
        assert_eq!(parsed, record);
    }
}
