use aws_sdk_firehose::{Client, error::DisplayErrorContext, primitives::Blob, types::Record};
use log::{debug, warn};

use crate::{
    BatchError,
    core::item::{ItemWriter, ItemWriterResult},
    item::{aws::AwsContext, partition::EventEntry},
};

/// Sends each chunk to a Firehose delivery stream with `PutRecordBatch`.
///
/// Firehose has no partition keys, so only the entry payloads are sent.
pub struct FirehoseItemWriter<'a> {
    aws: &'a AwsContext,
    client: Client,
    delivery_stream_name: String,
}

impl<'a> FirehoseItemWriter<'a> {
    pub fn new(aws: &'a AwsContext, delivery_stream_name: &str) -> Self {
        Self {
            aws,
            client: Client::new(aws.config()),
            delivery_stream_name: delivery_stream_name.to_owned(),
        }
    }
}

fn to_record(entry: &EventEntry) -> Result<Record, BatchError> {
    Record::builder()
        .data(Blob::new(entry.data.to_bytes()?))
        .build()
        .map_err(|err| BatchError::ItemWriter(err.to_string()))
}

impl ItemWriter<EventEntry> for FirehoseItemWriter<'_> {
    fn write(&self, items: &[EventEntry]) -> ItemWriterResult {
        let records = items
            .iter()
            .map(to_record)
            .collect::<Result<Vec<_>, _>>()?;

        let output = self
            .aws
            .block_on(
                self.client
                    .put_record_batch()
                    .delivery_stream_name(&self.delivery_stream_name)
                    .set_records(Some(records))
                    .send(),
            )
            .map_err(|err| BatchError::ItemWriter(DisplayErrorContext(&err).to_string()))?;

        debug!("[FIREHOSE] {:?}", output);

        let failed = output.failed_put_count();
        if failed > 0 {
            warn!(
                "{} of {} record(s) were rejected by delivery stream {}",
                failed,
                items.len(),
                self.delivery_stream_name
            );
        }
        Ok(())
    }

    fn destination(&self) -> String {
        format!("firehose delivery stream {}", self.delivery_stream_name)
    }
}
