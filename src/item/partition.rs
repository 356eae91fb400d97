//! Wraps records into stream entries carrying a partition key.

use std::ops::RangeInclusive;

use clap::ValueEnum;
use serde::Serialize;

use crate::{
    BatchError,
    core::{
        item::{ItemProcessor, ItemProcessorResult},
        random::RandomSource,
    },
    item::fake::Record,
};

const PARTITION_RANGE: RangeInclusive<u64> = 1..=1024;

/// How a record is carried in the `Data` field of an entry.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Framing {
    /// The record itself, sent as compact JSON.
    #[default]
    Object,
    /// A JSON string of the record terminated by a newline.
    JsonLine,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Record(Record),
    Line(String),
}

impl Payload {
    pub fn frame(record: &Record, framing: Framing) -> Result<Self, BatchError> {
        match framing {
            Framing::Object => Ok(Payload::Record(record.clone())),
            Framing::JsonLine => serde_json::to_string(record)
                .map(|json| Payload::Line(json + "\n"))
                .map_err(|err| BatchError::ItemProcessor(err.to_string())),
        }
    }

    /// Bytes sent over the wire for this payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BatchError> {
        match self {
            Payload::Record(record) => {
                serde_json::to_vec(record).map_err(|err| BatchError::ItemWriter(err.to_string()))
            }
            Payload::Line(line) => Ok(line.as_bytes().to_vec()),
        }
    }
}

/// One element of a batch sent to a stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventEntry {
    #[serde(rename = "Data")]
    pub data: Payload,
    #[serde(rename = "PartitionKey")]
    pub partition_key: String,
}

/// Formats a shard number as `part-NNNNN`.
pub fn partition_key(shard: u64) -> String {
    format!("part-{:05}", shard)
}

/// Attaches a random partition key to every record.
pub struct PartitionKeyProcessor<'a> {
    random: &'a RandomSource,
    framing: Framing,
}

impl<'a> PartitionKeyProcessor<'a> {
    pub fn new(random: &'a RandomSource, framing: Framing) -> Self {
        Self { random, framing }
    }
}

impl ItemProcessor<Record, EventEntry> for PartitionKeyProcessor<'_> {
    fn process(&self, item: &Record) -> ItemProcessorResult<EventEntry> {
        let shard = self.random.range(PARTITION_RANGE);
        Ok(EventEntry {
            data: Payload::frame(item, self.framing)?,
            partition_key: partition_key(shard),
        })
    }
}
