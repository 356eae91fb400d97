mod common;

use std::{cell::RefCell, time::Duration};

use common::fixed_schema;
use stream_faker::{
    core::{
        item::{DefaultProcessor, ItemReader, ItemWriter, ItemWriterResult},
        random::RandomSource,
        retry::RetryPolicy,
        step::{Step, StepBuilder, StepExecution, StepStatus},
    },
    item::{
        fake::{EventReaderBuilder, Record},
        partition::{EventEntry, Framing, PartitionKeyProcessor, Payload},
    },
};

struct CollectingWriter<T> {
    batches: RefCell<Vec<Vec<T>>>,
}

impl<T> Default for CollectingWriter<T> {
    fn default() -> Self {
        Self {
            batches: RefCell::new(Vec::new()),
        }
    }
}

impl<T: Clone> ItemWriter<T> for CollectingWriter<T> {
    fn write(&self, items: &[T]) -> ItemWriterResult {
        self.batches.borrow_mut().push(items.to_vec());
        Ok(())
    }
}

fn expected_records(seed: u64, count: usize) -> Vec<Record> {
    let random = RandomSource::seeded(seed);
    let reader = EventReaderBuilder::new()
        .number_of_items(count)
        .schema(fixed_schema())
        .random(&random)
        .build()
        .unwrap();
    std::iter::from_fn(|| reader.read().unwrap()).collect()
}

fn batch_records(seed: u64, count: usize, batch_size: usize) -> (Vec<Vec<Record>>, StepExecution) {
    let random = RandomSource::seeded(seed);
    let reader = EventReaderBuilder::new()
        .number_of_items(count)
        .schema(fixed_schema())
        .random(&random)
        .build()
        .unwrap();
    let processor = DefaultProcessor::default();
    let writer = CollectingWriter::default();

    let step = StepBuilder::new()
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .random(&random)
        .chunk(batch_size)
        .retry_policy(RetryPolicy::new(1).backoff_unit(Duration::ZERO))
        .build()
        .unwrap();

    let mut execution = StepExecution::new(step.get_name());
    step.execute(&mut execution).unwrap();

    (writer.batches.take(), execution)
}

#[test]
fn batch_sizes_follow_count_and_batch_size() {
    for (count, batch_size) in [(0, 10), (1, 10), (10, 10), (11, 10), (25, 10), (23, 4), (5, 1)] {
        let (batches, execution) = batch_records(47, count, batch_size);

        let expected_batches = count.div_ceil(batch_size);
        assert_eq!(batches.len(), expected_batches, "count={count} size={batch_size}");

        for (index, batch) in batches.iter().enumerate() {
            let expected_len = if index + 1 < expected_batches || count % batch_size == 0 {
                batch_size
            } else {
                count % batch_size
            };
            assert_eq!(batch.len(), expected_len);
        }

        assert_eq!(execution.status, StepStatus::Success);
        assert_eq!(execution.read_count, count);
        assert_eq!(execution.write_count, count);
        assert_eq!(execution.chunk_count, expected_batches);
    }
}

#[test]
fn batches_preserve_generation_order() {
    let (batches, _) = batch_records(47, 37, 10);
    assert_eq!(batches.concat(), expected_records(47, 37));
}

#[test]
fn stream_entries_carry_partition_keys() {
    let random = RandomSource::seeded(47);
    let reader = EventReaderBuilder::new()
        .number_of_items(12)
        .schema(fixed_schema())
        .random(&random)
        .build()
        .unwrap();
    let processor = PartitionKeyProcessor::new(&random, Framing::Object);
    let writer: CollectingWriter<EventEntry> = CollectingWriter::default();

    let step = StepBuilder::new()
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .random(&random)
        .build()
        .unwrap();
    let mut execution = StepExecution::new(step.get_name());
    step.execute(&mut execution).unwrap();

    let batches = writer.batches.take();
    assert_eq!(batches.iter().map(Vec::len).collect::<Vec<_>>(), vec![10, 2]);

    for entry in batches.concat() {
        assert!(entry.partition_key.starts_with("part-"));
        assert_eq!(entry.partition_key.len(), "part-00000".len());
        let shard: u32 = entry.partition_key[5..].parse().unwrap();
        assert!((1..=1024).contains(&shard));
        assert!(matches!(entry.data, Payload::Record(_)));
    }
}
