use std::{
    thread,
    time::{Duration, Instant},
};

use log::{debug, error, info};
use uuid::Uuid;

use crate::BatchError;

use super::{
    build_name,
    chunk::{Chunk, ChunkStatus},
    item::{ItemProcessor, ItemReader, ItemWriter},
    random::RandomSource,
    retry::{DeliveryOutcome, RetryPolicy},
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StepStatus {
    Starting,
    Started,
    Success,
    ReadError,
    ProcessorError,
    WriteError,
}

/// Execution details of a single step run.
#[derive(Debug)]
pub struct StepExecution {
    /// Unique identifier for this step execution
    pub id: Uuid,
    pub name: String,
    pub status: StepStatus,
    pub start_time: Instant,
    pub end_time: Instant,
    pub duration: Duration,
    /// Number of items successfully read
    pub read_count: usize,
    /// Number of items successfully delivered
    pub write_count: usize,
    /// Number of chunks successfully delivered
    pub chunk_count: usize,
    /// Number of failed delivery attempts that were retried
    pub retry_count: usize,
    pub read_error_count: usize,
    pub process_error_count: usize,
    /// Number of items in chunks that could not be delivered
    pub write_error_count: usize,
}

impl StepExecution {
    pub fn new(name: &str) -> Self {
        let now = Instant::now();
        Self {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            status: StepStatus::Starting,
            start_time: now,
            end_time: now,
            duration: Duration::ZERO,
            read_count: 0,
            write_count: 0,
            chunk_count: 0,
            retry_count: 0,
            read_error_count: 0,
            process_error_count: 0,
            write_error_count: 0,
        }
    }
}

pub trait Step {
    /// Runs the step, recording counters and final status in `step_execution`.
    fn execute(&self, step_execution: &mut StepExecution) -> Result<(), BatchError>;

    fn get_name(&self) -> &str;
}

/// Per-record pause used to throttle throughput.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Throttle {
    #[default]
    None,
    Fixed(Duration),
    /// One of the listed delays, drawn uniformly for every record.
    RandomChoice(Vec<Duration>),
}

impl Throttle {
    /// Delays drawn from when no fixed delay is configured.
    pub fn standard() -> Self {
        Throttle::RandomChoice(
            [10, 30, 50, 70, 100]
                .into_iter()
                .map(Duration::from_millis)
                .collect(),
        )
    }

    pub fn delay(&self, random: &RandomSource) -> Duration {
        match self {
            Throttle::None => Duration::ZERO,
            Throttle::Fixed(delay) => *delay,
            Throttle::RandomChoice(delays) => {
                random.choose(delays).copied().unwrap_or(Duration::ZERO)
            }
        }
    }

    fn pause(&self, random: &RandomSource) {
        let delay = self.delay(random);
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// Reads items into chunks, processes them and writes each chunk through a
/// retry policy.
///
/// Chunks are written in the order they are read and the next chunk is not
/// read before the previous one has been delivered. A chunk whose retries are
/// exhausted stops the step.
pub struct ChunkOrientedStep<'a, I, O> {
    name: String,
    reader: &'a dyn ItemReader<I>,
    processor: &'a dyn ItemProcessor<I, O>,
    writer: &'a dyn ItemWriter<O>,
    random: &'a RandomSource,
    chunk_size: usize,
    retry_policy: RetryPolicy,
    throttle: Throttle,
}

impl<I, O> Step for ChunkOrientedStep<'_, I, O> {
    fn execute(&self, step_execution: &mut StepExecution) -> Result<(), BatchError> {
        let start_time = Instant::now();
        step_execution.start_time = start_time;
        step_execution.status = StepStatus::Started;

        info!(
            "Start of step: {}, id: {}",
            step_execution.name, step_execution.id
        );

        let result = self.open().and_then(|()| self.run_chunks(step_execution));
        let result = result.and_then(|()| self.close());

        if result.is_ok() {
            step_execution.status = StepStatus::Success;
        } else if step_execution.status == StepStatus::Started {
            step_execution.status = StepStatus::WriteError;
        }

        step_execution.end_time = Instant::now();
        step_execution.duration = start_time.elapsed();

        info!(
            "End of step: {}, id: {}, status: {:?}",
            step_execution.name, step_execution.id, step_execution.status
        );

        result
    }

    fn get_name(&self) -> &str {
        &self.name
    }
}

impl<I, O> ChunkOrientedStep<'_, I, O> {
    fn open(&self) -> Result<(), BatchError> {
        self.writer.open()
    }

    fn close(&self) -> Result<(), BatchError> {
        self.writer.close()
    }

    fn run_chunks(&self, step_execution: &mut StepExecution) -> Result<(), BatchError> {
        loop {
            let chunk = self.read_chunk(step_execution)?;
            let status = chunk.get_status();

            if !chunk.is_empty() {
                let processed = self.process_chunk(step_execution, chunk.get_items())?;
                self.write_chunk(step_execution, &processed)?;
            }

            if status == ChunkStatus::Finished {
                return Ok(());
            }
        }
    }

    fn read_chunk(&self, step_execution: &mut StepExecution) -> Result<Chunk<I>, BatchError> {
        debug!("Start reading chunk");
        let mut chunk = Chunk::new(self.chunk_size);

        loop {
            match self.reader.read() {
                Ok(Some(item)) => {
                    step_execution.read_count += 1;
                    let status = chunk.push(item);
                    self.throttle.pause(self.random);

                    if status == ChunkStatus::Full {
                        debug!("End reading chunk: FULL ({} items)", chunk.len());
                        return Ok(chunk);
                    }
                }
                Ok(None) => {
                    chunk.finish();
                    debug!("End reading chunk: FINISHED ({} items)", chunk.len());
                    return Ok(chunk);
                }
                Err(err) => {
                    step_execution.read_error_count += 1;
                    step_execution.status = StepStatus::ReadError;
                    error!("Error occurred during read item: {}", err);
                    return Err(err);
                }
            }
        }
    }

    fn process_chunk(
        &self,
        step_execution: &mut StepExecution,
        read_items: &[I],
    ) -> Result<Vec<O>, BatchError> {
        debug!("Start processing chunk");
        let mut processed_items = Vec::with_capacity(read_items.len());

        for item in read_items {
            match self.processor.process(item) {
                Ok(processed) => processed_items.push(processed),
                Err(err) => {
                    step_execution.process_error_count += 1;
                    step_execution.status = StepStatus::ProcessorError;
                    error!("Error occurred during process item: {}", err);
                    return Err(err);
                }
            }
        }

        debug!("End processing chunk");
        Ok(processed_items)
    }

    fn write_chunk(
        &self,
        step_execution: &mut StepExecution,
        processed_items: &[O],
    ) -> Result<(), BatchError> {
        debug!("Start writing chunk of {} item(s)", processed_items.len());

        let outcome = self.retry_policy.execute(self.random, |attempt| {
            debug!("Writing chunk, attempt {}", attempt);
            self.writer
                .write(processed_items)
                .and_then(|()| self.writer.flush())
        });

        step_execution.retry_count += outcome.attempts() as usize - 1;

        match outcome {
            DeliveryOutcome::Delivered { .. } => {
                step_execution.write_count += processed_items.len();
                step_execution.chunk_count += 1;
                debug!("End writing chunk");
                Ok(())
            }
            DeliveryOutcome::Exhausted {
                attempts,
                last_error,
            } => {
                step_execution.write_error_count += processed_items.len();
                step_execution.status = StepStatus::WriteError;
                Err(BatchError::RetryExhausted {
                    destination: self.writer.destination(),
                    attempts,
                    source: Box::new(last_error),
                })
            }
        }
    }
}

pub struct StepBuilder<'a, I, O> {
    name: Option<String>,
    reader: Option<&'a dyn ItemReader<I>>,
    processor: Option<&'a dyn ItemProcessor<I, O>>,
    writer: Option<&'a dyn ItemWriter<O>>,
    random: Option<&'a RandomSource>,
    chunk_size: usize,
    retry_policy: RetryPolicy,
    throttle: Throttle,
}

impl<I, O> Default for StepBuilder<'_, I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, I, O> StepBuilder<'a, I, O> {
    pub fn new() -> StepBuilder<'a, I, O> {
        Self {
            name: None,
            reader: None,
            processor: None,
            writer: None,
            random: None,
            chunk_size: 10,
            retry_policy: RetryPolicy::default(),
            throttle: Throttle::None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    pub fn reader(mut self, reader: &'a impl ItemReader<I>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn processor(mut self, processor: &'a impl ItemProcessor<I, O>) -> Self {
        self.processor = Some(processor);
        self
    }

    pub fn writer(mut self, writer: &'a impl ItemWriter<O>) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn random(mut self, random: &'a RandomSource) -> Self {
        self.random = Some(random);
        self
    }

    /// Sets the commit interval: the number of items written together.
    pub fn chunk(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn build(self) -> Result<ChunkOrientedStep<'a, I, O>, BatchError> {
        let missing = |part: &str| BatchError::Configuration(format!("step requires a {part}"));

        if self.chunk_size == 0 {
            return Err(BatchError::Configuration(
                "chunk size must be at least 1".to_string(),
            ));
        }

        Ok(ChunkOrientedStep {
            name: self.name.unwrap_or_else(build_name),
            reader: self.reader.ok_or_else(|| missing("reader"))?,
            processor: self.processor.ok_or_else(|| missing("processor"))?,
            writer: self.writer.ok_or_else(|| missing("writer"))?,
            random: self.random.ok_or_else(|| missing("random source"))?,
            chunk_size: self.chunk_size,
            retry_policy: self.retry_policy,
            throttle: self.throttle,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        time::Duration,
    };

    use crate::{
        BatchError,
        core::{
            item::{DefaultProcessor, ItemReader, ItemReaderResult, ItemWriter, ItemWriterResult},
            random::RandomSource,
            retry::RetryPolicy,
        },
    };

    use super::{Step, StepBuilder, StepExecution, StepStatus, Throttle};

    struct CountingReader {
        next: Cell<u32>,
        end: u32,
    }

    impl CountingReader {
        fn new(end: u32) -> Self {
            Self {
                next: Cell::new(0),
                end,
            }
        }
    }

    impl ItemReader<u32> for CountingReader {
        fn read(&self) -> ItemReaderResult<u32> {
            let next = self.next.get();
            if next == self.end {
                return Ok(None);
            }
            self.next.set(next + 1);
            Ok(Some(next))
        }
    }

    #[derive(Default)]
    struct CollectingWriter {
        chunks: RefCell<Vec<Vec<u32>>>,
        failures_left: Cell<u32>,
    }

    impl ItemWriter<u32> for CollectingWriter {
        fn write(&self, items: &[u32]) -> ItemWriterResult {
            if self.failures_left.get() > 0 {
                self.failures_left.set(self.failures_left.get() - 1);
                return Err(BatchError::ItemWriter("unavailable".to_string()));
            }
            self.chunks.borrow_mut().push(items.to_vec());
            Ok(())
        }

        fn destination(&self) -> String {
            "collector".to_string()
        }
    }

    fn instant_retry(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts).backoff_unit(Duration::ZERO)
    }

    #[test]
    fn writes_full_chunks_then_trailing_chunk() {
        let random = RandomSource::seeded(47);
        let reader = CountingReader::new(25);
        let processor = DefaultProcessor::default();
        let writer = CollectingWriter::default();

        let step = StepBuilder::new()
            .name("numbers")
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .random(&random)
            .chunk(10)
            .build()
            .unwrap();

        let mut execution = StepExecution::new(step.get_name());
        step.execute(&mut execution).unwrap();

        let chunks = writer.chunks.borrow();
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![10, 10, 5]);
        assert_eq!(chunks.concat(), (0..25).collect::<Vec<u32>>());
        assert_eq!(execution.status, StepStatus::Success);
        assert_eq!(execution.read_count, 25);
        assert_eq!(execution.write_count, 25);
        assert_eq!(execution.chunk_count, 3);
    }

    #[test]
    fn empty_reader_writes_nothing() {
        let random = RandomSource::seeded(47);
        let reader = CountingReader::new(0);
        let processor = DefaultProcessor::default();
        let writer = CollectingWriter::default();

        let step = StepBuilder::new()
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .random(&random)
            .build()
            .unwrap();

        let mut execution = StepExecution::new(step.get_name());
        step.execute(&mut execution).unwrap();

        assert!(writer.chunks.borrow().is_empty());
        assert_eq!(execution.status, StepStatus::Success);
        assert_eq!(execution.chunk_count, 0);
    }

    #[test]
    fn exhausted_retries_stop_the_step() {
        let random = RandomSource::seeded(47);
        let reader = CountingReader::new(30);
        let processor = DefaultProcessor::default();
        let writer = CollectingWriter::default();
        writer.failures_left.set(2);

        let step = StepBuilder::new()
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .random(&random)
            .retry_policy(instant_retry(2))
            .build()
            .unwrap();

        let mut execution = StepExecution::new(step.get_name());
        let result = step.execute(&mut execution);

        match result {
            Err(BatchError::RetryExhausted {
                destination,
                attempts,
                ..
            }) => {
                assert_eq!(destination, "collector");
                assert_eq!(attempts, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(execution.status, StepStatus::WriteError);
        assert_eq!(execution.read_count, 10);
        assert_eq!(execution.write_error_count, 10);
        assert!(writer.chunks.borrow().is_empty());
    }

    #[test]
    fn retried_chunk_is_delivered_once() {
        let random = RandomSource::seeded(47);
        let reader = CountingReader::new(4);
        let processor = DefaultProcessor::default();
        let writer = CollectingWriter::default();
        writer.failures_left.set(1);

        let step = StepBuilder::new()
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .random(&random)
            .chunk(2)
            .retry_policy(instant_retry(3))
            .build()
            .unwrap();

        let mut execution = StepExecution::new(step.get_name());
        step.execute(&mut execution).unwrap();

        assert_eq!(*writer.chunks.borrow(), vec![vec![0, 1], vec![2, 3]]);
        assert_eq!(execution.retry_count, 1);
    }

    #[test]
    fn build_rejects_zero_chunk_size() {
        let random = RandomSource::seeded(47);
        let reader = CountingReader::new(1);
        let processor = DefaultProcessor::default();
        let writer = CollectingWriter::default();

        let result = StepBuilder::new()
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .random(&random)
            .chunk(0)
            .build();

        assert!(matches!(result, Err(BatchError::Configuration(_))));
    }

    #[test]
    fn throttle_draws_from_its_choices() {
        let random = RandomSource::seeded(3);
        let throttle = Throttle::standard();
        for _ in 0..20 {
            let delay = throttle.delay(&random).as_millis();
            assert!([10, 30, 50, 70, 100].contains(&delay));
        }
        assert_eq!(Throttle::None.delay(&random), Duration::ZERO);
        assert_eq!(
            Throttle::Fixed(Duration::from_millis(5)).delay(&random),
            Duration::from_millis(5)
        );
    }
}
