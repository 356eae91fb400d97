//! Wires a [`RunConfig`] into a reader, a processor, a writer and a job, and
//! runs it.

use std::{cell::RefCell, io::Write, time::Duration};

use log::{info, warn};

use crate::{
    BatchError,
    config::{Delivery, RunConfig},
    core::{
        item::{DefaultProcessor, ItemProcessor, ItemWriter},
        job::{Job, JobBuilder},
        random::RandomSource,
        step::StepBuilder,
    },
    item::{
        console::ConsoleItemWriter,
        dry_run::DryRunItemWriter,
        fake::{EventReader, EventReaderBuilder, EventSchema, Record},
        partition::PartitionKeyProcessor,
    },
};

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub record_count: usize,
    pub batch_count: usize,
    pub retry_count: usize,
    pub duration: Duration,
}

/// Generates and delivers the configured records.
///
/// Console and dry-run output, followed by the summary line, is written to
/// `out`. The first batch whose delivery attempts are exhausted aborts the
/// run with [`BatchError::RetryExhausted`].
pub fn run<W: Write>(config: &RunConfig, out: W) -> Result<RunReport, BatchError> {
    run_with_schema(config, EventSchema::default(), out)
}

/// Same as [`run`] with an explicit record schema.
pub fn run_with_schema<W: Write>(
    config: &RunConfig,
    schema: EventSchema,
    out: W,
) -> Result<RunReport, BatchError> {
    let random = RandomSource::seeded(config.seed);
    let reader = EventReaderBuilder::new()
        .number_of_items(config.max_count)
        .schema(schema.time_mode(config.time_mode))
        .random(&random)
        .build()?;

    let out = RefCell::new(out);

    let report = match &config.delivery {
        Delivery::Console => {
            let processor = DefaultProcessor::default();
            let writer = ConsoleItemWriter::new(&out);
            execute(config, &random, &reader, &processor, &writer, 1)?
        }
        Delivery::DryRun { target } => {
            let processor = PartitionKeyProcessor::new(&random, config.framing);
            let writer = DryRunItemWriter::new(&out, target);
            execute(config, &random, &reader, &processor, &writer, config.batch_size)?
        }
        #[cfg(feature = "kinesis")]
        Delivery::Kinesis {
            region,
            stream_name,
        } => {
            let aws = crate::item::aws::AwsContext::load(region)?;
            let processor = PartitionKeyProcessor::new(&random, config.framing);
            let writer = crate::item::kinesis::KinesisItemWriter::new(&aws, stream_name);
            execute(config, &random, &reader, &processor, &writer, config.batch_size)?
        }
        #[cfg(feature = "firehose")]
        Delivery::Firehose {
            region,
            delivery_stream_name,
        } => {
            let aws = crate::item::aws::AwsContext::load(region)?;
            let processor = PartitionKeyProcessor::new(&random, config.framing);
            let writer =
                crate::item::firehose::FirehoseItemWriter::new(&aws, delivery_stream_name);
            execute(config, &random, &reader, &processor, &writer, config.batch_size)?
        }
        #[allow(unreachable_patterns)]
        unsupported => {
            return Err(BatchError::Configuration(format!(
                "built without support for {unsupported:?}"
            )));
        }
    };

    let mut out = out.borrow_mut();
    writeln!(out, "Total {} records are processed", report.record_count)
        .and_then(|()| out.flush())
        .map_err(|err| BatchError::ItemWriter(err.to_string()))?;

    Ok(report)
}

fn execute<O>(
    config: &RunConfig,
    random: &RandomSource,
    reader: &EventReader<'_>,
    processor: &impl ItemProcessor<Record, O>,
    writer: &impl ItemWriter<O>,
    chunk_size: usize,
) -> Result<RunReport, BatchError> {
    let step = StepBuilder::new()
        .name("generate-events")
        .reader(reader)
        .processor(processor)
        .writer(writer)
        .random(random)
        .chunk(chunk_size)
        .retry_policy(config.retry_policy.clone())
        .throttle(config.throttle.clone())
        .build()?;

    let job = JobBuilder::new()
        .name(format!("put-records-{}", writer.destination()))
        .start(&step)
        .build();
    let execution = job.run().inspect_err(|_| {
        warn!("{} record(s) were never generated", reader.remaining());
    })?;

    let report = RunReport {
        record_count: execution.read_count(),
        batch_count: execution
            .step_executions
            .iter()
            .map(|step| step.chunk_count)
            .sum(),
        retry_count: execution
            .step_executions
            .iter()
            .map(|step| step.retry_count)
            .sum(),
        duration: execution.duration,
    };
    info!(
        "{} record(s) in {} batch(es) delivered to {} in {:?}",
        report.record_count,
        report.batch_count,
        writer.destination(),
        report.duration
    );
    Ok(report)
}
