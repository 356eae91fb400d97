//! Command-line options and the validated run configuration built from them.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::{
    BatchError,
    core::{retry::RetryPolicy, step::Throttle},
    item::{fake::TimestampMode, partition::Framing},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceName {
    /// Amazon Kinesis Data Streams
    Kinesis,
    /// Amazon Data Firehose
    Firehose,
    /// Print records on the diagnostic stream
    Console,
}

#[derive(Parser, Debug)]
#[command(name = "stream-faker")]
#[command(about = "Generate fake user events and put them into a Kinesis or Firehose stream")]
#[command(long_about = None)]
pub struct Cli {
    /// AWS region name
    #[arg(long, default_value = "us-east-1")]
    pub region_name: String,

    /// Destination service
    #[arg(long, value_enum)]
    pub service_name: ServiceName,

    /// Name of the stream (or delivery stream) to put the records into
    #[arg(long)]
    pub stream_name: Option<String>,

    /// Number of records to generate
    #[arg(long, default_value_t = 10)]
    pub max_count: usize,

    /// Print the batches instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Show debug logs, including service responses
    #[arg(long)]
    pub verbose: bool,

    /// Number of records sent in one request
    #[arg(long, default_value_t = 10)]
    pub batch_size: usize,

    /// Delivery attempts per batch before giving up
    #[arg(long, default_value_t = 3)]
    pub max_attempts: u32,

    /// Seed of the random generator
    #[arg(long, default_value_t = 47)]
    pub seed: u64,

    /// Encoding of each record in the request payload
    #[arg(long, value_enum, default_value_t = Framing::Object)]
    pub framing: Framing,

    /// Whether event times fall before or after the current time of day
    #[arg(long, value_enum, default_value_t = TimestampMode::BeforeNow)]
    pub time_mode: TimestampMode,

    /// Fixed delay after each record, in milliseconds (0 disables throttling).
    /// Without it a delay between 10 and 100 ms is drawn for every record.
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,
}

/// Where the batches go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// One JSON line per record, no batching.
    Console,
    /// One JSON array line per batch, nothing sent.
    DryRun { target: String },
    Kinesis {
        region: String,
        stream_name: String,
    },
    Firehose {
        region: String,
        delivery_stream_name: String,
    },
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub delivery: Delivery,
    pub max_count: usize,
    pub batch_size: usize,
    pub seed: u64,
    pub framing: Framing,
    pub time_mode: TimestampMode,
    pub throttle: Throttle,
    pub retry_policy: RetryPolicy,
}

impl RunConfig {
    /// Configuration with the default batch size, seed and retry policy and no throttling.
    pub fn new(delivery: Delivery, max_count: usize) -> Self {
        Self {
            delivery,
            max_count,
            batch_size: 10,
            seed: 47,
            framing: Framing::Object,
            time_mode: TimestampMode::BeforeNow,
            throttle: Throttle::None,
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl TryFrom<Cli> for RunConfig {
    type Error = BatchError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.batch_size == 0 {
            return Err(BatchError::Configuration(
                "--batch-size must be at least 1".to_string(),
            ));
        }
        if cli.max_attempts == 0 {
            return Err(BatchError::Configuration(
                "--max-attempts must be at least 1".to_string(),
            ));
        }

        let stream_name = cli.stream_name.filter(|name| !name.trim().is_empty());

        let delivery = match (cli.service_name, cli.dry_run) {
            (service, true) => Delivery::DryRun {
                target: stream_name.unwrap_or_else(|| service_label(service).to_string()),
            },
            (ServiceName::Console, false) => Delivery::Console,
            (ServiceName::Kinesis, false) => Delivery::Kinesis {
                region: cli.region_name,
                stream_name: require_stream_name(stream_name, ServiceName::Kinesis)?,
            },
            (ServiceName::Firehose, false) => Delivery::Firehose {
                region: cli.region_name,
                delivery_stream_name: require_stream_name(stream_name, ServiceName::Firehose)?,
            },
        };

        let throttle = match cli.delay_ms {
            None => Throttle::standard(),
            Some(0) => Throttle::None,
            Some(ms) => Throttle::Fixed(Duration::from_millis(ms)),
        };

        Ok(RunConfig {
            delivery,
            max_count: cli.max_count,
            batch_size: cli.batch_size,
            seed: cli.seed,
            framing: cli.framing,
            time_mode: cli.time_mode,
            throttle,
            retry_policy: RetryPolicy::new(cli.max_attempts),
        })
    }
}

fn service_label(service: ServiceName) -> &'static str {
    match service {
        ServiceName::Kinesis => "kinesis",
        ServiceName::Firehose => "firehose",
        ServiceName::Console => "console",
    }
}

fn require_stream_name(
    stream_name: Option<String>,
    service: ServiceName,
) -> Result<String, BatchError> {
    stream_name.ok_or_else(|| {
        BatchError::Configuration(format!(
            "--stream-name is required when --service-name is {}",
            service_label(service)
        ))
    })
}
