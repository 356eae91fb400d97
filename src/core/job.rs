use std::time::{Duration, Instant};

use log::{error, info};
use uuid::Uuid;

use crate::BatchError;

use super::{
    build_name,
    step::{Step, StepExecution},
};

type JobResult<T> = Result<T, BatchError>;

/// Represents a job that can be executed.
///
/// A job is a container for a sequence of steps executed in order. The first
/// failing step aborts the job and its error is returned unchanged, so a
/// caller can still tell a retry exhaustion from a configuration problem.
pub trait Job {
    /// Runs the job and returns the result of the job execution.
    ///
    /// # Returns
    /// - `Ok(JobExecution)` when every step succeeds
    /// - `Err(BatchError)` with the error of the first failing step
    fn run(&self) -> JobResult<JobExecution>;
}

/// Timing and step details of a successful job run.
#[derive(Debug)]
pub struct JobExecution {
    /// The time when the job started executing
    pub start: Instant,
    /// The time when the job finished executing
    pub end: Instant,
    /// The total duration of the job execution
    pub duration: Duration,
    /// Execution details of every step, in execution order
    pub step_executions: Vec<StepExecution>,
}

impl JobExecution {
    /// Sum of the items read by all steps.
    pub fn read_count(&self) -> usize {
        self.step_executions.iter().map(|s| s.read_count).sum()
    }
}

pub struct JobInstance<'a> {
    /// Unique identifier for this job instance
    id: Uuid,
    name: String,
    /// Steps in execution order
    steps: Vec<&'a dyn Step>,
}

impl JobInstance<'_> {
    pub fn get_name(&self) -> &str {
        &self.name
    }
}

impl Job for JobInstance<'_> {
    fn run(&self) -> JobResult<JobExecution> {
        let start = Instant::now();

        info!("Start of job: {}, id: {}", self.name, self.id);

        let mut step_executions = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let mut step_execution = StepExecution::new(step.get_name());

            if let Err(err) = step.execute(&mut step_execution) {
                error!(
                    "Job {} aborted in step {}: {}",
                    self.name,
                    step.get_name(),
                    err
                );
                return Err(err);
            }

            step_executions.push(step_execution);
        }

        info!("End of job: {}, id: {}", self.name, self.id);

        Ok(JobExecution {
            start,
            end: Instant::now(),
            duration: start.elapsed(),
            step_executions,
        })
    }
}

/// Builder for creating a job instance.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
///
/// use stream_faker::{
///     core::{
///         item::DefaultProcessor,
///         job::{Job, JobBuilder},
///         random::RandomSource,
///         step::StepBuilder,
///     },
///     item::{
///         console::ConsoleItemWriter,
///         fake::{EventReaderBuilder, Record},
///     },
/// };
///
/// let random = RandomSource::seeded(47);
/// let reader = EventReaderBuilder::new()
///     .number_of_items(3)
///     .random(&random)
///     .build()?;
/// let processor = DefaultProcessor::default();
/// let stream = RefCell::new(Vec::new());
/// let writer = ConsoleItemWriter::new(&stream);
///
/// let generate_step = StepBuilder::<Record, Record>::new()
///     .name("generate")
///     .reader(&reader)
///     .processor(&processor)
///     .writer(&writer)
///     .random(&random)
///     .build()?;
///
/// let job = JobBuilder::new()
///     .name("fake-events".to_string())
///     .start(&generate_step)
///     .build();
///
/// assert_eq!(job.run()?.read_count(), 3);
/// # Ok::<(), stream_faker::BatchError>(())
/// ```
#[derive(Default)]
pub struct JobBuilder<'a> {
    /// Optional name for the job (generated randomly if not specified)
    name: Option<String>,
    steps: Vec<&'a dyn Step>,
}

impl<'a> JobBuilder<'a> {
    pub fn new() -> Self {
        Self {
            name: None,
            steps: Vec::new(),
        }
    }

    pub fn name(mut self, name: String) -> JobBuilder<'a> {
        self.name = Some(name);
        self
    }

    /// Sets the first step of the job. Same as `next`, reads better first.
    pub fn start(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    pub fn next(mut self, step: &'a dyn Step) -> JobBuilder<'a> {
        self.steps.push(step);
        self
    }

    pub fn build(self) -> JobInstance<'a> {
        JobInstance {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_else(build_name),
            steps: self.steps,
        }
    }
}
