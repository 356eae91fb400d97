use thiserror::Error;

#[derive(Error, Debug)]
/// Batch error
pub enum BatchError {
    #[error("Configuration: {0}")]
    Configuration(String),

    #[error("ItemProcessor from: {0}")]
    ItemProcessor(String),

    #[error("ItemWriter from: {0}")]
    ItemWriter(String),

    /// Every delivery attempt for a chunk failed.
    #[error("Failed to write records into {destination} after {attempts} attempt(s)")]
    RetryExhausted {
        destination: String,
        attempts: u32,
        #[source]
        source: Box<BatchError>,
    },

    #[error("Step: {0}")]
    Step(String),
}
