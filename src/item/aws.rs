use std::future::Future;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use log::debug;
use tokio::runtime::{Builder, Runtime};

use crate::BatchError;

/// Shared AWS configuration and the runtime used to drive SDK calls.
///
/// Writers stay synchronous: each SDK call is driven to completion with
/// [`AwsContext::block_on`] before the next chunk is read.
pub struct AwsContext {
    runtime: Runtime,
    config: SdkConfig,
}

impl AwsContext {
    /// Resolves credentials and settings from the environment for `region`.
    pub fn load(region: &str) -> Result<Self, BatchError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| BatchError::Configuration(format!("tokio runtime: {err}")))?;

        let config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.to_owned()))
                .load(),
        );
        debug!("Loaded AWS configuration for region {}", region);

        Ok(Self { runtime, config })
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}
