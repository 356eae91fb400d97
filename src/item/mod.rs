/// This module provides a console item writer, one JSON line per record.
pub mod console;

/// This module provides a dry-run item writer printing each chunk instead of sending it.
pub mod dry_run;

/// This module provides a fake event reader and its field generators.
pub mod fake;

/// This module wraps records into stream entries with partition keys.
pub mod partition;

#[cfg(any(feature = "kinesis", feature = "firehose"))]
/// This module provides the shared AWS configuration and runtime.
pub mod aws;

#[cfg(feature = "kinesis")]
/// This module provides an item writer for Kinesis data streams.
pub mod kinesis;

#[cfg(feature = "firehose")]
/// This module provides an item writer for Firehose delivery streams.
pub mod firehose;
