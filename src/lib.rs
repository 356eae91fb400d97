#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # stream-faker

 Generates fake user events and streams them, in batches, into Amazon Kinesis
 Data Streams or Amazon Data Firehose. A dry run prints every batch instead of
 sending it, and the console mode prints every record as it is generated.

 ## Core Concepts

- **Job:** the whole run. A `Job` is composed of one or more `Step`s.
- **Step:** reads items, processes them and writes them out one chunk at a time.
- **ItemReader:** retrieves the input of a `Step`, one item at a time. Here the
  `EventReader` generates fake records.
- **ItemProcessor:** turns a read item into the item to write. Here the
  `PartitionKeyProcessor` attaches a random partition key to every record.
- **ItemWriter:** delivers one chunk of items. Writers exist for Kinesis,
  Firehose, dry runs and the console.
- **RetryPolicy:** re-sends a failed chunk a bounded number of times with a
  random pause between attempts.

 ## Features

| **Feature**   | **Description**                                         |
|---------------|---------------------------------------------------------|
| kinesis       | Enables the Kinesis Data Streams `ItemWriter`           |
| firehose      | Enables the Data Firehose `ItemWriter`                  |
| full          | Enables all available features                          |

 ## Getting Started

```rust
use stream_faker::{
    config::{Delivery, RunConfig},
    runner::run,
};

let mut output = Vec::new();
let report = run(&RunConfig::new(Delivery::Console, 3), &mut output).unwrap();

assert_eq!(report.record_count, 3);
assert!(String::from_utf8(output)
    .unwrap()
    .ends_with("Total 3 records are processed\n"));
```

 The same run from the command line:

```bash
stream-faker --service-name console --max-count 3
stream-faker --service-name kinesis --stream-name events --max-count 1000
stream-faker --service-name firehose --stream-name events --dry-run
```
 */

/// Command-line options and run configuration
pub mod config;

/// Core module for batch operations
pub mod core;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Set of item readers, processors and writers
pub mod item;

/// Entry point running a configured job
pub mod runner;
