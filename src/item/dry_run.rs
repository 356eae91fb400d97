use std::{cell::RefCell, io::Write};

use log::debug;
use serde::Serialize;

use crate::{
    BatchError,
    core::item::{ItemWriter, ItemWriterResult},
};

/// Prints each chunk as a single JSON array line instead of sending it.
///
/// Used for dry runs: the chunk is exactly what a stream writer would have
/// received, including partition keys.
pub struct DryRunItemWriter<'a, W: Write> {
    stream: &'a RefCell<W>,
    target: String,
}

impl<'a, W: Write> DryRunItemWriter<'a, W> {
    pub fn new(stream: &'a RefCell<W>, target: &str) -> Self {
        Self {
            stream,
            target: target.to_string(),
        }
    }
}

impl<T: Serialize, W: Write> ItemWriter<T> for DryRunItemWriter<'_, W> {
    fn write(&self, items: &[T]) -> ItemWriterResult {
        debug!("Dry run: {} item(s) not sent to {}", items.len(), self.target);

        let mut stream = self.stream.borrow_mut();
        serde_json::to_writer(&mut *stream, items)
            .map_err(|err| BatchError::ItemWriter(err.to_string()))?;
        stream
            .write_all(b"\n")
            .map_err(|err| BatchError::ItemWriter(err.to_string()))
    }

    fn flush(&self) -> ItemWriterResult {
        self.stream
            .borrow_mut()
            .flush()
            .map_err(|err| BatchError::ItemWriter(err.to_string()))
    }

    fn destination(&self) -> String {
        format!("dry-run({})", self.target)
    }
}
