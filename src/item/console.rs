use std::{cell::RefCell, io::Write};

use serde::Serialize;

use crate::{
    BatchError,
    core::item::{ItemWriter, ItemWriterResult},
};

/// Writes every item as one JSON line on an output stream.
pub struct ConsoleItemWriter<'a, W: Write> {
    stream: &'a RefCell<W>,
}

impl<'a, W: Write> ConsoleItemWriter<'a, W> {
    pub fn new(stream: &'a RefCell<W>) -> Self {
        Self { stream }
    }
}

impl<T: Serialize, W: Write> ItemWriter<T> for ConsoleItemWriter<'_, W> {
    fn write(&self, items: &[T]) -> ItemWriterResult {
        let mut stream = self.stream.borrow_mut();
        for item in items {
            serde_json::to_writer(&mut *stream, item)
                .map_err(|err| BatchError::ItemWriter(err.to_string()))?;
            stream
                .write_all(b"\n")
                .map_err(|err| BatchError::ItemWriter(err.to_string()))?;
        }
        Ok(())
    }

    fn flush(&self) -> ItemWriterResult {
        self.stream
            .borrow_mut()
            .flush()
            .map_err(|err| BatchError::ItemWriter(err.to_string()))
    }

    fn destination(&self) -> String {
        String::from("console")
    }
}
