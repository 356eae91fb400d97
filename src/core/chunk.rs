#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ChunkStatus {
    /// More items fit in the chunk.
    Continuable,
    /// The chunk reached its size and must be written.
    Full,
    /// The reader is exhausted; the chunk holds the trailing items, if any.
    Finished,
}

/// Accumulates read items until the configured chunk size is reached.
#[derive(Debug)]
pub struct Chunk<T> {
    items: Vec<T>,
    status: ChunkStatus,
    chunk_size: usize,
}

impl<T> Chunk<T> {
    pub fn new(chunk_size: usize) -> Chunk<T> {
        let chunk_size = chunk_size.max(1);
        Chunk {
            items: Vec::with_capacity(chunk_size),
            status: ChunkStatus::Continuable,
            chunk_size,
        }
    }

    /// Appends an item and reports whether the chunk is now full.
    pub fn push(&mut self, item: T) -> ChunkStatus {
        debug_assert!(self.items.len() < self.chunk_size);
        self.items.push(item);

        self.status = if self.items.len() == self.chunk_size {
            ChunkStatus::Full
        } else {
            ChunkStatus::Continuable
        };
        self.status
    }

    pub fn finish(&mut self) {
        self.status = ChunkStatus::Finished;
    }

    pub fn get_items(&self) -> &[T] {
        &self.items
    }

    pub fn get_status(&self) -> ChunkStatus {
        self.status
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
