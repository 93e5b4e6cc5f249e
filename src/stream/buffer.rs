//! Accumulation buffer for read-but-unconsumed bytes.
//!
//! # Design Decisions
//! - Capacity at least doubles when a read would overflow it
//! - Only a validated prefix is ever removed; a trailing partial line
//!   stays at the front for the next parse attempt

/// Growable byte store owned by one stream driver.
#[derive(Debug)]
pub struct AccumulationBuffer {
    data: Vec<u8>,
}

impl AccumulationBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Append freshly read bytes, growing the storage if needed.
    pub fn extend(&mut self, chunk: &[u8]) {
        let needed = self.data.len() + chunk.len();
        let capacity = self.data.capacity();
        if needed > capacity {
            let target = needed.max(capacity.saturating_mul(2));
            self.data.reserve_exact(target - self.data.len());
            tracing::trace!(
                from = capacity,
                to = self.data.capacity(),
                "Grew accumulation buffer"
            );
        }
        self.data.extend_from_slice(chunk);
    }

    /// Bytes not yet consumed by a successful parse step.
    pub fn unconsumed(&self) -> &[u8] {
        &self.data
    }

    /// Drop the first `n` bytes, shifting the rest down.
    pub fn consume(&mut self, n: usize) {
        if n >= self.data.len() {
            self.data.clear();
        } else {
            self.data.drain(..n);
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }
}
