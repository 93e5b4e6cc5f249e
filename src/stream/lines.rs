//! Newline-delimited line splitting over a chunked byte source.
//!
//! Lines are cut at `\n` (the `\n` is dropped, a preceding `\r` is kept)
//! and decoded lossily. A trailing line without `\n` is emitted once the
//! source ends, unless it is empty.

use std::collections::VecDeque;
use std::io::{self, Read};
use std::mem;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;

/// Read size used by the line splitters.
pub const LINE_CHUNK_SIZE: usize = 8;

const LINE_CHANNEL_CAPACITY: usize = 16;

/// Iterator over the lines of a blocking reader.
///
/// A read error is yielded once and ends the iteration.
#[derive(Debug)]
pub struct LineReader<R> {
    reader: R,
    chunk: Vec<u8>,
    pending: Vec<u8>,
    ready: VecDeque<String>,
    finished: bool,
}

impl<R: Read> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, LINE_CHUNK_SIZE)
    }

    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk: vec![0; chunk_size.max(1)],
            pending: Vec::new(),
            ready: VecDeque::new(),
            finished: false,
        }
    }
}

impl<R: Read> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.ready.pop_front() {
                return Some(Ok(line));
            }
            if self.finished {
                return None;
            }
            match self.reader.read(&mut self.chunk) {
                Ok(0) => {
                    self.finished = true;
                    if !self.pending.is_empty() {
                        return Some(Ok(decode(mem::take(&mut self.pending))));
                    }
                }
                Ok(n) => split_chunk(&self.chunk[..n], &mut self.pending, &mut self.ready),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Read lines from an async source on a background task.
///
/// The task stops early if the receiver is dropped. Must be called from
/// within a tokio runtime.
pub fn spawn_lines<R>(mut reader: R) -> mpsc::Receiver<io::Result<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut chunk = [0u8; LINE_CHUNK_SIZE];
        let mut pending = Vec::new();
        let mut ready = VecDeque::new();

        loop {
            match reader.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => {
                    split_chunk(&chunk[..n], &mut pending, &mut ready);
                    while let Some(line) = ready.pop_front() {
                        if tx.send(Ok(line)).await.is_err() {
                            tracing::trace!("Line receiver dropped");
                            return;
                        }
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed reading lines");
                    let _ = tx.send(Err(e)).await;
                    return;
                }
            }
        }

        if !pending.is_empty() {
            let _ = tx.send(Ok(decode(pending))).await;
        }
    });

    rx
}

fn split_chunk(chunk: &[u8], pending: &mut Vec<u8>, ready: &mut VecDeque<String>) {
    let mut parts = chunk.split(|&b| b == b'\n').peekable();
    while let Some(part) = parts.next() {
        pending.extend_from_slice(part);
        if parts.peek().is_some() {
            ready.push_back(decode(mem::take(pending)));
        }
    }
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(line) => line,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
