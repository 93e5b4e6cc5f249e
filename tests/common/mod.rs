//! Shared utilities for integration tests.

use std::io::{self, Read};

/// Reader that returns at most `per_read` bytes per call, like a socket
/// delivering a request in small segments.
#[allow(dead_code)]
pub struct ChunkReader {
    data: Vec<u8>,
    per_read: usize,
    pos: usize,
}

#[allow(dead_code)]
impl ChunkReader {
    pub fn new(data: impl AsRef<[u8]>, per_read: usize) -> Self {
        Self {
            data: data.as_ref().to_vec(),
            per_read,
            pos: 0,
        }
    }
}

impl Read for ChunkReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let end = (self.pos + self.per_read).min(self.data.len());
        let n = (end - self.pos).min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Reader that replays a fixed list of segments, one per read.
#[allow(dead_code)]
pub struct ScriptedReader {
    segments: Vec<Vec<u8>>,
    next: usize,
}

#[allow(dead_code)]
impl ScriptedReader {
    pub fn new(segments: &[&[u8]]) -> Self {
        Self {
            segments: segments.iter().map(|s| s.to_vec()).collect(),
            next: 0,
        }
    }
}

impl Read for ScriptedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(segment) = self.segments.get(self.next) else {
            return Ok(0);
        };
        assert!(buf.len() >= segment.len(), "read buffer smaller than segment");
        buf[..segment.len()].copy_from_slice(segment);
        self.next += 1;
        Ok(segment.len())
    }
}

/// Reader that serves `data` and then fails instead of signalling end-of-stream.
#[allow(dead_code)]
pub struct FailingReader {
    inner: ChunkReader,
    kind: io::ErrorKind,
}

#[allow(dead_code)]
impl FailingReader {
    pub fn new(data: impl AsRef<[u8]>, kind: io::ErrorKind) -> Self {
        Self {
            inner: ChunkReader::new(data, 8),
            kind,
        }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf)? {
            0 => Err(io::Error::new(self.kind, "source failed")),
            n => Ok(n),
        }
    }
}

/// Reader that fails with `Interrupted` before every successful read.
#[allow(dead_code)]
pub struct InterruptingReader {
    inner: ChunkReader,
    interrupt_next: bool,
    pub interruptions: usize,
}

#[allow(dead_code)]
impl InterruptingReader {
    pub fn new(data: impl AsRef<[u8]>, per_read: usize) -> Self {
        Self {
            inner: ChunkReader::new(data, per_read),
            interrupt_next: true,
            interruptions: 0,
        }
    }
}

impl Read for InterruptingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.interrupt_next {
            self.interrupt_next = false;
            self.interruptions += 1;
            return Err(io::Error::new(io::ErrorKind::Interrupted, "signal"));
        }
        self.interrupt_next = true;
        self.inner.read(buf)
    }
}

/// A representative request with several fields.
#[allow(dead_code)]
pub const FULL_REQUEST: &str = "GET /coffee HTTP/1.1\r\n\
Host: localhost:42069\r\n\
User-Agent: curl/7.81.0\r\n\
Accept: */*\r\n\
\r\n";
