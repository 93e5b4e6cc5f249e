//! Stream driver: pulls bytes from a source and runs the parser.
//!
//! # Responsibilities
//! - Read chunks from a blocking or async byte source
//! - Append them to the accumulation buffer and trim what was consumed
//! - Apply the end-of-stream policy and the buffer limit
//! - Tag read failures with the stage they happened in
//!
//! # Design Decisions
//! - One driver per stream; nothing is shared between drivers
//! - The first error ends the parse, no resynchronization
//! - Bytes after the header section are left unread
//! - Async reads can be bounded by a timeout; expiry is a read failure

use std::io::{self, Read};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::Instrument;

use crate::config::{EofPolicy, ParserConfig};
use crate::http::{ParseError, ParseResult, ParserState, Request, RequestParser};
use crate::stream::buffer::AccumulationBuffer;

const READ_STAGE: &str = "reading request";

/// Global counter for stream IDs.
/// Relaxed ordering is enough since only uniqueness matters.
static STREAM_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifier attached to the tracing span of one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(u64);

impl StreamId {
    pub fn new() -> Self {
        Self(STREAM_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for StreamId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stream-{}", self.0)
    }
}

/// Buffer plus parser for a single stream, independent of how bytes arrive.
#[derive(Debug)]
pub struct StreamDriver {
    id: StreamId,
    buffer: AccumulationBuffer,
    parser: RequestParser,
    max_buffered_bytes: usize,
    eof_policy: EofPolicy,
}

impl StreamDriver {
    pub fn new(config: &ParserConfig) -> Self {
        Self {
            id: StreamId::new(),
            buffer: AccumulationBuffer::with_capacity(config.initial_buffer_capacity),
            parser: RequestParser::new(),
            max_buffered_bytes: config.max_buffered_bytes,
            eof_policy: config.eof_policy,
        }
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn state(&self) -> ParserState {
        self.parser.state()
    }

    pub fn is_done(&self) -> bool {
        self.parser.is_done()
    }

    /// Bytes currently held but not consumed.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Append a chunk and advance the parser as far as it can go.
    pub fn push(&mut self, chunk: &[u8]) -> ParseResult<()> {
        self.buffer.extend(chunk);

        let consumed = self.parser.parse(self.buffer.unconsumed())?;
        if consumed > 0 {
            self.buffer.consume(consumed);
            tracing::trace!(consumed, remaining = self.buffer.len(), "Consumed bytes");
        }

        if !self.is_done() && self.buffer.len() > self.max_buffered_bytes {
            return Err(ParseError::BufferLimitExceeded {
                buffered: self.buffer.len(),
                limit: self.max_buffered_bytes,
            });
        }
        Ok(())
    }

    /// Produce the request once the source is finished or the parser is done.
    pub fn finish(mut self) -> ParseResult<Request> {
        if !self.is_done() {
            tracing::debug!(
                state = ?self.parser.state(),
                buffered = self.buffer.len(),
                policy = ?self.eof_policy,
                "End of stream before request completed"
            );
            match self.eof_policy {
                EofPolicy::Strict => return Err(ParseError::UnexpectedEof(self.parser.state())),
                EofPolicy::Lenient => self.parser.finish_headers()?,
            }
        }
        if !self.buffer.is_empty() {
            tracing::trace!(discarded = self.buffer.len(), "Discarding bytes after header section");
        }
        self.parser.into_request()
    }
}

/// Parse one request from a blocking reader with default settings.
pub fn request_from_reader<R: Read>(reader: R) -> ParseResult<Request> {
    request_from_reader_with(reader, &ParserConfig::default())
}

/// Parse one request from a blocking reader.
///
/// `Ok(0)` from the reader is end-of-stream. `Interrupted` reads are retried.
pub fn request_from_reader_with<R: Read>(
    mut reader: R,
    config: &ParserConfig,
) -> ParseResult<Request> {
    let mut driver = StreamDriver::new(config);
    let span = tracing::debug_span!("parse_request", stream_id = driver.id().as_u64());
    let _enter = span.enter();

    let mut chunk = vec![0u8; config.read_chunk_size.max(1)];
    while !driver.is_done() {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(log_failure(ParseError::read(READ_STAGE, e))),
        };
        tracing::trace!(bytes = n, "Read chunk");
        driver.push(&chunk[..n]).map_err(log_failure)?;
    }

    let request = driver.finish().map_err(log_failure)?;
    tracing::debug!(method = %request.method(), target = %request.target(), "Request parsed");
    Ok(request)
}

/// Parse one request from an async reader.
///
/// Dropping the returned future cancels the parse. When
/// `read_timeout_ms` is set, a read that stalls longer fails with an
/// `io::ErrorKind::TimedOut` read error.
pub async fn request_from_async_reader<R>(reader: R, config: &ParserConfig) -> ParseResult<Request>
where
    R: AsyncRead + Unpin,
{
    let driver = StreamDriver::new(config);
    let span = tracing::debug_span!("parse_request", stream_id = driver.id().as_u64());
    drive_async(reader, driver, config).instrument(span).await
}

async fn drive_async<R>(
    mut reader: R,
    mut driver: StreamDriver,
    config: &ParserConfig,
) -> ParseResult<Request>
where
    R: AsyncRead + Unpin,
{
    let timeout = config.read_timeout_ms.map(Duration::from_millis);
    let mut chunk = vec![0u8; config.read_chunk_size.max(1)];

    while !driver.is_done() {
        let result = match timeout {
            Some(limit) => match tokio::time::timeout(limit, reader.read(&mut chunk)).await {
                Ok(result) => result,
                Err(_) => Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("no data within {}ms", limit.as_millis()),
                )),
            },
            None => reader.read(&mut chunk).await,
        };
        let n = match result {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(log_failure(ParseError::read(READ_STAGE, e))),
        };
        tracing::trace!(bytes = n, "Read chunk");
        driver.push(&chunk[..n]).map_err(log_failure)?;
    }

    let request = driver.finish().map_err(log_failure)?;
    tracing::debug!(method = %request.method(), target = %request.target(), "Request parsed");
    Ok(request)
}

fn log_failure(err: ParseError) -> ParseError {
    tracing::warn!(error = %err, part = %err.part(), "Request parse failed");
    err
}
