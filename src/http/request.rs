//! Request parser state machine.
//!
//! # State Transitions
//! ```text
//! Initialized → ParsingHeaders: request line parsed
//! ParsingHeaders → ParsingHeaders: one field line parsed
//! ParsingHeaders → Done: empty line parsed
//! Done → (error): any further parse attempt
//! any state → (failed): a rejected line; every later call errors
//! ```
//!
//! # Design Decisions
//! - States only move forward; `Done` is terminal
//! - The first error poisons the parser; every later call fails
//! - `parse` is handed the whole unconsumed buffer and returns how many
//!   bytes it consumed; the caller owns the buffer and trims it
//! - Progress continues within one call, so several lines completed by a
//!   single read are all consumed at once

use serde::Serialize;

use crate::http::error::{ParseError, ParseResult};
use crate::http::headers::{FieldStatus, Headers};
use crate::http::request_line::RequestLine;
use crate::http::Status;

/// Parser progress through a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Initialized,
    ParsingHeaders,
    Done,
}

/// A fully parsed request head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    request_line: RequestLine,
    headers: Headers,
}

impl Request {
    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    pub fn method(&self) -> &str {
        &self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    pub fn http_version(&self) -> &str {
        &self.request_line.http_version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }
}

/// Incremental request parser.
///
/// Feed it the unconsumed bytes with [`parse`](Self::parse), drop the
/// reported number of bytes from the front of your buffer, append more
/// input, and repeat until [`is_done`](Self::is_done).
#[derive(Debug)]
pub struct RequestParser {
    state: ParserState,
    request_line: Option<RequestLine>,
    headers: Headers,
    failed: bool,
}

impl RequestParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Initialized,
            request_line: None,
            headers: Headers::new(),
            failed: false,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ParserState::Done
    }

    /// True once a parse step has been rejected.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Advance as far as `data` allows. Returns the bytes consumed.
    ///
    /// Zero means more input is needed. Calling this after `Done` always
    /// fails with [`ParseError::AlreadyDone`]; calling it after an error
    /// always fails with [`ParseError::Failed`].
    pub fn parse(&mut self, data: &[u8]) -> ParseResult<usize> {
        if self.failed {
            return Err(ParseError::Failed);
        }
        if self.is_done() {
            return Err(ParseError::AlreadyDone);
        }

        let mut total = 0;
        while !self.is_done() {
            let consumed = match self.parse_single(&data[total..]) {
                Ok(consumed) => consumed,
                Err(err) => {
                    self.failed = true;
                    self.request_line = None;
                    self.headers = Headers::new();
                    return Err(err);
                }
            };
            if consumed == 0 {
                break;
            }
            total += consumed;
        }
        Ok(total)
    }

    fn parse_single(&mut self, data: &[u8]) -> ParseResult<usize> {
        match self.state {
            ParserState::Initialized => match RequestLine::parse(data)? {
                Status::Incomplete => Ok(0),
                Status::Complete { value, consumed } => {
                    tracing::debug!(
                        method = %value.method,
                        target = %value.target,
                        "Request line parsed"
                    );
                    self.request_line = Some(value);
                    self.state = ParserState::ParsingHeaders;
                    Ok(consumed)
                }
            },
            ParserState::ParsingHeaders => match self.headers.parse(data)? {
                FieldStatus::Incomplete => Ok(0),
                FieldStatus::Field { consumed } => Ok(consumed),
                FieldStatus::End { consumed } => {
                    tracing::debug!(header_count = self.headers.len(), "Header section complete");
                    self.state = ParserState::Done;
                    Ok(consumed)
                }
            },
            ParserState::Done => Err(ParseError::AlreadyDone),
        }
    }

    /// Mark the header section finished without its closing empty line.
    ///
    /// Only possible once the request line is known; used for lenient
    /// end-of-stream handling.
    pub fn finish_headers(&mut self) -> ParseResult<()> {
        if self.failed {
            return Err(ParseError::Failed);
        }
        match self.state {
            ParserState::ParsingHeaders => {
                self.state = ParserState::Done;
                Ok(())
            }
            ParserState::Initialized => Err(ParseError::UnexpectedEof(self.state)),
            ParserState::Done => Ok(()),
        }
    }

    /// Take the completed request.
    ///
    /// Fails with [`ParseError::UnexpectedEof`] if the parser has not
    /// reached `Done`, or [`ParseError::Failed`] after an error.
    pub fn into_request(self) -> ParseResult<Request> {
        if self.failed {
            return Err(ParseError::Failed);
        }
        match (self.state, self.request_line) {
            (ParserState::Done, Some(request_line)) => Ok(Request {
                request_line,
                headers: self.headers,
            }),
            (state, _) => Err(ParseError::UnexpectedEof(state)),
        }
    }
}

impl Default for RequestParser {
    fn default() -> Self {
        Self::new()
    }
}
