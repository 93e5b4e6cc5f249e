//! HTTP/1.1 request head parsing.
//!
//! # Data Flow
//! ```text
//! unconsumed bytes (owned by the stream driver)
//!     → request.rs (state machine, decides which parser runs)
//!     → request_line.rs (first line: method, target, version)
//!     → headers.rs (one field line per call, until the empty line)
//!     → Request (immutable, handed to the caller)
//! ```
//!
//! # Design Decisions
//! - Parsers never own input; they report how many bytes they consumed
//! - Missing CRLF means "need more data", never an error
//! - No bodies, chunked encoding, trailers or header folding

pub mod error;
pub mod headers;
pub mod request;
pub mod request_line;

pub use error::{ParseError, ParseResult, RequestPart};
pub use headers::{FieldStatus, Headers};
pub use request::{ParserState, Request, RequestParser};
pub use request_line::RequestLine;

/// Line terminator.
pub(crate) const CRLF: &[u8] = b"\r\n";

/// Outcome of a parse step that may need more input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status<T> {
    /// No complete line yet; nothing consumed.
    Incomplete,
    /// Parsed `value` out of the first `consumed` bytes.
    Complete { value: T, consumed: usize },
}

impl<T> Status<T> {
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Status::Incomplete)
    }
}

/// Offset of the first CRLF in `data`.
pub(crate) fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(CRLF.len()).position(|w| w == CRLF)
}
