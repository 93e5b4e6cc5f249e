//! Parse error definitions.
//!
//! # Design Decisions
//! - Every error is terminal: the parser never retries or resynchronizes
//! - "Need more data" is not an error; it is reported through `Status`
//!   and `FieldStatus` instead
//! - Read failures keep the source `io::Error` and the stage that failed

use std::fmt;

use thiserror::Error;

use crate::http::request::ParserState;

/// The part of the request an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPart {
    Request,
    RequestLine,
    Method,
    Target,
    Protocol,
    ProtocolVersion,
    Header,
}

impl fmt::Display for RequestPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestPart::Request => "request",
            RequestPart::RequestLine => "request line",
            RequestPart::Method => "method",
            RequestPart::Target => "request target",
            RequestPart::Protocol => "protocol",
            RequestPart::ProtocolVersion => "protocol version",
            RequestPart::Header => "header",
        };
        f.write_str(name)
    }
}

/// Errors produced while parsing a request from a byte stream.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The byte source failed with something other than end-of-stream.
    #[error("failed {stage}: {source}")]
    Read {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Request line did not split into method, target and version.
    #[error("request line contains {0} parts when expecting 3 parts")]
    RequestLineParts(usize),

    /// Method or target token is empty.
    #[error("{0} is empty")]
    EmptyToken(RequestPart),

    /// Method contains a byte outside `A`-`Z`.
    #[error("character '{}' at index {index} of HTTP method is not valid", escape_byte(.byte))]
    InvalidMethodChar { byte: u8, index: usize },

    /// Version token does not start with `HTTP/`.
    #[error("protocol {0:?} does not start with \"HTTP/\"")]
    ProtocolPrefix(String),

    /// Version is present but not `1.1`.
    #[error("HTTP version {0} is not supported")]
    UnsupportedVersion(String),

    /// Field line has no `:`.
    #[error("field line does not contain a ':' separator")]
    MissingSeparator,

    /// Field line starts with `:`.
    #[error("field name is empty")]
    EmptyFieldName,

    /// Field name has a space right before the `:`.
    #[error("field name must not end with whitespace")]
    FieldNameWhitespace,

    /// A token, name or value is not valid UTF-8.
    #[error("{0} is not valid UTF-8")]
    InvalidUtf8(RequestPart),

    /// Parse attempted after the parser reached `Done`.
    #[error("parser is already finished")]
    AlreadyDone,

    /// Parser used again after it rejected earlier input.
    #[error("parser failed on earlier input")]
    Failed,

    /// Stream ended before the request was complete.
    #[error("stream ended before the request was complete (state: {0:?})")]
    UnexpectedEof(ParserState),

    /// Unconsumed bytes grew past the configured limit.
    #[error("buffered {buffered} bytes without completing a line (limit {limit})")]
    BufferLimitExceeded { buffered: usize, limit: usize },
}

impl ParseError {
    /// Which part of the request this error concerns.
    pub fn part(&self) -> RequestPart {
        match self {
            ParseError::Read { .. }
            | ParseError::AlreadyDone
            | ParseError::Failed
            | ParseError::UnexpectedEof(_)
            | ParseError::BufferLimitExceeded { .. } => RequestPart::Request,
            ParseError::RequestLineParts(_) => RequestPart::RequestLine,
            ParseError::EmptyToken(part) | ParseError::InvalidUtf8(part) => *part,
            ParseError::InvalidMethodChar { .. } => RequestPart::Method,
            ParseError::ProtocolPrefix(_) => RequestPart::Protocol,
            ParseError::UnsupportedVersion(_) => RequestPart::ProtocolVersion,
            ParseError::MissingSeparator
            | ParseError::EmptyFieldName
            | ParseError::FieldNameWhitespace => RequestPart::Header,
        }
    }

    /// Wrap a byte source failure, tagged with the stage it happened in.
    pub(crate) fn read(stage: &'static str, source: std::io::Error) -> Self {
        ParseError::Read { stage, source }
    }
}

/// Printable form of a raw byte: ASCII as-is, anything else as `\xNN`.
fn escape_byte(byte: &u8) -> std::ascii::EscapeDefault {
    std::ascii::escape_default(*byte)
}

/// Result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;
