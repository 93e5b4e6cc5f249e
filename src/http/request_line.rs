//! Request-line parsing.
//!
//! # Responsibilities
//! - Split `METHOD SP TARGET SP HTTP/1.1` into its three tokens
//! - Validate method characters and the protocol version
//! - Report "need more data" separately from malformed input
//!
//! # Design Decisions
//! - The target is opaque; it is only required to be non-empty UTF-8
//! - Only `HTTP/1.1` is accepted, no version negotiation

use serde::Serialize;

use crate::http::error::{ParseError, ParseResult, RequestPart};
use crate::http::{find_crlf, Status, CRLF};

const VERSION_PREFIX: &[u8] = b"HTTP/";
const SUPPORTED_VERSION: &[u8] = b"1.1";

/// The first line of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestLine {
    pub method: String,
    pub target: String,
    /// Version without the `HTTP/` prefix, always `"1.1"`.
    pub http_version: String,
}

impl RequestLine {
    /// Parse the line preceding the first CRLF in `data`.
    pub fn parse(data: &[u8]) -> ParseResult<Status<RequestLine>> {
        let Some(line_end) = find_crlf(data) else {
            return Ok(Status::Incomplete);
        };

        let parts: Vec<&[u8]> = data[..line_end].split(|&b| b == b' ').collect();
        let &[method, target, protocol] = parts.as_slice() else {
            return Err(ParseError::RequestLineParts(parts.len()));
        };

        validate_method(method)?;
        if target.is_empty() {
            return Err(ParseError::EmptyToken(RequestPart::Target));
        }
        let version = validate_protocol(protocol)?;

        Ok(Status::Complete {
            value: RequestLine {
                method: to_text(method, RequestPart::Method)?,
                target: to_text(target, RequestPart::Target)?,
                http_version: to_text(version, RequestPart::ProtocolVersion)?,
            },
            consumed: line_end + CRLF.len(),
        })
    }
}

fn validate_method(method: &[u8]) -> ParseResult<()> {
    if method.is_empty() {
        return Err(ParseError::EmptyToken(RequestPart::Method));
    }
    match method.iter().position(|b| !b.is_ascii_uppercase()) {
        Some(index) => Err(ParseError::InvalidMethodChar {
            byte: method[index],
            index,
        }),
        None => Ok(()),
    }
}

fn validate_protocol(protocol: &[u8]) -> ParseResult<&[u8]> {
    let Some(version) = protocol.strip_prefix(VERSION_PREFIX) else {
        return Err(ParseError::ProtocolPrefix(
            String::from_utf8_lossy(protocol).into_owned(),
        ));
    };
    if version != SUPPORTED_VERSION {
        return Err(ParseError::UnsupportedVersion(
            String::from_utf8_lossy(version).into_owned(),
        ));
    }
    Ok(version)
}

fn to_text(bytes: &[u8], part: RequestPart) -> ParseResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| ParseError::InvalidUtf8(part))
}
